mod platform;
mod simulation;

pub use platform::{load_config, start, write_config};
pub use simulation::*;
