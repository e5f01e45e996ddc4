mod desktop;

pub use desktop::{load_config, start, write_config};
