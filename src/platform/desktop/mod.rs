mod main_loop;

pub use main_loop::{load_config, start, write_config};
