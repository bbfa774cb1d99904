pub mod config;
pub mod scenario;
pub mod util;

pub use config::ConfigSource;
pub use util::{now_ms, split_csv};
