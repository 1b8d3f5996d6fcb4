pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{default_config_path, expand_path, load, load_file};
pub use types::Config;
