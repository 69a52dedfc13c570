mod config;

pub use config::{Config, ConfigCreationError};
