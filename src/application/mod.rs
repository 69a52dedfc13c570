mod application;
pub mod data;
mod report;
mod runtime_config;
mod watcher;

pub use application::{Application, ApplicationError};
pub use report::Reporter;
pub use runtime_config::RuntimeConfig;
pub use watcher::Watcher;
