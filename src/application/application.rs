use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;

use crate::application::runtime_config::RuntimeConfigError;
use crate::application::watcher::WatchError;
use crate::application::{Reporter, RuntimeConfig, Watcher};
use crate::cli::Cli;
use crate::config::{Config, ConfigCreationError};
use crate::namespace::FsNamespace;

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let file_config = Config::read(cli.config.as_deref())
            .await
            .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", file_config);

        let runtime_config = RuntimeConfig::resolve(cli, file_config).context(RuntimeConfigSnafu)?;
        debug!("Effective settings: {:?}", runtime_config);

        let namespace = FsNamespace;
        let mut reporter = Reporter::stdout();
        Watcher::new(&namespace, &runtime_config)
            .run(&mut reporter)
            .await
            .context(WatchSnafu)?;

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigCreationError },
    #[snafu(display("Critical failure encountered while resolving settings"))]
    RuntimeConfigError { source: RuntimeConfigError },
    #[snafu(display("Critical failure encountered while watching the namespace"))]
    WatchError { source: WatchError },
}
