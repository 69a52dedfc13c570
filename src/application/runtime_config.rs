use std::time::Duration;

use snafu::prelude::*;

use crate::cli::Cli;
use crate::config::Config;
use crate::namespace::{InvalidKeyPath, KeyPath};

const DEFAULT_MAX_DEPTH: u32 = 10;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Effective settings after merging the command line over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub root: String,
    pub start: KeyPath,
    pub filter: Option<Vec<String>>,
    pub max_depth: u32,
    pub interval: Duration,
    pub cycles: Option<u64>,
    pub show_tree: bool,
}

impl RuntimeConfig {
    pub fn resolve(cli: Cli, file: Config) -> Result<Self, RuntimeConfigError> {
        let root = cli.root.or(file.root).context(MissingRootSnafu)?;

        let raw_start = cli.path.or(file.path).unwrap_or_default();
        let start = KeyPath::parse(&raw_start).context(StartPathSnafu)?;

        let filter = if cli.filter.is_empty() {
            file.filter
        } else {
            Some(cli.filter)
        };

        Ok(Self {
            root,
            start,
            filter,
            max_depth: cli.max_depth.or(file.max_depth).unwrap_or(DEFAULT_MAX_DEPTH),
            interval: cli
                .interval
                .map(Duration::from_secs)
                .or(file.interval)
                .unwrap_or(DEFAULT_INTERVAL),
            cycles: cli.cycles.or(file.cycles),
            show_tree: cli.show_tree,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum RuntimeConfigError {
    #[snafu(display("No namespace root given; pass --root or set 'root' in the config file"))]
    MissingRoot,
    #[snafu(display("Invalid starting path"))]
    StartPathError { source: InvalidKeyPath },
}
