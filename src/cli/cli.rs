use std::path::PathBuf;

use clap::Parser;

use crate::application::data::LogLevel;

/// Watch a key namespace for structural and timestamp changes.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Namespace root to watch (a directory)
    #[clap(long, short)]
    pub root: Option<String>,

    /// Key below the root to snapshot; empty watches the root itself
    #[clap(long, short)]
    pub path: Option<String>,

    /// Only watch these children of the starting key (repeatable)
    #[clap(long, short)]
    pub filter: Vec<String>,

    /// How many levels below the starting key to expand
    #[clap(long, short = 'd')]
    pub max_depth: Option<u32>,

    /// Seconds between snapshots
    #[clap(long, short, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many comparisons instead of running until interrupted
    #[clap(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cycles: Option<u64>,

    /// Print the baseline snapshot before watching
    #[clap(long)]
    pub show_tree: bool,

    /// Config file; defaults to keywatch.yaml in the working directory if present
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,
}
