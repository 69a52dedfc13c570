use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;
use std::time::Duration;

use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::ext::BestEffortPathExt;

const CONFIG_FILE_NAME: &str = "keywatch.yaml";

fn get_default_config_path() -> PathBuf {
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Settings read from the YAML config file. Every field is optional; command
/// line flags take precedence over anything set here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub root: Option<String>,
    pub path: Option<String>,
    pub filter: Option<Vec<String>>,
    pub max_depth: Option<u32>,
    pub interval: Option<Duration>,
    pub cycles: Option<u64>,
}

impl Config {
    /// Reads `explicit`, or `keywatch.yaml` in the working directory when no
    /// path was given. Only the default file is allowed to be missing.
    pub async fn read(explicit: Option<&Path>) -> Result<Self, ConfigCreationError> {
        match explicit {
            Some(path) => Self::from_path(path.to_path_buf()).await,
            None => {
                let path = get_default_config_path();
                if !path.exists() {
                    debug!(
                        "No config file at {}, using command line only",
                        path.best_effort_path_display()
                    );
                    return Ok(Self::default());
                }
                Self::from_path(path).await
            }
        }
    }

    pub async fn from_path(path: PathBuf) -> Result<Self, ConfigCreationError> {
        debug!("Reading config file: {}", path.best_effort_path_display());
        let bytes = compio::fs::read(&path).await.context(ReadSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        debug!("Successfully read config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.best_effort_path_display(),
        })?;
        contents.as_str().try_into()
    }
}

impl TryFrom<&str> for Config {
    type Error = ConfigCreationError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let top_level = documents
            .first()
            .ok_or(ConfigCreationError::MalformedConfig)?
            .as_mapping()
            .ok_or(ConfigCreationError::TopLevelNotMap)?;

        let mut config = Config::default();
        for (key, value) in top_level {
            let Yaml::Value(Scalar::String(key)) = key else {
                debug!("Skipping non-string config key: {:?}", key);
                continue;
            };
            match &**key {
                "root" => config.root = Some(expect_string("root", value)?),
                "path" => config.path = Some(expect_string("path", value)?),
                "filter" => config.filter = Some(expect_string_list("filter", value)?),
                "max_depth" => {
                    let depth = expect_integer("max_depth", value)?;
                    config.max_depth = Some(u32::try_from(depth).ok().context(InvalidValueSnafu {
                        key: "max_depth",
                        expected: "a non-negative integer",
                    })?);
                }
                "interval" => {
                    let seconds = expect_positive("interval", value)?;
                    config.interval = Some(Duration::from_secs(seconds));
                }
                "cycles" => config.cycles = Some(expect_positive("cycles", value)?),
                other => debug!("Ignoring unknown config key '{}'", other),
            }
        }

        Ok(config)
    }
}

fn expect_string(key: &str, value: &Yaml) -> Result<String, ConfigCreationError> {
    match value {
        Yaml::Value(Scalar::String(text)) => Ok(text.to_string()),
        _ => InvalidValueSnafu {
            key,
            expected: "a string",
        }
        .fail(),
    }
}

fn expect_string_list(key: &str, value: &Yaml) -> Result<Vec<String>, ConfigCreationError> {
    match value {
        Yaml::Sequence(items) => items
            .iter()
            .map(|item| expect_string(key, item))
            .collect(),
        _ => InvalidValueSnafu {
            key,
            expected: "a list of strings",
        }
        .fail(),
    }
}

fn expect_integer(key: &str, value: &Yaml) -> Result<i64, ConfigCreationError> {
    match value {
        Yaml::Value(Scalar::Integer(number)) => Ok(*number),
        _ => InvalidValueSnafu {
            key,
            expected: "an integer",
        }
        .fail(),
    }
}

fn expect_positive(key: &str, value: &Yaml) -> Result<u64, ConfigCreationError> {
    let number = expect_integer(key, value)?;
    u64::try_from(number)
        .ok()
        .filter(|number| *number > 0)
        .context(InvalidValueSnafu {
            key,
            expected: "a positive integer",
        })
}

#[derive(Debug, Snafu)]
pub enum ConfigCreationError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
}
