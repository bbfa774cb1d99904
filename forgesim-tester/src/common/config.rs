use forgesim_game::{ConfigError, ConfigLoader, ForgeConfig};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid forge configuration")]
    Config(#[from] ConfigError),
}

/// Where the tester reads its balance table from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Builtin,
    File(PathBuf),
}

impl ConfigSource {
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Builtin, Self::File)
    }
}

impl ConfigLoader for ConfigSource {
    type Error = LoadError;

    fn load_forge_config(&self) -> Result<ForgeConfig, Self::Error> {
        match self {
            Self::Builtin => Ok(ForgeConfig::default_config()),
            Self::File(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                Ok(ForgeConfig::from_json(&raw)?)
            }
        }
    }
}
