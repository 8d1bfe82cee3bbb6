use std::path::{Path, PathBuf};

use demos_game::{ConfigError, RulesConfig, RulesLoader};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RulesFileError {
    #[error("failed to read rules file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid rules in {path}: {source}")]
    Invalid { path: PathBuf, source: ConfigError },
}

/// Reads a (possibly partial) JSON rules override from disk; a missing path
/// means the default rules.
#[derive(Debug, Clone, Default)]
pub struct FileRulesLoader {
    path: Option<PathBuf>,
}

impl FileRulesLoader {
    #[must_use]
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }
}

impl RulesLoader for FileRulesLoader {
    type Error = RulesFileError;

    fn load_rules(&self) -> Result<RulesConfig, Self::Error> {
        let Some(path) = &self.path else {
            return Ok(RulesConfig::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| RulesFileError::Io {
            path: path.clone(),
            source,
        })?;
        RulesConfig::from_json(&raw).map_err(|source| RulesFileError::Invalid {
            path: path.clone(),
            source,
        })
    }
}
