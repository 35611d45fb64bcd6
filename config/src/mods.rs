use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// error handling for the curation engine
#[derive(Debug, Error)]
pub enum CurationError {
    #[error("ERROR: {0:?} does not exist")]
    MissingPath(PathBuf),
    #[error("ERROR: invalid input: {0}")]
    InvalidInput(String),
    #[error("ERROR: could not parse {batch} at line {line}: {reason}")]
    Parse {
        batch: String,
        line: usize,
        reason: String,
    },
    #[error("ERROR: factor has to be >= 1, got {0}")]
    InvalidFactor(f64),
    #[error("ERROR: percentile has to be within [0, 100], got {0}")]
    InvalidPercentile(f64),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// error handling for CLI
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    Curation(#[from] CurationError),
}

/// Which record provides identifier and description when
/// several records share the same sequence.
///
/// Tags are always unioned; this only decides the descriptive fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RetentionPolicy {
    /// the first record seen keeps its fields
    #[default]
    FirstSeen,
    /// every later duplicate overwrites the fields
    LastSeen,
    /// a duplicate overwrites the fields only if it carries more tags
    MostAnnotated,
}

impl FromStr for RetentionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" | "first-seen" => Ok(RetentionPolicy::FirstSeen),
            "last" | "last-seen" => Ok(RetentionPolicy::LastSeen),
            "most-tags" | "most-annotated" => Ok(RetentionPolicy::MostAnnotated),
            _ => Err(format!(
                "unknown retention policy '{}' [expected first, last or most-tags]",
                s
            )),
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::FirstSeen => write!(f, "first"),
            RetentionPolicy::LastSeen => write!(f, "last"),
            RetentionPolicy::MostAnnotated => write!(f, "most-tags"),
        }
    }
}
