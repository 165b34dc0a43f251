//! Saving and restoring the primary stack between sessions.
//!
//! The stack is stored as JSON, bottom to top. JSON has no NaN or infinity,
//! so those are written as the strings `"NaN"`, `"inf"` and `"-inf"`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interpreter::Stack;

const FORMAT_VERSION: u32 = 1;
const FILE_NAME: &str = "stack.json";

/// Where the stack lives when no path is given on the command line: the
/// platform config directory, or the current directory if there isn't one.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("rpn").join(FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(format!("rpn-{}", FILE_NAME)))
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access stack file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to parse stack file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("stack file {path} has unsupported version {version}")]
    Version { path: PathBuf, version: u32 },

    #[error("failed to encode stack for {path}: {source}")]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredValue {
    Number(f64),
    Special(Special),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Special {
    #[serde(rename = "NaN")]
    Nan,
    #[serde(rename = "inf")]
    Infinity,
    #[serde(rename = "-inf")]
    NegInfinity,
}

impl From<f64> for StoredValue {
    fn from(v: f64) -> Self {
        if v.is_nan() {
            StoredValue::Special(Special::Nan)
        } else if v == f64::INFINITY {
            StoredValue::Special(Special::Infinity)
        } else if v == f64::NEG_INFINITY {
            StoredValue::Special(Special::NegInfinity)
        } else {
            StoredValue::Number(v)
        }
    }
}

impl From<StoredValue> for f64 {
    #[rustfmt::skip]
    fn from(v: StoredValue) -> Self {
        match v {
            StoredValue::Number(n)                    => n,
            StoredValue::Special(Special::Nan)         => f64::NAN,
            StoredValue::Special(Special::Infinity)    => f64::INFINITY,
            StoredValue::Special(Special::NegInfinity) => f64::NEG_INFINITY,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SavedStack {
    version: u32,
    stack: Vec<StoredValue>,
}

/// Read a saved stack. A missing file is an empty stack, not an error.
pub fn try_load(path: &Path) -> Result<Stack, PersistError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("no saved stack at {}", path.display());

            return Ok(Stack::default());
        }
        Err(source) => {
            return Err(PersistError::Io {
                path: path.to_owned(),
                source,
            })
        }
    };

    let saved: SavedStack =
        serde_json::from_str(&contents).map_err(|source| PersistError::Parse {
            path: path.to_owned(),
            source,
        })?;

    if saved.version != FORMAT_VERSION {
        return Err(PersistError::Version {
            path: path.to_owned(),
            version: saved.version,
        });
    }

    Ok(saved.stack.into_iter().map(f64::from).collect())
}

/// Read a saved stack, falling back to an empty one if it can't be used.
pub fn load(path: &Path) -> Stack {
    match try_load(path) {
        Ok(stack) => {
            info!("restored {} values from {}", stack.len(), path.display());

            stack
        }
        Err(e) => {
            warn!("starting with an empty stack: {}", e);

            Stack::default()
        }
    }
}

/// Write the stack, replacing whatever was saved before.
pub fn save(path: &Path, stack: &Stack) -> Result<(), PersistError> {
    let io_err = |source| PersistError::Io {
        path: path.to_owned(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let saved = SavedStack {
        version: FORMAT_VERSION,
        stack: stack.iter().map(StoredValue::from).collect(),
    };

    let json = serde_json::to_string_pretty(&saved).map_err(|source| PersistError::Serialize {
        path: path.to_owned(),
        source,
    })?;

    fs::write(path, json).map_err(io_err)?;

    info!("saved {} values to {}", stack.len(), path.display());

    Ok(())
}
