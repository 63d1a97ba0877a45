//! @acp:module "Errors"
//! @acp:summary "Library error type and result alias"
//! @acp:domain core
//! @acp:layer model

use std::path::PathBuf;

use thiserror::Error;

/// @acp:summary "Errors raised by the modinit library"
#[derive(Debug, Error)]
pub enum ModinitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Invalid module key {0:?}: keys must be non-empty and contain no whitespace")]
    InvalidModuleKey(String),

    #[error("Module {0:?} is already registered")]
    DuplicateRegistration(String),

    #[error("Module key {key:?} is claimed by both {} and {}", .first.display(), .second.display())]
    DuplicateModuleKey {
        key: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Module directory not found: {}", .0.display())]
    ModuleRootNotFound(PathBuf),

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ModinitError>;
