//! Error types.
//!
//! The widget core never fails: bad indices and stale geometry are absorbed as
//! no-ops. Errors only come from the outer surfaces (terminal I/O and
//! configuration).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
