use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum JpmlError {
    #[error("{0}")]
    Config(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("XML parse error: {0}")]
    Xml(String),
    #[error("Walk error: {0}")]
    Walk(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}
impl JpmlError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JpmlError::Io {
            path: path.into(),
            source,
        }
    }
    pub(crate) fn xml(message: impl std::fmt::Display) -> Self {
        JpmlError::Xml(message.to_string())
    }
}
