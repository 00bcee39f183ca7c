use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PkgDiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source error at {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: SourceError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Walk error: {0}")]
    Walk(String),
}

impl PkgDiffError {
    pub fn source_at(path: impl Into<PathBuf>, source: SourceError) -> Self {
        Self::Source {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PkgDiffError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Invalid UTF-8 content: {0}")]
    InvalidEncoding(String),
}
