//! Error types for content2html operations.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while generating a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing title heading")]
    MissingHeading,

    #[error("title has no text")]
    EmptyTitle,

    #[error("cannot overwrite {0:?}")]
    PathCollision(PathBuf),

    #[error("cannot load template: {0}")]
    TemplateLoad(String),

    #[error("render error: {0}")]
    Render(String),

    /// A registered minify function rejected its input.
    ///
    /// The pipeline's [`MinifyErrors`](crate::MinifyErrors) policy decides
    /// whether this fails the file or passes the unminified rendering through.
    #[error("cannot minify {media_type}: {reason}")]
    Minify { media_type: String, reason: String },

    #[error("no minifier registered for {0}")]
    UnsupportedMediaType(String),
}

impl Error {
    pub(crate) fn minify(media_type: &str, reason: impl fmt::Display) -> Self {
        Error::Minify {
            media_type: media_type.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline stage at which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Read,
    Render,
    Minify,
    Resolve,
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Read => "read",
            Stage::Render => "render",
            Stage::Minify => "minify",
            Stage::Resolve => "resolve",
            Stage::Write => "write",
        };
        f.write_str(name)
    }
}

/// A file-scoped failure: the offending input, the stage it reached, and why.
#[derive(Error, Debug)]
#[error("{}: {source}", path.display())]
pub struct PipelineError {
    pub path: PathBuf,
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl PipelineError {
    pub(crate) fn new(path: impl Into<PathBuf>, stage: Stage, source: Error) -> Self {
        Self {
            path: path.into(),
            stage,
            source,
        }
    }
}
