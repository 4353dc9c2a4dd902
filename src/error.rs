use std::path::PathBuf;

use crate::stylesheet::{Location, NodeKind, ParseError};

/// Problems with the command line or the config file, found before reading the input.
#[derive(thiserror::Error, Debug)]
pub enum ArgumentError {
    #[error("argument file-in must have extension .css: {}", .0.display())]
    InputExtension(PathBuf),

    #[error("argument file-out must have extension .json: {}", .0.display())]
    OutputExtension(PathBuf),

    #[error("cannot determine the base directory: {0}")]
    BaseDirectory(#[source] std::io::Error),

    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigRead { path: PathBuf, source: std::io::Error },

    #[error("invalid config file {}: {source}", .path.display())]
    ConfigParse { path: PathBuf, source: toml::de::Error },
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("ast is not of type stylesheet (found {0:?})")]
    NotAStylesheet(NodeKind),

    #[error("file has {} parse error(s)", .0.len())]
    HasParsingErrors(Vec<ParseError>),

    #[error("no keyframes rules found")]
    NoKeyframesFound,
}

#[derive(thiserror::Error, Debug)]
pub enum TransformError {
    #[error(
        "keyframes rule at {}:{} has an empty name",
        .location.start.line + 1,
        .location.start.utf16_col + 1
    )]
    EmptyName { location: Location },

    #[error("cannot serialize animations: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: std::io::Error },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

impl ConvertError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Argument(_) => 2,
            Self::Read { .. } | Self::Write { .. } => 3,
            Self::Validation(_) => 4,
            Self::Transform(_) => 5,
        }
    }
}
