//! Run configuration: the optional TOML config file and the resolved paths.

use std::path::{Path, PathBuf};

use crate::{
    animation::DuplicateNames,
    error::ArgumentError,
    utils::{has_suffix, normalize_path},
};

/// Where relative command line paths are resolved from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolveFrom {
    /// The directory holding the running executable.
    #[default]
    Executable,
    /// The current working directory.
    WorkingDir,
}

/// Content of a `--config` TOML file.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct ConfigFile {
    pub duplicate_names: DuplicateNames,
    pub pretty: bool,
    pub resolve_from: ResolveFrom,
    pub log_level: Option<log::LevelFilter>,
}

impl ConfigFile {
    pub fn parse_str(src: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(src)
    }

    pub async fn load(path: &Path) -> Result<Self, ArgumentError> {
        let src = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ArgumentError::ConfigRead { path: path.to_path_buf(), source })?;
        Self::parse_str(&src).map_err(|source| ArgumentError::ConfigParse { path: path.to_path_buf(), source })
    }

    pub fn options(&self) -> ConvertOptions {
        ConvertOptions {
            duplicate_names: self.duplicate_names,
            pretty: self.pretty,
        }
    }
}

/// Options of the conversion itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    pub duplicate_names: DuplicateNames,
    pub pretty: bool,
}

/// The input stylesheet and output JSON paths, fixed for a whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl PathPair {
    /// Join both paths to `base`, normalize them and check their extensions.
    pub fn resolve(input: &Path, output: &Path, base: &Path) -> Result<Self, ArgumentError> {
        let input = normalize_path(&base.join(input));
        let output = normalize_path(&base.join(output));
        if !has_suffix(&input, ".css") {
            return Err(ArgumentError::InputExtension(input));
        }
        if !has_suffix(&output, ".json") {
            return Err(ArgumentError::OutputExtension(output));
        }
        Ok(Self { input, output })
    }
}

/// The directory relative paths are resolved from.
pub fn base_dir(resolve_from: ResolveFrom) -> Result<PathBuf, ArgumentError> {
    match resolve_from {
        ResolveFrom::Executable => {
            let exe = std::env::current_exe().map_err(ArgumentError::BaseDirectory)?;
            exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                ArgumentError::BaseDirectory(std::io::Error::other("executable has no parent directory"))
            })
        }
        ResolveFrom::WorkingDir => std::env::current_dir().map_err(ArgumentError::BaseDirectory),
    }
}

/// Everything a single conversion run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub paths: PathPair,
    pub options: ConvertOptions,
}
