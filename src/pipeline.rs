//! The conversion pipeline: read, parse, validate, transform, serialize, write.
//!
//! Each step consumes the previous stage and produces the next one. A failing step
//! ends the run, so the output file is written only after every other step succeeded.

use std::path::Path;

use crate::{
    animation::{self, AnimationMap},
    config::{ConvertOptions, RunConfig},
    error::ConvertError,
    stylesheet::{self, Node},
    validate::{validate, ValidatedStyleSheet},
};

pub enum Stage {
    Idle,
    Parsed(Node),
    Validated(ValidatedStyleSheet),
    Transformed(AnimationMap),
    Serialized(Vec<u8>),
    Done,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Parsed(_) => "parsed",
            Self::Validated(_) => "validated",
            Self::Transformed(_) => "transformed",
            Self::Serialized(_) => "serialized",
            Self::Done => "done",
        }
    }
}

pub struct Pipeline<'a> {
    config: &'a RunConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a RunConfig) -> Self {
        Self { config }
    }

    /// Perform the transition out of `stage`.
    pub async fn advance(&self, stage: Stage) -> Result<Stage, ConvertError> {
        let RunConfig { paths, options } = self.config;
        let next = match stage {
            Stage::Idle => {
                let src = tokio::fs::read_to_string(&paths.input)
                    .await
                    .map_err(|source| ConvertError::Read { path: paths.input.clone(), source })?;
                Stage::Parsed(stylesheet::parse(&src))
            }
            Stage::Parsed(node) => Stage::Validated(validate(node)?),
            Stage::Validated(sheet) => {
                Stage::Transformed(animation::collect(&sheet, options.duplicate_names)?)
            }
            Stage::Transformed(map) => Stage::Serialized(map.to_json(options.pretty)?),
            Stage::Serialized(bytes) => {
                tokio::fs::write(&paths.output, bytes)
                    .await
                    .map_err(|source| ConvertError::Write { path: paths.output.clone(), source })?;
                Stage::Done
            }
            Stage::Done => Stage::Done,
        };
        log::debug!("Pipeline stage: {}", next.name());
        Ok(next)
    }

    /// Run every step; returns the path of the written file.
    pub async fn run(&self) -> Result<&'a Path, ConvertError> {
        let mut stage = Stage::Idle;
        while !matches!(stage, Stage::Done) {
            stage = self.advance(stage).await?;
        }
        Ok(self.config.paths.output.as_path())
    }
}

/// Convert stylesheet source to animations, without any file I/O.
pub fn convert_str(src: &str, options: &ConvertOptions) -> Result<AnimationMap, ConvertError> {
    let sheet = validate(stylesheet::parse(src))?;
    Ok(animation::collect(&sheet, options.duplicate_names)?)
}
