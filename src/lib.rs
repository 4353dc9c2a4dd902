//! Convert CSS `@keyframes` rules into a JSON map of animation frames.
//!
//! ```
//! use keyframes2json::{convert_str, ConvertOptions};
//!
//! let map = convert_str(
//!     "@keyframes fade { 0%, 50% { opacity: 0; } 100% { opacity: 1; } }",
//!     &ConvertOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(
//!     String::from_utf8(map.to_json(false).unwrap()).unwrap(),
//!     r#"{"fade":[{"offset":0,"opacity":"0"},{"offset":50,"opacity":"0"},{"offset":100,"opacity":"1"}]}"#,
//! );
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod stylesheet;
pub(crate) mod utils;
pub mod validate;

pub use animation::{AnimationMap, DuplicateNames, Frame};
pub use config::{ConfigFile, ConvertOptions, PathPair, RunConfig};
pub use error::ConvertError;
pub use pipeline::{convert_str, Pipeline};

/// Convert the input file of `config` and write the output file.
pub async fn run(config: &RunConfig) -> Result<(), ConvertError> {
    let output = Pipeline::new(config).run().await?;
    log::debug!("Wrote {}", output.display());
    Ok(())
}
