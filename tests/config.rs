use std::path::Path;

use keyframes2json::{config::ConfigFile, error::ArgumentError, DuplicateNames, PathPair};

#[tokio::test]
async fn load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keyframes2json.toml");
    std::fs::write(&path, "duplicate-names = \"overwrite\"\npretty = true\n").unwrap();
    let config = ConfigFile::load(&path).await.unwrap();
    assert_eq!(config.duplicate_names, DuplicateNames::Overwrite);
    assert!(config.options().pretty);
}

#[tokio::test]
async fn bad_config_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigFile::load(&dir.path().join("none.toml")).await.unwrap_err();
    assert!(matches!(err, ArgumentError::ConfigRead { .. }));

    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "colour = \"red\"\n").unwrap();
    let err = ConfigFile::load(&path).await.unwrap_err();
    assert!(matches!(err, ArgumentError::ConfigParse { .. }));
}

#[test]
fn paths_are_resolved_against_base() {
    let pair = PathPair::resolve(Path::new("../css/a.css"), Path::new("out/a.json"), Path::new("/srv/bin")).unwrap();
    assert_eq!(pair.input, Path::new("/srv/css/a.css"));
    assert_eq!(pair.output, Path::new("/srv/bin/out/a.json"));

    let pair = PathPair::resolve(Path::new("/abs/a.css"), Path::new("a.json"), Path::new("/srv")).unwrap();
    assert_eq!(pair.input, Path::new("/abs/a.css"));
}

#[test]
fn extensions_are_checked() {
    let err = PathPair::resolve(Path::new("a.scss"), Path::new("a.json"), Path::new("/")).unwrap_err();
    assert!(matches!(err, ArgumentError::InputExtension(_)));
    let err = PathPair::resolve(Path::new("a.css"), Path::new("a.js"), Path::new("/")).unwrap_err();
    assert!(matches!(err, ArgumentError::OutputExtension(_)));
}
