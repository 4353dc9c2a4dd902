//! Transformation of validated keyframes rules into named frame lists.

use std::collections::HashMap;

use compact_str::CompactString;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::{error::TransformError, stylesheet::KeyframesRule, validate::ValidatedStyleSheet};

pub mod frame;
pub mod offset;
pub mod properties;

pub use frame::Frame;
pub use properties::Properties;

/// What to do when several `@keyframes` rules share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNames {
    /// Append the later rule's frames after the earlier ones.
    #[default]
    Concatenate,
    /// Keep only the frames of the last rule with that name.
    Overwrite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub name: CompactString,
    pub frames: Vec<Frame>,
}

/// Animation name to frames, in order of first appearance of each name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationMap {
    animations: Vec<Animation>,
    /// Position of each name in `animations`.
    index: HashMap<CompactString, usize>,
}

impl AnimationMap {
    pub fn get(&self, name: &str) -> Option<&[Frame]> {
        self.index.get(name).map(|&i| self.animations[i].frames.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.animations.iter().map(|x| x.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Animation> {
        self.animations.iter()
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    fn insert(&mut self, name: CompactString, mut frames: Vec<Frame>, policy: DuplicateNames) {
        let Some(i) = self.index.get(&name).copied() else {
            self.index.insert(name.clone(), self.animations.len());
            self.animations.push(Animation { name, frames });
            return;
        };
        let existing = &mut self.animations[i];
        log::debug!("Animation {:?} is declared more than once ({:?})", name, policy);
        match policy {
            DuplicateNames::Concatenate => existing.frames.append(&mut frames),
            DuplicateNames::Overwrite => existing.frames = frames,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<Vec<u8>, TransformError> {
        let ret = if pretty {
            serde_json::to_vec_pretty(self)?
        } else {
            serde_json::to_vec(self)?
        };
        Ok(ret)
    }
}

impl Serialize for AnimationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.animations.len()))?;
        for Animation { name, frames } in &self.animations {
            map.serialize_entry(name.as_str(), frames)?;
        }
        map.end()
    }
}

/// All frames of one keyframes rule, block after block.
pub fn rule_frames(rule: &KeyframesRule) -> Vec<Frame> {
    rule.blocks
        .iter()
        .flat_map(|block| frame::assemble(&block.selectors, properties::merge(&block.declarations)))
        .collect()
}

/// Build the animation map of a validated stylesheet.
pub fn collect(sheet: &ValidatedStyleSheet, policy: DuplicateNames) -> Result<AnimationMap, TransformError> {
    let mut ret = AnimationMap::default();
    for rule in sheet.keyframes() {
        if rule.name.is_empty() {
            return Err(TransformError::EmptyName { location: rule.location.clone() });
        }
        let frames = rule_frames(rule);
        log::trace!("Collected {} frame(s) for {:?}", frames.len(), rule.name);
        ret.insert(rule.name.clone(), frames, policy);
    }
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{stylesheet, validate::validate};

    fn collect_src(src: &str, policy: DuplicateNames) -> Result<AnimationMap, TransformError> {
        let sheet = validate(stylesheet::parse(src)).unwrap();
        collect(&sheet, policy)
    }

    fn offsets(frames: &[Frame]) -> Vec<f64> {
        frames.iter().map(|x| x.offset).collect()
    }

    #[test]
    fn blocks_then_selectors_order() {
        let map = collect_src(
            "@keyframes a { 100% { top: 1px } 0%, 50% { top: 0 } } .x { color: red }",
            DuplicateNames::default(),
        )
        .unwrap();
        assert_eq!(map.names().collect::<Vec<_>>(), ["a"]);
        let frames = map.get("a").unwrap();
        assert_eq!(offsets(frames), [100., 0., 50.]);
        assert_eq!(frames[1].properties.get("top"), Some("0"));
    }

    #[test]
    fn duplicate_names_concatenate() {
        let src = "@keyframes a { from { top: 0 } } @keyframes b { to { top: 1px } } @keyframes a { to { top: 2px } }";
        let map = collect_src(src, DuplicateNames::Concatenate).unwrap();
        assert_eq!(map.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(offsets(map.get("a").unwrap()), [0., 100.]);
    }

    #[test]
    fn duplicate_names_overwrite() {
        let src = "@keyframes a { from { top: 0 } } @keyframes b { to { top: 1px } } @keyframes a { to { top: 2px } }";
        let map = collect_src(src, DuplicateNames::Overwrite).unwrap();
        assert_eq!(map.names().collect::<Vec<_>>(), ["a", "b"]);
        let frames = map.get("a").unwrap();
        assert_eq!(offsets(frames), [100.]);
        assert_eq!(frames[0].properties.get("top"), Some("2px"));
    }

    #[test]
    fn empty_rule_has_entry() {
        let map = collect_src("@keyframes idle {}", DuplicateNames::default()).unwrap();
        assert_eq!(map.get("idle").map(|x| x.len()), Some(0));
        assert_eq!(map.to_json(false).unwrap(), br#"{"idle":[]}"#);
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = collect_src(r#"@keyframes "" { from { top: 0 } }"#, DuplicateNames::default()).unwrap_err();
        assert!(matches!(err, TransformError::EmptyName { .. }));
    }

    #[test]
    fn pretty_json() {
        let map = collect_src("@keyframes a { from { top: 0 } }", DuplicateNames::default()).unwrap();
        let json = String::from_utf8(map.to_json(true).unwrap()).unwrap();
        assert_eq!(json, "{\n  \"a\": [\n    {\n      \"offset\": 0,\n      \"top\": \"0\"\n    }\n  ]\n}");
    }
}
