//! Declaration merging.

use std::collections::HashMap;

use compact_str::CompactString;

use crate::stylesheet::Declaration;

/// Property name to value mapping of one keyframe block.
///
/// Iteration follows the position where each property first appeared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(CompactString, CompactString)>,
    /// Position of each property in `entries`.
    index: HashMap<CompactString, usize>,
}

impl Properties {
    /// Set `property`, replacing the value of an existing entry in place.
    pub fn insert(&mut self, property: CompactString, value: CompactString) {
        match self.index.get(&property) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(property.clone(), self.entries.len());
                self.entries.push((property, value));
            }
        }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.index.get(property).map(|&i| self.entries[i].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fold declarations in source order; a later declaration of a property wins.
pub fn merge(declarations: &[Declaration]) -> Properties {
    declarations.iter().fold(Properties::default(), |mut acc, decl| {
        acc.insert(decl.property.clone(), decl.value.clone());
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_declaration_wins() {
        let merged = merge(&[
            Declaration::new("opacity", "0"),
            Declaration::new("top", "0"),
            Declaration::new("opacity", "1"),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get("opacity"), Some("1"));
        let order: Vec<_> = merged.iter().collect();
        assert_eq!(order, [("opacity", "1"), ("top", "0")]);
    }

    #[test]
    fn many_properties_keep_first_position() {
        let mut declarations: Vec<_> = (0..200).map(|i| Declaration::new(format!("p{}", i), "a")).collect();
        declarations.extend((0..200).rev().map(|i| Declaration::new(format!("p{}", i), format!("{}", i))));
        let merged = merge(&declarations);
        assert_eq!(merged.len(), 200);
        assert_eq!(merged.iter().next(), Some(("p0", "0")));
        assert_eq!(merged.iter().last(), Some(("p199", "199")));
        assert_eq!(merged.get("p42"), Some("42"));
    }

    #[test]
    fn empty_block() {
        let merged = merge(&[]);
        assert!(merged.is_empty());
        assert_eq!(merged.get("opacity"), None);
    }
}
