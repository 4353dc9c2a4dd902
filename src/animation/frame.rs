//! Frame assembly from one keyframe block.

use std::rc::Rc;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::{offset, properties::Properties};

/// A single point of an animation timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub offset: f64,
    /// Shared by all frames produced from the same keyframe block.
    pub properties: Rc<Properties>,
}

/// Produce one frame per selector token, all sharing `properties`.
pub fn assemble<S: AsRef<str>>(selectors: &[S], properties: Properties) -> Vec<Frame> {
    let properties = Rc::new(properties);
    selectors
        .iter()
        .map(|token| Frame {
            offset: offset::normalize(token.as_ref()),
            properties: properties.clone(),
        })
        .collect()
}

/// Integral offsets are written as integers and non-finite ones as `null`.
fn serialize_offset<S: Serializer>(map: &mut S::SerializeMap, offset: f64) -> Result<(), S::Error> {
    const MAX_EXACT: f64 = (1u64 << 53) as f64;
    if offset.is_finite() && offset.fract() == 0. && offset.abs() <= MAX_EXACT {
        map.serialize_entry("offset", &(offset as i64))
    } else if offset.is_finite() {
        map.serialize_entry("offset", &offset)
    } else {
        map.serialize_entry("offset", &Option::<f64>::None)
    }
}

impl Serialize for Frame {
    /// A flat object: `offset` first, then every property.
    ///
    /// A property named `offset` is shadowed by the numeric offset.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        serialize_offset::<S>(&mut map, self.offset)?;
        for (property, value) in self.properties.iter().filter(|(p, _)| *p != "offset") {
            map.serialize_entry(property, value)?;
        }
        map.end()
    }
}
