use compact_str::CompactString;

use super::*;

/// A `property: value` pair.
///
/// The value is the raw source text of the declaration value, trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: CompactString,
    pub value: CompactString,
    pub location: Location,
}

impl Declaration {
    pub fn new(property: impl Into<CompactString>, value: impl Into<CompactString>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
            location: Location::default(),
        }
    }
}

impl CSSParse for Declaration {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        loop {
            match ps.peek()? {
                Peek::Semicolon => {
                    ps.next();
                }
                Peek::Ident(property) => {
                    let start = ps.position();
                    ps.next();
                    if let Some(Peek::Colon) = ps.peek() {
                        ps.next();
                    } else {
                        ps.add_error(ParseErrorKind::MissingColon, start..ps.position());
                        ps.skip_until_before_semicolon();
                        continue;
                    }
                    let value = ps.raw_until_before(|peek| matches!(peek, Peek::Semicolon));
                    let location = start..ps.position();
                    if let Some(Peek::Semicolon) = ps.peek() {
                        ps.next();
                    }
                    return Some(Self { property, value, location });
                }
                _ => {
                    let start = ps.position();
                    ps.skip_until_before_semicolon();
                    ps.add_error(ParseErrorKind::UnexpectedToken, start..ps.position());
                }
            }
        }
    }
}
