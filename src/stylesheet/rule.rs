use compact_str::CompactString;

use super::*;

/// A top-level rule that is not `@keyframes`.
///
/// Only its kind is kept; its body is checked for syntax errors and skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct OtherRule {
    pub kind: OtherRuleKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OtherRuleKind {
    Style { selector: CompactString },
    AtRule { name: CompactString },
}

impl CSSParse for OtherRule {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        let start = ps.position();
        let kind = match ps.peek()? {
            Peek::AtKeyword(name) => {
                ps.next();
                ps.skip_until_before_brace_or_semicolon();
                match ps.peek() {
                    Some(Peek::Semicolon) => {
                        ps.next();
                    }
                    Some(Peek::CurlyBlock) => {
                        ps.parse_curly_block(|_| {});
                    }
                    _ => {}
                }
                OtherRuleKind::AtRule { name }
            }
            _ => {
                let selector = ps.raw_until_before(|peek| matches!(peek, Peek::CurlyBlock | Peek::Closing));
                if ps.parse_curly_block(|_| {}).is_none() {
                    ps.add_error(ParseErrorKind::MissingBlock, start..ps.position());
                } else if selector.is_empty() {
                    ps.add_error(ParseErrorKind::MissingSelector, start..ps.position());
                }
                OtherRuleKind::Style { selector }
            }
        };
        Some(Self { kind, location: start..ps.position() })
    }
}
