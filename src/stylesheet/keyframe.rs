use compact_str::CompactString;
use itertools::Itertools;

use super::*;

/// An `@keyframes` rule, possibly vendor-prefixed.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframesRule {
    pub name: CompactString,
    /// The prefix before `keyframes`, e.g. `-webkit-`.
    pub vendor: Option<CompactString>,
    pub blocks: Vec<KeyframeBlock>,
    pub location: Location,
}

/// One `<selectors> { <declarations> }` entry inside an `@keyframes` rule.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeBlock {
    /// Raw selector tokens such as `from`, `to` or `50%`.
    pub selectors: Vec<CompactString>,
    pub declarations: Vec<Declaration>,
    pub location: Location,
}

/// Returns the vendor prefix (possibly empty) if `at_keyword` names a keyframes rule.
pub(super) fn keyframes_vendor(at_keyword: &str) -> Option<&str> {
    let split = at_keyword.len().checked_sub("keyframes".len())?;
    if !at_keyword.is_char_boundary(split) {
        return None;
    }
    let (vendor, keyword) = at_keyword.split_at(split);
    if !keyword.eq_ignore_ascii_case("keyframes") {
        return None;
    }
    let is_vendor = vendor.is_empty()
        || (vendor.len() > 2 && vendor.starts_with('-') && vendor.ends_with('-'));
    is_vendor.then_some(vendor)
}

impl CSSParse for KeyframesRule {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        let start = ps.position();
        let Some(Peek::AtKeyword(at_keyword)) = ps.next() else {
            return None;
        };
        let vendor = keyframes_vendor(&at_keyword)
            .filter(|x| !x.is_empty())
            .map(CompactString::new);
        let name = match ps.peek() {
            Some(Peek::Ident(x)) | Some(Peek::QuotedString(x)) => {
                ps.next();
                x
            }
            _ => {
                ps.add_error(ParseErrorKind::MissingKeyframesName, start..ps.position());
                CompactString::default()
            }
        };
        let trailing_start = ps.position();
        let trailing = ps.raw_until_before(|peek| {
            matches!(peek, Peek::CurlyBlock | Peek::Semicolon | Peek::Closing)
        });
        if !trailing.is_empty() {
            ps.add_error(ParseErrorKind::UnexpectedToken, trailing_start..ps.position());
        }
        let blocks = match ps.parse_curly_block(|ps| Vec::<KeyframeBlock>::css_parse(ps)) {
            Some(blocks) => blocks.unwrap_or_default(),
            None => {
                let pos = ps.position();
                ps.add_error(ParseErrorKind::MissingBlock, pos..pos);
                if let Some(Peek::Semicolon) = ps.peek() {
                    ps.next();
                }
                vec![]
            }
        };
        let location = start..ps.position();
        log::trace!(
            "parsed @{}keyframes {:?} with {} block(s)",
            vendor.as_deref().unwrap_or_default(),
            name,
            blocks.len(),
        );
        Some(Self { name, vendor, blocks, location })
    }
}

impl CSSParse for KeyframeBlock {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        ps.peek()?;
        let start = ps.position();
        let prelude = ps.raw_until_before(|peek| matches!(peek, Peek::CurlyBlock | Peek::Semicolon));
        let selectors = if prelude.is_empty() {
            ps.add_error(ParseErrorKind::MissingSelector, start..ps.position());
            vec![]
        } else {
            prelude.split(',').map(|x| CompactString::new(x.trim())).collect_vec()
        };
        let declarations = match ps.parse_curly_block(|ps| Vec::<Declaration>::css_parse(ps)) {
            Some(declarations) => declarations.unwrap_or_default(),
            None => {
                let pos = ps.position();
                ps.add_error(ParseErrorKind::MissingBlock, start..pos);
                if let Some(Peek::Semicolon) = ps.peek() {
                    ps.next();
                }
                vec![]
            }
        };
        let location = start..ps.position();
        Some(Self { selectors, declarations, location })
    }
}
