//! Stylesheet syntax tree and its `cssparser`-based parser.
//!
//! The parser never aborts. It parses as much as it can and attaches every
//! syntax error it meets to the resulting [`StyleSheet`].

use std::ops::Range;

use state::{ParseState, Peek};

pub mod keyframe;
pub mod property;
pub mod rule;

pub use keyframe::{KeyframeBlock, KeyframesRule};
pub use property::Declaration;
pub use rule::{OtherRule, OtherRuleKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub utf16_col: u32,
}

pub type Location = Range<Position>;

trait CSSParse: Sized {
    /// Do real parsing.
    ///
    /// Returns `None` if it cannot be parsed at all.
    /// Otherwise, try parse as many tokens as possible,
    /// and record syntax errors if any.
    fn css_parse(ps: &mut ParseState) -> Option<Self>;
}

impl<C: CSSParse> CSSParse for Vec<C> {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        let mut items = vec![];
        while let Some(c) = C::css_parse(ps) {
            items.push(c);
        }
        Some(items)
    }
}

/// Parse a whole stylesheet source.
pub fn parse(src: &str) -> Node {
    Node::StyleSheet(StyleSheet::parse_str(src))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    StyleSheet,
    Rule,
}

/// A syntax tree root as handed to the validator.
#[derive(Debug, Clone)]
pub enum Node {
    StyleSheet(StyleSheet),
    Rule(Rule),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::StyleSheet(_) => NodeKind::StyleSheet,
            Self::Rule(_) => NodeKind::Rule,
        }
    }
}

impl From<StyleSheet> for Node {
    fn from(sheet: StyleSheet) -> Self {
        Self::StyleSheet(sheet)
    }
}

impl From<Rule> for Node {
    fn from(rule: Rule) -> Self {
        Self::Rule(rule)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    pub rules: Vec<Rule>,
    pub errors: Vec<ParseError>,
}

impl StyleSheet {
    pub fn parse_str(src: &str) -> Self {
        let mut errors = vec![];
        let mut rules: Vec<Rule> = vec![];
        state::run(src, &mut errors, |ps| {
            while let Some(rule) = Rule::css_parse(ps) {
                rules.push(rule);
            }
        });
        Self { rules, errors }
    }

    pub fn keyframes(&self) -> impl Iterator<Item = &KeyframesRule> {
        self.rules.iter().filter_map(|rule| match rule {
            Rule::Keyframes(x) => Some(x),
            Rule::Other(_) => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Keyframes(KeyframesRule),
    Other(OtherRule),
}

impl CSSParse for Rule {
    fn css_parse(ps: &mut ParseState) -> Option<Self> {
        while let Some(Peek::Closing) = ps.peek() {
            ps.skip_component_value();
        }
        let ret = match ps.peek()? {
            Peek::AtKeyword(at_keyword) if keyframe::keyframes_vendor(&at_keyword).is_some() => {
                Self::Keyframes(CSSParse::css_parse(ps)?)
            }
            _ => Self::Other(CSSParse::css_parse(ps)?),
        };
        Some(ret)
    }
}

mod state {
    use compact_str::CompactString;
    use cssparser::{SourcePosition, Token as CSSToken};

    use super::*;

    /// A lookahead summary of the next significant token.
    #[derive(Debug, Clone, PartialEq)]
    pub(super) enum Peek {
        AtKeyword(CompactString),
        Ident(CompactString),
        QuotedString(CompactString),
        Colon,
        Semicolon,
        CurlyBlock,
        Closing,
        Other,
    }

    impl Peek {
        fn from_token(token: &CSSToken) -> Self {
            match token {
                CSSToken::AtKeyword(s) => Self::AtKeyword(CompactString::new(&**s)),
                CSSToken::Ident(s) => Self::Ident(CompactString::new(&**s)),
                CSSToken::QuotedString(s) => Self::QuotedString(CompactString::new(&**s)),
                CSSToken::Colon => Self::Colon,
                CSSToken::Semicolon => Self::Semicolon,
                CSSToken::CurlyBracketBlock => Self::CurlyBlock,
                CSSToken::CloseCurlyBracket
                | CSSToken::CloseParenthesis
                | CSSToken::CloseSquareBracket => Self::Closing,
                _ => Self::Other,
            }
        }
    }

    enum Trivia {
        WhiteSpace,
        Comment,
        Significant,
    }

    enum Skipped {
        Plain,
        Error(ParseErrorKind),
        Block(char, ParseErrorKind),
    }

    pub(super) fn run(src: &str, errors: &mut Vec<ParseError>, f: impl FnOnce(&mut ParseState)) {
        let mut input = cssparser::ParserInput::new(src);
        let mut parser = cssparser::Parser::new(&mut input);
        let mut comments = vec![];
        let mut ps = ParseState {
            parser: &mut parser,
            errors,
            comments: &mut comments,
        };
        f(&mut ps);
        while ps.skip_component_value().is_some() {
            // empty
        }
    }

    /// Remove the `comments` byte ranges (ascending) from `raw`.
    ///
    /// Whitespace directly after a removed comment is dropped when the kept text already
    /// ends with whitespace, so `a /* c */ b` becomes `a b`.
    pub(super) fn strip_comments(raw: &str, comments: impl Iterator<Item = Range<usize>>) -> String {
        let mut ret = String::with_capacity(raw.len());
        let mut kept_from = 0;
        for comment in comments {
            if comment.start < kept_from {
                continue;
            }
            ret.push_str(&raw[kept_from..comment.start]);
            kept_from = comment.end;
            if ret.ends_with(|c: char| c.is_ascii_whitespace()) {
                let rest = &raw[kept_from..];
                kept_from += rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_whitespace()).len();
            }
        }
        ret.push_str(&raw[kept_from..]);
        ret
    }

    fn parser_position(parser: &cssparser::Parser<'_, '_>) -> Position {
        let p = parser.current_source_location();
        Position {
            line: p.line,
            utf16_col: p.column.saturating_sub(1),
        }
    }

    pub(super) struct ParseState<'a, 'b, 'c> {
        parser: &'c mut cssparser::Parser<'a, 'b>,
        errors: &'c mut Vec<ParseError>,
        /// Byte ranges of the comments consumed so far.
        comments: &'c mut Vec<Range<usize>>,
    }

    impl<'a, 'b, 'c> ParseState<'a, 'b, 'c> {
        pub(super) fn add_error(&mut self, kind: ParseErrorKind, location: Location) {
            self.errors.push(ParseError { kind, location })
        }

        pub(super) fn position(&self) -> Position {
            parser_position(self.parser)
        }

        /// Skip whitespace and comments.
        ///
        /// Comments that run into the end of input are reported.
        fn skip_trivia(&mut self) {
            loop {
                let state = self.parser.state();
                let start_src = self.parser.position();
                let start = self.position();
                let trivia = match self.parser.next_including_whitespace_and_comments() {
                    Ok(CSSToken::WhiteSpace(_)) => Trivia::WhiteSpace,
                    Ok(CSSToken::Comment(_)) => Trivia::Comment,
                    Ok(_) => Trivia::Significant,
                    Err(_) => break,
                };
                match trivia {
                    Trivia::WhiteSpace => {}
                    Trivia::Comment => {
                        let text = self.parser.slice_from(start_src);
                        let end_src = start_src.byte_index() + text.len();
                        self.comments.push(start_src.byte_index()..end_src);
                        if text.len() < 4 || !text.ends_with("*/") {
                            let location = start..self.position();
                            self.add_error(ParseErrorKind::UnterminatedComment, location);
                        }
                    }
                    Trivia::Significant => {
                        self.parser.reset(&state);
                        break;
                    }
                }
            }
        }

        /// Get the next significant token without advancing the cursor.
        ///
        /// Whitespace and comments before it are consumed.
        pub(super) fn peek(&mut self) -> Option<Peek> {
            self.skip_trivia();
            let state = self.parser.state();
            let ret = match self.parser.next() {
                Err(_) => None,
                Ok(token) => Some(Peek::from_token(token)),
            };
            self.parser.reset(&state);
            ret
        }

        /// Consume the next significant token.
        ///
        /// Blocks must go through `parse_curly_block` or `skip_component_value` instead.
        pub(super) fn next(&mut self) -> Option<Peek> {
            self.skip_trivia();
            match self.parser.next() {
                Err(_) => None,
                Ok(token) => Some(Peek::from_token(token)),
            }
        }

        /// Consume one component value, descending into blocks and functions.
        ///
        /// Returns `None` at the end of input (or the end of the current block).
        pub(super) fn skip_component_value(&mut self) -> Option<()> {
            self.skip_trivia();
            let start = self.position();
            let skipped = match self.parser.next() {
                Err(_) => return None,
                Ok(CSSToken::BadString(_)) => Skipped::Error(ParseErrorKind::BadString),
                Ok(CSSToken::BadUrl(_)) => Skipped::Error(ParseErrorKind::BadUrl),
                Ok(CSSToken::CloseCurlyBracket)
                | Ok(CSSToken::CloseParenthesis)
                | Ok(CSSToken::CloseSquareBracket) => Skipped::Error(ParseErrorKind::UnexpectedToken),
                Ok(CSSToken::Function(_)) | Ok(CSSToken::ParenthesisBlock) => {
                    Skipped::Block(')', ParseErrorKind::UnmatchedParenthesis)
                }
                Ok(CSSToken::SquareBracketBlock) => {
                    Skipped::Block(']', ParseErrorKind::UnmatchedBracket)
                }
                Ok(CSSToken::CurlyBracketBlock) => {
                    Skipped::Block('}', ParseErrorKind::UnmatchedBrace)
                }
                Ok(_) => Skipped::Plain,
            };
            let location = start..self.position();
            match skipped {
                Skipped::Plain => {}
                Skipped::Error(kind) => self.add_error(kind, location),
                Skipped::Block(closing, kind) => {
                    let _ = self.nested((closing, kind, location), |ps| {
                        while ps.skip_component_value().is_some() {}
                    });
                }
            }
            Some(())
        }

        pub(super) fn skip_until_before(&mut self, mut stop: impl FnMut(&Peek) -> bool) {
            while let Some(peek) = self.peek() {
                if stop(&peek) {
                    break;
                }
                self.skip_component_value();
            }
        }

        pub(super) fn skip_until_before_semicolon(&mut self) {
            self.skip_until_before(|peek| matches!(peek, Peek::Semicolon));
        }

        pub(super) fn skip_until_before_brace_or_semicolon(&mut self) {
            self.skip_until_before(|peek| {
                matches!(peek, Peek::Semicolon | Peek::CurlyBlock | Peek::Closing)
            });
        }

        /// Like `skip_until_before`, but returns the trimmed source text consumed.
        ///
        /// Comments are removed from the text.
        pub(super) fn raw_until_before(&mut self, mut stop: impl FnMut(&Peek) -> bool) -> CompactString {
            self.skip_trivia();
            let start: SourcePosition = self.parser.position();
            let first_comment = self.comments.len();
            let mut end = start;
            while let Some(peek) = self.peek() {
                if stop(&peek) {
                    break;
                }
                self.skip_component_value();
                end = self.parser.position();
            }
            let base = start.byte_index();
            let raw = self.parser.slice(start..end);
            let comments = self.comments[first_comment..]
                .iter()
                .filter(|x| x.start >= base && x.end <= base + raw.len())
                .map(|x| (x.start - base)..(x.end - base));
            CompactString::new(strip_comments(raw, comments).trim())
        }

        /// Parse the content of the `{ ... }` block at the cursor.
        ///
        /// Returns `None` if the cursor is not at a curly block.
        pub(super) fn parse_curly_block<R>(&mut self, f: impl FnOnce(&mut ParseState) -> R) -> Option<R> {
            match self.peek() {
                Some(Peek::CurlyBlock) => {}
                _ => return None,
            }
            let start = self.position();
            let _ = self.parser.next();
            let location = start..self.position();
            self.nested(('}', ParseErrorKind::UnmatchedBrace, location), f)
        }

        /// Parse the content of the block whose opening token was just consumed.
        ///
        /// The block must be terminated by `closing`, otherwise an error of `kind` is
        /// reported at `location`.
        fn nested<R>(
            &mut self,
            (closing, kind, location): (char, ParseErrorKind, Location),
            f: impl FnOnce(&mut ParseState) -> R,
        ) -> Option<R> {
            let errors = &mut *self.errors;
            let comments = &mut *self.comments;
            let mut content_end = None;
            let ret = self
                .parser
                .parse_nested_block::<_, _, ()>(|parser| {
                    let mut ps = ParseState { parser, errors, comments };
                    let r = f(&mut ps);
                    while ps.skip_component_value().is_some() {
                        // empty
                    }
                    content_end = Some(ps.parser.position());
                    Ok(r)
                })
                .ok();
            let closed = content_end
                .is_some_and(|end| self.parser.slice_from(end).starts_with(closing));
            if !closed {
                self.add_error(kind, location);
            }
            ret
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Range<Position>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "style sheet parsing error at {}:{}-{}:{}: {}",
            self.location.start.line + 1,
            self.location.start.utf16_col + 1,
            self.location.end.line + 1,
            self.location.end.utf16_col + 1,
            self.kind,
        )
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn code(&self) -> u32 {
        self.kind.clone() as u32
    }
}

#[repr(u32)]
#[derive(Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnexpectedToken = 0x10001,
    BadString,
    BadUrl,
    UnmatchedBrace,
    UnmatchedBracket,
    UnmatchedParenthesis,
    UnterminatedComment,
    MissingBlock,
    MissingKeyframesName,
    MissingSelector,
    MissingColon,
}

impl ParseErrorKind {
    fn static_message(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::BadString => "invalid string",
            Self::BadUrl => "invalid URL",
            Self::UnmatchedBrace => "unmatched curly bracket",
            Self::UnmatchedBracket => "unmatched square bracket",
            Self::UnmatchedParenthesis => "unmatched parenthesis",
            Self::UnterminatedComment => "end of comment missing",
            Self::MissingBlock => "missing '{'",
            Self::MissingKeyframesName => "@keyframes missing name",
            Self::MissingSelector => "selector missing",
            Self::MissingColon => "property missing ':'",
        }
    }
}

impl std::fmt::Debug for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self.static_message())
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.static_message())
    }
}
