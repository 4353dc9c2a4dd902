use std::ops::Deref;

use crate::{
    error::ValidationError,
    stylesheet::{Node, Rule, StyleSheet},
};

/// A stylesheet without syntax errors and with at least one keyframes rule.
#[derive(Debug, Clone)]
pub struct ValidatedStyleSheet(StyleSheet);

impl ValidatedStyleSheet {
    pub fn into_inner(self) -> StyleSheet {
        self.0
    }
}

impl Deref for ValidatedStyleSheet {
    type Target = StyleSheet;

    fn deref(&self) -> &StyleSheet {
        &self.0
    }
}

/// Check that `node` can be converted.
///
/// Every syntax error is logged as a warning before failing.
pub fn validate(node: Node) -> Result<ValidatedStyleSheet, ValidationError> {
    let sheet = match node {
        Node::StyleSheet(sheet) => sheet,
        node => return Err(ValidationError::NotAStylesheet(node.kind())),
    };
    if !sheet.errors.is_empty() {
        for err in sheet.errors.iter() {
            log::warn!("{}", err);
        }
        return Err(ValidationError::HasParsingErrors(sheet.errors));
    }
    if !sheet.rules.iter().any(|rule| matches!(rule, Rule::Keyframes(_))) {
        return Err(ValidationError::NoKeyframesFound);
    }
    Ok(ValidatedStyleSheet(sheet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use crate::stylesheet::{self, NodeKind, ParseErrorKind};

    thread_local! {
        static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
    }

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            RECORDS.with_borrow_mut(|x| x.push((record.level(), record.args().to_string())));
        }

        fn flush(&self) {}
    }

    static CAPTURE_LOGGER: CaptureLogger = CaptureLogger;

    /// Run `f` and return the log records it emitted on this thread.
    fn with_captured_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<(log::Level, String)>) {
        let _ = log::set_logger(&CAPTURE_LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
        RECORDS.with_borrow_mut(|x| x.clear());
        let ret = f();
        (ret, RECORDS.take())
    }

    #[test]
    fn accepts_keyframes() {
        let sheet = validate(stylesheet::parse("@keyframes a { from { top: 0 } }")).unwrap();
        assert_eq!(sheet.keyframes().count(), 1);
        assert_eq!(sheet.into_inner().rules.len(), 1);
    }

    #[test]
    fn rejects_lone_rule() {
        let StyleSheet { mut rules, .. } = StyleSheet::parse_str("@keyframes a { from { top: 0 } }");
        let err = validate(Node::from(rules.remove(0))).unwrap_err();
        assert!(matches!(err, ValidationError::NotAStylesheet(NodeKind::Rule)));
    }

    #[test]
    fn rejects_parse_errors_first() {
        let err = validate(stylesheet::parse(".a { color: red }}")).unwrap_err();
        let ValidationError::HasParsingErrors(errors) = err else {
            panic!("expected parsing errors");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ParseErrorKind::UnexpectedToken);
    }

    #[test]
    fn warns_once_per_parse_error() {
        let node = stylesheet::parse("} @keyframes a { from { top: 0 } } ]");
        let (ret, records) = with_captured_logs(|| validate(node));
        let ValidationError::HasParsingErrors(errors) = ret.unwrap_err() else {
            panic!("expected parsing errors");
        };
        assert_eq!(errors.len(), 2);
        let warnings: Vec<_> = records
            .into_iter()
            .filter(|(level, _)| *level == log::Level::Warn)
            .map(|(_, msg)| msg)
            .collect();
        let expected: Vec<_> = errors.iter().map(|x| x.to_string()).collect();
        assert_eq!(warnings, expected);
    }

    #[test]
    fn no_warnings_without_parse_errors() {
        let node = stylesheet::parse(".a { color: red }");
        let (ret, records) = with_captured_logs(|| validate(node));
        assert!(matches!(ret, Err(ValidationError::NoKeyframesFound)));
        assert!(records.iter().all(|(level, _)| *level != log::Level::Warn));
    }

    #[test]
    fn rejects_without_keyframes() {
        let err = validate(stylesheet::parse(".a { animation: spin 1s }")).unwrap_err();
        assert!(matches!(err, ValidationError::NoKeyframesFound));
        let err = validate(stylesheet::parse("")).unwrap_err();
        assert!(matches!(err, ValidationError::NoKeyframesFound));
    }
}
