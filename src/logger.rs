//! A `log` backend writing to stderr.
//!
//! Records are cached until the level is known (the config file may change it),
//! then replayed through the level filter.

use std::sync::{LazyLock, Mutex, PoisonError, RwLock};

use log::{LevelFilter, Log};

static GLOBAL_LOGGER: LazyLock<GlobalLogger> = LazyLock::new(|| GlobalLogger {
    inner: RwLock::new(LoggerKind::Cache(Default::default())),
});

enum LoggerKind {
    Cache(Mutex<Vec<LogMessage>>),
    Normal(StderrLogger),
}

struct GlobalLogger {
    inner: RwLock<LoggerKind>,
}

impl GlobalLogger {
    fn set_normal_logger(&self, logger: StderrLogger) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let old = std::mem::replace(&mut *inner, LoggerKind::Normal(logger));
        if let (LoggerKind::Cache(cache), LoggerKind::Normal(logger)) = (old, &*inner) {
            let cache = cache.into_inner().unwrap_or_else(PoisonError::into_inner);
            for log_message in cache {
                logger.log(log_message);
            }
        }
    }
}

impl Log for GlobalLogger {
    #[inline]
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        match &*self.inner.read().unwrap_or_else(PoisonError::into_inner) {
            LoggerKind::Cache(_) => true,
            LoggerKind::Normal(inner) => inner.enabled(metadata),
        }
    }

    #[inline]
    fn log(&self, record: &log::Record) {
        let log_message = LogMessage::new(record);
        match &*self.inner.read().unwrap_or_else(PoisonError::into_inner) {
            LoggerKind::Cache(inner) => {
                inner.lock().unwrap_or_else(PoisonError::into_inner).push(log_message);
            }
            LoggerKind::Normal(inner) => {
                inner.log(log_message);
            }
        }
    }

    #[inline]
    fn flush(&self) {
        // empty
    }
}

struct LogMessage {
    message: String,
    full_message: String,
    level: log::Level,
    is_current_module_message: bool,
}

impl LogMessage {
    fn new(record: &log::Record) -> Self {
        let is_current_module_message = {
            let module_path = record.module_path().unwrap_or_default();
            module_path == "keyframes2json" || module_path.starts_with("keyframes2json::")
        };
        let message = format!("{}", record.args());
        let full_message = format!(
            "[{}:{}] {}",
            record.file().unwrap_or(""),
            record.line().unwrap_or(0),
            message,
        );
        Self {
            message,
            full_message,
            level: record.level(),
            is_current_module_message,
        }
    }
}

struct StderrLogger {
    level: LevelFilter,
}

impl StderrLogger {
    #[inline]
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    /// The line to print, or `None` if the message is filtered out.
    fn render(&self, log_message: &LogMessage) -> Option<String> {
        if log_message.level > self.level {
            return None;
        }
        let prefix = match log_message.level {
            log::Level::Error => "error",
            log::Level::Warn => "warning",
            log::Level::Info => "info",
            log::Level::Debug => "debug",
            log::Level::Trace => "trace",
        };
        if log_message.is_current_module_message {
            Some(format!("{}: {}", prefix, log_message.message))
        } else if self.level >= LevelFilter::Debug {
            Some(format!("{}: {}", prefix, log_message.full_message))
        } else {
            None
        }
    }

    #[inline]
    fn log(&self, log_message: LogMessage) {
        if let Some(line) = self.render(&log_message) {
            eprintln!("{}", line);
        }
    }
}

/// Install the logger. Records are held back until [`set_level`] is called.
pub fn init() {
    if log::set_logger(&*GLOBAL_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::max());
    }
}

/// Fix the level and print the records cached so far.
pub fn set_level(level: LevelFilter) {
    GLOBAL_LOGGER.set_normal_logger(StderrLogger { level });
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(level: log::Level, own: bool) -> LogMessage {
        LogMessage {
            message: "hello".to_string(),
            full_message: "[src/x.rs:3] hello".to_string(),
            level,
            is_current_module_message: own,
        }
    }

    #[test]
    fn own_messages_are_short() {
        let logger = StderrLogger { level: LevelFilter::Info };
        assert_eq!(logger.render(&message(log::Level::Error, true)).as_deref(), Some("error: hello"));
        assert_eq!(logger.render(&message(log::Level::Warn, true)).as_deref(), Some("warning: hello"));
        assert_eq!(logger.render(&message(log::Level::Debug, true)), None);
    }

    #[test]
    fn foreign_messages_need_debug() {
        let quiet = StderrLogger { level: LevelFilter::Info };
        assert_eq!(quiet.render(&message(log::Level::Warn, false)), None);
        let verbose = StderrLogger { level: LevelFilter::Debug };
        assert_eq!(
            verbose.render(&message(log::Level::Warn, false)).as_deref(),
            Some("warning: [src/x.rs:3] hello"),
        );
    }

    #[test]
    fn record_module_detection() {
        let record = log::Record::builder()
            .args(format_args!("x"))
            .level(log::Level::Info)
            .module_path(Some("keyframes2json::pipeline"))
            .build();
        assert!(LogMessage::new(&record).is_current_module_message);
        let record = log::Record::builder()
            .args(format_args!("x"))
            .level(log::Level::Info)
            .module_path(Some("tokio::fs"))
            .build();
        assert!(!LogMessage::new(&record).is_current_module_message);
    }
}
