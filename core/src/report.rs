//! Structured diagnostic reporting.
//!
//! Every diagnostic the engine produces goes through a [`Reporter`]: a sink
//! receiving `(level, source, message)` triples. Three levels exist:
//!
//! - [`Level::Fatal`] — schema-definition errors; the offending type never
//!   becomes usable.
//! - [`Level::Error`] — data-level validation failures; advisory, the
//!   surrounding construction still completes.
//! - [`Level::Warn`] — benign conditions such as re-defining a type name.
//!
//! The active reporter is resolved in two stages: a thread-local scoped
//! override installed with [`with_reporter`] (useful for capturing
//! diagnostics in tests or escalating `error`-level reports into hard
//! failures), falling back to a process-global default set with
//! [`set_reporter`]. Out of the box the default is [`TracingReporter`],
//! which forwards everything to the `tracing` macros.

use std::cell::RefCell;
use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Benign condition, e.g. a type name being re-defined.
    Warn,
    /// Data-level validation failure; construction continues.
    Error,
    /// Schema-definition failure; the definition is aborted.
    Fatal,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// One recorded diagnostic.
///
/// # Examples
///
/// ```
/// use core3::{Level, Report};
///
/// let report = Report::new(Level::Warn, "core3.define", "Type User already defined");
/// assert_eq!(report.level, Level::Warn);
/// assert_eq!(report.level.to_string(), "warn");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Severity of the diagnostic.
    pub level: Level,
    /// Component that emitted it (e.g. `core3.List`).
    pub source: String,
    /// Human-readable message; the exact strings are a stable contract.
    pub message: String,
}

impl Report {
    /// Creates a report record.
    pub fn new(level: Level, source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level,
            source: source.into(),
            message: message.into(),
        }
    }
}

/// Diagnostic sink.
pub trait Reporter: Send + Sync {
    /// Receives one diagnostic.
    fn report(&self, level: Level, source: &str, message: &str);
}

/// Default reporter forwarding diagnostics to `tracing`.
///
/// `warn` maps to [`tracing::warn!`]; `error` and `fatal` map to
/// [`tracing::error!`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, level: Level, source: &str, message: &str) {
        match level {
            Level::Warn => tracing::warn!(source, "{message}"),
            Level::Error | Level::Fatal => tracing::error!(source, %level, "{message}"),
        }
    }
}

static GLOBAL: LazyLock<RwLock<Arc<dyn Reporter>>> =
    LazyLock::new(|| RwLock::new(Arc::new(TracingReporter)));

thread_local! {
    static SCOPED: RefCell<Vec<Arc<dyn Reporter>>> = const { RefCell::new(Vec::new()) };
}

/// Replaces the process-global default reporter.
pub fn set_reporter(reporter: Arc<dyn Reporter>) {
    *GLOBAL.write().unwrap_or_else(PoisonError::into_inner) = reporter;
}

/// Runs `f` with `reporter` installed as this thread's diagnostic sink.
///
/// Overrides the global default for the duration of the call only; nesting
/// is allowed and the innermost reporter wins.
pub fn with_reporter<R>(reporter: Arc<dyn Reporter>, f: impl FnOnce() -> R) -> R {
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            SCOPED.with(|stack| {
                stack.borrow_mut().pop();
            });
        }
    }

    SCOPED.with(|stack| stack.borrow_mut().push(reporter));
    let _guard = Guard;
    f()
}

/// Dispatches a diagnostic to the active reporter.
pub fn report(level: Level, source: &str, message: &str) {
    let scoped = SCOPED.with(|stack| stack.borrow().last().cloned());
    match scoped {
        Some(reporter) => reporter.report(level, source, message),
        None => GLOBAL
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .report(level, source, message),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Sink(Mutex<Vec<Report>>);

    impl Reporter for Sink {
        fn report(&self, level: Level, source: &str, message: &str) {
            self.0
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Report::new(level, source, message));
        }
    }

    #[test]
    fn test_scoped_reporter_receives_diagnostics() {
        let sink = Arc::new(Sink::default());
        with_reporter(sink.clone(), || {
            report(Level::Error, "core3.List", "boom");
        });

        let seen = sink.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], Report::new(Level::Error, "core3.List", "boom"));
    }

    #[test]
    fn test_scoped_reporter_is_popped_after_the_closure() {
        let outer = Arc::new(Sink::default());
        let inner = Arc::new(Sink::default());
        with_reporter(outer.clone(), || {
            with_reporter(inner.clone(), || report(Level::Warn, "core3.define", "inner"));
            report(Level::Warn, "core3.define", "outer");
        });

        assert_eq!(inner.0.lock().unwrap().len(), 1);
        let outer_seen = outer.0.lock().unwrap();
        assert_eq!(outer_seen.len(), 1);
        assert_eq!(outer_seen[0].message, "outer");
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_string(&Level::Fatal).unwrap();
        assert_eq!(json, "\"fatal\"");
    }
}
