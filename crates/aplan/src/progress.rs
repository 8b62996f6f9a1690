//! Progress records, cooperative cancellation, and run outcomes.
//!
//! A `Reporter` forwards `Progress` records to an optional channel and mirrors each one to
//! `tracing` at the matching level, so synchronous callers get logs and task callers get both.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Stage headers and start/finish markers.
    Focus,
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub severity: Severity,
    pub message: String,
}

type Sink = Arc<dyn Fn(Progress) + Send + Sync>;

/// Progress sink handed to the engines. Cheap to clone; sending never blocks.
#[derive(Clone, Default)]
pub struct Reporter {
    sink: Option<Sink>,
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("forwarding", &self.sink.is_some())
            .finish()
    }
}

impl Reporter {
    /// Log-only reporter.
    pub fn silent() -> Self {
        Self { sink: None }
    }

    pub fn with_channel(tx: Sender<Progress>) -> Self {
        // A dropped receiver only means nobody is listening any more.
        Self::with_sink(move |p| {
            let _ = tx.send(p);
        })
    }

    pub fn with_sink(sink: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        Self {
            sink: Some(Arc::new(sink)),
        }
    }

    pub fn report(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Focus | Severity::Info => tracing::info!("{message}"),
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error => tracing::error!("{message}"),
        }
        if let Some(sink) = &self.sink {
            sink(Progress { severity, message });
        }
    }

    #[inline]
    pub fn focus(&self, message: impl Into<String>) {
        self.report(Severity::Focus, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.report(Severity::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) {
        self.report(Severity::Warning, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.report(Severity::Error, message)
    }

    /// Emit the final status line for `outcome` and pass it through.
    pub fn conclude<T>(&self, outcome: Outcome<T>) -> Outcome<T> {
        match &outcome {
            Outcome::Finished(_) | Outcome::Aborted => self.focus(outcome.status_line()),
            Outcome::Errored(e) => {
                self.error(format!("{}: {e}", outcome.status_line()));
            }
        }
        outcome
    }
}

/// Shared cancellation flag, polled between refinement and solve steps.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal state of a detection run.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<T> {
    Finished(T),
    Aborted,
    Errored(Error),
}

impl<T> Outcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Finished(t) => Outcome::Finished(f(t)),
            Outcome::Aborted => Outcome::Aborted,
            Outcome::Errored(e) => Outcome::Errored(e),
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self, Outcome::Finished(_))
    }

    pub fn finished(self) -> Option<T> {
        match self {
            Outcome::Finished(t) => Some(t),
            _ => None,
        }
    }

    /// Collapse into a `Result`; `Aborted` becomes `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, Error> {
        match self {
            Outcome::Finished(t) => Ok(Some(t)),
            Outcome::Aborted => Ok(None),
            Outcome::Errored(e) => Err(e),
        }
    }

    /// Final status line as emitted by the worker protocol.
    pub fn status_line(&self) -> &'static str {
        match self {
            Outcome::Finished(_) => ">>> FINISHED",
            Outcome::Aborted => ">>> ABORTED",
            Outcome::Errored(_) => ">>> ERROR",
        }
    }
}

/// Early-return helper: `check_cancel!(token)` yields `Outcome::Aborted` when cancelled.
macro_rules! check_cancel {
    ($cancel:expr) => {
        if $cancel.is_cancelled() {
            return $crate::progress::Outcome::Aborted;
        }
    };
}
pub(crate) use check_cancel;

/// `?` for `Outcome`-returning functions: errors become `Outcome::Errored`.
macro_rules! try_outcome {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => return $crate::progress::Outcome::Errored(e.into()),
        }
    };
}
pub(crate) use try_outcome;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn reporter_forwards_to_channel() {
        let (tx, rx) = channel();
        let r = Reporter::with_channel(tx);
        r.focus(">>> STARTED");
        r.warn("careful");
        drop(r);
        let got: Vec<Progress> = rx.iter().collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[0].severity, Severity::Focus);
        assert_eq!(got[1].message, "careful");
    }

    #[test]
    fn cancel_token_is_shared() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn outcome_helpers() {
        let o: Outcome<u32> = Outcome::Finished(2);
        assert_eq!(o.clone().map(|x| x * 2).finished(), Some(4));
        assert_eq!(o.status_line(), ">>> FINISHED");
        let a: Outcome<u32> = Outcome::Aborted;
        assert_eq!(a.into_result(), Ok(None));
        let e: Outcome<u32> = Outcome::Errored(Error::Worker("boom".into()));
        assert!(e.into_result().is_err());
    }

    #[test]
    fn conclude_reports_status_line() {
        let (tx, rx) = channel();
        let r = Reporter::with_channel(tx);
        let out = r.conclude(Outcome::<()>::Aborted);
        assert_eq!(out, Outcome::Aborted);
        let last = rx.try_recv().unwrap();
        assert_eq!(last.message, ">>> ABORTED");
        assert_eq!(last.severity, Severity::Focus);
        r.conclude(Outcome::<()>::Errored(Error::Worker("x".into())));
        assert_eq!(rx.try_recv().unwrap().severity, Severity::Error);
    }

    #[test]
    fn severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"WARNING\"");
    }
}
