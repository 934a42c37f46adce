//! Error reporting, latching, and the fatal path.
//!
//! Every bridge failure funnels through [`ErrorReporter::report`]. The
//! reporter emits a `tracing` event at the severity's level, latches the
//! error as the host's most recent one, and then either returns it to the
//! caller ([`FailurePolicy::Raise`]) or swallows it
//! ([`FailurePolicy::Latch`], the default) so the caller can poll
//! [`error_encountered`](ErrorReporter::error_encountered) /
//! [`error_string`](ErrorReporter::error_string) instead.
//!
//! [`Severity::Fatal`] is reserved for unrecoverable internal states and
//! terminates the process after logging.

use std::cell::RefCell;

use crate::error::HostError;

/// How serious a report is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Critical,
    Fatal,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
            Severity::Fatal => "fatal",
        }
    }
}

/// What `report` does with a non-fatal error, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// `report` returns the error to the caller.
    Raise,
    /// `report` latches the error and returns `Ok`; the caller polls.
    #[default]
    Latch,
}

/// Single-threaded error sink for one host instance.
pub struct ErrorReporter {
    policy: FailurePolicy,
    last: RefCell<Option<HostError>>,
}

impl ErrorReporter {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            last: RefCell::new(None),
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Clear the latch. The host calls this at the start of each public
    /// operation so the latch reflects the most recent one only.
    pub fn clear(&self) {
        self.last.borrow_mut().take();
    }

    pub fn error_encountered(&self) -> bool {
        self.last.borrow().is_some()
    }

    pub fn error_string(&self) -> Option<String> {
        self.last.borrow().as_ref().map(|e| e.to_string())
    }

    pub fn last_error(&self) -> Option<HostError> {
        self.last.borrow().clone()
    }

    /// Record a failure. Fatal reports never return.
    pub fn report(&self, severity: Severity, error: HostError) -> Result<(), HostError> {
        match severity {
            Severity::Debug => tracing::debug!(kind = error.kind(), "{error}"),
            Severity::Info => tracing::info!(kind = error.kind(), "{error}"),
            Severity::Warning => tracing::warn!(kind = error.kind(), "{error}"),
            Severity::Critical => tracing::error!(kind = error.kind(), "{error}"),
            Severity::Fatal => {
                tracing::error!(kind = error.kind(), "fatal: {error}");
                std::process::abort();
            }
        }

        *self.last.borrow_mut() = Some(error.clone());
        match self.policy {
            FailurePolicy::Raise => Err(error),
            FailurePolicy::Latch => Ok(()),
        }
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}
