//! User-facing reporting capability injected into command structs.
//!
//! Commands declare a `#[cli(reporter)]` field of type [`Logger`]; the
//! application fills it before any hook runs. How messages look is up to
//! the [`Reporter`] behind the handle. The default forwards to `tracing`.

use std::fmt;
use std::sync::Arc;

/// Sink for the four user-facing message levels.
pub trait Reporter: Send + Sync {
    /// Informational message.
    fn info(&self, message: fmt::Arguments<'_>);
    /// Something unexpected that does not stop the command.
    fn warning(&self, message: fmt::Arguments<'_>);
    /// A failure.
    fn error(&self, message: fmt::Arguments<'_>);
    /// A completed operation.
    fn success(&self, message: fmt::Arguments<'_>);
}

/// Reporter emitting `tracing` events with a `status` field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, message: fmt::Arguments<'_>) {
        tracing::info!(status = "info", "{message}");
    }

    fn warning(&self, message: fmt::Arguments<'_>) {
        tracing::warn!(status = "warning", "{message}");
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        tracing::error!(status = "error", "{message}");
    }

    fn success(&self, message: fmt::Arguments<'_>) {
        tracing::info!(status = "success", "{message}");
    }
}

/// Cloneable handle to a shared [`Reporter`].
///
/// # Examples
///
/// ```rust
/// use argtree::Logger;
///
/// let logger = Logger::default();
/// logger.success(format_args!("added {}", "widget"));
/// logger.info("plain text works too");
/// ```
#[derive(Clone)]
pub struct Logger {
    inner: Arc<dyn Reporter>,
}

impl Logger {
    /// Wraps a reporter.
    #[must_use]
    pub fn new(reporter: impl Reporter + 'static) -> Self {
        Self {
            inner: Arc::new(reporter),
        }
    }

    /// Wraps an already shared reporter.
    #[must_use]
    pub const fn from_shared(reporter: Arc<dyn Reporter>) -> Self {
        Self { inner: reporter }
    }

    /// Reports an informational message.
    pub fn info(&self, message: impl fmt::Display) {
        self.inner.info(format_args!("{message}"));
    }

    /// Reports a warning.
    pub fn warning(&self, message: impl fmt::Display) {
        self.inner.warning(format_args!("{message}"));
    }

    /// Reports an error.
    pub fn error(&self, message: impl fmt::Display) {
        self.inner.error(format_args!("{message}"));
    }

    /// Reports a success.
    pub fn success(&self, message: impl fmt::Display) {
        self.inner.success(format_args!("{message}"));
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(TracingReporter)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}
