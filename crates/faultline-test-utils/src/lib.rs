//! Testing utilities for the faultline workspace
//!
//! Shared fixtures, a foreign error type and log capture.

#![allow(missing_docs)]

use faultline_core::{AnyFailure, MessageCatalog, ReturnCode, Unrecoverable};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;

/// Display text of the storage layer's "no transaction" condition
pub const NO_TRANSACTION: &str = "No transaction is currently active";

/// Error type from outside the taxonomy, modelled on a storage driver
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("No transaction is currently active")]
    NoTransaction,
    #[error("record {0} not found")]
    NotFound(String),
    #[error("write failed")]
    Write(#[source] io::Error),
}

/// Unrelated foreign error type
#[derive(Debug, thiserror::Error)]
#[error("socket closed by peer")]
pub struct SocketClosed;

/// Chain of `depth` unrecoverable failures, outermost first
pub fn nested_unrecoverable(depth: usize) -> Unrecoverable {
    assert!(depth > 0, "a chain needs at least one failure");
    let mut failure = Unrecoverable::limitation(format!("level {}", depth - 1));
    for level in (0..depth - 1).rev() {
        failure = Unrecoverable::impossible_state(format!("level {level}")).caused_by(failure);
    }
    failure
}

/// Return code carrying one cause per message
pub fn return_code_with_causes(message: &str, causes: &[&str]) -> ReturnCode {
    let mut code = ReturnCode::new(message.to_string());
    for cause in causes {
        code.add_cause(Unrecoverable::environment_error((*cause).to_string()));
    }
    code
}

pub fn foreign(error: StorageError) -> AnyFailure {
    AnyFailure::foreign(error)
}

/// In-memory catalog: `(locale, template) -> translation`
#[derive(Debug, Default)]
pub struct MapCatalog {
    entries: HashMap<(String, String), String>,
}

impl MapCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, locale: &str, template: &str, translation: &str) -> Self {
        self.entries
            .insert((locale.to_string(), template.to_string()), translation.to_string());
        self
    }

    pub fn shared(self) -> Arc<dyn MessageCatalog> {
        Arc::new(self)
    }
}

impl MessageCatalog for MapCatalog {
    fn lookup(&self, locale: &str, template: &str) -> Option<String> {
        self.entries
            .get(&(locale.to_string(), template.to_string()))
            .cloned()
    }
}

// ============================================================================
// Log capture
// ============================================================================

/// Shared buffer that a fmt subscriber writes into
#[derive(Debug, Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

pub struct LogWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter(Arc::clone(&self.0))
    }
}

/// Plain-text subscriber writing every event down to `DEBUG` into `buffer`
///
/// For code that unwinds out of [`capture_logs`], e.g. a thread that dies.
pub fn log_subscriber(buffer: &LogBuffer) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish()
}

/// Run `f` with a thread-local subscriber, returning its result and the log text
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let result = tracing::subscriber::with_default(log_subscriber(&buffer), f);
    (result, buffer.contents())
}
