//! Error conversion helpers for consumer I/O
//!
//! Provides extension traits for cleaner error handling inside step consumers.

use std::io;

use crate::application::ConsumerError;

/// Extension trait for converting `io::Result` into a consumer failure with context.
pub trait IoResultExt<T> {
    /// Add context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// writeln!(out, "{frame}").consumer_context("write frame")?;
    /// ```
    fn consumer_context(self, action: &str) -> Result<T, ConsumerError>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn consumer_context(self, action: &str) -> Result<T, ConsumerError> {
        self.map_err(|e| ConsumerError::io(action, e))
    }
}
