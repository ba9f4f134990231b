// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the estream push-stream library
//!
//! [`EstreamError`] serves two purposes: it is the default payload type of
//! `Error` events, and it is the error returned by the few fallible APIs
//! (replaying without history, loading invalid options).
//!
//! Pushing into an ended stream is not an error: the event is dropped.
//!
//! # Examples
//!
//! ```
//! use estream_core::{EstreamError, Result};
//!
//! fn parse_reading(raw: &str) -> Result<u32> {
//!     raw.parse()
//!         .map_err(|_| EstreamError::stream_error(format!("bad reading: {raw}")))
//! }
//!
//! assert!(parse_reading("12").is_ok());
//! assert!(parse_reading("twelve").is_err());
//! ```

use crate::stream_id::StreamId;

/// Root error type for all estream operations
#[derive(Debug, thiserror::Error)]
pub enum EstreamError {
    /// Stream processing encountered an error
    ///
    /// General purpose variant for failures that carry only a description.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong during stream processing
        context: String,
    },

    /// Custom error from user code
    ///
    /// Wraps errors produced by user-provided transformation functions and
    /// producers so they can travel downstream as `Error` events.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Multiple errors occurred
    #[error("Multiple errors occurred: {count} errors")]
    MultipleErrors {
        /// Number of errors that occurred
        count: usize,
        /// The individual errors
        errors: Vec<EstreamError>,
    },

    /// An operation needed the history buffer of a stream that keeps none
    #[error("History is disabled for {stream}")]
    HistoryDisabled {
        /// The stream the operation was attempted on
        stream: StreamId,
    },

    /// Stream options could not be loaded or are inconsistent
    #[error("Invalid stream options: {context}")]
    InvalidOptions {
        /// What was wrong with the options
        context: String,
    },
}

impl EstreamError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create an invalid options error with the given context
    pub fn invalid_options(context: impl Into<String>) -> Self {
        Self::InvalidOptions {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Aggregate multiple user errors into a `MultipleErrors` variant
    ///
    /// # Examples
    ///
    /// ```
    /// use estream_core::EstreamError;
    ///
    /// #[derive(Debug, thiserror::Error)]
    /// #[error("Custom error: {msg}")]
    /// struct CustomError {
    ///     msg: String,
    /// }
    ///
    /// let errors = vec![
    ///     CustomError { msg: "first".to_string() },
    ///     CustomError { msg: "second".to_string() },
    /// ];
    ///
    /// let result = EstreamError::from_user_errors(errors);
    /// assert!(matches!(result, EstreamError::MultipleErrors { count: 2, .. }));
    /// ```
    pub fn from_user_errors<E>(errors: Vec<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let count = errors.len();
        let errors = errors
            .into_iter()
            .map(|e| Self::UserError(Box::new(e)))
            .collect();

        Self::MultipleErrors { count, errors }
    }

    /// Check if this error was raised by estream itself rather than user code
    #[must_use]
    pub const fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::HistoryDisabled { .. } | Self::InvalidOptions { .. }
        )
    }
}

/// Specialized Result type for estream operations
pub type Result<T> = std::result::Result<T, EstreamError>;

/// Extension trait for converting errors into `EstreamError`
pub trait IntoEstreamError {
    /// Convert this error into an `EstreamError` with additional context
    fn into_estream_error(self, context: &str) -> EstreamError;

    /// Convert this error into an `EstreamError` without additional context
    fn into_estream(self) -> EstreamError
    where
        Self: Sized,
    {
        self.into_estream_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoEstreamError for E {
    fn into_estream_error(self, context: &str) -> EstreamError {
        if context.is_empty() {
            EstreamError::user_error(self)
        } else {
            EstreamError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<EstreamError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| wrap_with_context(context.into(), e.into()))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| wrap_with_context(f(), e.into()))
    }
}

fn wrap_with_context(context: String, error: EstreamError) -> EstreamError {
    match error {
        EstreamError::UserError(inner) => EstreamError::StreamProcessingError {
            context: format!("{context}: {inner}"),
        },
        other => other,
    }
}

impl Clone for EstreamError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            // The boxed source cannot be cloned, keep its rendering instead
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
            Self::MultipleErrors { count, errors } => Self::MultipleErrors {
                count: *count,
                errors: errors.clone(),
            },
            Self::HistoryDisabled { stream } => Self::HistoryDisabled { stream: *stream },
            Self::InvalidOptions { context } => Self::InvalidOptions {
                context: context.clone(),
            },
        }
    }
}

impl PartialEq for EstreamError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Self::StreamProcessingError { context: a },
                Self::StreamProcessingError { context: b },
            )
            | (Self::InvalidOptions { context: a }, Self::InvalidOptions { context: b }) => a == b,
            // Boxed sources compare by their rendering
            (Self::UserError(a), Self::UserError(b)) => a.to_string() == b.to_string(),
            (
                Self::MultipleErrors {
                    count: a,
                    errors: xs,
                },
                Self::MultipleErrors {
                    count: b,
                    errors: ys,
                },
            ) => a == b && xs == ys,
            (Self::HistoryDisabled { stream: a }, Self::HistoryDisabled { stream: b }) => a == b,
            _ => false,
        }
    }
}
