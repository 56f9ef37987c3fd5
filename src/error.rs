//! Error types for the intake-client library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`IntakeError`] — the attempt never reached the network: bad
//!   configuration, a file the picker refuses, an empty form, or a second
//!   submit while one is still outstanding. Returned as `Err(IntakeError)`.
//!
//! * [`TransportError`] — the single POST was attempted but produced no
//!   response. It never escapes [`crate::SubmissionController::submit`];
//!   [`crate::pipeline::classify`] folds it into a
//!   [`crate::SubmissionOutcome`] alongside server errors and successes.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised before (or instead of) contacting the intake endpoint.
#[derive(Debug, Error)]
pub enum IntakeError {
    // ── Form errors ───────────────────────────────────────────────────────
    /// None of file / JSON body / email body holds a usable value.
    #[error("Please provide a file, JSON body, or email body.")]
    NoInputProvided,

    /// `submit()` was called while a previous attempt is still in flight.
    #[error("A submission is already in flight; wait for it to settle")]
    SubmissionInFlight,

    // ── File picker errors ────────────────────────────────────────────────
    /// The picker only offers PDF files.
    #[error("'{path}' is not a PDF file (the picker only accepts .pdf)")]
    NotAPdfFile { path: PathBuf },

    /// The chosen file does not exist.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The chosen file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of the network call itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request was dispatched but no response arrived: connection
    /// refused, reset, or the request timeout expired.
    #[error("no response from server: {reason}")]
    NoResponse { reason: String },

    /// Building or dispatching the request failed locally.
    #[error("{0}")]
    Local(String),
}

impl TransportError {
    /// Map a `reqwest` failure onto the two transport categories.
    ///
    /// Builder errors (bad URL, invalid header, unreadable multipart part)
    /// happen before anything is sent, so they are local. Everything else
    /// means a request went out and nothing usable came back.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            TransportError::Local(err.to_string())
        } else {
            TransportError::NoResponse {
                reason: err.to_string(),
            }
        }
    }
}
