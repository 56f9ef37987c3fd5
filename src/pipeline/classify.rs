//! Outcome classification at the network-call boundary.
//!
//! This is the only place that turns transport results into
//! [`SubmissionOutcome`]s. Panics raised while dispatching are converted by
//! the controller and arrive here as [`TransportError::Local`].

use crate::error::TransportError;
use crate::outcome::SubmissionOutcome;
use crate::pipeline::transport::RawResponse;
use serde_json::Value;

/// Classify the result of one intake call.
pub fn classify(result: Result<RawResponse, TransportError>) -> SubmissionOutcome {
    match result {
        Ok(response) if response.is_success() => {
            SubmissionOutcome::Success(parse_body(&response.body))
        }
        Ok(response) => SubmissionOutcome::ServerError {
            status: response.status,
            body: response.body,
        },
        Err(TransportError::NoResponse { .. }) => SubmissionOutcome::NetworkError,
        Err(TransportError::Local(message)) => SubmissionOutcome::OtherError(message),
    }
}

/// Parse a success body as JSON, keeping non-JSON text as a JSON string.
pub fn parse_body(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
