//! Outcome types: what one submission attempt produced.
//!
//! [`SubmissionOutcome`] is the tagged result of the network step. Both
//! consumers derive their view from it: the result store keeps an
//! [`IntakeResult`], and the observer receives a [`Notice`] on failure.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Result and notice text for an attempt that got no response.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error: No response from server";

/// Notice text when no input slot qualifies.
pub const NO_INPUT_MESSAGE: &str = "Please provide a file, JSON body, or email body.";

/// Classified result of one intake call. Exactly one variant applies.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// 2xx response. The body is kept as-is: parsed JSON, or the raw text
    /// as a JSON string when it is not JSON.
    Success(Value),
    /// A response arrived with a non-2xx status.
    ServerError { status: u16, body: String },
    /// The request went out but nothing came back (includes timeouts).
    NetworkError,
    /// Any other fault while building or dispatching the request.
    OtherError(String),
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success(_))
    }

    /// The value stored as the latest result.
    pub fn result(&self) -> IntakeResult {
        match self {
            SubmissionOutcome::Success(body) => IntakeResult::Payload(body.clone()),
            SubmissionOutcome::ServerError { status, .. } => {
                IntakeResult::error(format!("Server error: {}", status))
            }
            SubmissionOutcome::NetworkError => IntakeResult::error(NETWORK_ERROR_MESSAGE),
            SubmissionOutcome::OtherError(message) => IntakeResult::error(message.clone()),
        }
    }

    /// The blocking notice to show, if any. Successes raise none.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SubmissionOutcome::Success(_) => None,
            SubmissionOutcome::ServerError { status, body } => Some(Notice::new(
                NoticeKind::ServerError,
                format!("Server error: {} - {}", status, body),
            )),
            SubmissionOutcome::NetworkError => Some(Notice::new(
                NoticeKind::NetworkError,
                NETWORK_ERROR_MESSAGE,
            )),
            SubmissionOutcome::OtherError(message) => Some(Notice::new(
                NoticeKind::OtherError,
                format!("Error: {}", message),
            )),
        }
    }

    /// Typed view of a successful body, when it has the backend's usual shape.
    pub fn response(&self) -> Option<IntakeResponse> {
        match self {
            SubmissionOutcome::Success(body) => IntakeResponse::from_value(body),
            _ => None,
        }
    }
}

/// The latest result shown in the result panel.
///
/// Serialises to the success body itself, or to `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum IntakeResult {
    Error { error: String },
    Payload(Value),
}

impl IntakeResult {
    pub fn error(message: impl Into<String>) -> Self {
        IntakeResult::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, IntakeResult::Error { .. })
    }

    pub fn to_value(&self) -> Value {
        match self {
            IntakeResult::Error { error } => json!({ "error": error }),
            IntakeResult::Payload(body) => body.clone(),
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn render(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap_or_else(|e| e.to_string())
    }
}

/// Which failure a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    NoInputProvided,
    ServerError,
    NetworkError,
    OtherError,
}

/// A blocking, must-acknowledge message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn no_input() -> Self {
        Self::new(NoticeKind::NoInputProvided, NO_INPUT_MESSAGE)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ── Backend response shape ───────────────────────────────────────────────

/// The body the intake backend returns on success:
/// `{"classification": {...}, "extraction": {...}}`.
///
/// Purely informational. A success body of any other shape is still a
/// success; it just has no typed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub classification: Classification,
    #[serde(default)]
    pub extraction: Option<Value>,
}

/// Input format and intent as decided by the backend's classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub intent: Option<String>,
}

impl IntakeResponse {
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Error reported by the extraction agent, e.g. `"Unknown format"`.
    pub fn extraction_error(&self) -> Option<&str> {
        self.extraction
            .as_ref()
            .and_then(|e| e.get("error"))
            .and_then(Value::as_str)
    }

    /// One-line summary such as `format=Email intent=Complaint`.
    pub fn summary(&self) -> String {
        let format = self.classification.format.as_deref().unwrap_or("?");
        let intent = self.classification.intent.as_deref().unwrap_or("?");
        match self.extraction_error() {
            Some(err) => format!("format={format} intent={intent} extraction_error={err}"),
            None => format!("format={format} intent={intent}"),
        }
    }
}
