//! # intake-client
//!
//! Submit one artifact (a PDF file, a raw JSON payload, or a raw email body)
//! to a multi-agent intake endpoint and show what it answered.
//!
//! ## Submission Overview
//!
//! ```text
//! form slots
//!  │
//!  ├─ 1. Select    file > JSON body > email body (blank text doesn't count)
//!  ├─ 2. Request   one-field multipart/form-data body
//!  ├─ 3. Send      POST {api_base}/intake/, 10 s timeout, no retries
//!  ├─ 4. Classify  success | server error | network error | other error
//!  └─ 5. Store     latest result + blocking notice on failure
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use intake_client::{IntakeConfig, SubmissionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // INTAKE_API_URL unset ⇒ relative /intake/ against INTAKE_ORIGIN
//!     let controller = SubmissionController::new(IntakeConfig::from_env()?)?;
//!     controller.set_email_body("From: John Doe <john@example.com>\nSubject: Complaint");
//!     let outcome = controller.submit().await?;
//!     println!("{}", outcome.result().render());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `intake` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod controller;
pub mod error;
pub mod observer;
pub mod outcome;
pub mod pipeline;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{IntakeConfig, IntakeConfigBuilder};
pub use controller::{ControllerSnapshot, SubmissionController, SubmissionState};
pub use error::{IntakeError, TransportError};
pub use observer::{NoopObserver, Observer, SubmissionObserver};
pub use outcome::{
    Classification, IntakeResponse, IntakeResult, Notice, NoticeKind, SubmissionOutcome,
};
pub use pipeline::input::{FileInput, InputSelection, IntakeForm};
pub use pipeline::request::{IntakeField, IntakeRequest};
pub use pipeline::transport::{HttpTransport, IntakeTransport, RawResponse};
pub use view::FormView;
