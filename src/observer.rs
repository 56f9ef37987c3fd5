//! Observer trait for submission lifecycle events.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] via
//! [`crate::SubmissionController::with_observer`] to be told when an
//! attempt starts, when a blocking notice must be shown, and when the
//! attempt settles.
//!
//! # Example
//!
//! ```rust
//! use intake_client::{Notice, SubmissionObserver};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct AlertLog {
//!     shown: Mutex<Vec<String>>,
//! }
//!
//! impl SubmissionObserver for AlertLog {
//!     fn on_notice(&self, notice: &Notice) {
//!         self.shown.lock().unwrap().push(notice.message.clone());
//!     }
//! }
//! ```

use crate::outcome::{IntakeResult, Notice};
use crate::pipeline::request::IntakeField;
use std::sync::Arc;

/// Called by the controller as a submission progresses.
///
/// All methods default to no-ops. Hooks run on the task that called
/// `submit()` and must not block for long.
pub trait SubmissionObserver: Send + Sync {
    /// The controller entered the in-flight state for `field`.
    fn on_submit_start(&self, field: IntakeField) {
        let _ = field;
    }

    /// A blocking notice must be shown to the user.
    fn on_notice(&self, notice: &Notice) {
        let _ = notice;
    }

    /// The latest result was replaced.
    fn on_result(&self, result: &IntakeResult) {
        let _ = result;
    }

    /// The controller returned to idle.
    fn on_settled(&self) {}
}

/// The default observer; ignores every event.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias for the type held by the controller.
pub type Observer = Arc<dyn SubmissionObserver>;
