//! The submission controller: form state, request lifecycle, latest result.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──submit (input selected)──▶ InFlight ──(response / failure / panic)──▶ Idle
//! Idle ──submit (nothing selected)──▶ Idle   (notice only, no network call)
//! InFlight ──submit──▶ rejected, state untouched
//! ```
//!
//! The state lives behind a `std::sync::Mutex` that is only held for short,
//! synchronous sections and never across the network await, so field edits
//! and snapshots stay available while a request is outstanding. The return
//! to `Idle` is done by a drop guard: it also runs when the transport panics
//! or the `submit()` future is dropped before it completes.

use crate::config::IntakeConfig;
use crate::error::{IntakeError, TransportError};
use crate::observer::{NoopObserver, Observer, SubmissionObserver};
use crate::outcome::{IntakeResult, Notice, SubmissionOutcome};
use crate::pipeline::classify::classify;
use crate::pipeline::input::{pick_file, FileInput, IntakeForm};
use crate::pipeline::request::IntakeRequest;
use crate::pipeline::transport::{HttpTransport, IntakeTransport};
use crate::view::FormView;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Whether a request is outstanding. Governs the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    InFlight,
}

impl SubmissionState {
    pub fn is_in_flight(self) -> bool {
        self == SubmissionState::InFlight
    }
}

/// A read-only copy of the controller's state, for display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerSnapshot {
    pub form: IntakeForm,
    pub state: SubmissionState,
    pub result: Option<IntakeResult>,
}

#[derive(Debug, Default)]
struct Inner {
    form: IntakeForm,
    state: SubmissionState,
    result: Option<IntakeResult>,
}

/// Owns the form, runs submissions, and keeps the latest result.
pub struct SubmissionController {
    config: IntakeConfig,
    transport: Arc<dyn IntakeTransport>,
    observer: Observer,
    inner: Mutex<Inner>,
}

impl SubmissionController {
    /// Controller posting over HTTP to the configured endpoint.
    pub fn new(config: IntakeConfig) -> Result<Self, IntakeError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Controller using a caller-supplied transport.
    pub fn with_transport(config: IntakeConfig, transport: Arc<dyn IntakeTransport>) -> Self {
        Self {
            config,
            transport,
            observer: Arc::new(NoopObserver),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Arc<dyn SubmissionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    // ── Field edits ──────────────────────────────────────────────────────
    // Allowed at any time, including while a request is in flight. An edit
    // made mid-flight does not affect the request already sent.

    pub fn set_file(&self, file: FileInput) {
        self.lock().form.set_file(file);
    }

    /// Choose a file through the PDF-only picker.
    pub async fn load_file(&self, path: impl AsRef<Path>) -> Result<(), IntakeError> {
        let file = pick_file(path).await?;
        self.set_file(file);
        Ok(())
    }

    pub fn clear_file(&self) {
        self.lock().form.clear_file();
    }

    pub fn set_json_body(&self, text: impl Into<String>) {
        self.lock().form.set_json_body(text);
    }

    pub fn set_email_body(&self, text: impl Into<String>) {
        self.lock().form.set_email_body(text);
    }

    // ── Reads ────────────────────────────────────────────────────────────

    pub fn state(&self) -> SubmissionState {
        self.lock().state
    }

    /// The latest result, or `None` before the first attempt settles.
    pub fn result(&self) -> Option<IntakeResult> {
        self.lock().result.clone()
    }

    pub fn form(&self) -> IntakeForm {
        self.lock().form.clone()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let inner = self.lock();
        ControllerSnapshot {
            form: inner.form.clone(),
            state: inner.state,
            result: inner.result.clone(),
        }
    }

    pub fn view(&self) -> FormView {
        FormView::new(self.snapshot())
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Run one submission attempt.
    ///
    /// # Returns
    /// `Ok(outcome)` once the network step settles, whichever way it went;
    /// the outcome is also stored as the latest result and any failure is
    /// reported to the observer as a notice.
    ///
    /// # Errors
    /// * [`IntakeError::NoInputProvided`] — no slot qualified; no network
    ///   call was made and the state stays `Idle`.
    /// * [`IntakeError::SubmissionInFlight`] — another attempt is still
    ///   outstanding; nothing is changed.
    pub async fn submit(&self) -> Result<SubmissionOutcome, IntakeError> {
        let request = {
            let mut inner = self.lock();
            if inner.state.is_in_flight() {
                debug!("Submit ignored: a request is already in flight");
                return Err(IntakeError::SubmissionInFlight);
            }
            inner.result = None;
            let request = IntakeRequest::from_selection(inner.form.select());
            if request.is_some() {
                inner.state = SubmissionState::InFlight;
            }
            request
        };

        let Some(request) = request else {
            warn!("Submit without input: nothing to send");
            self.observer.on_notice(&Notice::no_input());
            return Err(IntakeError::NoInputProvided);
        };

        let _in_flight = InFlightGuard { controller: self };
        let field = request.field();
        self.observer.on_submit_start(field);
        info!("Submitting {} to {}", field, self.config.endpoint_path());

        let start = Instant::now();
        let sent = AssertUnwindSafe(self.transport.send(request))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(TransportError::Local(panic_message(panic.as_ref()))));
        let outcome = classify(sent);
        let elapsed_ms = start.elapsed().as_millis();

        match &outcome {
            SubmissionOutcome::Success(_) => info!("Intake succeeded in {}ms", elapsed_ms),
            SubmissionOutcome::ServerError { status, .. } => {
                warn!("Intake failed with status {} after {}ms", status, elapsed_ms)
            }
            SubmissionOutcome::NetworkError => {
                warn!("No response from intake endpoint after {}ms", elapsed_ms)
            }
            SubmissionOutcome::OtherError(message) => warn!("Intake error: {}", message),
        }

        let result = outcome.result();
        self.lock().result = Some(result.clone());

        if let Some(notice) = outcome.notice() {
            self.observer.on_notice(&notice);
        }
        self.observer.on_result(&result);

        Ok(outcome)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Restores `Idle` when the in-flight section ends, on every exit path.
struct InFlightGuard<'a> {
    controller: &'a SubmissionController,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.controller.lock().state = SubmissionState::Idle;
        self.controller.observer.on_settled();
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "submission panicked".to_string()
    }
}
