//! Read-only display of the form and the latest result.

use crate::controller::{ControllerSnapshot, SubmissionState};
use crate::pipeline::input::IntakeForm;
use std::fmt::Write;

pub const TITLE: &str = "Multi-Agent Input Processor";
pub const SUBMIT_LABEL: &str = "Submit";
pub const PROCESSING_LABEL: &str = "Processing...";

/// Longest preview shown for a text slot.
const PREVIEW_CHARS: usize = 60;

/// A rendering of one controller snapshot.
#[derive(Debug, Clone)]
pub struct FormView {
    snapshot: ControllerSnapshot,
}

impl FormView {
    pub fn new(snapshot: ControllerSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.snapshot.state {
            SubmissionState::Idle => SUBMIT_LABEL,
            SubmissionState::InFlight => PROCESSING_LABEL,
        }
    }

    /// The submit control is disabled while a request is in flight.
    pub fn submit_enabled(&self) -> bool {
        !self.snapshot.state.is_in_flight()
    }

    /// The result panel body, or `None` when there is no result to show.
    pub fn result_panel(&self) -> Option<String> {
        self.snapshot.result.as_ref().map(|r| r.render())
    }

    /// Plain-text rendering of the whole form.
    pub fn render(&self) -> String {
        let form = &self.snapshot.form;
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        let _ = writeln!(out, "{}", "=".repeat(TITLE.len()));
        let _ = writeln!(out, "PDF file:   {}", describe_file(form));
        let _ = writeln!(out, "JSON body:  {}", preview(&form.json_body));
        let _ = writeln!(out, "Email body: {}", preview(&form.email_body));
        if self.submit_enabled() {
            let _ = writeln!(out, "[ {} ]", self.submit_label());
        } else {
            let _ = writeln!(out, "[ {} ] (disabled)", self.submit_label());
        }
        if let Some(panel) = self.result_panel() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Result");
            let _ = writeln!(out, "{panel}");
        }
        out
    }
}

fn describe_file(form: &IntakeForm) -> String {
    match &form.file {
        Some(file) => format!("{} ({} bytes)", file.file_name, file.len()),
        None => "(none)".to_string(),
    }
}

/// First line of a text slot, truncated for display.
fn preview(text: &str) -> String {
    if text.trim().is_empty() {
        return "(empty)".to_string();
    }
    let first = text.trim().lines().next().unwrap_or_default();
    let shown = truncate_text(first, PREVIEW_CHARS);
    let extra_lines = text.trim().lines().count().saturating_sub(1);
    if extra_lines > 0 {
        format!("{shown} (+{extra_lines} more lines)")
    } else {
        shown
    }
}

/// Truncate to `max_len` characters, appending `...` when cut.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
