//! Request construction: one selected input → one multipart form.
//!
//! An [`IntakeRequest`] always carries exactly one field, so the "at most
//! one artifact per submission" rule is enforced by the type rather than
//! checked at runtime.

use crate::pipeline::input::{FileInput, InputSelection};
use reqwest::multipart::{Form, Part};
use std::fmt;

/// The multipart field names understood by the intake endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeField {
    File,
    JsonBody,
    EmailBody,
}

impl IntakeField {
    /// Name of the multipart field on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            IntakeField::File => "file",
            IntakeField::JsonBody => "json_body",
            IntakeField::EmailBody => "email_body",
        }
    }
}

impl fmt::Display for IntakeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ready-to-send intake request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeRequest {
    File(FileInput),
    JsonBody(String),
    EmailBody(String),
}

impl IntakeRequest {
    /// Build the request for a selection. `None` yields no request.
    pub fn from_selection(selection: InputSelection) -> Option<Self> {
        match selection {
            InputSelection::File(file) => Some(IntakeRequest::File(file)),
            InputSelection::JsonText(text) => Some(IntakeRequest::JsonBody(text)),
            InputSelection::EmailText(text) => Some(IntakeRequest::EmailBody(text)),
            InputSelection::None => None,
        }
    }

    pub fn field(&self) -> IntakeField {
        match self {
            IntakeRequest::File(_) => IntakeField::File,
            IntakeRequest::JsonBody(_) => IntakeField::JsonBody,
            IntakeRequest::EmailBody(_) => IntakeField::EmailBody,
        }
    }

    /// Payload size in bytes, for logging.
    pub fn payload_len(&self) -> usize {
        match self {
            IntakeRequest::File(file) => file.len(),
            IntakeRequest::JsonBody(text) | IntakeRequest::EmailBody(text) => text.len(),
        }
    }

    /// Encode as a `multipart/form-data` body.
    ///
    /// Fails only when the file's media type is not a valid MIME string.
    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let field = self.field().as_str();
        let form = match self {
            IntakeRequest::File(file) => {
                let part = Part::bytes(file.bytes)
                    .file_name(file.file_name)
                    .mime_str(&file.media_type)?;
                Form::new().part(field, part)
            }
            IntakeRequest::JsonBody(text) | IntakeRequest::EmailBody(text) => {
                Form::new().text(field, text)
            }
        };
        Ok(form)
    }
}
