//! Input slots and source selection.
//!
//! The form holds three independent slots. Any combination may be filled;
//! at submit time exactly one is picked by a fixed precedence:
//! file, then JSON body, then email body. A text slot only counts when it is
//! non-blank after trimming, but the selected text is sent untrimmed.
//!
//! The file slot is filled through a picker that offers `.pdf` files only.
//! The picker does not open the file to check it is really a PDF; the
//! backend owns that decision.

use crate::error::IntakeError;
use crate::pipeline::request::IntakeField;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Media type attached to files chosen through the picker.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file chosen through the picker, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct FileInput {
    /// File name sent in the multipart part's `filename` parameter.
    pub file_name: String,
    /// Media type sent as the part's `Content-Type`.
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// A file tagged `application/pdf`.
    pub fn pdf(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(file_name, PDF_MEDIA_TYPE, bytes)
    }

    /// Size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for FileInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileInput")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Whether the picker offers this path (`.pdf`, any case).
pub fn picker_accepts(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Choose a file through the PDF-only picker and load it.
pub async fn pick_file(path: impl AsRef<Path>) -> Result<FileInput, IntakeError> {
    let path = path.as_ref();

    if !picker_accepts(path) {
        return Err(IntakeError::NotAPdfFile {
            path: path.to_path_buf(),
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IntakeError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IntakeError::FileReadFailed {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());

    debug!("Picked {} ({} bytes)", file_name, bytes.len());
    Ok(FileInput::pdf(file_name, bytes))
}

/// The one input that will be transmitted, chosen by precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSelection {
    File(FileInput),
    JsonText(String),
    EmailText(String),
    /// No slot qualifies; the attempt ends without a network call.
    None,
}

impl InputSelection {
    /// The multipart field this selection is sent under.
    pub fn field(&self) -> Option<IntakeField> {
        match self {
            InputSelection::File(_) => Some(IntakeField::File),
            InputSelection::JsonText(_) => Some(IntakeField::JsonBody),
            InputSelection::EmailText(_) => Some(IntakeField::EmailBody),
            InputSelection::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, InputSelection::None)
    }
}

/// The three input slots of the form.
///
/// Slots are never cleared by a submission; they keep their values until
/// edited again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeForm {
    pub file: Option<FileInput>,
    pub json_body: String,
    pub email_body: String,
}

impl IntakeForm {
    pub fn set_file(&mut self, file: FileInput) {
        self.file = Some(file);
    }

    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn set_json_body(&mut self, text: impl Into<String>) {
        self.json_body = text.into();
    }

    pub fn set_email_body(&mut self, text: impl Into<String>) {
        self.email_body = text.into();
    }

    /// Pick the slot to transmit: file > JSON body > email body.
    pub fn select(&self) -> InputSelection {
        if let Some(ref file) = self.file {
            InputSelection::File(file.clone())
        } else if !self.json_body.trim().is_empty() {
            InputSelection::JsonText(self.json_body.clone())
        } else if !self.email_body.trim().is_empty() {
            InputSelection::EmailText(self.email_body.clone())
        } else {
            InputSelection::None
        }
    }
}
