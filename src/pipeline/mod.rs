//! Pipeline stages for one intake submission.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and the network step can be swapped out behind a trait.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ request ──▶ transport ──▶ classify
//! (slots)   (multipart)  (POST, 10 s)  (outcome)
//! ```
//!
//! 1. [`input`]     — the three form slots and the file > JSON > email precedence
//! 2. [`request`]   — wrap the selected input as a one-field multipart body
//! 3. [`transport`] — the single POST; the only stage with network I/O
//! 4. [`classify`]  — fold the response or failure into a
//!    [`crate::SubmissionOutcome`]

pub mod classify;
pub mod input;
pub mod request;
pub mod transport;
