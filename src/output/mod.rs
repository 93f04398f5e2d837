//! Caption file writing and verification module

pub mod verifier;
pub mod writer;

pub use verifier::{CaptionIssue, CaptionVerifier};
pub use writer::SrtWriter;
