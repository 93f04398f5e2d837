//! Transcoding engine
//!
//! Turns the video stages into external tool invocations.

pub mod transcode;

pub use transcode::{EncoderSettings, MediaEditor, VoiceTool};
