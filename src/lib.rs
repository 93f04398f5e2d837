//! reelsmith library
//!
//! Turns a prompt (or a ready script) and a background clip into a narrated,
//! captioned short video. The pipeline is strictly sequential and stops at
//! the first failing stage.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::{DomainError, PipelineFailure};
pub use domain::model::{CaptionSet, PipelineReport, PipelineRequest, Stage, TimeSpec};
pub use error::{ReelError, ReelResult};
