//! CLI module for reelsmith
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// reelsmith - narrated short videos from a prompt
///
/// Generates a story, voices it, fits a background clip to the narration
/// and burns in timed captions.
#[derive(Parser, Debug)]
#[command(name = "reelsmith")]
#[command(about = "Turn a prompt and a background clip into a captioned, narrated video")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Configuration file (default: ./reelsmith.toml when present)
    #[arg(long, global = true, env = "REELSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline
    Run(args::RunArgs),
    /// Generate a story and print it
    Story(args::StoryArgs),
    /// Caption an existing narration file
    Captions(args::CaptionsArgs),
    /// Print the duration of a WAV file
    Probe(args::ProbeArgs),
}
