//! Command-line argument definitions

use std::path::PathBuf;

use clap::{ArgGroup, Args};

/// Arguments for the run command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("script").required(true).args(["prompt", "script_file"])))]
pub struct RunArgs {
    /// Prompt for the text-generation backend
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Use this file as the narration instead of generating one
    #[arg(short, long)]
    pub script_file: Option<PathBuf>,

    /// Background video, looped or cut to the narration length
    #[arg(short = 'i', long)]
    pub video: PathBuf,

    /// Final video (relative paths land in the work dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for intermediate files
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Resize before burning captions, e.g. 1080x1920
    #[arg(long)]
    pub resize: Option<String>,

    /// Words per caption
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Time captions from a transcription of the narration
    #[arg(long)]
    pub transcribe: bool,

    /// Voice backend (remote, local-tool)
    #[arg(long)]
    pub voice: Option<String>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the story command
#[derive(Args, Debug)]
pub struct StoryArgs {
    /// Prompt for the text-generation backend
    #[arg(short, long)]
    pub prompt: String,
}

/// Arguments for the captions command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "text_file"])))]
pub struct CaptionsArgs {
    /// Narration audio (WAV)
    #[arg(short, long)]
    pub audio: PathBuf,

    /// Narration text
    #[arg(short, long)]
    pub text: Option<String>,

    /// File holding the narration text
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Words per caption
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Write the SRT here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Audio file (WAV)
    #[arg(short, long)]
    pub audio: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
