//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{AppContainer, CaptionsRequest};
use crate::cli::args::{CaptionsArgs, ProbeArgs, RunArgs, StoryArgs};
use crate::domain::model::{PipelineRequest, ScriptSource};
use crate::error::ReelError;
use crate::utils::format_elapsed;
use crate::utils::time::TimestampFormatter;

/// Execute the run command
pub async fn run(container: &AppContainer, args: RunArgs) -> Result<()> {
    let source = match (args.prompt, args.script_file) {
        (Some(prompt), _) => ScriptSource::Prompt(prompt),
        (None, Some(path)) => {
            let text = tokio::fs::read_to_string(&path)
                .await
                .map_err(ReelError::from)
                .with_context(|| format!("Failed to read script file {}", path.display()))?;
            ScriptSource::Text(text)
        }
        (None, None) => anyhow::bail!("Either --prompt or --script-file is required"),
    };

    let config = container.config();
    let request = PipelineRequest {
        script: source,
        video: args.video,
        work_dir: config.output.work_dir.clone(),
        output: config.output.final_name.clone(),
        resize: config.resize().map_err(ReelError::from)?,
        transcribe: config.captions.transcribe,
    };

    let pipeline = container
        .pipeline_interactor(&request.script)
        .map_err(ReelError::from)?;
    let report = pipeline.execute(request).await.map_err(ReelError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).map_err(ReelError::from)?);
    } else {
        println!("Output: {}", report.output.display());
        println!(
            "Narration: {} ({} captions, {:?})",
            report.duration, report.caption_count, report.caption_source
        );
        println!("Elapsed: {}", format_elapsed(report.elapsed));
    }

    info!("Run started at {} completed", report.started_at.to_rfc3339());
    Ok(())
}

/// Execute the story command
pub async fn story(container: &AppContainer, args: StoryArgs) -> Result<()> {
    let interactor = container.story_interactor().map_err(ReelError::from)?;
    let script = interactor
        .execute(&args.prompt)
        .await
        .map_err(ReelError::from)?;
    println!("{}", script.as_str());
    Ok(())
}

/// Execute the captions command
pub async fn captions(container: &AppContainer, args: CaptionsArgs) -> Result<()> {
    let text = match (args.text, args.text_file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .map_err(ReelError::from)
            .with_context(|| format!("Failed to read text file {}", path.display()))?,
        (None, None) => anyhow::bail!("Either --text or --text-file is required"),
    };

    let interactor = container.captions_interactor().map_err(ReelError::from)?;
    let response = interactor
        .execute(CaptionsRequest {
            audio: args.audio,
            text,
            output: args.output,
        })
        .await
        .map_err(ReelError::from)?;

    match &response.written_to {
        Some(path) => println!(
            "Wrote {} captions to {}",
            response.captions.len(),
            path.display()
        ),
        None => print!("{}", response.srt),
    }
    Ok(())
}

/// Execute the probe command
pub async fn probe(container: &AppContainer, args: ProbeArgs) -> Result<()> {
    let interactor = container.captions_interactor().map_err(ReelError::from)?;
    let track = interactor.probe(&args.audio).await.map_err(ReelError::from)?;

    if args.json {
        let summary = serde_json::json!({
            "path": track.path,
            "duration_seconds": track.duration.as_seconds(),
            "timestamp": TimestampFormatter::format(track.duration.as_seconds()),
            "sample_rate": track.sample_rate,
            "channels": track.channels,
            "frames": track.frames,
        });
        println!("{}", serde_json::to_string_pretty(&summary).map_err(ReelError::from)?);
    } else {
        println!(
            "Duration: {:.3}s ({})",
            track.duration.as_seconds(),
            track.duration
        );
        println!(
            "Format: {} Hz, {} channel(s), {} frames",
            track.sample_rate, track.channels, track.frames
        );
    }
    Ok(())
}
