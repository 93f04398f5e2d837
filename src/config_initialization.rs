//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use crate::adapters::toml_config::{AppConfig, TomlConfigAdapter, VoiceMode};
use crate::cli::{Cli, Commands};
use crate::domain::errors::DomainError;
use crate::error::{ReelError, ReelResult};
use crate::utils::logging::LogFormat;

/// Final configuration and where its values came from
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: AppConfig,
    pub file: Option<PathBuf>,
    pub env_overrides: Vec<String>,
}

/// Resolve configuration with precedence CLI > Env > File > Defaults
pub fn resolve_configuration(cli: &Cli) -> ReelResult<ResolvedConfig> {
    resolve_with_env(cli, |name| std::env::var(name).ok())
}

/// Same as [`resolve_configuration`] with an explicit environment
pub fn resolve_with_env<F>(cli: &Cli, lookup: F) -> ReelResult<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let (mut config, file) =
        TomlConfigAdapter::discover(cli.config.as_deref()).map_err(config_error)?;
    let env_overrides = TomlConfigAdapter::apply_env(&mut config, lookup).map_err(config_error)?;
    apply_cli_overrides(&mut config, cli).map_err(config_error)?;
    config.validate().map_err(config_error)?;

    Ok(ResolvedConfig {
        config,
        file,
        env_overrides,
    })
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> Result<(), DomainError> {
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.log.format = LogFormat::parse(format)?;
    }

    match &cli.command {
        Commands::Run(args) => {
            if let Some(dir) = &args.work_dir {
                config.output.work_dir = dir.clone();
            }
            if let Some(output) = &args.output {
                config.output.final_name = output.clone();
            }
            if let Some(resize) = &args.resize {
                config.video.resize = Some(resize.clone());
            }
            if let Some(chunk_size) = args.chunk_size {
                config.captions.chunk_size = chunk_size;
            }
            if args.transcribe {
                config.captions.transcribe = true;
            }
            if let Some(voice) = &args.voice {
                config.voice.mode = VoiceMode::parse(voice)?;
            }
        }
        Commands::Captions(args) => {
            if let Some(chunk_size) = args.chunk_size {
                config.captions.chunk_size = chunk_size;
            }
        }
        Commands::Story(_) | Commands::Probe(_) => {}
    }

    Ok(())
}

fn config_error(e: DomainError) -> ReelError {
    ReelError::ConfigError {
        message: match e {
            DomainError::Config(message) | DomainError::BadArgs(message) => message,
            other => other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("reelsmith").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[captions]\nchunk_size = 3\n\n[output]\nwork_dir = \"from-file\"").unwrap();
        let path = file.path().to_string_lossy().into_owned();

        let env: HashMap<&str, &str> = [
            ("REELSMITH_CHUNK_SIZE", "4"),
            ("REELSMITH_WORK_DIR", "from-env"),
        ]
        .into_iter()
        .collect();
        let lookup = |name: &str| env.get(name).map(|v| v.to_string());

        let cli = parse(&[
            "--config",
            &path,
            "run",
            "-p",
            "x",
            "-i",
            "bg.mp4",
            "--chunk-size",
            "7",
        ]);
        let resolved = resolve_with_env(&cli, lookup).unwrap();

        assert_eq!(resolved.config.captions.chunk_size, 7);
        assert_eq!(resolved.config.output.work_dir, PathBuf::from("from-env"));
        assert_eq!(resolved.file.as_deref(), Some(file.path()));
        assert_eq!(resolved.env_overrides.len(), 2);
    }

    #[test]
    fn test_run_flags_override_config() {
        let cli = parse(&[
            "--log-level",
            "debug",
            "--log-format",
            "json",
            "run",
            "--script-file",
            "story.txt",
            "-i",
            "bg.mp4",
            "--resize",
            "1080x1920",
            "--transcribe",
            "--voice",
            "local-tool",
            "-o",
            "out.mp4",
        ]);
        let mut config = AppConfig::default();
        apply_cli_overrides(&mut config, &cli).unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.video.resize.as_deref(), Some("1080x1920"));
        assert!(config.captions.transcribe);
        assert_eq!(config.voice.mode, VoiceMode::LocalTool);
        assert_eq!(config.output.final_name, PathBuf::from("out.mp4"));
    }

    #[test]
    fn test_invalid_values_are_config_errors() {
        let cli = parse(&["probe", "-a", "v.wav", "--log-level", "loud"]);
        let err = resolve_with_env(&cli, |_| None).unwrap_err();
        assert!(matches!(err, ReelError::ConfigError { .. }));
        assert_eq!(err.exit_code(), 2);

        let cli = parse(&["captions", "-a", "v.wav", "-t", "hi", "--chunk-size", "0"]);
        assert!(resolve_with_env(&cli, |_| None).is_err());
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let cli = parse(&["--config", "/nonexistent/reelsmith.toml", "probe", "-a", "v.wav"]);
        let err = resolve_with_env(&cli, |_| None).unwrap_err();
        assert!(err.to_string().contains("reelsmith.toml"));
    }
}
