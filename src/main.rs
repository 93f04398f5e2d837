//! reelsmith
//!
//! Narrated short videos from a prompt and a background clip.
//!
//! # Usage
//!
//! ```bash
//! reelsmith run --prompt "A lighthouse keeper finds a message" --video ocean.mp4
//! reelsmith story --prompt "A lighthouse keeper finds a message"
//! reelsmith captions --audio voiceover.wav --text-file story.txt
//! reelsmith probe --audio voiceover.wav
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, info};

use reelsmith::app::AppContainer;
use reelsmith::cli::{commands, Cli, Commands};
use reelsmith::config_initialization::resolve_configuration;
use reelsmith::error::ReelError;
use reelsmith::utils::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // a missing .env is fine
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli, dotenv.is_ok()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<ReelError>()
                .map(ReelError::exit_code)
                .unwrap_or(1);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli, dotenv_loaded: bool) -> Result<()> {
    let resolved = resolve_configuration(&cli)?;
    let config = resolved.config;
    init_logging(config.log_level().map_err(ReelError::from)?, config.log.format);

    info!("Starting reelsmith {}", env!("CARGO_PKG_VERSION"));
    if dotenv_loaded {
        debug!("Loaded environment from .env");
    }
    match &resolved.file {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => debug!("No configuration file, using defaults"),
    }
    for name in &resolved.env_overrides {
        debug!("Environment override: {}", name);
    }

    let container = AppContainer::new(config).map_err(ReelError::from)?;

    match cli.command {
        Commands::Run(args) => commands::run(&container, args).await,
        Commands::Story(args) => commands::story(&container, args).await,
        Commands::Captions(args) => commands::captions(&container, args).await,
        Commands::Probe(args) => commands::probe(&container, args).await,
    }
}
