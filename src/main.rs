//! Terminal host for the storyteller dialog engine.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use storyteller::config::DEFAULT_CONFIG_PATH;
use storyteller::sandbox::{sandbox_collaborators, ConsoleSession, SandboxDisplay, SandboxWorld};
use storyteller::{BookGenerator, DialogRegistry, Player, StorytellerConfig, StorytellerResult};

#[derive(Parser)]
#[command(
    name = "storyteller",
    about = "Play through data-driven NPC dialogs in the terminal",
    version
)]
struct Cli {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Directory containing `dialogs/`, overrides the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Name of the player talking
    #[arg(short, long, default_value = "Traveler")]
    player: String,

    /// NPC or event to talk to on start
    #[arg(short, long)]
    talk_to: Option<String>,

    /// Reload dialogs when their files change
    #[arg(long)]
    hot_reload: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("storyteller: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> StorytellerResult<()> {
    let mut config = StorytellerConfig::load_or_default(&cli.config).await?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    config.hot_reload |= cli.hot_reload;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(DialogRegistry::new(&config.data_dir));
    let count = registry.load_all()?;
    info!("{} dialog(s) ready", count);

    // Start hot-reload watcher for dialog files
    let reloads = if config.hot_reload {
        match registry.start_file_watcher() {
            Ok(rx) => Some(rx),
            Err(e) => {
                warn!("Failed to start dialog hot-reload: {}", e);
                None
            }
        }
    } else {
        None
    };

    let world = Arc::new(SandboxWorld::new());
    let (display, deliveries) = SandboxDisplay::channel();
    let generator = BookGenerator::from_collaborators(sandbox_collaborators(
        registry,
        world.clone(),
        Arc::new(display),
    ));

    let session = ConsoleSession::new(
        Player::new(cli.player),
        generator,
        world,
        deliveries,
        config.default_greeting,
    );
    session.run(cli.talk_to.as_deref(), reloads).await
}
