mod commands;
mod config;

use clap::{Parser, Subcommand};
use spinboard_core::{GameClient, SpinboardError};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spinboard")]
#[command(about = "Spinboard - roulette spins on a live leaderboard")]
#[command(version)]
struct Cli {
    /// Data directory for session storage
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Session profile; each profile keeps its own login
    #[arg(short, long, global = true)]
    profile: Option<String>,

    /// Scoring service base URL (overrides SPINBOARD_SERVICE_URL)
    #[arg(short, long, global = true)]
    server: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the scoring service
    Login {
        /// Username
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the saved session for this profile
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show the leaderboard
    Leaderboard,
    /// Show your current rank
    Rank,
    /// Spin the wheel
    Spin {
        /// Number of spins to play
        #[arg(short, long, default_value_t = 1)]
        count: u32,
    },
    /// Follow live leaderboard updates until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let defaults = config::CliConfig::default();
    let settings = config::CliConfig {
        data_dir: cli.data_dir.unwrap_or(defaults.data_dir),
        profile: cli.profile.unwrap_or(defaults.profile),
        verbose: cli.verbose,
    };

    // Initialize logging
    let log_level = if settings.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "spinboard={},spinboard_core={}",
            log_level, log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tokio::fs::create_dir_all(&settings.data_dir).await?;

    let client_config = config::client_config(cli.server);
    let client = GameClient::open(client_config, &settings.data_dir, &settings.profile).await?;

    let result = match cli.command {
        Commands::Login { username, password } => {
            commands::login(&client, &username, password).await
        }
        Commands::Logout => commands::logout(&client).await,
        Commands::Whoami => commands::whoami(&client),
        Commands::Leaderboard => commands::show_leaderboard(&client).await,
        Commands::Rank => commands::show_rank(&client).await,
        Commands::Spin { count } => commands::spin(&client, count).await,
        Commands::Watch => commands::watch(&client).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<SpinboardError>() {
            Some(SpinboardError::Auth(msg)) => {
                eprintln!("Error: {}", msg);
                eprintln!("Use 'spinboard login <username>' to sign in");
            }
            Some(SpinboardError::Network(msg)) | Some(SpinboardError::Timeout(msg)) => {
                eprintln!("Error: scoring service unreachable: {}", msg);
            }
            _ => {
                eprintln!("Error: {}", e);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
