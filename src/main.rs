use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use swiss_tracker::api::{build_router, cors_layer, state::AppState};
use swiss_tracker::config::AppConfig;
use swiss_tracker::models::PlayerId;
use swiss_tracker::storage::{JsonlStore, StorageConfig};
use swiss_tracker::tournament::Tournament;

#[derive(Parser)]
#[command(name = "swiss-tracker")]
#[command(about = "Swiss-system tournament tracker")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new player
    Register {
        /// Player's full name (need not be unique)
        name: String,
    },

    /// Report the result of a match
    Report {
        /// Id of the player who won
        #[arg(long)]
        winner: PlayerId,

        /// Id of the player who lost
        #[arg(long)]
        loser: PlayerId,
    },

    /// Show current standings
    Standings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show pairings for the next round
    Pairings {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the number of registered players
    Count,

    /// Remove all match results
    DeleteMatches,

    /// Remove all players and their match results
    DeletePlayers,

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }
    if let Commands::Serve { host, port, .. } = &cli.command {
        config.override_server(host.clone(), *port);
    }
    config.validate()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    tracing::debug!("Starting swiss-tracker v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());
    let tournament = Tournament::new(Arc::new(JsonlStore::new(storage)));

    match cli.command {
        Commands::Register { name } => {
            let player = tournament.register_player(&name)?;
            println!("Registered player {}: {}", player.id, player.name);
        }
        Commands::Report { winner, loser } => {
            let record = tournament.report_match(winner, loser)?;
            println!(
                "Recorded match {}: {} beat {}",
                record.id, record.winner, record.loser
            );
        }
        Commands::Standings { json } => {
            let standings = tournament.player_standings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&standings)?);
            } else if standings.is_empty() {
                println!("No players registered.");
            } else {
                println!(
                    " {:>3}  {:>5}  {:30}  {:>4}  {:>7}",
                    "#", "Id", "Name", "Wins", "Matches"
                );
                println!("{:-<58}", "");
                for (rank, s) in standings.iter().enumerate() {
                    println!(
                        " {:>3}  {:>5}  {:30}  {:>4}  {:>7}",
                        rank + 1,
                        s.id,
                        s.name,
                        s.wins,
                        s.matches
                    );
                }
            }
        }
        Commands::Pairings { json } => {
            let pairings = tournament.swiss_pairings()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&pairings)?);
            } else {
                for p in &pairings {
                    println!(
                        "Table {:>2}: [{}] {}  vs  [{}] {}",
                        p.table, p.id1, p.name1, p.id2, p.name2
                    );
                }
            }
        }
        Commands::Count => {
            println!("{}", tournament.count_players()?);
        }
        Commands::DeleteMatches => {
            let removed = tournament.delete_matches()?;
            println!("Deleted {} matches", removed);
        }
        Commands::DeletePlayers => {
            let removed = tournament.delete_players()?;
            println!("Deleted {} players and their matches", removed);
        }
        Commands::Serve { access_log, .. } => {
            let mut app = build_router(AppState { tournament })
                .layer(cors_layer(&config.server.cors_origin).context("Invalid CORS origin")?);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
