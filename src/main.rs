use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tennis_stats::api::state::AppState;
use tennis_stats::api::{build_router, cors_layer};
use tennis_stats::calculate::{bmi_text, round2, win_rate};
use tennis_stats::config::AppConfig;
use tennis_stats::service::{PlayerService, ServiceError};
use tennis_stats::storage::{snapshot, InMemoryPlayerStore};

#[derive(Parser)]
#[command(name = "tennis-stats")]
#[command(about = "Tennis player catalog with per-country statistics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Player snapshot file (overrides config)
    #[arg(long)]
    data_file: Option<PathBuf>,

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
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print per-country statistics and the best country by win ratio
    Stats,

    /// Print players ordered by rank
    Ranking {
        /// Max players to print
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn load_service(config: &AppConfig) -> PlayerService {
    let players = snapshot::load_or_empty(&config.data_file);
    let store = InMemoryPlayerStore::with_players(players).await;
    PlayerService::new(Arc::new(store))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting tennis-stats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let service = load_service(&config).await;
            let app = build_router(AppState::new(service))
                .layer(cors_layer(&config.server.cors_origin));

            let addr = config.server.bind_addr();
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind to {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Stats => {
            let service = load_service(&config).await;
            let stats = service.get_country_statistics().await;

            println!("\n=== Country Statistics ===");
            println!(
                "{:<8} {:>10} {:>10} {:>10}",
                "Country", "Win %", "Avg BMI", "Median cm"
            );
            for stat in &stats {
                println!(
                    "{:<8} {:>10.2} {:>10.2} {:>10.2}",
                    stat.country_code,
                    round2(stat.win_ratio),
                    round2(stat.average_bmi),
                    round2(stat.median_height)
                );
            }

            match service.get_country_with_best_win_ratio().await {
                Ok(best) => println!(
                    "\nBest win ratio: {} ({:.2}%)",
                    best.country_code,
                    round2(best.win_ratio)
                ),
                Err(ServiceError::NoStatisticAvailable) => {
                    println!("\nNo player with a valid country");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Ranking { limit } => {
            let service = load_service(&config).await;
            let players = service.get_players_sorted_by_rank().await;

            println!("\n=== Ranking ===");
            println!(
                "{:>5}  {:<28} {:<5} {:>7} {:>7}",
                "Rank", "Player", "Ctry", "Win %", "BMI"
            );
            for player in players.iter().take(limit) {
                let Some(data) = player.data.as_ref() else {
                    continue;
                };
                let rank = data
                    .rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let country = player
                    .country
                    .as_ref()
                    .map(|c| c.code.as_str())
                    .unwrap_or("-");
                println!(
                    "{:>5}  {:<28} {:<5} {:>7.2} {:>7}",
                    rank,
                    player.full_name(),
                    country,
                    win_rate(data),
                    bmi_text(data)
                );
            }
        }
    }

    Ok(())
}
