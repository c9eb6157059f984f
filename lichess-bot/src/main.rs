//! Reference Lichess bot.
//!
//! Listens on the incoming events stream, answers challenges, follows every
//! started game on its own game state stream and replies with a legal move
//! whenever it is the bot's turn. Reads `LICHESS_TOKEN` (and optionally
//! `LICHESS_BASE_URL`) from the environment.

use std::collections::HashMap;

use clap::{Parser, Subcommand};
use lichess_client::{BotClient, ClientConfig, Record, StreamKind, Subscription};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod bot;
mod config;
mod error;
mod play;

use bot::{Bot, BotSettings, Follow};

#[derive(Parser)]
#[command(name = "lichess-bot", about = "A minimal bot for the Lichess Bot API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Accept challenges and play games until interrupted.
    Run {
        /// Accept rated challenges too.
        #[arg(long)]
        accept_rated: bool,

        /// Stop after this many games.
        #[arg(long)]
        max_games: Option<usize>,
    },
    /// Print the account the token belongs to.
    Whoami,
}

/// Records from every open stream, tagged with their origin.
enum BotEvent {
    Incoming(Record),
    Game { game_id: String, record: Record },
}

fn init_tracing() -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(log_dir) = config::get_log_dir() else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    };

    std::fs::create_dir_all(&log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&log_dir, config::LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = init_tracing();
    let cli = Cli::parse();

    let client = BotClient::connect(&ClientConfig::from_env()).await?;

    match cli.command {
        Commands::Whoami => {
            let profile = client.get_profile().await?;
            println!(
                "{} ({}){}",
                profile.username().unwrap_or_default(),
                profile.id().unwrap_or_default(),
                if profile.is_bot() { " [bot]" } else { "" }
            );
        }
        Commands::Run {
            accept_rated,
            max_games,
        } => {
            let settings = BotSettings {
                accept_rated,
                max_games,
            };
            run(client, settings).await?;
        }
    }

    Ok(())
}

async fn run(client: BotClient, settings: BotSettings) -> anyhow::Result<()> {
    let mut bot = Bot::new(client.clone(), settings).await?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let events_tx = tx.clone();
    let mut events = client.subscribe(StreamKind::IncomingEvents, move |record| {
        let _ = events_tx.send(BotEvent::Incoming(record));
    });
    let mut games: HashMap<String, Subscription> = HashMap::new();

    tracing::info!("Waiting for challenges as {}", bot.account_id());
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            state = events.finished() => {
                tracing::warn!("Event stream ended: {:?}", state);
                break;
            }
            Some(event) = rx.recv() => match event {
                BotEvent::Incoming(record) => match bot.handle_event(&record).await {
                    Ok(Some(Follow::Start(game_id))) => {
                        let game_tx = tx.clone();
                        let id = game_id.clone();
                        let subscription = client.subscribe(
                            client.game_state_stream(game_id.clone()),
                            move |record| {
                                let _ = game_tx.send(BotEvent::Game {
                                    game_id: id.clone(),
                                    record,
                                });
                            },
                        );
                        games.insert(game_id, subscription);
                    }
                    Ok(Some(Follow::Stop(game_id))) => {
                        if let Some(subscription) = games.remove(&game_id) {
                            subscription.close();
                        }
                        if bot.is_done() {
                            tracing::info!("Game quota reached");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => tracing::error!("Failed to handle event: {}", e),
                },
                BotEvent::Game { game_id, record } => {
                    if let Err(e) = bot.handle_game_record(&game_id, &record).await {
                        tracing::error!("Game {}: {}", game_id, e);
                    }
                }
            },
        }
    }

    events.close();
    for subscription in games.values() {
        subscription.close();
    }
    Ok(())
}
