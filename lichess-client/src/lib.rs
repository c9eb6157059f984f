//! Async client for the Lichess web API
//!
//! Wraps the REST endpoints, maps every response into
//! [`lichess_model`] objects, and dispatches the live NDJSON streams to
//! subscriber callbacks.
//!
//! # Example
//!
//! ```no_run
//! use lichess_client::{ClientConfig, LichessClient, StreamKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LichessClient::connect(&ClientConfig::from_env()).await?;
//!     let history = client.get_rating_history("thibault").await?;
//!     println!("{} blitz points", history.blitz.len());
//!
//!     let feed = client.subscribe(StreamKind::TvFeed, |record| {
//!         println!("featured game: {:?}", record.object("d").and_then(|d| d.str("id")));
//!     });
//!     feed.join().await;
//!     Ok(())
//! }
//! ```

mod bot;
mod client;
mod config;
pub mod dispatch;
mod endpoints;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod traits;
mod transport;
pub mod validate;

pub use bot::BotClient;
pub use client::{LichessClient, RecordStream, Seat};
pub use config::{get_base_url, get_token, get_user_agent, ClientConfig};
pub use dispatch::{Record, StreamKind, StreamOutcome, StreamState, Subscription};
pub use endpoints::{AiChallenge, ChallengeRequest, ExportOptions, OpenChallenge, Seek, UserGamesQuery};
pub use error::{ClientError, ClientResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockBotActions, MockCall};
pub use traits::BotActions;
pub use transport::{Accept, Body, Params};
pub use validate::{ChallengeRule, ChatRoom, Color, DeclineReason, PerfType, RatingRange, Variant};

// Re-export the object model for convenience
pub use lichess_model;
