//! The API client.

use futures::stream::BoxStream;
use futures::{future, StreamExt, TryStreamExt};
use serde_json::Value as Json;
use tokio_stream::wrappers::LinesStream;

use lichess_model::MappedObject;

use crate::config::ClientConfig;
use crate::dispatch::{Record, StreamKind, Subscription};
use crate::error::{ClientError, ClientResult};
use crate::transport::{RequestSpec, Transport};

/// Pull-style view of a live stream.
pub type RecordStream = BoxStream<'static, ClientResult<Record>>;

/// Which play API board calls go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Seat {
    /// `/api/board`, for human accounts.
    #[default]
    Board,
    /// `/api/bot`, for accounts upgraded to bot.
    Bot,
}

impl Seat {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Board => "/api/board",
            Self::Bot => "/api/bot",
        }
    }
}

/// Client for the Lichess web API.
///
/// Cloning is cheap; clones share the same HTTP connection pool.
#[derive(Debug, Clone)]
pub struct LichessClient {
    transport: Transport,
    seat: Seat,
}

impl LichessClient {
    /// Build a client without contacting the server.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_seat(config, Seat::Board)
    }

    pub(crate) fn with_seat(config: &ClientConfig, seat: Seat) -> ClientResult<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            seat,
        })
    }

    /// Build a client and check which kind of account the token belongs to.
    ///
    /// A bot account still gets a working client, but a warning suggests
    /// [`BotClient`](crate::BotClient). A failed profile lookup is not an
    /// error here; anonymous clients cannot read a profile.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let client = Self::new(config)?;
        match client.get_profile().await {
            Ok(profile) if profile.is_bot() => {
                tracing::warn!(
                    account = profile.username().unwrap_or_default(),
                    "Token belongs to a bot account; use BotClient to play through the Bot API"
                );
            }
            Ok(profile) => {
                tracing::debug!(account = profile.username().unwrap_or_default(), "Authenticated");
            }
            Err(e) => tracing::debug!(error = %e, "Profile lookup failed, continuing anonymously"),
        }
        Ok(client)
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Path of a board-play endpoint under the client's seat.
    pub(crate) fn seat_path(&self, suffix: &str) -> String {
        format!("{}{}", self.seat.prefix(), suffix)
    }

    pub(crate) async fn get_json(&self, request: RequestSpec) -> ClientResult<Json> {
        self.transport.json(request).await
    }

    pub(crate) async fn get_object(&self, request: RequestSpec) -> ClientResult<MappedObject> {
        Ok(MappedObject::from_json(self.transport.json(request).await?)?)
    }

    /// Send a request whose answer is `{"ok": true}`.
    pub(crate) async fn post_ok(&self, request: RequestSpec) -> ClientResult<bool> {
        let body = self.transport.json::<Json>(request).await?;
        body.get("ok")
            .and_then(Json::as_bool)
            .ok_or_else(|| ClientError::InvalidData(format!("expected an ok flag, got {body}")))
    }

    pub(crate) async fn ndjson(&self, request: RequestSpec) -> ClientResult<Vec<Json>> {
        self.transport.ndjson(request).await
    }

    /// Map every element of a finite NDJSON body.
    pub(crate) async fn ndjson_as<T, F>(&self, request: RequestSpec, map: F) -> ClientResult<Vec<T>>
    where
        F: Fn(Json) -> Result<T, lichess_model::MapError>,
    {
        self.ndjson(request)
            .await?
            .into_iter()
            .map(|json| map(json).map_err(ClientError::from))
            .collect()
    }

    /// Consume `kind` on a background task, calling `handler` for each record.
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe<F>(&self, kind: StreamKind, handler: F) -> Subscription
    where
        F: FnMut(Record) + Send + 'static,
    {
        Subscription::spawn(self.transport.clone(), kind, handler)
    }

    /// Open `kind` and return its records as a stream.
    ///
    /// Malformed lines follow the stream's decode policy: dropped, or
    /// surfaced as a final `Err` item after which the stream ends.
    pub async fn stream(&self, kind: StreamKind) -> ClientResult<RecordStream> {
        let lines = self.transport.lines(kind.request()).await?;
        let mut decoder = kind.decoder();
        let records = LinesStream::new(lines)
            .map_err(ClientError::from)
            .try_filter_map(move |line| future::ready(decoder.feed(&line)))
            .scan(false, |failed, item| {
                if *failed {
                    return future::ready(None);
                }
                *failed = item.is_err();
                future::ready(Some(item))
            });
        Ok(records.boxed())
    }

    /// The game state stream of `game_id` under this client's seat.
    pub fn game_state_stream(&self, game_id: impl Into<String>) -> StreamKind {
        let game_id = game_id.into();
        match self.seat {
            Seat::Board => StreamKind::BoardGameState { game_id },
            Seat::Bot => StreamKind::BotGameState { game_id },
        }
    }
}
