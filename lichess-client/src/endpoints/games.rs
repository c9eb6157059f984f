use chrono::{DateTime, Utc};
use lichess_model::{Game, MappedObject};

use crate::client::LichessClient;
use crate::dispatch::StreamKind;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Body, Params, RequestSpec};
use crate::validate::{ensure_min, ensure_min_opt, ensure_range, Color, PerfType, EARLIEST_GAME_MS};

/// What to include in an exported game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    pub moves: Option<bool>,
    /// Include the full PGN in the JSON payload.
    pub pgn_in_json: Option<bool>,
    pub tags: Option<bool>,
    pub clocks: Option<bool>,
    pub evals: Option<bool>,
    pub opening: Option<bool>,
    /// Textual annotations about the opening, mistakes and termination.
    pub literate: Option<bool>,
    /// URL of a file mapping usernames to real names and ratings.
    pub players: Option<String>,
}

impl ExportOptions {
    pub(crate) fn apply(&self, params: Params) -> Params {
        params
            .opt("moves", self.moves)
            .opt("pgnInJson", self.pgn_in_json)
            .opt("tags", self.tags)
            .opt("clocks", self.clocks)
            .opt("evals", self.evals)
            .opt("opening", self.opening)
            .opt("literate", self.literate)
            .opt("players", self.players.as_deref())
    }
}

/// Filters for a user's game export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserGamesQuery {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub opponent: Option<String>,
    pub rated: Option<bool>,
    pub perf_types: Vec<PerfType>,
    pub color: Option<Color>,
    pub analysed: Option<bool>,
    pub ongoing: Option<bool>,
    pub finished: Option<bool>,
    /// Oldest first instead of most recent first.
    pub reverse: Option<bool>,
    pub export: ExportOptions,
}

impl UserGamesQuery {
    pub fn validate(&self) -> ClientResult<()> {
        ensure_min_opt("since", self.since.map(|t| t.timestamp_millis()), EARLIEST_GAME_MS)?;
        ensure_min_opt("until", self.until.map(|t| t.timestamp_millis()), EARLIEST_GAME_MS)?;
        ensure_min_opt("limit", self.limit, 1)?;
        if self.color == Some(Color::Random) {
            return Err(ClientError::Validation(
                "color must be either white or black".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn params(&self) -> Params {
        let perf_types = (!self.perf_types.is_empty()).then(|| {
            self.perf_types
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(",")
        });
        let sort = self
            .reverse
            .map(|reverse| if reverse { "dateAsc" } else { "dateDesc" });

        let params = Params::new()
            .opt("since", self.since.map(|t| t.timestamp_millis()))
            .opt("until", self.until.map(|t| t.timestamp_millis()))
            .opt("max", self.limit)
            .opt("vs", self.opponent.as_deref())
            .opt("rated", self.rated)
            .opt("perfType", perf_types)
            .opt("color", self.color)
            .opt("analysed", self.analysed)
            .opt("ongoing", self.ongoing)
            .opt("finished", self.finished)
            .opt("sort", sort);
        self.export.apply(params)
    }
}

impl LichessClient {
    /// One game. Ongoing games have their last 3 moves omitted after move 5.
    pub async fn export_game(&self, game_id: &str, options: &ExportOptions) -> ClientResult<Game> {
        let request = RequestSpec::get(format!("/game/export/{game_id}"))
            .params(options.apply(Params::new()));
        Ok(Game::from_json(self.get_json(request).await?)?)
    }

    /// The ongoing game of a user, or their last finished one.
    pub async fn export_latest_game(
        &self,
        username: &str,
        options: &ExportOptions,
    ) -> ClientResult<Game> {
        let request = RequestSpec::get(format!("/api/user/{username}/current-game"))
            .params(options.apply(Params::new()));
        Ok(Game::from_json(self.get_json(request).await?)?)
    }

    pub async fn export_user_games(
        &self,
        username: &str,
        query: &UserGamesQuery,
    ) -> ClientResult<Vec<Game>> {
        query.validate()?;
        let request = RequestSpec::get(format!("/api/games/user/{username}")).params(query.params());
        self.ndjson_as(request, Game::from_json).await
    }

    /// Up to 300 games by ID.
    pub async fn export_games<S: AsRef<str>>(
        &self,
        game_ids: &[S],
        options: &ExportOptions,
    ) -> ClientResult<Vec<Game>> {
        ensure_range("number of games", game_ids.len(), 1, 300)?;
        let ids = game_ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let request = RequestSpec::post("/api/games/export/_ids")
            .params(options.apply(Params::new()))
            .body(Body::Text(ids));
        self.ndjson_as(request, Game::from_json).await
    }

    /// Import a PGN; the answer carries the new game's ID and URL.
    pub async fn import_game(&self, pgn: &str) -> ClientResult<MappedObject> {
        ensure_min("pgn length", pgn.trim().len(), 1)?;
        let request =
            RequestSpec::post("/api/import").body(Body::form(Params::new().set("pgn", pgn)));
        self.get_object(request).await
    }

    /// A stream of the given games, tracked under `stream_id` so more games
    /// can be added with [`LichessClient::add_games_to_stream`]. A random ID
    /// is used when none is given.
    pub fn stream_games<S: AsRef<str>>(&self, game_ids: &[S], stream_id: Option<&str>) -> StreamKind {
        StreamKind::GamesById {
            stream_id: stream_id
                .map(str::to_string)
                .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
            game_ids: game_ids.iter().map(|id| id.as_ref().to_string()).collect(),
        }
    }

    pub async fn add_games_to_stream<S: AsRef<str>>(
        &self,
        stream_id: &str,
        game_ids: &[S],
    ) -> ClientResult<bool> {
        let ids = game_ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let request = RequestSpec::post(format!("/api/stream/games/{stream_id}/add"))
            .body(Body::Text(ids));
        self.post_ok(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_user_games_query_params() {
        let query = UserGamesQuery {
            limit: Some(10),
            perf_types: vec![PerfType::Blitz, PerfType::Rapid],
            color: Some(Color::White),
            reverse: Some(true),
            export: ExportOptions {
                clocks: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        query.validate().unwrap();

        let params = query.params();
        assert_eq!(params.get("max"), Some("10"));
        assert_eq!(params.get("perfType"), Some("blitz,rapid"));
        assert_eq!(params.get("color"), Some("white"));
        assert_eq!(params.get("sort"), Some("dateAsc"));
        assert_eq!(params.get("clocks"), Some("false"));
        assert_eq!(params.get("since"), None);
    }

    #[test]
    fn test_user_games_query_rejects_early_timestamps() {
        let query = UserGamesQuery {
            since: DateTime::from_timestamp_millis(EARLIEST_GAME_MS - 1),
            ..Default::default()
        };
        assert!(query.validate().unwrap_err().is_validation());

        let query = UserGamesQuery {
            limit: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_err());

        let query = UserGamesQuery {
            color: Some(Color::Random),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_stream_games_generates_stream_id() {
        let client = LichessClient::new(&ClientConfig::default()).unwrap();
        let StreamKind::GamesById {
            stream_id,
            game_ids,
        } = client.stream_games(&["a", "b"], None)
        else {
            panic!("expected a games stream");
        };
        assert_eq!(stream_id.len(), 32);
        assert_eq!(game_ids, vec!["a", "b"]);
    }
}
