use std::fmt;

use super::decoder::{DecodePolicy, Shape, StreamDecoder};
use crate::transport::{join_ids, Body, Params, RequestSpec};

/// A live NDJSON stream offered by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamKind {
    /// Challenges, game starts and finishes for the authenticated account.
    IncomingEvents,
    /// Full game state then state updates, through the Board API.
    BoardGameState { game_id: String },
    /// Same as [`StreamKind::BoardGameState`] through the Bot API.
    BotGameState { game_id: String },
    /// Start and finish of games played by the given users.
    GameStatus {
        user_ids: Vec<String>,
        with_current_games: bool,
    },
    /// Games tracked by an ad-hoc stream id. More games can be added later
    /// with `add_games_to_stream`.
    GamesById {
        stream_id: String,
        game_ids: Vec<String>,
    },
    /// Moves of any ongoing game, delivered after the spectator lag.
    GameMoves { game_id: String },
    /// The featured TV game.
    TvFeed,
}

impl StreamKind {
    pub(crate) fn request(&self) -> RequestSpec {
        match self {
            Self::IncomingEvents => RequestSpec::get("/api/stream/event"),
            Self::BoardGameState { game_id } => RequestSpec::get(format!("/api/board/game/stream/{game_id}")),
            Self::BotGameState { game_id } => RequestSpec::get(format!("/api/bot/game/stream/{game_id}")),
            Self::GameStatus {
                user_ids,
                with_current_games,
            } => RequestSpec::post("/api/stream/games-by-users")
                .params(Params::new().set("withCurrentGames", with_current_games))
                .body(Body::Text(join_ids(user_ids))),
            Self::GamesById {
                stream_id,
                game_ids,
            } => RequestSpec::post(format!("/api/stream/games/{stream_id}"))
                .body(Body::Text(game_ids.join(","))),
            Self::GameMoves { game_id } => RequestSpec::get(format!("/api/stream/game/{game_id}")),
            Self::TvFeed => RequestSpec::get("/api/tv/feed"),
        }
    }

    /// Whether a malformed line is dropped or ends the stream.
    pub fn decode_policy(&self) -> DecodePolicy {
        match self {
            Self::IncomingEvents | Self::BoardGameState { .. } | Self::BotGameState { .. } => {
                DecodePolicy::Skip
            }
            Self::GameStatus { .. }
            | Self::GamesById { .. }
            | Self::GameMoves { .. }
            | Self::TvFeed => DecodePolicy::Propagate,
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::BoardGameState { .. }
            | Self::BotGameState { .. }
            | Self::GameStatus { .. }
            | Self::GamesById { .. } => Shape::Game,
            Self::IncomingEvents | Self::GameMoves { .. } | Self::TvFeed => Shape::Generic,
        }
    }

    /// A fresh decoder carrying this stream's policy, shape and filters.
    pub fn decoder(&self) -> StreamDecoder {
        let decoder = StreamDecoder::new(self.decode_policy(), self.shape());
        match self {
            Self::GameMoves { .. } => decoder.with_move_gate(),
            Self::TvFeed => decoder.featured_only(),
            _ => decoder,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncomingEvents => write!(f, "incoming-events"),
            Self::BoardGameState { game_id } => write!(f, "board-game-state/{game_id}"),
            Self::BotGameState { game_id } => write!(f, "bot-game-state/{game_id}"),
            Self::GameStatus { user_ids, .. } => write!(f, "game-status/{}", user_ids.join(",")),
            Self::GamesById { stream_id, .. } => write!(f, "games/{stream_id}"),
            Self::GameMoves { game_id } => write!(f, "game-moves/{game_id}"),
            Self::TvFeed => write!(f, "tv-feed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Method;

    #[test]
    fn test_event_streams_skip_malformed_lines() {
        assert_eq!(StreamKind::IncomingEvents.decode_policy(), DecodePolicy::Skip);
        let state = StreamKind::BotGameState {
            game_id: "abc".into(),
        };
        assert_eq!(state.decode_policy(), DecodePolicy::Skip);
        assert_eq!(StreamKind::TvFeed.decode_policy(), DecodePolicy::Propagate);
    }

    #[test]
    fn test_game_state_paths_follow_seat() {
        let board = StreamKind::BoardGameState {
            game_id: "abc".into(),
        };
        let bot = StreamKind::BotGameState {
            game_id: "abc".into(),
        };
        assert_eq!(board.request().path, "/api/board/game/stream/abc");
        assert_eq!(bot.request().path, "/api/bot/game/stream/abc");
    }

    #[test]
    fn test_game_status_posts_user_list() {
        let kind = StreamKind::GameStatus {
            user_ids: vec!["Thibault".into(), "Lichess".into()],
            with_current_games: true,
        };
        let request = kind.request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Body::Text("thibault,lichess".into()));
        assert_eq!(request.params.get("withCurrentGames"), Some("true"));
        assert_eq!(kind.shape(), Shape::Game);
    }

    #[test]
    fn test_display() {
        let kind = StreamKind::GameMoves {
            game_id: "q7ZvsdUF".into(),
        };
        assert_eq!(kind.to_string(), "game-moves/q7ZvsdUF");
    }
}
