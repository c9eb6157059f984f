//! Line decoding for live streams: keep-alives, malformed lines, record
//! shapes and per-stream filters.

use std::ops::Deref;

use lichess_model::{Game, MappedObject, Player, Value};

use crate::error::{ClientError, ClientResult};

/// What happens to a line that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Log and drop the line, keep reading.
    Skip,
    /// End the stream with the error.
    Propagate,
}

/// Preferred record shape for a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Generic,
    /// Try [`Game`], fall back to a plain object when the payload lacks game fields.
    Game,
    /// Try [`Player`], with the same fallback.
    Player,
}

/// One decoded stream record.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Game(Game),
    Player(Player),
    Object(MappedObject),
}

impl Record {
    pub fn from_json(json: serde_json::Value, shape: Shape) -> ClientResult<Self> {
        match shape {
            Shape::Game => {
                if let Ok(game) = Game::from_json(json.clone()) {
                    return Ok(Self::Game(game));
                }
            }
            Shape::Player => {
                if let Ok(player) = Player::from_json(json.clone()) {
                    return Ok(Self::Player(player));
                }
            }
            Shape::Generic => {}
        }
        Ok(Self::Object(MappedObject::from_json(json)?))
    }

    /// The `type` discriminator carried by event and game-state records.
    pub fn event_type(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    pub fn as_game(&self) -> Option<&Game> {
        match self {
            Self::Game(game) => Some(game),
            Self::Player(_) | Self::Object(_) => None,
        }
    }

    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            Self::Game(_) | Self::Object(_) => None,
        }
    }

    pub fn into_object(self) -> MappedObject {
        match self {
            Self::Game(game) => game.into_inner(),
            Self::Player(player) => player.into_inner(),
            Self::Object(object) => object,
        }
    }
}

impl Deref for Record {
    type Target = MappedObject;

    fn deref(&self) -> &MappedObject {
        match self {
            Self::Game(game) => &**game,
            Self::Player(player) => &**player,
            Self::Object(object) => object,
        }
    }
}

/// Holds back move records until the one matching the position the stream
/// opened with has passed.
///
/// The first record of a move stream describes the game and carries the
/// last move played (`lastMove`). Subsequent records carry a move marker
/// (`lm`). Markers are released only after the buffered move has come round
/// again, so a subscriber never sees moves out of sync with the spectator
/// delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveFeedGate {
    last_move: Option<String>,
    open: bool,
}

impl MoveFeedGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `record` should reach the subscriber.
    pub fn admit(&mut self, record: &MappedObject) -> bool {
        if record.contains("id") {
            match record.get("last_move").and_then(Value::as_str) {
                Some(last_move) => self.last_move = Some(last_move.to_string()),
                // A game with no moves yet has nothing to wait for.
                None => self.open = true,
            }
            return false;
        }

        let Some(marker) = record.get("lm").and_then(Value::as_str) else {
            return false;
        };
        if self.open {
            return true;
        }
        if self.last_move.as_deref() == Some(marker) {
            self.open = true;
        }
        false
    }
}

/// Stateful line decoder for one stream.
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    policy: DecodePolicy,
    shape: Shape,
    gate: Option<MoveFeedGate>,
    featured_only: bool,
}

impl StreamDecoder {
    pub fn new(policy: DecodePolicy, shape: Shape) -> Self {
        Self {
            policy,
            shape,
            gate: None,
            featured_only: false,
        }
    }

    pub fn with_move_gate(mut self) -> Self {
        self.gate = Some(MoveFeedGate::new());
        self
    }

    /// Only pass records whose `d` payload identifies a game.
    pub fn featured_only(mut self) -> Self {
        self.featured_only = true;
        self
    }

    /// Decode one line. `Ok(None)` means nothing to deliver.
    pub fn feed(&mut self, line: &str) -> ClientResult<Option<Record>> {
        let line = line.trim();
        if line.is_empty() {
            tracing::trace!("keep-alive");
            return Ok(None);
        }

        let record = match serde_json::from_str::<serde_json::Value>(line)
            .map_err(ClientError::from)
            .and_then(|json| Record::from_json(json, self.shape))
        {
            Ok(record) => record,
            Err(e) => return self.reject(e, line),
        };

        if self.featured_only && !is_featured(&record) {
            return Ok(None);
        }
        if let Some(gate) = self.gate.as_mut() {
            if !gate.admit(&record) {
                return Ok(None);
            }
        }
        Ok(Some(record))
    }

    fn reject(&self, error: ClientError, line: &str) -> ClientResult<Option<Record>> {
        match self.policy {
            DecodePolicy::Skip => {
                tracing::warn!(error = %error, line, "Dropping undecodable stream line");
                Ok(None)
            }
            DecodePolicy::Propagate => Err(error),
        }
    }
}

fn is_featured(record: &Record) -> bool {
    record
        .get("d")
        .and_then(Value::as_object)
        .is_some_and(|d| d.contains("id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(json: serde_json::Value) -> MappedObject {
        MappedObject::from_json(json).unwrap()
    }

    #[test]
    fn test_gate_opens_on_matching_marker() {
        let mut gate = MoveFeedGate::new();
        assert!(!gate.admit(&object(json!({ "id": "g", "lastMove": "e2e4" }))));
        assert!(!gate.admit(&object(json!({ "lm": "d2d4" }))));
        assert!(!gate.is_open());

        // The matching record opens the gate but is itself held back.
        assert!(!gate.admit(&object(json!({ "lm": "e2e4" }))));
        assert!(gate.is_open());

        assert!(gate.admit(&object(json!({ "lm": "e7e5" }))));
        assert!(gate.admit(&object(json!({ "lm": "g1f3" }))));
    }

    #[test]
    fn test_gate_stays_closed_before_any_game_record() {
        let mut gate = MoveFeedGate::new();
        assert!(!gate.admit(&object(json!({ "lm": "e2e4" }))));
        assert!(!gate.admit(&object(json!({ "lm": "e2e4" }))));
        assert!(!gate.is_open());
    }

    #[test]
    fn test_gate_opens_for_game_without_moves() {
        let mut gate = MoveFeedGate::new();
        assert!(!gate.admit(&object(json!({ "id": "g" }))));
        assert!(gate.admit(&object(json!({ "lm": "e2e4" }))));
    }

    #[test]
    fn test_keep_alive_is_skipped_under_every_policy() {
        for policy in [DecodePolicy::Skip, DecodePolicy::Propagate] {
            let mut decoder = StreamDecoder::new(policy, Shape::Generic);
            assert!(decoder.feed("").unwrap().is_none());
            assert!(decoder.feed("  \r").unwrap().is_none());
        }
    }

    #[test]
    fn test_malformed_line_policy() {
        let mut skip = StreamDecoder::new(DecodePolicy::Skip, Shape::Generic);
        assert!(skip.feed("{not json").unwrap().is_none());
        assert!(skip.feed("17").unwrap().is_none());

        let mut propagate = StreamDecoder::new(DecodePolicy::Propagate, Shape::Generic);
        assert!(matches!(
            propagate.feed("{not json"),
            Err(ClientError::Decode(_))
        ));
        assert!(matches!(propagate.feed("17"), Err(ClientError::Mapping(_))));
    }

    #[test]
    fn test_game_shape_with_fallback() {
        let mut decoder = StreamDecoder::new(DecodePolicy::Skip, Shape::Game);
        let full = decoder
            .feed(r#"{"type":"gameFull","id":"g","createdAt":1700000000000}"#)
            .unwrap()
            .unwrap();
        assert!(full.as_game().is_some());
        assert_eq!(full.event_type(), Some("gameFull"));

        let state = decoder
            .feed(r#"{"type":"gameState","moves":"e2e4","wtime":60000}"#)
            .unwrap()
            .unwrap();
        assert!(state.as_game().is_none());
        assert_eq!(state.str("moves").unwrap(), "e2e4");
    }

    #[test]
    fn test_player_shape_with_fallback() {
        let member = Record::from_json(
            json!({"id": "bobby", "username": "Bobby", "createdAt": 1290415680000i64, "seenAt": 1700000000000i64}),
            Shape::Player,
        )
        .unwrap();
        let player = member.as_player().unwrap();
        assert_eq!(player.username(), Some("Bobby"));
        assert!(player.created_at().is_some());

        let partial = Record::from_json(json!({"id": "ghost"}), Shape::Player).unwrap();
        assert!(partial.as_player().is_none());
        assert_eq!(partial.str("id").unwrap(), "ghost");
    }

    #[test]
    fn test_featured_only() {
        let mut decoder = StreamDecoder::new(DecodePolicy::Propagate, Shape::Generic).featured_only();
        assert!(decoder
            .feed(r#"{"t":"fen","d":{"fen":"8/8/8/8/8/8/8/8","lm":"e2e4"}}"#)
            .unwrap()
            .is_none());

        let featured = decoder
            .feed(r#"{"t":"featured","d":{"id":"abc","orientation":"white"}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(featured.object("d").unwrap().str("id").unwrap(), "abc");
    }
}
