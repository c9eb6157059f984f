//! Event handling for the reference bot, generic over [`BotActions`] so it
//! can be driven by a mock in tests.

use std::collections::{HashMap, HashSet};

use cozy_chess::Color;
use lichess_client::lichess_model::{MappedObject, Value};
use lichess_client::{BotActions, DeclineReason, Record};
use tracing::{debug, info, warn};

use crate::error::BotResult;
use crate::play;

#[derive(Debug, Clone, Default)]
pub struct BotSettings {
    pub accept_rated: bool,
    /// Games to play before declining further challenges.
    pub max_games: Option<usize>,
}

/// Stream changes requested by an incoming event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Follow {
    Start(String),
    Stop(String),
}

#[derive(Debug, Clone)]
struct GameTracker {
    color: Color,
    initial_fen: String,
}

pub struct Bot<A: BotActions> {
    actions: A,
    account_id: String,
    settings: BotSettings,
    games: HashMap<String, GameTracker>,
    active: HashSet<String>,
    games_started: usize,
}

impl<A: BotActions> Bot<A> {
    pub async fn new(actions: A, settings: BotSettings) -> BotResult<Self> {
        let account_id = actions.profile_id().await?;
        info!("Playing as {}", account_id);
        Ok(Self {
            actions,
            account_id,
            settings,
            games: HashMap::new(),
            active: HashSet::new(),
            games_started: 0,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// No game in progress and the game quota is used up.
    pub fn is_done(&self) -> bool {
        self.active.is_empty() && self.quota_reached()
    }

    fn quota_reached(&self) -> bool {
        self.settings
            .max_games
            .is_some_and(|max| self.games_started >= max)
    }

    /// React to a record of the incoming events stream.
    pub async fn handle_event(&mut self, record: &Record) -> BotResult<Option<Follow>> {
        match record.event_type() {
            Some("challenge") => {
                self.answer_challenge(record.object("challenge")?).await?;
                Ok(None)
            }
            Some("gameStart") => {
                let game_id = game_id(record.object("game")?)?;
                if !self.active.insert(game_id.clone()) {
                    return Ok(None);
                }
                self.games_started += 1;
                info!("Game {} started", game_id);
                Ok(Some(Follow::Start(game_id)))
            }
            Some("gameFinish") => {
                let game_id = game_id(record.object("game")?)?;
                self.active.remove(&game_id);
                self.games.remove(&game_id);
                info!("Game {} finished", game_id);
                Ok(Some(Follow::Stop(game_id)))
            }
            other => {
                debug!("Ignoring event {:?}", other);
                Ok(None)
            }
        }
    }

    async fn answer_challenge(&mut self, challenge: &MappedObject) -> BotResult<()> {
        let id = challenge.str("id")?;
        let challenger = challenge
            .object("challenger")
            .and_then(|c| c.str("id"))
            .unwrap_or_default();
        if challenger == self.account_id {
            // Our own outgoing challenge echoed back.
            return Ok(());
        }

        let rated = challenge.get("rated").and_then(Value::as_bool).unwrap_or(false);
        let variant = challenge
            .object("variant")
            .and_then(|v| v.str("key"))
            .unwrap_or("standard");

        let reason = if self.quota_reached() || !self.active.is_empty() {
            Some(DeclineReason::Later)
        } else if rated && !self.settings.accept_rated {
            Some(DeclineReason::Casual)
        } else if variant != "standard" {
            Some(DeclineReason::Standard)
        } else {
            None
        };

        match reason {
            Some(reason) => {
                info!("Declining challenge {} from {} ({})", id, challenger, reason);
                self.actions.decline_challenge(id, Some(reason)).await?;
            }
            None => {
                info!("Accepting challenge {} from {}", id, challenger);
                self.actions.accept_challenge(id).await?;
            }
        }
        Ok(())
    }

    /// React to a record of a game state stream.
    pub async fn handle_game_record(&mut self, game_id: &str, record: &Record) -> BotResult<()> {
        match record.event_type() {
            Some("gameFull") => {
                let white = record
                    .object("white")
                    .and_then(|w| w.str("id"))
                    .unwrap_or_default();
                let color = if white == self.account_id {
                    Color::White
                } else {
                    Color::Black
                };
                let initial_fen = record
                    .get("initial_fen")
                    .and_then(Value::as_str)
                    .unwrap_or("startpos")
                    .to_string();
                debug!("Game {} playing {:?} from {}", game_id, color, initial_fen);
                self.games
                    .insert(game_id.to_string(), GameTracker { color, initial_fen });
                self.play_turn(game_id, record.object("state")?).await
            }
            Some("gameState") => self.play_turn(game_id, record).await,
            _ => Ok(()),
        }
    }

    async fn play_turn(&self, game_id: &str, state: &MappedObject) -> BotResult<()> {
        let Some(tracker) = self.games.get(game_id) else {
            warn!("State for untracked game {}", game_id);
            return Ok(());
        };
        let status = state.get("status").and_then(Value::as_str).unwrap_or("started");
        if status != "started" {
            debug!("Game {} is {}", game_id, status);
            return Ok(());
        }

        let moves = state.get("moves").and_then(Value::as_str).unwrap_or_default();
        let board = play::replay(&tracker.initial_fen, moves)?;
        if board.side_to_move() != tracker.color {
            return Ok(());
        }

        let Some(mv) = play::choose_move(&board) else {
            return Ok(());
        };
        let uci = play::format_uci(&board, mv);
        debug!("Game {}: playing {}", game_id, uci);
        self.actions.make_move(game_id, &uci).await?;
        Ok(())
    }
}

/// Game events carry `gameId`; older payloads only `id`.
fn game_id(game: &MappedObject) -> BotResult<String> {
    let id = match game.get("game_id").and_then(Value::as_str) {
        Some(id) => id,
        None => game.str("id")?,
    };
    Ok(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lichess_client::dispatch::Shape;
    use lichess_client::{ClientError, MockBotActions, MockCall};
    use serde_json::json;

    fn record(json: serde_json::Value) -> Record {
        Record::from_json(json, Shape::Generic).unwrap()
    }

    fn challenge(id: &str, from: &str, rated: bool, variant: &str) -> Record {
        record(json!({
            "type": "challenge",
            "challenge": {
                "id": id,
                "challenger": {"id": from},
                "rated": rated,
                "variant": {"key": variant}
            }
        }))
    }

    async fn bot(settings: BotSettings) -> (Bot<MockBotActions>, MockBotActions) {
        let mock = MockBotActions::new().with_profile_id("mybot");
        let bot = Bot::new(mock.clone(), settings).await.unwrap();
        mock.clear_calls();
        (bot, mock)
    }

    #[tokio::test]
    async fn test_new_requires_profile() {
        let result = Bot::new(MockBotActions::new(), BotSettings::default()).await;
        assert!(matches!(
            result,
            Err(crate::error::BotError::Client(ClientError::NotConfigured(_)))
        ));
    }

    #[tokio::test]
    async fn test_accepts_casual_standard_challenge() {
        let (mut bot, mock) = bot(BotSettings::default()).await;

        let follow = bot
            .handle_event(&challenge("c1", "alice", false, "standard"))
            .await
            .unwrap();

        assert_eq!(follow, None);
        assert_eq!(
            mock.get_calls(),
            vec![MockCall::AcceptChallenge {
                challenge_id: "c1".into()
            }]
        );
    }

    #[tokio::test]
    async fn test_decline_reasons() {
        let (mut bot, mock) = bot(BotSettings::default()).await;

        bot.handle_event(&challenge("c1", "alice", true, "standard"))
            .await
            .unwrap();
        bot.handle_event(&challenge("c2", "alice", false, "chess960"))
            .await
            .unwrap();

        assert_eq!(
            mock.get_calls(),
            vec![
                MockCall::DeclineChallenge {
                    challenge_id: "c1".into(),
                    reason: Some(DeclineReason::Casual)
                },
                MockCall::DeclineChallenge {
                    challenge_id: "c2".into(),
                    reason: Some(DeclineReason::Standard)
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_ignores_own_challenge() {
        let (mut bot, mock) = bot(BotSettings::default()).await;
        bot.handle_event(&challenge("c1", "mybot", false, "standard"))
            .await
            .unwrap();
        assert!(mock.get_calls().is_empty());
    }

    #[tokio::test]
    async fn test_game_lifecycle_and_quota() {
        let settings = BotSettings {
            accept_rated: true,
            max_games: Some(1),
        };
        let (mut bot, mock) = bot(settings).await;
        let start = record(json!({"type": "gameStart", "game": {"gameId": "g1", "id": "g1"}}));

        assert_eq!(
            bot.handle_event(&start).await.unwrap(),
            Some(Follow::Start("g1".into()))
        );
        assert_eq!(bot.handle_event(&start).await.unwrap(), None);
        assert!(!bot.is_done());

        bot.handle_event(&challenge("c2", "alice", false, "standard"))
            .await
            .unwrap();
        assert_eq!(
            mock.get_calls(),
            vec![MockCall::DeclineChallenge {
                challenge_id: "c2".into(),
                reason: Some(DeclineReason::Later)
            }]
        );

        let finish = record(json!({"type": "gameFinish", "game": {"gameId": "g1"}}));
        assert_eq!(
            bot.handle_event(&finish).await.unwrap(),
            Some(Follow::Stop("g1".into()))
        );
        assert!(bot.is_done());
    }

    #[tokio::test]
    async fn test_plays_on_own_turn_only() {
        let (mut bot, mock) = bot(BotSettings::default()).await;

        let full = record(json!({
            "type": "gameFull",
            "id": "g1",
            "white": {"id": "alice"},
            "black": {"id": "mybot"},
            "initialFen": "startpos",
            "state": {"type": "gameState", "moves": "", "status": "started"}
        }));
        bot.handle_game_record("g1", &full).await.unwrap();
        assert!(mock.moves().is_empty());

        let state = record(json!({"type": "gameState", "moves": "e2e4", "status": "started"}));
        bot.handle_game_record("g1", &state).await.unwrap();
        assert_eq!(mock.moves().len(), 1);

        let state = record(json!({"type": "gameState", "moves": "e2e4 d7d5", "status": "started"}));
        bot.handle_game_record("g1", &state).await.unwrap();
        assert_eq!(mock.moves().len(), 1);
    }

    #[tokio::test]
    async fn test_white_moves_first_and_prefers_capture() {
        let (mut bot, mock) = bot(BotSettings::default()).await;

        let full = record(json!({
            "type": "gameFull",
            "id": "g1",
            "white": {"id": "mybot"},
            "black": {"id": "alice"},
            "initialFen": "startpos",
            "state": {"type": "gameState", "moves": "", "status": "started"}
        }));
        bot.handle_game_record("g1", &full).await.unwrap();

        let state = record(json!({"type": "gameState", "moves": "a2a3 d7d5 e2e4 h7h6", "status": "started"}));
        bot.handle_game_record("g1", &state).await.unwrap();

        let moves = mock.moves();
        assert_eq!(moves.len(), 2);
        assert_eq!(moves[1], ("g1".to_string(), "e4d5".to_string()));
    }

    #[tokio::test]
    async fn test_finished_game_is_not_played() {
        let (mut bot, mock) = bot(BotSettings::default()).await;
        let full = record(json!({
            "type": "gameFull",
            "id": "g1",
            "white": {"id": "mybot"},
            "black": {"id": "alice"},
            "state": {"type": "gameState", "moves": "", "status": "resign"}
        }));
        bot.handle_game_record("g1", &full).await.unwrap();
        assert!(mock.moves().is_empty());
    }
}
