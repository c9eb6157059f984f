use chrono::{DateTime, Utc};

use super::mapped_view;
use crate::error::MapResult;
use crate::time::{coerce_field, coerce_optional_field};
use crate::value::{MappedObject, Value};

/// A game. `created_at` is required, `last_move_at` is coerced when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Game(MappedObject);

mapped_view!(Game);

impl Game {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut game = MappedObject::from_json(json)?;
        coerce_field(&mut game, "created_at")?;
        coerce_optional_field(&mut game, "last_move_at")?;
        Ok(Self(game))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.0.get("created_at").and_then(Value::as_datetime)
    }

    pub fn last_move_at(&self) -> Option<DateTime<Utc>> {
        self.0.get("last_move_at").and_then(Value::as_datetime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;
    use serde_json::json;

    #[test]
    fn test_game_with_last_move() {
        let game = Game::from_json(json!({
            "id": "q7ZvsdUF",
            "rated": true,
            "createdAt": 1514505150384_i64,
            "lastMoveAt": 1514505592843_i64,
            "players": { "white": { "user": { "name": "Lance5500" } } }
        }))
        .unwrap();

        assert_eq!(game.id(), Some("q7ZvsdUF"));
        assert!(game.last_move_at().unwrap() > game.created_at().unwrap());
        assert!(game.bool("rated").unwrap());
    }

    #[test]
    fn test_game_without_last_move() {
        let game = Game::from_json(json!({ "id": "x", "createdAt": 1514505150384_i64 })).unwrap();
        assert!(game.last_move_at().is_none());
    }

    #[test]
    fn test_game_state_record_is_not_a_game() {
        let state = json!({ "type": "gameState", "moves": "e2e4", "wtime": 60000 });
        assert_eq!(
            Game::from_json(state),
            Err(MapError::MissingAttribute("created_at".to_string()))
        );
    }
}
