use chrono::{DateTime, Utc};

use super::mapped_view;
use crate::error::MapResult;
use crate::time::coerce_field;
use crate::value::{MappedObject, Value};

/// A user account, with `created_at` and `seen_at` as timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Player(MappedObject);

mapped_view!(Player);

impl Player {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut player = MappedObject::from_json(json)?;
        coerce_field(&mut player, "created_at")?;
        coerce_field(&mut player, "seen_at")?;
        Ok(Self(player))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn username(&self) -> Option<&str> {
        self.0.get("username").and_then(Value::as_str)
    }

    /// The account title (`GM`, `BOT`, ...), if any.
    pub fn title(&self) -> Option<&str> {
        self.0.get("title").and_then(Value::as_str)
    }

    pub fn is_bot(&self) -> bool {
        self.title() == Some("BOT")
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.0.get("created_at").and_then(Value::as_datetime)
    }

    pub fn seen_at(&self) -> Option<DateTime<Utc>> {
        self.0.get("seen_at").and_then(Value::as_datetime)
    }
}
