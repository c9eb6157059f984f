use crate::error::{MapError, MapResult};
use crate::time::coerce_field;
use crate::value::{MappedObject, Value};

use super::Player;

/// A list of games whose `at` field is coerced when an element is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamesList {
    items: Vec<serde_json::Value>,
}

impl GamesList {
    pub fn new(items: Vec<serde_json::Value>) -> Self {
        Self { items }
    }

    pub fn get(&self, index: usize) -> MapResult<MappedObject> {
        let raw = self
            .items
            .get(index)
            .ok_or(MapError::IndexOutOfRange(index))?;
        let mut game = MappedObject::from_json(raw.clone())?;
        coerce_field(&mut game, "at")?;
        Ok(game)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A pending request to join a team.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinRequest {
    /// The request itself, with `date` as a timestamp.
    pub request: MappedObject,
    pub user: Player,
}

/// Join requests of a team, decoded when an element is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestList {
    items: Vec<serde_json::Value>,
}

impl RequestList {
    pub fn new(items: Vec<serde_json::Value>) -> Self {
        Self { items }
    }

    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        match json {
            serde_json::Value::Array(items) => Ok(Self::new(items)),
            other => Err(MapError::NotAContainer(Value::from(other).type_name())),
        }
    }

    pub fn get(&self, index: usize) -> MapResult<JoinRequest> {
        let raw = self
            .items
            .get(index)
            .ok_or(MapError::IndexOutOfRange(index))?;

        let request = raw
            .get("request")
            .cloned()
            .ok_or_else(|| MapError::MissingAttribute("request".to_string()))?;
        let mut request = MappedObject::from_json(request)?;
        coerce_field(&mut request, "date")?;

        let user = raw
            .get("user")
            .cloned()
            .ok_or_else(|| MapError::MissingAttribute("user".to_string()))?;

        Ok(JoinRequest {
            request,
            user: Player::from_json(user)?,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MapResult<JoinRequest>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_games_list_coerces_on_read() {
        let list = GamesList::new(vec![
            json!({ "gameId": "a", "at": "2022-01-01T10:00:00.000Z" }),
            json!({ "gameId": "b" }),
        ]);

        assert_eq!(list.get(0).unwrap().str("game_id").unwrap(), "a");
        assert!(list.get(0).unwrap().datetime("at").is_ok());
        assert_eq!(list.get(1), Err(MapError::MissingAttribute("at".to_string())));
        assert_eq!(list.get(5), Err(MapError::IndexOutOfRange(5)));
    }

    #[test]
    fn test_join_requests() {
        let list = RequestList::from_json(json!([{
            "request": { "teamId": "coders", "userId": "mary", "date": 1617631214000_i64, "message": "hi" },
            "user": { "id": "mary", "createdAt": 1600000000000_i64, "seenAt": 1617631214000_i64 }
        }]))
        .unwrap();

        let join = list.get(0).unwrap();
        assert_eq!(join.request.str("team_id").unwrap(), "coders");
        assert_eq!(join.request.datetime("date").unwrap().timestamp_millis(), 1617631214000);
        assert_eq!(join.user.id(), Some("mary"));
        assert_eq!(list.iter().count(), 1);
    }
}
