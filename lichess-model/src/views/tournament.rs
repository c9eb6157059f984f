use super::mapped_view;
use crate::error::MapResult;
use crate::time::{coerce_field, coerce_optional_field};
use crate::value::{MappedObject, Value};

/// An arena tournament with `starts_at` as a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ArenaTournament(MappedObject);

mapped_view!(ArenaTournament);

impl ArenaTournament {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut tournament = MappedObject::from_json(json)?;
        coerce_field(&mut tournament, "starts_at")?;
        Ok(Self(tournament))
    }
}

/// A Swiss tournament with `starts_at` and, when scheduled, `next_round.at`
/// as timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct SwissTournament(MappedObject);

mapped_view!(SwissTournament);

impl SwissTournament {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut tournament = MappedObject::from_json(json)?;
        coerce_field(&mut tournament, "starts_at")?;
        if let Some(Value::Object(next_round)) = tournament.get_mut("next_round") {
            coerce_optional_field(next_round, "at")?;
        }
        Ok(Self(tournament))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MapError;
    use serde_json::json;

    #[test]
    fn test_swiss_next_round() {
        let swiss = SwissTournament::from_json(json!({
            "id": "fKbJJ0Hx",
            "startsAt": "2022-03-14T17:00:00.000Z",
            "nextRound": { "at": "2022-03-14T17:10:00.000Z", "in": 600 }
        }))
        .unwrap();

        let starts = swiss.datetime("starts_at").unwrap();
        let next = swiss.object("next_round").unwrap().datetime("at").unwrap();
        assert_eq!((next - starts).num_minutes(), 10);
    }

    #[test]
    fn test_finished_swiss_has_no_next_round() {
        let swiss = SwissTournament::from_json(json!({
            "id": "done", "startsAt": "2022-03-14T17:00:00.000Z", "status": "finished"
        }))
        .unwrap();
        assert!(swiss.get("next_round").is_none());
    }

    #[test]
    fn test_arena_requires_start() {
        assert_eq!(
            ArenaTournament::from_json(json!({ "id": "x" })),
            Err(MapError::MissingAttribute("starts_at".to_string()))
        );
        let arena = ArenaTournament::from_json(json!({ "id": "x", "startsAt": 1647277200000_i64 }));
        assert!(arena.is_ok());
    }
}
