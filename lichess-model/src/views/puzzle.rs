use super::mapped_view;
use crate::error::MapResult;
use crate::time::coerce_field;
use crate::value::MappedObject;

/// A puzzle activity entry with `date` as a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Puzzle(MappedObject);

mapped_view!(Puzzle);

impl Puzzle {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut puzzle = MappedObject::from_json(json)?;
        coerce_field(&mut puzzle, "date")?;
        Ok(Self(puzzle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_puzzle_date() {
        let puzzle = Puzzle::from_json(json!({
            "id": "K69di", "date": 1622380800000_i64, "win": true, "puzzleRating": 1805
        }))
        .unwrap();
        assert_eq!(puzzle.datetime("date").unwrap().timestamp_millis(), 1622380800000);
        assert_eq!(puzzle.i64("puzzle_rating").unwrap(), 1805);
    }
}
