use super::mapped_view;
use crate::error::MapResult;
use crate::time::coerce_timestamp;
use crate::value::{MappedObject, Value};

/// Performance statistics of a user for one speed or variant.
///
/// Every `at` attribute, at any depth of nested objects, is coerced to a
/// timestamp. Values inside arrays are left as they are.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceStatistic(MappedObject);

mapped_view!(PerformanceStatistic);

impl PerformanceStatistic {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let mut stat = MappedObject::from_json(json)?;
        coerce_nested(&mut stat, "at")?;
        Ok(Self(stat))
    }
}

fn coerce_nested(obj: &mut MappedObject, target: &str) -> MapResult<()> {
    for (name, value) in obj.values_mut() {
        match value {
            Value::Object(inner) => coerce_nested(inner, target)?,
            _ if name == target => *value = Value::DateTime(coerce_timestamp(value)?),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_at_fields() {
        let stat = PerformanceStatistic::from_json(json!({
            "perf": { "glicko": { "rating": 2000 } },
            "stat": {
                "highest": { "int": 2100, "at": "2021-05-01T10:00:00.000Z", "gameId": "a" },
                "lowest": { "int": 1400, "at": "2019-01-01T10:00:00.000Z", "gameId": "b" },
                "bestWins": { "results": [{ "at": "2020-01-01T10:00:00.000Z" }] }
            }
        }))
        .unwrap();

        let stat_obj = stat.object("stat").unwrap();
        let highest = stat_obj.object("highest").unwrap();
        assert!(highest.datetime("at").is_ok());
        assert!(stat_obj.object("lowest").unwrap().datetime("at").is_ok());

        let results = stat_obj.object("best_wins").unwrap().array("results").unwrap();
        let first = results.get(0).unwrap();
        assert!(first.as_object().unwrap().attr("at").unwrap().as_str().is_some());
    }
}
