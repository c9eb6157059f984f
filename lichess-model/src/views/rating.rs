use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{MapError, MapResult};

/// One point of a rating history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingPoint {
    pub date: NaiveDate,
    pub rating: i64,
}

/// The rating points of one speed or variant, decoded on read.
///
/// The API encodes each point as `[year, month, day, rating]` with a
/// zero-based month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingList {
    points: Vec<serde_json::Value>,
}

impl RatingList {
    pub fn new(points: Vec<serde_json::Value>) -> Self {
        Self { points }
    }

    pub fn get(&self, index: usize) -> MapResult<RatingPoint> {
        let raw = self
            .points
            .get(index)
            .ok_or(MapError::IndexOutOfRange(index))?;
        decode_point(raw)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = MapResult<RatingPoint>> + '_ {
        self.points.iter().map(decode_point)
    }
}

fn decode_point(raw: &serde_json::Value) -> MapResult<RatingPoint> {
    let invalid = || MapError::InvalidTimestamp(raw.to_string());
    let parts: Vec<i64> = raw
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|part| part.as_i64().ok_or_else(invalid))
        .collect::<MapResult<_>>()?;

    let [year, month, day, rating] = parts[..] else {
        return Err(invalid());
    };
    let date = NaiveDate::from_ymd_opt(
        i32::try_from(year).map_err(|_| invalid())?,
        month
            .checked_add(1)
            .and_then(|month| u32::try_from(month).ok())
            .ok_or_else(invalid)?,
        u32::try_from(day).map_err(|_| invalid())?,
    )
    .ok_or_else(invalid)?;

    Ok(RatingPoint { date, rating })
}

/// A user's rating history across every rated speed and variant.
///
/// Construction fails when any of the thirteen standard perf names is absent.
/// Perfs outside that set are kept in `others`, keyed by their API name.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingHistory {
    pub ultra_bullet: RatingList,
    pub bullet: RatingList,
    pub blitz: RatingList,
    pub rapid: RatingList,
    pub classical: RatingList,
    pub chess960: RatingList,
    pub crazyhouse: RatingList,
    pub antichess: RatingList,
    pub atomic: RatingList,
    pub horde: RatingList,
    pub king_of_the_hill: RatingList,
    pub racing_kings: RatingList,
    pub three_check: RatingList,
    pub others: BTreeMap<String, RatingList>,
}

impl RatingHistory {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let serde_json::Value::Array(entries) = json else {
            return Err(MapError::UnexpectedType {
                name: "rating history".to_string(),
                expected: "an array",
            });
        };

        let mut perfs = BTreeMap::new();
        for entry in entries {
            let name = entry
                .get("name")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| MapError::MissingAttribute("name".to_string()))?
                .to_string();
            let points = match entry.get("points") {
                Some(serde_json::Value::Array(points)) => points.clone(),
                _ => return Err(MapError::MissingAttribute("points".to_string())),
            };
            perfs.insert(name, RatingList::new(points));
        }

        let mut take = |name: &str| {
            perfs
                .remove(name)
                .ok_or_else(|| MapError::MissingAttribute(name.to_string()))
        };

        Ok(Self {
            ultra_bullet: take("UltraBullet")?,
            bullet: take("Bullet")?,
            blitz: take("Blitz")?,
            rapid: take("Rapid")?,
            classical: take("Classical")?,
            chess960: take("Chess960")?,
            crazyhouse: take("Crazyhouse")?,
            antichess: take("Antichess")?,
            atomic: take("Atomic")?,
            horde: take("Horde")?,
            king_of_the_hill: take("King of the Hill")?,
            racing_kings: take("Racing Kings")?,
            three_check: take("Three-check")?,
            others: perfs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PERFS: [&str; 13] = [
        "UltraBullet",
        "Bullet",
        "Blitz",
        "Rapid",
        "Classical",
        "Chess960",
        "Crazyhouse",
        "Antichess",
        "Atomic",
        "Horde",
        "King of the Hill",
        "Racing Kings",
        "Three-check",
    ];

    fn history_json(skip: Option<&str>) -> serde_json::Value {
        let mut entries: Vec<_> = PERFS
            .iter()
            .filter(|name| Some(**name) != skip)
            .map(|name| json!({ "name": name, "points": [] }))
            .collect();
        entries[2] = json!({ "name": "Blitz", "points": [[2011, 0, 8, 1472], [2011, 11, 31, 1523]] });
        entries.push(json!({ "name": "Correspondence", "points": [[2012, 5, 1, 1500]] }));
        serde_json::Value::Array(entries)
    }

    #[test]
    fn test_rating_points_use_zero_based_months() {
        let history = RatingHistory::from_json(history_json(None)).unwrap();

        assert_eq!(history.blitz.len(), 2);
        let first = history.blitz.get(0).unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 8).unwrap());
        assert_eq!(first.rating, 1472);
        let last = history.blitz.get(1).unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2011, 12, 31).unwrap());
        assert!(history.bullet.is_empty());
        assert_eq!(history.others["Correspondence"].len(), 1);
    }

    #[test]
    fn test_missing_perf_fails_fast() {
        let result = RatingHistory::from_json(history_json(Some("Horde")));
        assert_eq!(result, Err(MapError::MissingAttribute("Horde".to_string())));
    }

    #[test]
    fn test_out_of_range_and_malformed_points() {
        let list = RatingList::new(vec![json!([2011, 0, 8]), json!([2011, 12, 1, 1500])]);
        assert!(matches!(list.get(0), Err(MapError::InvalidTimestamp(_))));
        assert!(matches!(list.get(1), Err(MapError::InvalidTimestamp(_))));
        assert_eq!(list.get(2), Err(MapError::IndexOutOfRange(2)));
    }

    #[test]
    fn test_extreme_month_is_rejected() {
        let list = RatingList::new(vec![json!([2011, i64::MAX, 1, 1500]), json!([2011, -1, 1, 1500])]);
        assert!(matches!(list.get(0), Err(MapError::InvalidTimestamp(_))));
        assert!(matches!(list.get(1), Err(MapError::InvalidTimestamp(_))));
    }
}
