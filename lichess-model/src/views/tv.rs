use serde_json::Map;

use crate::error::{MapError, MapResult};
use crate::value::MappedObject;

/// The current game of every TV channel.
///
/// Channel names are looked up verbatim (`"King of the Hill"`, `"Top Rated"`)
/// before mapping; every channel must be present.
#[derive(Debug, Clone, PartialEq)]
pub struct TvChannels {
    pub ultra_bullet: MappedObject,
    pub bullet: MappedObject,
    pub blitz: MappedObject,
    pub rapid: MappedObject,
    pub classical: MappedObject,
    pub chess960: MappedObject,
    pub crazyhouse: MappedObject,
    pub antichess: MappedObject,
    pub atomic: MappedObject,
    pub horde: MappedObject,
    pub king_of_the_hill: MappedObject,
    pub racing_kings: MappedObject,
    pub three_check: MappedObject,
    pub bot: MappedObject,
    pub computer: MappedObject,
    pub top_rated: MappedObject,
}

impl TvChannels {
    pub fn from_json(json: serde_json::Value) -> MapResult<Self> {
        let serde_json::Value::Object(mut channels) = json else {
            return Err(MapError::UnexpectedType {
                name: "tv channels".to_string(),
                expected: "an object",
            });
        };

        let mut take = |name: &str| channel(&mut channels, name);
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
            bot: take("Bot")?,
            computer: take("Computer")?,
            top_rated: take("Top Rated")?,
        })
    }
}

fn channel(channels: &mut Map<String, serde_json::Value>, name: &str) -> MapResult<MappedObject> {
    let game = channels
        .remove(name)
        .ok_or_else(|| MapError::MissingAttribute(name.to_string()))?;
    MappedObject::from_json(game)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CHANNELS: [&str; 16] = [
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
        "Bot",
        "Computer",
        "Top Rated",
    ];

    fn channels_json() -> serde_json::Map<String, serde_json::Value> {
        CHANNELS
            .iter()
            .map(|name| {
                let game = json!({ "user": { "id": name.to_lowercase() }, "rating": 2000, "gameId": "g" });
                (name.to_string(), game)
            })
            .collect()
    }

    #[test]
    fn test_all_channels_mapped() {
        let tv = TvChannels::from_json(serde_json::Value::Object(channels_json())).unwrap();
        assert_eq!(tv.top_rated.object("user").unwrap().str("id").unwrap(), "top rated");
        assert_eq!(tv.king_of_the_hill.str("game_id").unwrap(), "g");
    }

    #[test]
    fn test_missing_channel() {
        let mut channels = channels_json();
        channels.remove("Computer");
        assert_eq!(
            TvChannels::from_json(serde_json::Value::Object(channels)),
            Err(MapError::MissingAttribute("Computer".to_string()))
        );
    }
}
