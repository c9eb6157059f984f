//! Parameter validation performed before any request is sent.

use std::fmt;
use std::str::FromStr;

use crate::error::{ClientError, ClientResult};

/// The earliest timestamp accepted by game export filters (2013-01-01, in ms).
pub const EARLIEST_GAME_MS: i64 = 1_356_998_400_070;

/// Days-per-turn values accepted for correspondence games.
pub const CORRESPONDENCE_DAYS: [u32; 7] = [1, 2, 3, 5, 7, 10, 14];

/// Fail unless `lo <= value <= hi`.
pub fn ensure_range<T>(name: &str, value: T, lo: T, hi: T) -> ClientResult<T>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < lo || value > hi {
        return Err(ClientError::Validation(format!(
            "{name} must be between {lo} and {hi}, got {value}"
        )));
    }
    Ok(value)
}

/// Fail unless `value >= lo`.
pub fn ensure_min<T>(name: &str, value: T, lo: T) -> ClientResult<T>
where
    T: PartialOrd + fmt::Display + Copy,
{
    if value < lo {
        return Err(ClientError::Validation(format!(
            "{name} must be at least {lo}, got {value}"
        )));
    }
    Ok(value)
}

pub fn ensure_range_opt<T>(name: &str, value: Option<T>, lo: T, hi: T) -> ClientResult<Option<T>>
where
    T: PartialOrd + fmt::Display + Copy,
{
    value.map(|v| ensure_range(name, v, lo, hi)).transpose()
}

pub fn ensure_min_opt<T>(name: &str, value: Option<T>, lo: T) -> ClientResult<Option<T>>
where
    T: PartialOrd + fmt::Display + Copy,
{
    value.map(|v| ensure_min(name, v, lo)).transpose()
}

pub fn ensure_days(days: u32) -> ClientResult<u32> {
    if CORRESPONDENCE_DAYS.contains(&days) {
        Ok(days)
    } else {
        Err(ClientError::Validation(format!(
            "days must be one of {CORRESPONDENCE_DAYS:?}, got {days}"
        )))
    }
}

/// Inclusive rating window, rendered as `min-max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingRange {
    min: i32,
    max: i32,
}

impl RatingRange {
    pub const LOWEST: i32 = 0;
    pub const HIGHEST: i32 = 4000;

    pub fn new(min: i32, max: i32) -> ClientResult<Self> {
        ensure_range("rating range lower bound", min, Self::LOWEST, Self::HIGHEST)?;
        ensure_range("rating range upper bound", max, Self::LOWEST, Self::HIGHEST)?;
        if min > max {
            return Err(ClientError::Validation(format!(
                "rating range lower bound {min} exceeds upper bound {max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }
}

impl fmt::Display for RatingRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Closed set of API keywords. `FromStr` is case-insensitive and rejects
/// anything outside the set with a validation error.
macro_rules! api_enum {
    ($(#[$meta:meta])* $name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ClientError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ClientError::Validation(format!("unknown {}: {s}", $label)))
            }
        }
    };
}

api_enum!(
    /// Rating category.
    PerfType, "perf type" {
        UltraBullet => "ultraBullet",
        Bullet => "bullet",
        Blitz => "blitz",
        Rapid => "rapid",
        Classical => "classical",
        Correspondence => "correspondence",
        Chess960 => "chess960",
        Crazyhouse => "crazyhouse",
        Antichess => "antichess",
        Atomic => "atomic",
        Horde => "horde",
        KingOfTheHill => "kingOfTheHill",
        RacingKings => "racingKings",
        ThreeCheck => "threeCheck",
    }
);

api_enum!(
    Variant, "variant" {
        Standard => "standard",
        Chess960 => "chess960",
        Crazyhouse => "crazyhouse",
        Antichess => "antichess",
        Atomic => "atomic",
        Horde => "horde",
        KingOfTheHill => "kingOfTheHill",
        RacingKings => "racingKings",
        ThreeCheck => "threeCheck",
        FromPosition => "fromPosition",
    }
);

api_enum!(
    Color, "color" {
        White => "white",
        Black => "black",
        Random => "random",
    }
);

api_enum!(
    /// Chat room of a game in progress.
    ChatRoom, "chat room" {
        Player => "player",
        Spectator => "spectator",
    }
);

api_enum!(
    DeclineReason, "decline reason" {
        Generic => "generic",
        Later => "later",
        TooFast => "tooFast",
        TooSlow => "tooSlow",
        TimeControl => "timeControl",
        Rated => "rated",
        Casual => "casual",
        Standard => "standard",
        Variant => "variant",
        NoBot => "noBot",
        OnlyBot => "onlyBot",
    }
);

api_enum!(
    /// Extra condition attached to a challenge.
    ChallengeRule, "challenge rule" {
        NoAbort => "noAbort",
        NoRematch => "noRematch",
        NoGiveTime => "noGiveTime",
        NoClaimWin => "noClaimWin",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_are_inclusive() {
        assert_eq!(ensure_range("nb", 1, 1, 200).unwrap(), 1);
        assert_eq!(ensure_range("nb", 200, 1, 200).unwrap(), 200);
        assert!(ensure_range("nb", 0, 1, 200).is_err());
        assert!(ensure_range("nb", 201, 1, 200).is_err());
    }

    #[test]
    fn test_validation_message_names_parameter() {
        let err = ensure_range("level", 9, 1, 8).unwrap_err();
        assert_eq!(err.to_string(), "level must be between 1 and 8, got 9");
        assert!(err.is_validation());
    }

    #[test]
    fn test_optional_values_pass_when_absent() {
        assert_eq!(ensure_range_opt::<u32>("nb", None, 1, 30).unwrap(), None);
        assert!(ensure_min_opt("since", Some(0_i64), EARLIEST_GAME_MS).is_err());
    }

    #[test]
    fn test_rating_range() {
        assert_eq!(RatingRange::new(1500, 1800).unwrap().to_string(), "1500-1800");
        assert!(RatingRange::new(-1, 1800).unwrap_err().is_validation());
        assert!(RatingRange::new(1500, 4001).is_err());
        assert!(RatingRange::new(1800, 1500).is_err());
    }

    #[test]
    fn test_days() {
        assert!(ensure_days(3).is_ok());
        assert!(ensure_days(4).is_err());
    }

    #[test]
    fn test_keywords_parse_case_insensitively() {
        assert_eq!("Blitz".parse::<PerfType>().unwrap(), PerfType::Blitz);
        assert_eq!("kingofthehill".parse::<Variant>().unwrap(), Variant::KingOfTheHill);
        assert_eq!(DeclineReason::TooFast.to_string(), "tooFast");
        assert!("purple".parse::<Color>().unwrap_err().is_validation());
    }
}
