//! Dynamic mapping of Lichess API payloads.
//!
//! Every JSON document returned by the API is turned into a [`MappedObject`]:
//! keys are converted from camelCase to snake_case and exposed by name, nested
//! objects and arrays are wrapped recursively, and scalars pass through as
//! [`Value`] variants. Specialized views such as [`Game`] and [`Player`]
//! additionally coerce timestamp fields into [`chrono::DateTime`] values.
//!
//! ```
//! use lichess_model::MappedObject;
//!
//! let json = serde_json::json!({ "id": "q7ZvsdUF", "lastMove": "e2e4" });
//! let game = MappedObject::from_json(json).unwrap();
//! assert_eq!(game.str("last_move").unwrap(), "e2e4");
//! ```

mod case;
mod error;
mod time;
mod value;
pub mod views;

pub use case::to_snake_case;
pub use error::{MapError, MapResult};
pub use time::coerce_timestamp;
pub use value::{map_value, MappedArray, MappedObject, Value};
pub use views::{
    ArenaTournament, Game, GamesList, JoinRequest, PerformanceStatistic, Player, Puzzle,
    RatingHistory, RatingList, RatingPoint, RequestList, SwissTournament, TvChannels,
};
