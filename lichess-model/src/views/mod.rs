//! Specialized views over mapped payloads.
//!
//! A view is a [`MappedObject`](crate::MappedObject) whose timestamp fields
//! have been coerced during construction. Views deref to the underlying
//! object, so every attribute stays reachable by name. A view that expects a
//! field fails with [`MapError::MissingAttribute`](crate::MapError) when the
//! payload lacks it instead of defaulting.

/// Deref, conversion, and `TryFrom<serde_json::Value>` for a newtype view
/// that provides `from_json`.
macro_rules! mapped_view {
    ($view:ident) => {
        impl std::ops::Deref for $view {
            type Target = $crate::MappedObject;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl $view {
            pub fn into_inner(self) -> $crate::MappedObject {
                self.0
            }
        }

        impl TryFrom<serde_json::Value> for $view {
            type Error = $crate::MapError;

            fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
                Self::from_json(json)
            }
        }

        impl From<$view> for $crate::MappedObject {
            fn from(view: $view) -> Self {
                view.0
            }
        }
    };
}

pub(crate) use mapped_view;

mod game;
mod list;
mod performance;
mod player;
mod puzzle;
mod rating;
mod tournament;
mod tv;

pub use game::Game;
pub use list::{GamesList, JoinRequest, RequestList};
pub use performance::PerformanceStatistic;
pub use player::Player;
pub use puzzle::Puzzle;
pub use rating::{RatingHistory, RatingList, RatingPoint};
pub use tournament::{ArenaTournament, SwissTournament};
pub use tv::TvChannels;
