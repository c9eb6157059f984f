//! Endpoint wrappers, grouped by API section.
//!
//! Each section adds an `impl LichessClient` block. Parameters are validated
//! before anything is sent; a rejected parameter never reaches the network.

mod account;
mod board;
mod challenges;
mod games;
mod puzzles;
mod teams;
mod tv;
mod users;

pub use board::Seek;
pub use challenges::{AiChallenge, ChallengeRequest, OpenChallenge};
pub use games::{ExportOptions, UserGamesQuery};

use lichess_model::MapResult;
use serde_json::Value as Json;

use crate::error::{ClientError, ClientResult};

/// Map every element of a JSON array.
pub(crate) fn array_of<T>(json: Json, map: impl Fn(Json) -> MapResult<T>) -> ClientResult<Vec<T>> {
    match json {
        Json::Array(items) => items
            .into_iter()
            .map(|item| map(item).map_err(ClientError::from))
            .collect(),
        other => Err(ClientError::InvalidData(format!(
            "expected an array, got {other}"
        ))),
    }
}

/// Take a named field out of a JSON object.
pub(crate) fn field(json: Json, name: &str) -> ClientResult<Json> {
    match json {
        Json::Object(mut map) => map
            .remove(name)
            .ok_or_else(|| ClientError::InvalidData(format!("missing field '{name}'"))),
        other => Err(ClientError::InvalidData(format!(
            "expected an object with '{name}', got {other}"
        ))),
    }
}
