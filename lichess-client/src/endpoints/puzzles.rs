use lichess_model::{MappedObject, Puzzle};

use crate::client::LichessClient;
use crate::error::ClientResult;
use crate::transport::{Params, RequestSpec};
use crate::validate::{ensure_min, ensure_min_opt, ensure_range_opt};

impl LichessClient {
    pub async fn get_daily_puzzle(&self) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get("/api/puzzle/daily")).await
    }

    pub async fn get_puzzle(&self, puzzle_id: &str) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get(format!("/api/puzzle/{puzzle_id}")))
            .await
    }

    /// Puzzles solved by the authenticated account, most recent first.
    pub async fn get_puzzle_activity(&self, limit: Option<u32>) -> ClientResult<Vec<Puzzle>> {
        let limit = ensure_min_opt("limit", limit, 1)?;
        let request =
            RequestSpec::get("/api/puzzle/activity").params(Params::new().opt("max", limit));
        self.ndjson_as(request, Puzzle::from_json).await
    }

    pub async fn get_puzzle_dashboard(&self, days: u32) -> ClientResult<MappedObject> {
        let days = ensure_min("days", days, 1)?;
        self.get_object(RequestSpec::get(format!("/api/puzzle/dashboard/{days}")))
            .await
    }

    pub async fn get_storm_dashboard(
        &self,
        username: &str,
        days: Option<u32>,
    ) -> ClientResult<MappedObject> {
        let days = ensure_range_opt("days", days, 0, 365)?;
        let request = RequestSpec::get(format!("/api/storm/dashboard/{username}"))
            .params(Params::new().opt("days", days));
        self.get_object(request).await
    }

    /// Create a private puzzle race; the answer carries its URL.
    pub async fn create_puzzle_race(&self) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::post("/api/racer")).await
    }
}
