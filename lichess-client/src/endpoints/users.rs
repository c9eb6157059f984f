use lichess_model::{MappedObject, PerformanceStatistic, Player, RatingHistory};

use super::array_of;
use crate::client::LichessClient;
use crate::dispatch::{Record, Shape};
use crate::error::{ClientError, ClientResult};
use crate::transport::{join_ids, Body, Params, RequestSpec};
use crate::validate::{ensure_range, PerfType};

impl LichessClient {
    pub async fn get_user(&self, username: &str, with_trophies: Option<bool>) -> ClientResult<Player> {
        let request = RequestSpec::get(format!("/api/user/{username}"))
            .params(Params::new().opt("trophies", with_trophies));
        Ok(Player::from_json(self.get_json(request).await?)?)
    }

    /// Up to 300 users by ID.
    pub async fn get_users<S: AsRef<str>>(&self, user_ids: &[S]) -> ClientResult<Vec<Player>> {
        let request = RequestSpec::post("/api/users").body(Body::ids(user_ids));
        array_of(self.get_json(request).await?, Player::from_json)
    }

    /// Online, playing and streaming flags of several users.
    pub async fn get_user_statuses<S: AsRef<str>>(
        &self,
        user_ids: &[S],
        with_game_ids: Option<bool>,
    ) -> ClientResult<Vec<MappedObject>> {
        let request = RequestSpec::get("/api/users/status").params(
            Params::new()
                .set("ids", join_ids(user_ids))
                .opt("withGameIds", with_game_ids),
        );
        array_of(self.get_json(request).await?, MappedObject::from_json)
    }

    /// The top 10 players of every speed and variant.
    pub async fn get_top_10(&self) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get("/api/player")).await
    }

    pub async fn get_leaderboard(&self, number: u32, perf: PerfType) -> ClientResult<MappedObject> {
        let number = ensure_range("number", number, 1, 200)?;
        if perf == PerfType::Correspondence {
            return Err(ClientError::Validation(
                "correspondence has no leaderboard".to_string(),
            ));
        }
        self.get_object(RequestSpec::get(format!("/api/player/top/{number}/{perf}")))
            .await
    }

    pub async fn get_rating_history(&self, username: &str) -> ClientResult<RatingHistory> {
        let request = RequestSpec::get(format!("/api/user/{username}/rating-history"));
        Ok(RatingHistory::from_json(self.get_json(request).await?)?)
    }

    pub async fn get_performance_statistic(
        &self,
        username: &str,
        perf: PerfType,
    ) -> ClientResult<PerformanceStatistic> {
        let request = RequestSpec::get(format!("/api/user/{username}/perf/{perf}"));
        Ok(PerformanceStatistic::from_json(self.get_json(request).await?)?)
    }

    pub async fn get_live_streamers(&self) -> ClientResult<Vec<MappedObject>> {
        array_of(
            self.get_json(RequestSpec::get("/api/streamer/live")).await?,
            MappedObject::from_json,
        )
    }

    /// Total results between two users, optionally with the current match.
    pub async fn get_crosstable(
        &self,
        user_1: &str,
        user_2: &str,
        with_current_match: Option<bool>,
    ) -> ClientResult<MappedObject> {
        let request = RequestSpec::get(format!("/api/crosstable/{user_1}/{user_2}"))
            .params(Params::new().opt("matchup", with_current_match));
        self.get_object(request).await
    }

    /// Members as [`Player`] views, or plain objects when a member lacks
    /// the account timestamps.
    pub async fn get_team_members(&self, team_id: &str) -> ClientResult<Vec<Record>> {
        self.ndjson(RequestSpec::get(format!("/api/team/{team_id}/users")))
            .await?
            .into_iter()
            .map(|json| Record::from_json(json, Shape::Player))
            .collect()
    }

    pub async fn get_followed_players(&self) -> ClientResult<Vec<Player>> {
        self.ndjson_as(RequestSpec::get("/api/rel/following"), Player::from_json)
            .await
    }

    pub async fn follow(&self, username: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("/api/rel/follow/{username}")))
            .await
    }

    pub async fn unfollow(&self, username: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("/api/rel/unfollow/{username}")))
            .await
    }
}
