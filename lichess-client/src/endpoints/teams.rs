use lichess_model::{ArenaTournament, MappedObject, RequestList, SwissTournament};

use super::array_of;
use crate::client::LichessClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Body, Params, RequestSpec};
use crate::validate::ensure_min_opt;

impl LichessClient {
    pub async fn get_team(&self, team_id: &str) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get(format!("/api/team/{team_id}")))
            .await
    }

    /// One page of teams, most popular first.
    pub async fn get_popular_teams(&self, page: Option<u32>) -> ClientResult<MappedObject> {
        let page = ensure_min_opt("page", page, 1)?;
        let request = RequestSpec::get("/api/team/all").params(Params::new().opt("page", page));
        self.get_object(request).await
    }

    pub async fn get_user_teams(&self, username: &str) -> ClientResult<Vec<MappedObject>> {
        let json = self
            .get_json(RequestSpec::get(format!("/api/team/all/of/{username}")))
            .await?;
        array_of(json, MappedObject::from_json)
    }

    pub async fn search_team(
        &self,
        text: Option<&str>,
        page: Option<u32>,
    ) -> ClientResult<MappedObject> {
        let page = ensure_min_opt("page", page, 1)?;
        let request = RequestSpec::get("/api/team/search")
            .params(Params::new().opt("text", text).opt("page", page));
        self.get_object(request).await
    }

    pub async fn get_swiss_tournaments(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<SwissTournament>> {
        let limit = ensure_min_opt("limit", limit, 1)?;
        let request = RequestSpec::get(format!("/api/team/{team_id}/swiss"))
            .params(Params::new().opt("max", limit));
        self.ndjson_as(request, SwissTournament::from_json).await
    }

    pub async fn get_arena_tournaments(
        &self,
        team_id: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<ArenaTournament>> {
        let limit = ensure_min_opt("limit", limit, 1)?;
        let request = RequestSpec::get(format!("/api/team/{team_id}/arena"))
            .params(Params::new().opt("max", limit));
        self.ndjson_as(request, ArenaTournament::from_json).await
    }

    /// Join a team, or ask to join when it requires approval.
    pub async fn join_team(
        &self,
        team_id: &str,
        message: Option<&str>,
        password: Option<&str>,
    ) -> ClientResult<bool> {
        let form = Params::new().opt("message", message).opt("password", password);
        let request = RequestSpec::post(format!("/team/{team_id}/join")).body(Body::form(form));
        self.post_ok(request).await
    }

    pub async fn leave_team(&self, team_id: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("/team/{team_id}/quit")))
            .await
    }

    /// Pending join requests of a team the account leads.
    pub async fn get_join_requests(&self, team_id: &str) -> ClientResult<RequestList> {
        let json = self
            .get_json(RequestSpec::get(format!("/api/team/{team_id}/requests")))
            .await?;
        Ok(RequestList::from_json(json)?)
    }

    pub async fn accept_join_request(&self, team_id: &str, user_id: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!(
            "/api/team/{team_id}/request/{user_id}/accept"
        )))
        .await
    }

    pub async fn decline_join_request(&self, team_id: &str, user_id: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!(
            "/api/team/{team_id}/request/{user_id}/decline"
        )))
        .await
    }

    pub async fn kick_team_member(&self, team_id: &str, user_id: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("/api/team/{team_id}/kick/{user_id}")))
            .await
    }

    /// Send a private message to every member of a team.
    pub async fn message_team_members(&self, team_id: &str, message: &str) -> ClientResult<bool> {
        if message.trim().is_empty() {
            return Err(ClientError::Validation("message must not be empty".to_string()));
        }
        let request = RequestSpec::post(format!("/team/{team_id}/pm-all"))
            .body(Body::form(Params::new().set("message", message)));
        self.post_ok(request).await
    }
}
