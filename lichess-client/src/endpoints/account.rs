use lichess_model::{MappedObject, Player};

use super::{array_of, field};
use crate::client::LichessClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Params, RequestSpec};
use crate::validate::ensure_range_opt;

impl LichessClient {
    /// The authenticated account.
    pub async fn get_profile(&self) -> ClientResult<Player> {
        let json = self.get_json(RequestSpec::get("/api/account")).await?;
        Ok(Player::from_json(json)?)
    }

    pub async fn get_email_address(&self) -> ClientResult<String> {
        let json = self.get_json(RequestSpec::get("/api/account/email")).await?;
        match field(json, "email")? {
            serde_json::Value::String(email) => Ok(email),
            other => Err(ClientError::InvalidData(format!("email is not a string: {other}"))),
        }
    }

    pub async fn get_kid_mode_status(&self) -> ClientResult<bool> {
        let json = self.get_json(RequestSpec::get("/api/account/kid")).await?;
        field(json, "kid")?
            .as_bool()
            .ok_or_else(|| ClientError::InvalidData("kid is not a boolean".into()))
    }

    pub async fn set_kid_mode_status(&self, enabled: bool) -> ClientResult<bool> {
        let request = RequestSpec::post("/api/account/kid").params(Params::new().set("v", enabled));
        self.post_ok(request).await
    }

    pub async fn get_preferences(&self) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get("/api/account/preferences")).await
    }

    /// Ongoing games of the authenticated account, most urgent first.
    pub async fn get_ongoing_games(&self, limit: Option<u32>) -> ClientResult<Vec<MappedObject>> {
        let limit = ensure_range_opt("limit", limit, 1, 50)?;
        let request =
            RequestSpec::get("/api/account/playing").params(Params::new().opt("nb", limit));
        let json = self.get_json(request).await?;
        array_of(field(json, "nowPlaying")?, MappedObject::from_json)
    }
}
