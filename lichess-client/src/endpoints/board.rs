use lichess_model::{MappedObject, Player};

use super::array_of;
use crate::client::{LichessClient, Seat};
use crate::error::{ClientError, ClientResult};
use crate::transport::{body_lines, Accept, Body, Params, RequestSpec};
use crate::validate::{ensure_days, ensure_range_opt, ChatRoom, Color, RatingRange, Variant};

/// A public seek looking for a random opponent.
///
/// Real-time seeks need `time` and `increment`; correspondence seeks need
/// `days`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seek {
    pub rated: Option<bool>,
    /// Initial clock time in minutes.
    pub time: Option<u32>,
    /// Increment in seconds.
    pub increment: Option<u32>,
    pub days: Option<u32>,
    pub variant: Option<Variant>,
    pub color: Option<Color>,
    pub rating_range: Option<RatingRange>,
}

impl Seek {
    pub fn validate(&self) -> ClientResult<()> {
        ensure_range_opt("time", self.time, 0, 180)?;
        ensure_range_opt("increment", self.increment, 0, 180)?;
        self.days.map(ensure_days).transpose()?;
        Ok(())
    }

    pub(crate) fn params(&self) -> Params {
        Params::new()
            .opt("rated", self.rated)
            .opt("time", self.time)
            .opt("increment", self.increment)
            .opt("days", self.days)
            .opt("variant", self.variant)
            .opt("color", self.color)
            .opt("ratingRange", self.rating_range)
    }
}

impl LichessClient {
    /// Post a seek and keep it open until a game starts or the future is
    /// dropped. Watch the incoming events stream to learn the game ID.
    pub async fn create_seek(&self, seek: &Seek) -> ClientResult<()> {
        seek.validate()?;
        let request = RequestSpec::post("/api/board/seek").body(Body::form(seek.params()));
        let response = self.transport().send(request, Accept::Text).await?;

        let mut lines = body_lines(response);
        while lines.next_line().await?.is_some() {}
        tracing::debug!("Seek closed by server");
        Ok(())
    }

    /// Play a move in UCI notation, optionally offering a draw with it.
    pub async fn make_move(
        &self,
        game_id: &str,
        uci: &str,
        offering_draw: Option<bool>,
    ) -> ClientResult<bool> {
        let request = RequestSpec::post(self.seat_path(&format!("/game/{game_id}/move/{uci}")))
            .params(Params::new().opt("offeringDraw", offering_draw));
        self.post_ok(request).await
    }

    pub async fn post_chat_message(
        &self,
        game_id: &str,
        room: ChatRoom,
        text: &str,
    ) -> ClientResult<bool> {
        if text.is_empty() {
            return Err(ClientError::Validation("chat text must not be empty".to_string()));
        }
        let form = Params::new().set("room", room).set("text", text);
        let request =
            RequestSpec::post(self.seat_path(&format!("/game/{game_id}/chat"))).body(Body::form(form));
        self.post_ok(request).await
    }

    pub async fn get_game_chat(&self, game_id: &str) -> ClientResult<Vec<MappedObject>> {
        let json = self
            .get_json(RequestSpec::get(self.seat_path(&format!("/game/{game_id}/chat"))))
            .await?;
        array_of(json, MappedObject::from_json)
    }

    pub async fn abort_game(&self, game_id: &str) -> ClientResult<bool> {
        self.game_action(game_id, "abort").await
    }

    pub async fn resign_game(&self, game_id: &str) -> ClientResult<bool> {
        self.game_action(game_id, "resign").await
    }

    pub async fn handle_draw_offer(&self, game_id: &str, accept: bool) -> ClientResult<bool> {
        self.game_action(game_id, &format!("draw/{}", yes_no(accept)))
            .await
    }

    pub async fn handle_takeback_offer(&self, game_id: &str, accept: bool) -> ClientResult<bool> {
        self.game_action(game_id, &format!("takeback/{}", yes_no(accept)))
            .await
    }

    /// Claim the win once the opponent has left the game.
    pub async fn claim_victory(&self, game_id: &str) -> ClientResult<bool> {
        self.game_action(game_id, "claim-victory").await
    }

    /// Halve the clock in an arena game for an extra point on a win.
    pub async fn berserk_game(&self, game_id: &str) -> ClientResult<bool> {
        self.game_action(game_id, "berserk").await
    }

    async fn game_action(&self, game_id: &str, action: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(
            self.seat_path(&format!("/game/{game_id}/{action}")),
        ))
        .await
    }

    /// Bots currently online.
    pub async fn get_online_bots(&self, limit: Option<u32>) -> ClientResult<Vec<Player>> {
        let request = RequestSpec::get("/api/bot/online").params(Params::new().opt("nb", limit));
        self.ndjson_as(request, Player::from_json).await
    }

    /// Turn the account into a bot account. This cannot be undone, and only
    /// works for accounts that have never played a game.
    pub async fn upgrade_to_bot_account(&self) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("{}/account/upgrade", Seat::Bot.prefix())))
            .await
    }
}

fn yes_no(accept: bool) -> &'static str {
    if accept {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_validation() {
        let seek = Seek {
            time: Some(10),
            increment: Some(0),
            ..Default::default()
        };
        assert!(seek.validate().is_ok());

        let seek = Seek {
            time: Some(181),
            ..Default::default()
        };
        assert!(seek.validate().unwrap_err().is_validation());

        let seek = Seek {
            days: Some(4),
            ..Default::default()
        };
        assert!(seek.validate().is_err());
    }

    #[test]
    fn test_seek_params() {
        let seek = Seek {
            rated: Some(true),
            days: Some(3),
            color: Some(Color::Black),
            rating_range: Some(RatingRange::new(1500, 1800).unwrap()),
            ..Default::default()
        };
        let params = seek.params();
        assert_eq!(params.get("rated"), Some("true"));
        assert_eq!(params.get("days"), Some("3"));
        assert_eq!(params.get("color"), Some("black"));
        assert_eq!(params.get("ratingRange"), Some("1500-1800"));
        assert_eq!(params.get("time"), None);
    }
}
