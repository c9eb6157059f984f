use lichess_model::{Game, MappedObject};

use crate::client::LichessClient;
use crate::error::{ClientError, ClientResult};
use crate::transport::{Body, Params, RequestSpec};
use crate::validate::{ensure_days, ensure_range, ensure_range_opt, ChallengeRule, Color, DeclineReason, Variant};

fn rules_param(rules: &[ChallengeRule]) -> Option<String> {
    (!rules.is_empty()).then(|| {
        rules
            .iter()
            .map(|r| r.as_str())
            .collect::<Vec<_>>()
            .join(",")
    })
}

/// A challenge sent to one user.
///
/// Without a clock the game is correspondence and `days` applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeRequest {
    pub rated: Option<bool>,
    /// Initial clock time in seconds.
    pub clock_limit: Option<u32>,
    pub clock_increment: Option<u32>,
    pub days: Option<u32>,
    pub color: Option<Color>,
    pub variant: Option<Variant>,
    /// Custom initial position. Requires a standard, chess960 or
    /// from-position variant, and an unrated game.
    pub fen: Option<String>,
    /// Keep the challenge open until it is accepted instead of expiring after 20 seconds.
    pub keep_alive_stream: Option<bool>,
    /// `challenge:write` token of the opponent; the game starts immediately.
    pub accept_by_token: Option<String>,
    /// Message sent to both players when the game starts. Needs `accept_by_token`.
    pub message: Option<String>,
    pub rules: Vec<ChallengeRule>,
}

impl ChallengeRequest {
    pub fn validate(&self) -> ClientResult<()> {
        ensure_range_opt("clock limit", self.clock_limit, 0, 10800)?;
        ensure_range_opt("clock increment", self.clock_increment, 0, 180)?;
        self.days.map(ensure_days).transpose()?;
        if self.message.is_some() && self.accept_by_token.is_none() {
            return Err(ClientError::Validation(
                "message can only be set together with an acceptance token".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn params(&self) -> Params {
        Params::new()
            .opt("rated", self.rated)
            .opt("clock.limit", self.clock_limit)
            .opt("clock.increment", self.clock_increment)
            .opt("days", self.days)
            .opt("color", self.color)
            .opt("variant", self.variant)
            .opt("fen", self.fen.as_deref())
            .opt("keepAliveStream", self.keep_alive_stream)
            .opt("acceptByToken", self.accept_by_token.as_deref())
            .opt("message", self.message.as_deref())
            .opt("rules", rules_param(&self.rules))
    }
}

/// A game against the Lichess AI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiChallenge {
    /// Strength, 1 to 8.
    pub level: u8,
    pub clock_limit: Option<u32>,
    pub clock_increment: Option<u32>,
    pub days: Option<u32>,
    pub color: Option<Color>,
    pub variant: Option<Variant>,
    pub fen: Option<String>,
}

impl AiChallenge {
    pub fn new(level: u8) -> Self {
        Self {
            level,
            clock_limit: None,
            clock_increment: None,
            days: None,
            color: None,
            variant: None,
            fen: None,
        }
    }

    pub fn validate(&self) -> ClientResult<()> {
        ensure_range("level", self.level, 1, 8)?;
        ensure_range_opt("clock limit", self.clock_limit, 0, 10800)?;
        ensure_range_opt("clock increment", self.clock_increment, 0, 60)?;
        self.days.map(ensure_days).transpose()?;
        Ok(())
    }

    pub(crate) fn params(&self) -> Params {
        Params::new()
            .set("level", self.level)
            .opt("clock.limit", self.clock_limit)
            .opt("clock.increment", self.clock_increment)
            .opt("days", self.days)
            .opt("color", self.color)
            .opt("variant", self.variant)
            .opt("fen", self.fen.as_deref())
    }
}

/// A challenge any two players can join through its URL. Expires after 24 hours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenChallenge {
    pub rated: Option<bool>,
    pub clock_limit: Option<u32>,
    pub clock_increment: Option<u32>,
    pub days: Option<u32>,
    pub variant: Option<Variant>,
    pub fen: Option<String>,
    pub rules: Vec<ChallengeRule>,
    /// Restrict the challenge to a pair of users; the first plays white.
    pub users: Option<(String, String)>,
}

impl OpenChallenge {
    pub fn validate(&self) -> ClientResult<()> {
        ensure_range_opt("clock limit", self.clock_limit, 0, 10800)?;
        ensure_range_opt("clock increment", self.clock_increment, 0, 60)?;
        self.days.map(ensure_days).transpose()?;
        Ok(())
    }

    pub(crate) fn params(&self) -> Params {
        Params::new()
            .opt("rated", self.rated)
            .opt("clock.limit", self.clock_limit)
            .opt("clock.increment", self.clock_increment)
            .opt("days", self.days)
            .opt("variant", self.variant)
            .opt("fen", self.fen.as_deref())
            .opt("rules", rules_param(&self.rules))
            .opt(
                "users",
                self.users.as_ref().map(|(white, black)| format!("{white},{black}")),
            )
    }
}

impl LichessClient {
    /// Incoming and outgoing challenges of the authenticated account.
    pub async fn get_challenges(&self) -> ClientResult<MappedObject> {
        self.get_object(RequestSpec::get("/api/challenge")).await
    }

    pub async fn create_challenge(
        &self,
        username: &str,
        challenge: &ChallengeRequest,
    ) -> ClientResult<MappedObject> {
        challenge.validate()?;
        let request = RequestSpec::post(format!("/api/challenge/{username}"))
            .body(Body::form(challenge.params()));
        self.get_object(request).await
    }

    pub async fn accept_challenge(&self, challenge_id: &str) -> ClientResult<bool> {
        self.post_ok(RequestSpec::post(format!("/api/challenge/{challenge_id}/accept")))
            .await
    }

    pub async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: Option<DeclineReason>,
    ) -> ClientResult<bool> {
        let request = RequestSpec::post(format!("/api/challenge/{challenge_id}/decline"))
            .body(Body::form(Params::new().opt("reason", reason)));
        self.post_ok(request).await
    }

    /// Cancel a challenge. With the opponent's token an ongoing game is aborted too.
    pub async fn cancel_challenge(
        &self,
        challenge_id: &str,
        opponent_token: Option<&str>,
    ) -> ClientResult<bool> {
        let request = RequestSpec::post(format!("/api/challenge/{challenge_id}/cancel"))
            .params(Params::new().opt("opponentToken", opponent_token));
        self.post_ok(request).await
    }

    pub async fn challenge_ai(&self, challenge: &AiChallenge) -> ClientResult<Game> {
        challenge.validate()?;
        let request = RequestSpec::post("/api/challenge/ai").body(Body::form(challenge.params()));
        Ok(Game::from_json(self.get_json(request).await?)?)
    }

    pub async fn create_open_challenge(
        &self,
        challenge: &OpenChallenge,
    ) -> ClientResult<MappedObject> {
        challenge.validate()?;
        let request =
            RequestSpec::post("/api/challenge/open").body(Body::form(challenge.params()));
        self.get_object(request).await
    }

    /// Start both clocks right away. Both tokens need the `challenge:write` scope.
    pub async fn start_game_clocks(
        &self,
        game_id: &str,
        token_1: Option<&str>,
        token_2: Option<&str>,
    ) -> ClientResult<bool> {
        let request = RequestSpec::post(format!("/api/challenge/{game_id}/start-clocks"))
            .params(Params::new().opt("token1", token_1).opt("token2", token_2));
        self.post_ok(request).await
    }

    /// Give the opponent extra seconds.
    pub async fn add_time_to_clock(&self, game_id: &str, seconds: u32) -> ClientResult<bool> {
        let seconds = ensure_range("seconds", seconds, 1, 86400)?;
        self.post_ok(RequestSpec::post(format!(
            "/api/round/{game_id}/add-time/{seconds}"
        )))
        .await
    }

    /// Admin only: obtain `challenge:write` tokens for several users.
    pub async fn create_challenge_tokens<S: AsRef<str>>(
        &self,
        users: &[S],
        description: &str,
    ) -> ClientResult<MappedObject> {
        let users = users.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",");
        let form = Params::new().set("users", users).set("description", description);
        let request = RequestSpec::post("/api/token/admin-challenge").body(Body::form(form));
        self.get_object(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_requires_acceptance_token() {
        let challenge = ChallengeRequest {
            message: Some("Your game with {opponent} is ready".into()),
            ..Default::default()
        };
        assert!(challenge.validate().unwrap_err().is_validation());

        let challenge = ChallengeRequest {
            accept_by_token: Some("lip_opponent".into()),
            ..challenge
        };
        assert!(challenge.validate().is_ok());
    }

    #[test]
    fn test_challenge_params() {
        let challenge = ChallengeRequest {
            clock_limit: Some(300),
            clock_increment: Some(3),
            rules: vec![ChallengeRule::NoAbort, ChallengeRule::NoRematch],
            ..Default::default()
        };
        let params = challenge.params();
        assert_eq!(params.get("clock.limit"), Some("300"));
        assert_eq!(params.get("rules"), Some("noAbort,noRematch"));
        assert_eq!(params.get("message"), None);
    }

    #[test]
    fn test_ai_challenge_bounds() {
        assert!(AiChallenge::new(8).validate().is_ok());
        assert!(AiChallenge::new(0).validate().is_err());
        assert!(AiChallenge::new(9).validate().is_err());

        let challenge = AiChallenge {
            clock_increment: Some(61),
            ..AiChallenge::new(3)
        };
        assert!(challenge.validate().is_err());
    }

    #[test]
    fn test_open_challenge_users() {
        let challenge = OpenChallenge {
            users: Some(("alice".into(), "bob".into())),
            ..Default::default()
        };
        assert_eq!(challenge.params().get("users"), Some("alice,bob"));
    }
}
