//! BotActions trait abstraction for bot logic

use async_trait::async_trait;

use crate::bot::BotClient;
use crate::client::LichessClient;
use crate::error::{ClientError, ClientResult};
use crate::validate::DeclineReason;

/// The calls a bot makes in reaction to stream events.
/// Implemented by the real clients and by `MockBotActions`.
#[async_trait]
pub trait BotActions: Send + Sync {
    /// Lowercase ID of the authenticated account
    async fn profile_id(&self) -> ClientResult<String>;

    async fn accept_challenge(&self, challenge_id: &str) -> ClientResult<bool>;

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: Option<DeclineReason>,
    ) -> ClientResult<bool>;

    /// Play a move in UCI notation
    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<bool>;
}

#[async_trait]
impl BotActions for LichessClient {
    async fn profile_id(&self) -> ClientResult<String> {
        let profile = self.get_profile().await?;
        profile
            .id()
            .map(str::to_string)
            .ok_or_else(|| ClientError::InvalidData("profile has no id".to_string()))
    }

    async fn accept_challenge(&self, challenge_id: &str) -> ClientResult<bool> {
        LichessClient::accept_challenge(self, challenge_id).await
    }

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: Option<DeclineReason>,
    ) -> ClientResult<bool> {
        LichessClient::decline_challenge(self, challenge_id, reason).await
    }

    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<bool> {
        LichessClient::make_move(self, game_id, uci, None).await
    }
}

#[async_trait]
impl BotActions for BotClient {
    async fn profile_id(&self) -> ClientResult<String> {
        BotActions::profile_id(&**self).await
    }

    async fn accept_challenge(&self, challenge_id: &str) -> ClientResult<bool> {
        LichessClient::accept_challenge(self, challenge_id).await
    }

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: Option<DeclineReason>,
    ) -> ClientResult<bool> {
        LichessClient::decline_challenge(self, challenge_id, reason).await
    }

    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<bool> {
        LichessClient::make_move(self, game_id, uci, None).await
    }
}
