//! Client for accounts upgraded to bot.

use std::ops::Deref;

use crate::client::{LichessClient, Seat};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// A [`LichessClient`] whose board-play calls and game streams go through
/// the Bot API.
#[derive(Debug, Clone)]
pub struct BotClient {
    inner: LichessClient,
}

impl BotClient {
    /// Build a bot client without contacting the server.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            inner: LichessClient::with_seat(config, Seat::Bot)?,
        })
    }

    /// Build a bot client and verify the token.
    ///
    /// Fails when the profile cannot be read. An account that is not a bot
    /// only gets a warning, since it can still be upgraded.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let client = Self::new(config)?;
        let profile = client.get_profile().await.map_err(|e| {
            tracing::debug!(error = %e, "Profile lookup failed");
            ClientError::Api {
                status: e.status().unwrap_or(401),
                message: "invalid authorization token.".to_string(),
            }
        })?;

        if !profile.is_bot() {
            tracing::warn!(
                account = profile.username().unwrap_or_default(),
                "Account is not a bot account; Bot API calls will be rejected until it is upgraded"
            );
        }
        Ok(client)
    }

    pub fn into_inner(self) -> LichessClient {
        self.inner
    }
}

impl Deref for BotClient {
    type Target = LichessClient;

    fn deref(&self) -> &LichessClient {
        &self.inner
    }
}
