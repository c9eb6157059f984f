//! Mock BotActions implementation for testing

use crate::error::{ClientError, ClientResult};
use crate::traits::BotActions;
use crate::validate::DeclineReason;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

type Response<T> = Option<Box<dyn Fn() -> ClientResult<T> + Send>>;

/// Mock bot actions for testing - only compiled in test mode or with mock feature.
/// Clones share the same responses and call log.
#[cfg(any(test, feature = "mock"))]
#[derive(Clone)]
pub struct MockBotActions {
    responses: Arc<Mutex<MockResponses>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Default)]
struct MockResponses {
    profile_id: Response<String>,
    accept_challenge: Response<bool>,
    decline_challenge: Response<bool>,
    make_move: Response<bool>,
}

#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    ProfileId,
    AcceptChallenge {
        challenge_id: String,
    },
    DeclineChallenge {
        challenge_id: String,
        reason: Option<DeclineReason>,
    },
    MakeMove {
        game_id: String,
        uci: String,
    },
}

#[cfg(any(test, feature = "mock"))]
impl Default for MockBotActions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "mock"))]
impl MockBotActions {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(MockResponses::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer profile_id with a fixed account ID
    pub fn with_profile_id(self, id: &str) -> Self {
        let id = id.to_string();
        self.responses.lock().unwrap().profile_id = Some(Box::new(move || Ok(id.clone())));
        self
    }

    /// Configure accept_challenge response
    pub fn with_accept_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<bool> + Send + 'static,
    {
        self.responses.lock().unwrap().accept_challenge = Some(Box::new(f));
        self
    }

    /// Configure decline_challenge response
    pub fn with_decline_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<bool> + Send + 'static,
    {
        self.responses.lock().unwrap().decline_challenge = Some(Box::new(f));
        self
    }

    /// Configure make_move response
    pub fn with_make_move_response<F>(self, f: F) -> Self
    where
        F: Fn() -> ClientResult<bool> + Send + 'static,
    {
        self.responses.lock().unwrap().make_move = Some(Box::new(f));
        self
    }

    /// Get recorded calls for verification
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Moves played so far, as (game, uci) pairs
    pub fn moves(&self) -> Vec<(String, String)> {
        self.get_calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::MakeMove { game_id, uci } => Some((game_id, uci)),
                _ => None,
            })
            .collect()
    }

    /// Clear call history
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    fn record(&self, call: MockCall) {
        self.call_log.lock().unwrap().push(call);
    }
}

#[cfg(any(test, feature = "mock"))]
#[async_trait]
impl BotActions for MockBotActions {
    async fn profile_id(&self) -> ClientResult<String> {
        self.record(MockCall::ProfileId);

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.profile_id {
            f()
        } else {
            Err(ClientError::NotConfigured("profile_id".to_string()))
        }
    }

    async fn accept_challenge(&self, challenge_id: &str) -> ClientResult<bool> {
        self.record(MockCall::AcceptChallenge {
            challenge_id: challenge_id.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.accept_challenge {
            f()
        } else {
            Ok(true)
        }
    }

    async fn decline_challenge(
        &self,
        challenge_id: &str,
        reason: Option<DeclineReason>,
    ) -> ClientResult<bool> {
        self.record(MockCall::DeclineChallenge {
            challenge_id: challenge_id.to_string(),
            reason,
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.decline_challenge {
            f()
        } else {
            Ok(true)
        }
    }

    async fn make_move(&self, game_id: &str, uci: &str) -> ClientResult<bool> {
        self.record(MockCall::MakeMove {
            game_id: game_id.to_string(),
            uci: uci.to_string(),
        });

        let responses = self.responses.lock().unwrap();
        if let Some(ref f) = responses.make_move {
            f()
        } else {
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_and_defaults() {
        let mock = MockBotActions::new();
        assert!(matches!(
            mock.profile_id().await,
            Err(ClientError::NotConfigured(_))
        ));
        assert!(mock.make_move("g", "e2e4").await.unwrap());

        assert_eq!(
            mock.get_calls(),
            vec![
                MockCall::ProfileId,
                MockCall::MakeMove {
                    game_id: "g".into(),
                    uci: "e2e4".into()
                }
            ]
        );
        assert_eq!(mock.moves(), vec![("g".to_string(), "e2e4".to_string())]);
    }

    #[tokio::test]
    async fn test_configured_responses_and_shared_log() {
        let mock = MockBotActions::new()
            .with_profile_id("mybot")
            .with_accept_response(|| {
                Err(ClientError::Api {
                    status: 404,
                    message: "challenge not found".into(),
                })
            });
        let clone = mock.clone();

        assert_eq!(clone.profile_id().await.unwrap(), "mybot");
        assert_eq!(
            clone.accept_challenge("c1").await.unwrap_err().to_string(),
            "challenge not found"
        );
        assert_eq!(mock.get_calls().len(), 2);

        mock.clear_calls();
        assert!(clone.get_calls().is_empty());
    }
}
