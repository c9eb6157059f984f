use lichess_client::lichess_model::MapError;
use lichess_client::ClientError;
use thiserror::Error;

pub type BotResult<T> = Result<T, BotError>;

#[derive(Error, Debug)]
pub enum BotError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Unexpected event payload: {0}")]
    Payload(#[from] MapError),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid move notation: {0}")]
    InvalidMove(String),

    #[error("Illegal move in game record: {0}")]
    IllegalMove(String),
}
