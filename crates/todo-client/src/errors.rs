use thiserror::Error;

/// クライアント側のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// 2xx 以外の応答（メッセージは固定文言、ボディは読まない）
    #[error("{0}")]
    RequestFailed(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid token: {0}")]
    InvalidToken(String),
}
