use model::Snowflake;
use std::fmt::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("received malformed message: {0}")]
    MalformedMessage(#[source] serde_json::Error),

    #[error("message data did not match the expected shape: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error("command arguments were not a JSON object: {0}")]
    InvalidArgs(#[source] serde_json::Error),

    #[error("authentication was rejected: {0}")]
    AuthRejected(String),

    #[error("user {0} is not in the roster")]
    UnknownUser(Snowflake),

    #[error("token exchange returned status {0}")]
    TokenExchange(reqwest::StatusCode),

    #[error("token exchange response did not contain an access token")]
    MissingAccessToken,

    #[error("connection is not running")]
    NotRunning,

    #[error("{0}")]
    GenericError(String),

    #[error("error while encoding payload: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("error while performing HTTP request: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("error while operating on websocket: {0}")]
    WebsocketError(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("error while parsing url: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("error while loading config: {0}")]
    EnvyError(#[from] envy::Error),
}

impl RpcError {
    pub fn custom<T: Display>(msg: T) -> Self {
        RpcError::GenericError(msg.to_string())
    }
}

impl<T> From<RpcError> for Result<T> {
    fn from(e: RpcError) -> Self {
        Err(e)
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
