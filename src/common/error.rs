use thiserror::Error;

/// Connection-level failure on any backend call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("login rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("login response missing token: {body}")]
    MissingToken { body: String },

    #[error("login transport error: {0}")]
    Transport(#[from] TransportError),
}

/// The ingestion endpoint answered with something other than 200 or 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("report rejected with status {status}: {body}")]
pub struct ServerRejection {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Rejected(#[from] ServerRejection),

    #[error("report transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Why a tick was abandoned. Never fatal to the agent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("cannot login, skipping send: {0}")]
    Auth(AuthError),

    #[error("re-login after 401 failed: {0}")]
    Relogin(AuthError),

    #[error("send failed: {0}")]
    Submit(SubmitError),

    #[error("resend after re-login failed: {0}")]
    Resend(SubmitError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

pub type TickResult<T> = Result<T, TickError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
