use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BizrpcError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// In-band fault declared by the remote inside a successful reply.
    #[error("Fault ({code}) '{message}'")]
    RemoteFault { code: Value, message: String },

    /// In-band status failure used by a narrower set of remote methods.
    #[error("Status ({status}) '{message}'")]
    RemoteStatus { status: Value, message: String },

    #[error("Response entry error: {0}")]
    ResponseEntry(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("JSON serialization error: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),
}

impl BizrpcError {
    pub fn is_auth(&self) -> bool {
        matches!(self, BizrpcError::Auth(_))
    }

    /// True for errors carried inside a structurally successful reply.
    pub fn is_in_band(&self) -> bool {
        matches!(
            self,
            BizrpcError::RemoteFault { .. } | BizrpcError::RemoteStatus { .. }
        )
    }

    /// Numeric fault code, when the remote sent one.
    pub fn fault_code(&self) -> Option<i64> {
        match self {
            BizrpcError::RemoteFault { code, .. } => code
                .as_i64()
                .or_else(|| code.as_str().and_then(|s| s.trim().parse().ok())),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BizrpcError>;
