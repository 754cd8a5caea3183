use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatumError>;

#[derive(Error, Debug)]
pub enum DatumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid URI `{uri}`: {reason}")]
    InvalidUri { uri: String, reason: String },
    #[error("Base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("Argument error: {0}")]
    Argument(String),
    #[error("Parsing error")]
    Parse,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DatumError {
    /// Rejection of a URI that is absent or matched no recognized form.
    pub fn invalid_uri(
        uri: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidUri {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DatumError {
    fn from(_: serde_json::Error) -> Self {
        Self::Parse
    }
}
