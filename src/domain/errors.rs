use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error)]
#[display("invalid announcement configuration format")]
pub struct InvalidConfigError;

#[derive(Debug, Display, Error)]
#[display("{_0}")]
pub struct TransportError(#[error(not(source))] String);

impl TransportError {
    pub fn message(msg: impl ToString) -> Self {
        Self(msg.to_string())
    }
}

/// Everything that can go wrong between discovering a configuration and rendering it.
/// None of these ever leave the pipeline: each one is replaced by the fallback configuration.
#[derive(Debug, Display, Error, From)]
pub enum AnnouncementError {
    #[display("{_0}")]
    InvalidConfig(InvalidConfigError),
    #[display("failed to load announcement configuration (HTTP {status})")]
    #[from(ignore)]
    FetchFailure { status: u16 },
    #[display("failed to load announcement configuration: {_0}")]
    Transport(TransportError),
    #[display("failed to parse announcement configuration: {_0}")]
    ParseFailure(serde_json::Error),
}
