/// Result alias that carries the custom [`ShowcaseError`] type.
pub type Result<T> = std::result::Result<T, ShowcaseError>;

/// Common error type for the core crate.
///
/// Playback conditions such as an unmounted clip or an unready catalog are
/// not errors; the controller simply does nothing for that tick. This type
/// covers configuration loading and surfaces that refuse a call.
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    /// Free-form message.
    #[error("{0}")]
    Message(String),
    /// The clip configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A native clip surface rejected a play or pause request.
    #[error("clip surface error: {0}")]
    Surface(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Wrapper around JSON (de)serialisation errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ShowcaseError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid_config<T: Into<String>>(msg: T) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

impl From<&str> for ShowcaseError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for ShowcaseError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
