/// Client-specific result type
pub type Result<T> = std::result::Result<T, EaselClientError>;

/// Shown when a failure carries nothing more specific
pub const GENERIC_FAILURE: &str = "Failed to generate image. Please try again.";

/// Errors from the Easel client
#[derive(Debug, thiserror::Error)]
pub enum EaselClientError {
    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("{message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message suitable for end users
        message: String,
        /// Error string as sent by the server
        detail: Option<String>,
    },

    /// Server reported success without a usable image
    #[error("The image generation was incomplete. Please try again.")]
    Incomplete,

    /// Failed to parse response
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl EaselClientError {
    /// Text to show an end user
    ///
    /// Transport and parse failures collapse to a generic retry hint.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { .. } | Self::Incomplete => self.to_string(),
            Self::Http(_) | Self::Parse(_) | Self::Config(_) => GENERIC_FAILURE.to_owned(),
        }
    }
}
