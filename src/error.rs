use alloc::string::String;

/// Errors raised while loading configuration or parsing route requests.
///
/// The control cycle itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The land task configuration is not valid JSON for [`LandConfig`](crate::land::LandConfig).
    #[cfg(feature = "serde")]
    #[error("invalid land task configuration: {0}")]
    Config(serde_json::Error),

    /// A route request that is not a list of `<flag>,<distance>,<bearing>,-` groups.
    #[error("malformed route request `{0}`")]
    RouteRequest(String),
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for Error {
    fn from(json_error: serde_json::Error) -> Self {
        Error::Config(json_error)
    }
}
