//! Errors reported by the windmill simulation

/// Simulation result type
pub type Result<T> = std::result::Result<T, WindmillError>;

/// Errors that a caller can recover from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindmillError {
    /// `start` was called with no points placed
    EmptyRegistry,
    /// A settings document could not be parsed or written
    Settings(String),
}

impl std::fmt::Display for WindmillError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            WindmillError::EmptyRegistry => write!(f, "cannot start: no points placed"),
            WindmillError::Settings(msg) => write!(f, "Settings Error: {}", msg),
        }
    }
}

impl std::error::Error for WindmillError {}

impl From<serde_json::Error> for WindmillError {
    fn from(err: serde_json::Error) -> Self {
        WindmillError::Settings(err.to_string())
    }
}
