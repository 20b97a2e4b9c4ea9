//! Typed navigation errors.
//!
//! Everything except `BuildFailed` is a programmer error: returned before
//! an operation is queued and never retried. `BuildFailed` is a runtime
//! error from a screen factory; the navigator rolls the attempted push back
//! before returning it.

/// Errors returned by the navigation core
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// Navigation to a screen name that was never registered
    #[error("unknown screen '{0}'")]
    UnknownScreen(String),

    /// Entity-scoped screen invoked without a usable key parameter
    #[error("screen '{screen}' requires parameter '{field}'")]
    InvalidParams { screen: String, field: String },

    /// The screen factory rejected
    #[error("failed to build screen '{screen}': {source}")]
    BuildFailed {
        screen: String,
        #[source]
        source: anyhow::Error,
    },

    /// A descriptor with this name is already registered
    #[error("screen '{0}' is already registered")]
    DuplicateScreen(String),

    /// Screen names must be non-empty and free of the identity separator `:`
    #[error("invalid screen name '{0}'")]
    InvalidScreenName(String),

    /// Base-layout tab outside the configured tab set
    #[error("unknown base tab '{0}'")]
    UnknownBaseTab(String),
}

impl NavError {
    /// Errors caused by calling code rather than the environment
    pub fn is_programmer_error(&self) -> bool {
        !matches!(self, NavError::BuildFailed { .. })
    }

    /// Name of the screen the error is about, if any
    pub fn screen(&self) -> Option<&str> {
        match self {
            NavError::UnknownScreen(screen)
            | NavError::DuplicateScreen(screen)
            | NavError::InvalidScreenName(screen) => Some(screen),
            NavError::InvalidParams { screen, .. } | NavError::BuildFailed { screen, .. } => Some(screen),
            NavError::UnknownBaseTab(_) => None,
        }
    }
}
