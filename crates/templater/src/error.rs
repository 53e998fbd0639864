//! Templater errors

use templater_dom::{DomError, Target};

/// Result type for templater operations
pub type Result<T> = std::result::Result<T, TemplaterError>;

/// Errors raised by [`crate::Templater`]
#[derive(Debug, thiserror::Error)]
pub enum TemplaterError {
    /// The source identifier resolved to no fragment
    #[error("Template source {target} not found")]
    SourceNotFound { target: Target },

    /// Auto-append is on but the source has no parent to append into
    #[error("Template source {target} has no parent container to append instances to")]
    NoContainer { target: Target },

    /// An explicit append destination could not be resolved
    #[error("Append target {target} not found")]
    TargetNotFound { target: Target },

    /// The host tree refused a move
    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}
