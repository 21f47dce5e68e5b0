//! Error types for field-value parsing and macro resolution.

use thiserror::Error;

/// Result type alias for bibnorm-field operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing raw field nodes or resolving macros.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// The lexer handed us a raw node whose shape we don't recognize.
    #[error("invalid raw field node: {detail}")]
    InvalidNode { detail: String },

    /// A macro reference names a macro that is not in the table.
    #[error("unknown macro '{name}'{}", .suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
    UnknownMacro {
        name: String,
        /// Closest defined macro name, if any is reasonably close.
        suggestion: Option<String>,
    },

    /// Resolution re-entered a macro that is currently being resolved.
    ///
    /// Macros are defined before use upstream, so this is a defensive
    /// guard rather than an expected condition.
    #[error("circular macro reference: {}", .chain.join(" -> "))]
    CircularMacro {
        /// The macro names forming the cycle, in visit order.
        chain: Vec<String>,
    },
}
