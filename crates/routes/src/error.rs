use thiserror::Error;

/// Errors raised while building a route table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("route '{pattern}' overlaps previously registered '{existing}'")]
    DuplicatePattern { pattern: String, existing: String },

    /// The not-found page is terminal and may not be bound to a path.
    #[error("route '{0}' points at the not-found page")]
    NotFoundPageRouted(String),
}
