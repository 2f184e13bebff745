use thiserror::Error;

/// Errors from mutating the SOP rule list. The validation path itself
/// never returns `Result` — malformed inputs degrade to "no alert
/// emitted for that item".
#[derive(Error, Debug)]
pub enum RuleError {
    #[error("invalid field pattern regex '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{0}' has no conditions")]
    NoConditions(String),

    #[error("rule id '{0}' not found")]
    NotFound(String),

    #[error("rule id '{0}' already exists")]
    DuplicateId(String),
}
