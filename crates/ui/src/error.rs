use thiserror::Error;

/// Errors raised by table and navigation components.
///
/// `Configuration` and `Index` indicate caller bugs and are meant to fail
/// loudly at the offending call site. Stale fetch responses are not errors;
/// they are discarded silently and logged by the table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UiError {
    /// A field, action, or table description is malformed.
    #[error("invalid configuration: {reason}")]
    Configuration { reason: String },

    /// A page, row, action, or crumb index is out of range.
    #[error("{what} index {index} out of range (len {len})")]
    Index {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A context lookup found nothing; callers must handle this rather than
    /// assume presence.
    #[error("no {what} available in this context")]
    NotFound { what: &'static str },
}

impl UiError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
