//! Error types for slot math loading and evaluation

use thiserror::Error;

/// Slot math error type
///
/// Configuration problems are reported when math data is loaded or a group
/// model is created, never in the middle of a spin.
#[derive(Error, Debug)]
pub enum SlotError {
    #[error("{kind} not found ({id} - {group})")]
    NotFound {
        kind: &'static str,
        id: String,
        group: String,
    },

    #[error("Duplicate {kind} ({id} - {group})")]
    Duplicate {
        kind: &'static str,
        id: String,
        group: String,
    },

    #[error("Invalid math config: {0}")]
    InvalidConfig(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Strip stops have not been generated")]
    StopsNotGenerated,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl SlotError {
    pub(crate) fn not_found(kind: &'static str, id: &str, group: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
            group: group.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, id: &str, group: &str) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
            group: group.to_string(),
        }
    }

    /// Is this a load-time configuration error?
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Duplicate { .. } | Self::InvalidConfig(_) | Self::Parse(_)
        )
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;
