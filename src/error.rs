use crate::records::RecordKind;

/// Failures raised by a world state backend.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The backend refused the call for a reason of its own.
    #[error("state backend unavailable: {0}")]
    Unavailable(String),
}

pub type StateResult<T> = Result<T, StateError>;

/// Failures of a contract operation.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("the {kind} {id} already exists")]
    AlreadyExists { kind: RecordKind, id: String },

    #[error("the {kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: String },

    #[error("failed to {action} world state: {source}")]
    Store {
        action: &'static str,
        #[source]
        source: StateError,
    },

    #[error("failed to {action} {kind} record: {source}")]
    Codec {
        kind: RecordKind,
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl ContractError {
    pub(crate) fn store(action: &'static str) -> impl FnOnce(StateError) -> Self {
        move |source| ContractError::Store { action, source }
    }

    pub(crate) fn codec(
        kind: RecordKind,
        action: &'static str,
    ) -> impl FnOnce(serde_json::Error) -> Self {
        move |source| ContractError::Codec {
            kind,
            action,
            source,
        }
    }

    /// Stable machine-readable code, used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::AlreadyExists { .. } => "ALREADY_EXISTS",
            ContractError::NotFound { .. } => "NOT_FOUND",
            ContractError::Store { .. } => "STORE_FAILURE",
            ContractError::Codec { .. } => "CODEC_FAILURE",
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;

/// Invalid or missing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be set when LEDGER_BACKEND=postgres")]
    Missing { name: &'static str },

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}
