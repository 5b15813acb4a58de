use axum::http::StatusCode;

/// Failures surfaced by the gate, the aggregator, and the record store.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("identity name must not be empty")]
    EmptyIdentity,

    #[error("invalid admin password")]
    InvalidAdminPassword,

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("record {record} has no `{key}` to group by")]
    MissingGroupKey { key: &'static str, record: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Opaque failure from the record store, carrying the store's own message.
#[derive(Debug, thiserror::Error)]
#[error("store error: {message}")]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let status = match &err {
            LedgerError::EmptyIdentity | LedgerError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            LedgerError::InvalidAdminPassword => StatusCode::UNAUTHORIZED,
            LedgerError::MissingGroupKey { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
