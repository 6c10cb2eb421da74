use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Insufficient funds: required {required_cents}, available {available_cents}")]
    InsufficientFunds {
        required_cents: i64,
        available_cents: i64,
    },

    #[error("No account with free capacity for service {service_id}")]
    NoAvailableAccount { service_id: uuid::Uuid },

    #[error("No service in the package could be activated")]
    BundleActivationFailed,

    #[error("Invalid state transition: {from} -> {attempted}")]
    InvalidStateTransition { from: String, attempted: String },

    #[error("Not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Clone, Copy, Debug)]
pub enum ErrorCode {
    DatabaseError,
    InsufficientFunds,
    NoAvailableAccount,
    BundleActivationFailed,
    InvalidStateTransition,
    NotFound,
    InvalidInput,
    GatewayError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::NoAvailableAccount => "NO_AVAILABLE_ACCOUNT",
            ErrorCode::BundleActivationFailed => "BUNDLE_ACTIVATION_FAILED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::GatewayError => "GATEWAY_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
