use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("invalid period: {month}/{year} is out of range or outside the allowed window")]
    InvalidPeriod {
        month: u32,
        year: i32,
    },

    #[error("client {client_id} has no plan associated")]
    NoPlanAssociated {
        client_id: Uuid,
    },

    #[error("client {client_id} has no pending non-suspended period to apply the payment to")]
    NoEligiblePeriod {
        client_id: Uuid,
    },

    #[error("at least one period must be specified for the payment")]
    NoMonthsSpecified,

    #[error("all selected periods are suspended; no period available to apply the payment")]
    EmptyEligibleSet,

    #[error("payment not found: {id}")]
    PaymentNotFound {
        id: Uuid,
    },

    #[error("validation error: {message}")]
    Validation {
        message: String,
    },

    #[error("storage error: {message}")]
    Storage {
        message: String,
    },
}

impl LedgerError {
    /// wrap an opaque storage-layer failure; never carries business meaning
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
