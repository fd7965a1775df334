//! Kiosk error types

use thiserror::Error;

use super::form::FormError;
use super::store::StoreError;

/// Kiosk 错误类型
#[derive(Debug, Error)]
pub enum KioskError {
    #[error("Unknown screen: {0}")]
    UnknownScreen(String),

    #[error("A submission is already in flight")]
    SubmissionInFlight,

    #[error("No site selected")]
    NoSiteSelected,

    #[error("Site configuration not loaded")]
    NotConfigured,

    #[error("Client error: {0}")]
    Client(#[from] parche_client::ClientError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type KioskResult<T> = Result<T, KioskError>;
