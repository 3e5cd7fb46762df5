use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Register not loaded")]
    RegisterNotLoaded,
    #[error("Register not found: {0}")]
    RegisterNotFound(String),
    #[error("Family not found: {0}")]
    FamilyNotFound(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Account code not found: {0}")]
    AccountCodeNotFound(String),
    #[error("Asset not found: {0}")]
    AssetNotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
