use crate::domain::model::ProductId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Catalog answered product {returned} when asked for {requested}")]
    CatalogMismatch {
        requested: ProductId,
        returned: ProductId,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Malformed cart snapshot: {message}")]
    MalformedSnapshot { message: String },

    #[error("Product {product_id} is not in the cart")]
    NotInCart { product_id: ProductId },

    #[error("Product {product_id} is already in the cart")]
    AlreadyInCart { product_id: ProductId },

    #[error("Requested {requested} of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse grouping of failures, used for exit codes and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotInCart,
    OutOfStock,
    Upstream,
    Persistence,
    Config,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::NotInCart { .. } => ErrorCategory::NotInCart,
            CartError::OutOfStock { .. } => ErrorCategory::OutOfStock,
            CartError::ApiError(_)
            | CartError::UpstreamStatus { .. }
            | CartError::CatalogMismatch { .. }
            | CartError::AlreadyInCart { .. } => ErrorCategory::Upstream,
            CartError::IoError(_)
            | CartError::SerializationError(_)
            | CartError::MalformedSnapshot { .. } => ErrorCategory::Persistence,
            CartError::ConfigError { .. }
            | CartError::MissingConfigError { .. }
            | CartError::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    /// True for failures caused by the request itself rather than the environment.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::NotInCart | ErrorCategory::OutOfStock
        )
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
