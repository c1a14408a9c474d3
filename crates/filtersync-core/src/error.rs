//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Form error: {0}")]
    Form(#[from] filtersync_form::FormError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] filtersync_navigation::NavigationError),

    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
