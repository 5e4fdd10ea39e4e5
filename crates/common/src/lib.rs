use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
    #[error("io error: {0}")]
    Io(String),
}
