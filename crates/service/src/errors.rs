use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("Missing required fields: {} are required.", .0.join(" and "))]
    MissingFields(Vec<String>),
    #[error("{0}")]
    NotFound(String),
    #[error("{entity} with id {id} already present")]
    Duplicate { entity: String, id: i64 },
    #[error("record with id {0} already stored")]
    Conflict(i64),
    #[error("seed error: {0}")]
    Seed(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::MissingFields(fields.iter().map(|f| f.to_string()).collect())
    }
}
