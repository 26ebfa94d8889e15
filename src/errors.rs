use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid document id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] mongodb::bson::ser::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejections produced while parsing the `filters` query parameter.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    #[error("Filters must be valid JSON: {0}")]
    Malformed(String),

    #[error("Unknown contact field: {0}")]
    UnknownField(String),

    #[error("Field `{field}` expects {expected}")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Operator `contains` is only supported on text fields, not `{0}`")]
    UnsupportedOperator(&'static str),
}
