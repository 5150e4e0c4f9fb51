use thiserror::Error;

pub type Result<T> = std::result::Result<T, CatalogError>;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Catalog parse error: {0}")]
    ParseError(String),

    #[error("catalog.schema_version {0} is not supported (expected 1)")]
    UnsupportedSchema(u32),

    #[error("Duplicate symptom id: {0}")]
    DuplicateSymptom(u32),

    #[error("Duplicate condition id: {0}")]
    DuplicateCondition(u32),
}
