use thiserror::Error;

pub type Result<T> = std::result::Result<T, TriageError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("Empty selection: please select at least one symptom")]
    EmptySelection,
}
