use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("conversation record is not an object")]
    RecordNotObject,
}

pub type Result<T> = std::result::Result<T, CoreError>;
