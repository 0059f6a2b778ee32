use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed alert record: {0}")]
    Decode(#[from] serde_json::Error),
}
