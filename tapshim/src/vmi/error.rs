use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to unmarshal vmi json: {0}")]
    Deserialize(#[from] serde_json::Error),
}
