use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to unmarshal given domain spec: {0}")]
    DecodeDomain(#[source] crate::domain::error::Error),

    #[error("failed to marshal updated domain spec: {0}")]
    EncodeDomain(#[source] crate::domain::error::Error),
}
