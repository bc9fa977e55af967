use thiserror::Error;

use super::SUPPORTED_VERSIONS;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing --version parameter, supported options are {:?}", SUPPORTED_VERSIONS)]
    MissingVersion,

    #[error("version {0} is not supported, supported options are {:?}", SUPPORTED_VERSIONS)]
    UnsupportedVersion(String),
}
