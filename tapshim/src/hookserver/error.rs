use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("hook sockets directory {0} is unavailable: {1}")]
    HooksDirUnavailable(PathBuf, #[source] io::Error),

    #[error("failed to generate a free socket path in {0} after {1} attempts")]
    SocketNamesExhausted(PathBuf, usize),

    #[error("failed to initialize socket on path {0}: {1}")]
    Bind(PathBuf, #[source] io::Error),

    #[error("grpc server error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
