use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("file utility is not installed")]
    NotInstalled,
    #[error("Fail to run file utility: {0}")]
    IOError(io::Error),
    #[error("file utility failed: {0}")]
    Failed(String),
    #[error("{0}")]
    CannotOpen(String),
    #[error("file utility returned non-UTF8 output: {0}")]
    InvalidOutput(String),
}

impl From<io::Error> for E {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            E::NotInstalled
        } else {
            E::IOError(err)
        }
    }
}

impl From<E> for crate::E {
    fn from(err: E) -> Self {
        crate::E::engine(err)
    }
}
