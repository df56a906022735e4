use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("File {0} cannot be read: {1}")]
    NotFound(PathBuf, io::Error),
    #[error("Stream has already been consumed")]
    AlreadyConsumed,
    #[error("At end of stream or stream is closed")]
    EmptyOrClosedStream,
    #[error("Engine error: {0}")]
    Engine(String),
    #[error("Engine isn't available: {0}")]
    EngineUnavailable(String),
    #[error("Sniff window {0} is out of range; expected 1..={1}")]
    InvalidWindow(usize, usize),
    #[error("IO: {0}")]
    IO(#[from] io::Error),
    #[error("Fail to get access to engine between threads: {0}")]
    PoisonError(String),
}

impl E {
    pub fn engine<Er: std::error::Error>(err: Er) -> E {
        E::Engine(err.to_string())
    }
}

impl From<(PathBuf, io::Error)> for E {
    fn from(err: (PathBuf, io::Error)) -> Self {
        E::NotFound(err.0, err.1)
    }
}
