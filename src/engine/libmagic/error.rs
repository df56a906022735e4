use thiserror::Error;

#[derive(Error, Debug)]
pub enum E {
    #[error("Fail to open libmagic cookie")]
    Open,
    #[error("Fail to load magic database: {0}")]
    Load(String),
    #[error("Path {0} contains NUL byte")]
    InvalidPath(String),
    #[error("{0}")]
    Native(String),
}

impl From<E> for crate::E {
    fn from(err: E) -> Self {
        crate::E::engine(err)
    }
}
