use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Terminate error: {0}")]
    Terminate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
