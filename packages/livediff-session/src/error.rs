use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The external renderer raised while producing a tree. The session's
    /// committed state is untouched.
    #[error("renderer error: {0}")]
    Renderer(String),
    #[error(transparent)]
    Core(#[from] livediff_core::Error),
    #[error("session is disconnected")]
    Disconnected,
    #[error("session is already mounted")]
    AlreadyMounted,
    #[error("session is not mounted")]
    NotMounted,
    #[error("wire serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
