use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tree depth {depth} exceeds the configured limit of {max}")]
    TreeTooDeep { depth: usize, max: usize },
    #[error("patch address does not resolve: {0}")]
    PatchAddress(String),
    #[error("html parse error: {0}")]
    Parse(String),
}
