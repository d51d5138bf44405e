#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout options: {message}")]
    InvalidOptions { message: String },
    #[error(transparent)]
    Core(#[from] folio_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
