/// Errors that abort an animated run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Path reconstruction hit an inconsistent predecessor chain.
    #[error(transparent)]
    Path(#[from] pathviz_paths::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
