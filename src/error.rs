use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnionFindError {
    #[error("index {index} is not between 0 and {size} (exclusive)")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("number of sites must be non-negative, got {0}")]
    InvalidSize(i64),
    #[error("trial over {trial} sites does not match a set of {size} sites")]
    SizeMismatch { trial: usize, size: usize },
}
