use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommentError {
    #[error("{0}")]
    Validation(String),
    #[error("Comment not found")]
    NotFound,
    #[error("Only the author or an admin can delete this comment")]
    Forbidden,
}
