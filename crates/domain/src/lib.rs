mod error;
mod events;
mod models;
pub mod thread;

pub use error::CommentError;
pub use events::ThreadEvent;
pub use models::{
    validate_content, Author, Comment, CommentView, LikeState, NewComment, ReplyNode, RootNode,
    MAX_CONTENT_CHARS, MIN_CONTENT_CHARS,
};
