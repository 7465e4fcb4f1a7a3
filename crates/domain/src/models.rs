use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CommentError;

pub const MIN_CONTENT_CHARS: usize = 1;
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A stored comment. Everything here is fixed at creation; likes live in a
/// separate index and are attached by [`CommentView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub topic_id: String,
    pub parent_id: Option<String>,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub avatar: String,
}

/// Input for comment creation, before validation.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub topic_id: String,
    pub content: String,
    pub parent_id: Option<String>,
    pub author: Author,
}

impl NewComment {
    pub fn validate(&self) -> Result<(), CommentError> {
        validate_content(&self.content)
    }
}

/// Content length is counted in characters, not bytes.
pub fn validate_content(content: &str) -> Result<(), CommentError> {
    let len = content.chars().count();
    if len < MIN_CONTENT_CHARS {
        return Err(CommentError::Validation(
            "Content cannot be empty".to_string(),
        ));
    }
    if len > MAX_CONTENT_CHARS {
        return Err(CommentError::Validation(format!(
            "Content is too long (max {} chars)",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// Result of a like toggle, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub likes: usize,
    pub is_liked: bool,
}

/// A comment decorated with its like count and the viewer's like flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: Comment,
    pub likes: usize,
    pub is_liked: bool,
}

/// Second level of a thread. Its `replies` are the third and last level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyNode {
    #[serde(flatten)]
    pub view: CommentView,
    pub replies: Vec<CommentView>,
    pub replies_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootNode {
    #[serde(flatten)]
    pub view: CommentView,
    pub replies: Vec<ReplyNode>,
    pub replies_count: usize,
}
