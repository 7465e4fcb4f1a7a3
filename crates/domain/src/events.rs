use crate::models::Comment;
use serde::{Deserialize, Serialize};

/// Emitted after a mutation has been applied to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ThreadEvent {
    CommentCreated {
        topic_id: String,
        comment: Comment,
    },
    CommentsDeleted {
        topic_id: String,
        ids: Vec<String>,
    },
    LikeToggled {
        topic_id: String,
        comment_id: String,
        likes: usize,
    },
}

impl ThreadEvent {
    pub fn topic_id(&self) -> &str {
        match self {
            ThreadEvent::CommentCreated { topic_id, .. }
            | ThreadEvent::CommentsDeleted { topic_id, .. }
            | ThreadEvent::LikeToggled { topic_id, .. } => topic_id,
        }
    }

    /// Builds one deletion event per topic, keeping the order ids were purged in.
    pub fn deletions(removed: &[Comment]) -> Vec<ThreadEvent> {
        let mut events: Vec<ThreadEvent> = Vec::new();
        for c in removed {
            let existing = events.iter_mut().find_map(|e| match e {
                ThreadEvent::CommentsDeleted { topic_id, ids } if *topic_id == c.topic_id => {
                    Some(ids)
                }
                _ => None,
            });
            match existing {
                Some(ids) => ids.push(c.id.clone()),
                None => events.push(ThreadEvent::CommentsDeleted {
                    topic_id: c.topic_id.clone(),
                    ids: vec![c.id.clone()],
                }),
            }
        }
        events
    }
}
