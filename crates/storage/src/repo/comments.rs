use std::collections::{HashMap, HashSet};

use chrono::Utc;
use domain::{Comment, CommentError, NewComment};
use tracing::{debug, info};

use crate::CommentStore;

impl CommentStore {
    /// Stores a comment as-is and appends it to its topic's list.
    /// An existing comment with the same id is replaced.
    pub fn put(&self, comment: Comment) {
        debug!(id = %comment.id, topic = %comment.topic_id, "Storing comment");
        self.lock().insert(comment);
    }

    pub fn get(&self, id: &str) -> Option<Comment> {
        self.lock().comments.get(id).cloned()
    }

    /// Removes a single comment with its likes. Absent ids are a no-op.
    pub fn remove(&self, id: &str) -> Option<Comment> {
        let removed = self.lock().delete(id);
        if removed.is_some() {
            debug!(id, "Removed comment");
        }
        removed
    }

    /// Comment ids of a topic in insertion order.
    pub fn topic_comment_ids(&self, topic_id: &str) -> Vec<String> {
        self.lock().topics.get(topic_id).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lock().comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validates and stores a new comment. The parent may live at any depth,
    /// and in any topic.
    pub fn create_comment(&self, new: NewComment) -> Result<Comment, CommentError> {
        new.validate()?;

        let mut indices = self.lock();

        if let Some(parent_id) = &new.parent_id {
            if !indices.comments.contains_key(parent_id) {
                return Err(CommentError::Validation(format!(
                    "Parent comment not found: {}",
                    parent_id
                )));
            }
        }

        let id = loop {
            let candidate = format!("{:x}", rand::random::<u128>());
            if !indices.comments.contains_key(&candidate) {
                break candidate;
            }
        };

        let comment = Comment {
            id,
            topic_id: new.topic_id,
            parent_id: new.parent_id,
            author_id: new.author.id,
            author_name: new.author.name,
            author_avatar: new.author.avatar,
            content: new.content,
            created_at: Utc::now().naive_utc(),
        };

        indices.insert(comment.clone());
        debug!(
            id = %comment.id,
            topic = %comment.topic_id,
            parent = ?comment.parent_id,
            "Created comment"
        );
        Ok(comment)
    }

    /// Deletes a comment and every transitive reply, returning what was
    /// removed (target first). Only the author or an admin may do this.
    pub fn delete_cascade(
        &self,
        comment_id: &str,
        requester_id: &str,
        requester_is_admin: bool,
    ) -> Result<Vec<Comment>, CommentError> {
        let mut indices = self.lock();

        let target = indices
            .comments
            .get(comment_id)
            .ok_or(CommentError::NotFound)?;
        if !requester_is_admin && target.author_id != requester_id {
            return Err(CommentError::Forbidden);
        }

        let doomed: Vec<String> = {
            let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
            for c in indices.comments.values() {
                if let Some(parent_id) = &c.parent_id {
                    children.entry(parent_id.as_str()).or_default().push(c.id.as_str());
                }
            }

            // Explicit stack: thread depth is not bounded by anything. `put` can
            // store arbitrary parent links, so guard against revisits.
            let mut seen: HashSet<&str> = HashSet::new();
            let mut doomed = Vec::new();
            let mut pending = vec![comment_id];
            while let Some(id) = pending.pop() {
                if !seen.insert(id) {
                    continue;
                }
                doomed.push(id.to_string());
                if let Some(kids) = children.get(id) {
                    pending.extend(kids.iter().copied());
                }
            }
            doomed
        };

        let removed = indices.delete_many(&doomed);

        info!(
            id = comment_id,
            requester = requester_id,
            admin = requester_is_admin,
            count = removed.len(),
            "Cascade-deleted comment"
        );
        Ok(removed)
    }
}
