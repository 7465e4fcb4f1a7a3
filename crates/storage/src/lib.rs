use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use domain::Comment;

mod repo;

/// Process-lifetime comment storage. Nothing is persisted; state resets when
/// the last handle is dropped.
///
/// Cloning yields another handle to the same indices. All three indices sit
/// behind one lock, so every operation is atomic with respect to the others.
#[derive(Clone, Default)]
pub struct CommentStore {
    pub(crate) inner: Arc<Mutex<Indices>>,
}

#[derive(Default)]
pub(crate) struct Indices {
    pub(crate) comments: HashMap<String, Comment>,
    /// Comment ids per topic, in insertion order.
    pub(crate) topics: HashMap<String, Vec<String>>,
    pub(crate) likes: HashMap<String, HashSet<String>>,
}

impl CommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Indices> {
        // Every operation leaves the maps consistent before it can panic.
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Indices {
    pub(crate) fn insert(&mut self, comment: Comment) {
        if let Some(previous) = self.comments.remove(&comment.id) {
            self.unlink(&previous);
        }
        self.topics
            .entry(comment.topic_id.clone())
            .or_default()
            .push(comment.id.clone());
        self.comments.insert(comment.id.clone(), comment);
    }

    pub(crate) fn delete(&mut self, id: &str) -> Option<Comment> {
        let comment = self.comments.remove(id)?;
        self.unlink(&comment);
        self.likes.remove(id);
        Some(comment)
    }

    /// Removes several comments, pruning each affected topic list once.
    /// Returns the removed comments in the order of `ids`.
    pub(crate) fn delete_many(&mut self, ids: &[String]) -> Vec<Comment> {
        let removed: Vec<Comment> = ids
            .iter()
            .filter_map(|id| {
                self.likes.remove(id);
                self.comments.remove(id)
            })
            .collect();

        let mut by_topic: HashMap<&str, HashSet<&str>> = HashMap::new();
        for c in &removed {
            by_topic
                .entry(c.topic_id.as_str())
                .or_default()
                .insert(c.id.as_str());
        }
        for (topic_id, gone) in by_topic {
            if let Some(list) = self.topics.get_mut(topic_id) {
                list.retain(|id| !gone.contains(id.as_str()));
                if list.is_empty() {
                    self.topics.remove(topic_id);
                }
            }
        }

        removed
    }

    fn unlink(&mut self, comment: &Comment) {
        if let Some(ids) = self.topics.get_mut(&comment.topic_id) {
            ids.retain(|id| id != &comment.id);
            if ids.is_empty() {
                self.topics.remove(&comment.topic_id);
            }
        }
    }

    pub(crate) fn like_count(&self, id: &str) -> usize {
        self.likes.get(id).map_or(0, HashSet::len)
    }

    pub(crate) fn is_liked_by(&self, id: &str, user_id: Option<&str>) -> bool {
        match (self.likes.get(id), user_id) {
            (Some(users), Some(user_id)) => users.contains(user_id),
            _ => false,
        }
    }
}
