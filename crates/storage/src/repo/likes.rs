use domain::{CommentError, LikeState};
use tracing::debug;

use crate::CommentStore;

impl CommentStore {
    /// Flips `user_id`'s like on a comment and reports the new state.
    pub fn toggle_like(&self, comment_id: &str, user_id: &str) -> Result<LikeState, CommentError> {
        self.toggle_like_in_topic(comment_id, user_id)
            .map(|(_, state)| state)
    }

    /// Same as [`CommentStore::toggle_like`], also returning the comment's
    /// topic as seen under the lock.
    pub fn toggle_like_in_topic(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> Result<(String, LikeState), CommentError> {
        let mut indices = self.lock();
        let topic_id = indices
            .comments
            .get(comment_id)
            .map(|c| c.topic_id.clone())
            .ok_or(CommentError::NotFound)?;

        let users = indices.likes.entry(comment_id.to_string()).or_default();
        let is_liked = if users.remove(user_id) {
            false
        } else {
            users.insert(user_id.to_string());
            true
        };
        let likes = users.len();
        if likes == 0 {
            indices.likes.remove(comment_id);
        }

        debug!(comment_id, user_id, likes, is_liked, "Toggled like");
        Ok((topic_id, LikeState { likes, is_liked }))
    }
}
