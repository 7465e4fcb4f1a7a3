use domain::{thread::build_thread, CommentView, RootNode};

use crate::CommentStore;

impl CommentStore {
    /// The nested view of a topic, with likes resolved for `viewer_id`.
    /// Unknown topics yield an empty thread.
    pub fn thread(&self, topic_id: &str, viewer_id: Option<&str>) -> Vec<RootNode> {
        self.thread_with_total(topic_id, viewer_id).0
    }

    /// Like [`CommentStore::thread`], plus the number of stored comments in
    /// the topic (including those below the display depth), read under the
    /// same lock.
    pub fn thread_with_total(
        &self,
        topic_id: &str,
        viewer_id: Option<&str>,
    ) -> (Vec<RootNode>, usize) {
        let views: Vec<CommentView> = {
            let indices = self.lock();
            let Some(ids) = indices.topics.get(topic_id) else {
                return (Vec::new(), 0);
            };
            ids.iter()
                .filter_map(|id| indices.comments.get(id))
                .map(|c| CommentView {
                    comment: c.clone(),
                    likes: indices.like_count(&c.id),
                    is_liked: indices.is_liked_by(&c.id, viewer_id),
                })
                .collect()
        };

        let total = views.len();
        (build_thread(views), total)
    }
}
