//! Builds the nested reply tree shown to clients.
//!
//! The tree has exactly three levels: root comments, their replies, and the
//! replies to those. Comments nested deeper stay in storage but are not
//! attached anywhere in the output.

use std::collections::HashMap;

use crate::models::{CommentView, ReplyNode, RootNode};

/// Assembles a thread from one topic's comments.
///
/// `comments` must be in insertion order; the sort by `created_at` is stable,
/// so comments sharing a timestamp keep that order. Comments whose parent is
/// not among `comments` (for instance a parent in another topic) are dropped.
pub fn build_thread(comments: Vec<CommentView>) -> Vec<RootNode> {
    if comments.is_empty() {
        return Vec::new();
    }

    let (mut roots, mut replies): (Vec<_>, Vec<_>) =
        comments.into_iter().partition(|c| c.comment.is_root());

    roots.sort_by_key(|c| c.comment.created_at);
    replies.sort_by_key(|c| c.comment.created_at);

    let mut children: HashMap<String, Vec<CommentView>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.comment.parent_id.clone() {
            children.entry(parent_id).or_default().push(reply);
        }
    }

    roots
        .into_iter()
        .map(|root| {
            let replies: Vec<ReplyNode> = children
                .remove(&root.comment.id)
                .unwrap_or_default()
                .into_iter()
                .map(|reply| {
                    let sub_replies = children.remove(&reply.comment.id).unwrap_or_default();
                    ReplyNode {
                        replies_count: sub_replies.len(),
                        replies: sub_replies,
                        view: reply,
                    }
                })
                .collect();

            RootNode {
                replies_count: replies.len(),
                replies,
                view: root,
            }
        })
        .collect()
}
