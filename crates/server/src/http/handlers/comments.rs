use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, LikeState, NewComment, RootNode, ThreadEvent};
use serde::{Deserialize, Serialize};

use crate::{auth::Identity, error::ApiError, http::extract::ApiJson, state::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<String>,
}

#[derive(Serialize)]
pub struct ThreadResponse {
    pub comments: Vec<RootNode>,
    pub total: usize,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: Vec<String>,
}

pub async fn list_comments(
    State(state): State<AppState>,
    viewer: Option<Identity>,
    Path(topic_id): Path<String>,
) -> Json<ThreadResponse> {
    let viewer_id = viewer.as_ref().map(|v| v.id.as_str());
    let (comments, total) = state.store.thread_with_total(&topic_id, viewer_id);

    Json(ThreadResponse { comments, total })
}

pub async fn post_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(topic_id): Path<String>,
    ApiJson(payload): ApiJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let comment = state.store.create_comment(NewComment {
        topic_id,
        content: payload.content,
        parent_id: payload.parent_id,
        author: identity.author(),
    })?;

    state.publish(ThreadEvent::CommentCreated {
        topic_id: comment.topic_id.clone(),
        comment: comment.clone(),
    });

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    identity: Identity,
    Path(comment_id): Path<String>,
) -> Result<Json<LikeState>, ApiError> {
    let (topic_id, like) = state
        .store
        .toggle_like_in_topic(&comment_id, &identity.id)?;

    state.publish(ThreadEvent::LikeToggled {
        topic_id,
        comment_id,
        likes: like.likes,
    });

    Ok(Json(like))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    identity: Identity,
    Path(comment_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let removed = state
        .store
        .delete_cascade(&comment_id, &identity.id, identity.is_admin)?;

    for event in ThreadEvent::deletions(&removed) {
        state.publish(event);
    }

    Ok(Json(DeleteResponse {
        deleted: removed.into_iter().map(|c| c.id).collect(),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
