use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use domain::ThreadEvent;
use futures::stream::Stream;
use serde_json::{json, Value};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use crate::state::AppState;

pub async fn sse_handler(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.tx_events.subscribe();
    tracing::info!("SSE connected: topic={}", topic_id);

    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) if event.topic_id() == topic_id => to_sse(&event),
        Ok(_) => None,
        Err(_lagged) => {
            tracing::warn!("SSE client lagged for topic {}", topic_id);
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(15)))
}

fn to_sse(event: &ThreadEvent) -> Option<Result<Event, axum::Error>> {
    let (name, data) = event_payload(event);

    Some(
        data.map_err(axum::Error::new)
            .and_then(|data| Event::default().event(name).json_data(data))
            .map_err(|e| {
                tracing::error!("SSE serialization error: {}", e);
                e
            }),
    )
}

/// SSE event name and JSON data for a thread event.
fn event_payload(event: &ThreadEvent) -> (&'static str, serde_json::Result<Value>) {
    match event {
        ThreadEvent::CommentCreated { comment, .. } => {
            ("new_comment", serde_json::to_value(comment))
        }
        ThreadEvent::CommentsDeleted { ids, .. } => {
            ("delete_comments", Ok(json!({ "ids": ids })))
        }
        ThreadEvent::LikeToggled {
            comment_id, likes, ..
        } => ("like_updated", Ok(json!({ "id": comment_id, "likes": likes }))),
    }
}
