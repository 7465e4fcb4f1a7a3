use super::handlers::{comments, sse};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const METHODS: [Method; 3] = [Method::GET, Method::POST, Method::DELETE];

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods(METHODS)
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods(METHODS)
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods(METHODS)
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    // `:id` is a topic id for GET/POST and a comment id for DELETE.
    Router::new()
        .route(
            "/api/comments/:id",
            get(comments::list_comments)
                .post(comments::post_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/comments/:id/like", post(comments::toggle_like))
        .route("/api/comments/:id/events", get(sse::sse_handler))
        .route("/api/health", get(comments::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auth::StaticTokens,
        config::{SecuritySettings, UserSettings},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use domain::ThreadEvent;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use storage::CommentStore;
    use tower::ServiceExt;

    const ALICE: &str = "token-alice";
    const BOB: &str = "token-bob";
    const ADMIN: &str = "token-admin";

    fn state() -> AppState {
        let users: Vec<UserSettings> = [(ALICE, "alice"), (BOB, "bob")]
            .into_iter()
            .map(|(token, id)| UserSettings {
                token: token.into(),
                id: id.into(),
                name: id.to_uppercase(),
                avatar: None,
                admin: false,
            })
            .collect();
        let auth = StaticTokens::new(
            &SecuritySettings {
                identity_salt: "test-salt".into(),
                admin_token: ADMIN.into(),
            },
            &users,
        );
        AppState::new(CommentStore::new(), Arc::new(auth), 16)
    }

    fn app() -> (Router, CommentStore) {
        let state = state();
        let store = state.store.clone();
        (build_router(state, "*"), store)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => req
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();

        dispatch(app, req).await
    }

    async fn dispatch(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create(app: &Router, topic: &str, token: &str, parent: Option<&str>) -> String {
        let (status, body) = send(
            app,
            "POST",
            &format!("/api/comments/{}", topic),
            Some(token),
            Some(json!({ "content": "hello there", "parentId": parent })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn empty_topic_returns_empty_list() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/api/comments/t1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "comments": [], "total": 0 }));
    }

    #[tokio::test]
    async fn create_requires_identity() {
        let (app, store) = app();
        let payload = json!({ "content": "hi" });

        let (status, _) =
            send(&app, "POST", "/api/comments/t1", None, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) =
            send(&app, "POST", "/api/comments/t1", Some("bogus"), Some(payload)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn create_returns_comment() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/comments/t1",
            Some(ALICE),
            Some(json!({ "content": "first!" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["content"], "first!");
        assert_eq!(body["topicId"], "t1");
        assert_eq!(body["authorId"], "alice");
        assert_eq!(body["authorName"], "ALICE");
        assert_eq!(body["parentId"], Value::Null);
        assert_eq!(body["authorAvatar"].as_str().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn create_validation_errors() {
        let (app, _) = app();
        for content in [String::new(), "x".repeat(1001)] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/comments/t1",
                Some(ALICE),
                Some(json!({ "content": content })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].is_string());
        }

        let (status, _) = send(
            &app,
            "POST",
            "/api/comments/t1",
            Some(ALICE),
            Some(json!({ "content": "orphan", "parentId": "missing" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn thread_is_nested_and_capped() {
        let (app, _) = app();
        let a = create(&app, "t1", ALICE, None).await;
        let b = create(&app, "t1", BOB, Some(a.as_str())).await;
        let c = create(&app, "t1", ALICE, Some(b.as_str())).await;
        create(&app, "t1", BOB, Some(c.as_str())).await;

        let (status, body) = send(&app, "GET", "/api/comments/t1", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 4);

        let roots = body["comments"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["id"], a.as_str());
        assert_eq!(roots[0]["repliesCount"], 1);
        let reply = &roots[0]["replies"][0];
        assert_eq!(reply["id"], b.as_str());
        assert_eq!(reply["repliesCount"], 1);
        let sub = &reply["replies"][0];
        assert_eq!(sub["id"], c.as_str());
        assert!(sub.get("replies").is_none());
    }

    #[tokio::test]
    async fn like_toggles_and_reflects_viewer() {
        let (app, _) = app();
        let a = create(&app, "t1", ALICE, None).await;
        let uri = format!("/api/comments/{}/like", a);

        let (status, _) = send(&app, "POST", &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&app, "POST", &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "likes": 1, "isLiked": true }));

        let (_, body) = send(&app, "GET", "/api/comments/t1", Some(BOB), None).await;
        assert_eq!(body["comments"][0]["isLiked"], true);
        let (_, body) = send(&app, "GET", "/api/comments/t1", None, None).await;
        assert_eq!(body["comments"][0]["isLiked"], false);
        assert_eq!(body["comments"][0]["likes"], 1);

        let (_, body) = send(&app, "POST", &uri, Some(BOB), None).await;
        assert_eq!(body, json!({ "likes": 0, "isLiked": false }));

        let (status, _) =
            send(&app, "POST", "/api/comments/missing/like", Some(BOB), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_rules() {
        let (app, store) = app();
        let a = create(&app, "t1", ALICE, None).await;
        let b = create(&app, "t1", BOB, Some(a.as_str())).await;
        let uri = format!("/api/comments/{}", a);

        let (status, _) = send(&app, "DELETE", &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, "DELETE", &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(&app, "DELETE", &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], json!([a, b]));
        assert!(store.is_empty());

        let (status, _) = send(&app, "DELETE", &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_can_delete_any_comment() {
        let (app, store) = app();
        let a = create(&app, "t1", ALICE, None).await;

        let uri = format!("/api/comments/{}", a);
        let (status, _) = send(&app, "DELETE", &uri, Some(ADMIN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(store.get(&a).is_none());
    }

    #[tokio::test]
    async fn health_check() {
        let (app, _) = app();
        let (status, body) = send(&app, "GET", "/api/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn mutations_are_broadcast() {
        let state = state();
        let mut rx = state.tx_events.subscribe();
        let app = build_router(state, "*");

        let a = create(&app, "t1", ALICE, None).await;
        match rx.try_recv().unwrap() {
            ThreadEvent::CommentCreated { topic_id, comment } => {
                assert_eq!(topic_id, "t1");
                assert_eq!(comment.id, a);
            }
            other => panic!("unexpected event {:?}", other),
        }

        send(&app, "POST", &format!("/api/comments/{}/like", a), Some(BOB), None).await;
        match rx.try_recv().unwrap() {
            ThreadEvent::LikeToggled { comment_id, likes, .. } => {
                assert_eq!(comment_id, a);
                assert_eq!(likes, 1);
            }
            other => panic!("unexpected event {:?}", other),
        }

        send(&app, "DELETE", &format!("/api/comments/{}", a), Some(ALICE), None).await;
        match rx.try_recv().unwrap() {
            ThreadEvent::CommentsDeleted { topic_id, ids } => {
                assert_eq!(topic_id, "t1");
                assert_eq!(ids, vec![a]);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn malformed_bodies_are_validation_errors() {
        let (app, store) = app();

        for payload in [json!({}), json!({ "content": 5 }), json!(["content"])] {
            let (status, body) =
                send(&app, "POST", "/api/comments/t1", Some(ALICE), Some(payload)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"].is_string(), "{}", body);
        }

        let req = Request::builder()
            .method("POST")
            .uri("/api/comments/t1")
            .header(header::AUTHORIZATION, format!("Bearer {}", ALICE))
            .body(Body::from(r#"{"content":"no content type"}"#))
            .unwrap();
        let (status, body) = dispatch(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{}", body);

        let req = Request::builder()
            .method("POST")
            .uri("/api/comments/t1")
            .header(header::AUTHORIZATION, format!("Bearer {}", ALICE))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = dispatch(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string(), "{}", body);

        assert!(store.is_empty());
    }
}
