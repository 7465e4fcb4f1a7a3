use domain::{Comment, LikeState};
use serde::Serialize;
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
const TOPIC: &str = "hello-forum";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCommentRequest<'a> {
    content: &'a str,
    parent_id: Option<&'a str>,
}

struct Api {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl Api {
    async fn create(&self, content: &str, parent_id: Option<&str>) -> anyhow::Result<Comment> {
        let comment = self
            .client
            .post(format!("{}/api/comments/{}", self.base_url, TOPIC))
            .bearer_auth(&self.token)
            .json(&CreateCommentRequest { content, parent_id })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(comment)
    }

    async fn like(&self, id: &str) -> anyhow::Result<LikeState> {
        let state = self
            .client
            .post(format!("{}/api/comments/{}/like", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(state)
    }

    async fn thread(&self) -> anyhow::Result<Value> {
        let thread = self
            .client
            .get(format!("{}/api/comments/{}", self.base_url, TOPIC))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(thread)
    }

    async fn delete(&self, id: &str) -> anyhow::Result<Value> {
        let resp = self
            .client
            .delete(format!("{}/api/comments/{}", self.base_url, id))
            .bearer_auth(&self.token)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(resp)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let api = Api {
        client: reqwest::Client::new(),
        base_url: std::env::var("FORUM_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        token: std::env::var("FORUM_TOKEN").unwrap_or_else(|_| "admin_secret_123".into()),
    };
    println!("Starting forum test client against {}...", api.base_url);

    println!("\n[1/5] Posting a small thread...");
    let root = api.create("Is Rust a good fit for a forum backend?", None).await?;
    let reply = api.create("Sure, axum makes it easy.", Some(root.id.as_str())).await?;
    let sub = api
        .create("Threads nest three levels deep.", Some(reply.id.as_str()))
        .await?;
    println!("   -> root={} reply={} sub-reply={}", root.id, reply.id, sub.id);

    println!("\n[2/5] Liking the root comment...");
    let liked = api.like(&root.id).await?;
    println!("   -> likes={} isLiked={}", liked.likes, liked.is_liked);

    println!("\n[3/5] Unliking it again...");
    let unliked = api.like(&root.id).await?;
    println!("   -> likes={} isLiked={}", unliked.likes, unliked.is_liked);

    println!("\n[4/5] Fetching the thread...");
    let thread = api.thread().await?;
    println!("{}", serde_json::to_string_pretty(&thread)?);

    println!("\n[5/5] Deleting the root (cascades to replies)...");
    let deleted = api.delete(&root.id).await?;
    println!("   -> {}", deleted);

    Ok(())
}
