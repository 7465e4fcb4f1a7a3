use std::sync::Arc;

use axum::extract::FromRef;
use domain::ThreadEvent;
use storage::CommentStore;
use tokio::sync::broadcast;

use crate::auth::Authenticator;

#[derive(Clone)]
pub struct AppState {
    pub store: CommentStore,
    pub auth: Arc<dyn Authenticator>,
    pub tx_events: broadcast::Sender<ThreadEvent>,
}

impl AppState {
    pub fn new(store: CommentStore, auth: Arc<dyn Authenticator>, capacity: usize) -> Self {
        let (tx_events, _rx) = broadcast::channel(capacity.max(1));
        Self {
            store,
            auth,
            tx_events,
        }
    }

    /// Sending without subscribers is fine; nobody is listening yet.
    pub fn publish(&self, event: ThreadEvent) {
        let _ = self.tx_events.send(event);
    }
}

impl FromRef<AppState> for CommentStore {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}
