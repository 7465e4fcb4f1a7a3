//! Bearer-token identity resolution.
//!
//! Tokens are resolved by an [`Authenticator`]; the default one is a static
//! table from configuration plus the admin token. Handlers take [`Identity`]
//! when a caller is required and `Option<Identity>` when it is not.

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use domain::Author;
use sha2::{Digest, Sha256};

use crate::{
    config::{SecuritySettings, UserSettings},
    error::ApiError,
    state::AppState,
};

const ADMIN_ID: &str = "admin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn author(&self) -> Author {
        Author {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

pub trait Authenticator: Send + Sync {
    fn resolve(&self, token: &str) -> Option<Identity>;
}

pub struct StaticTokens {
    identities: HashMap<String, Identity>,
}

impl StaticTokens {
    pub fn new(security: &SecuritySettings, users: &[UserSettings]) -> Self {
        let mut identities: HashMap<String, Identity> = users
            .iter()
            .map(|u| {
                let avatar = u
                    .avatar
                    .clone()
                    .unwrap_or_else(|| avatar_token(&u.id, &security.identity_salt));
                (
                    u.token.clone(),
                    Identity {
                        id: u.id.clone(),
                        name: u.name.clone(),
                        avatar,
                        is_admin: u.admin,
                    },
                )
            })
            .collect();

        identities.insert(
            security.admin_token.clone(),
            Identity {
                id: ADMIN_ID.to_string(),
                name: "Administrator".to_string(),
                avatar: avatar_token(ADMIN_ID, &security.identity_salt),
                is_admin: true,
            },
        );

        Self { identities }
    }
}

impl Authenticator for StaticTokens {
    fn resolve(&self, token: &str) -> Option<Identity> {
        self.identities.get(token).cloned()
    }
}

/// Stable per-user avatar token for users without their own avatar.
pub fn avatar_token(user_id: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(user_id.as_bytes());
    let mut token = hex::encode(hasher.finalize());
    token.truncate(16);
    token
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts).ok_or(ApiError::Unauthenticated)?;
        state.auth.resolve(token).ok_or_else(|| {
            tracing::warn!("Rejected unknown bearer token");
            ApiError::Unauthenticated
        })
    }
}
