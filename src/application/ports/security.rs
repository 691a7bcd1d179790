// src/application/ports/security.rs
use crate::application::{ApplicationResult, dto::Actor};
use async_trait::async_trait;

#[async_trait]
pub trait ActorAuthenticator: Send + Sync {
    /// Resolve a bearer token to the acting user.
    async fn authenticate(&self, token: &str) -> ApplicationResult<Actor>;
}
