use crate::application::{
    ApplicationResult, dto::Actor, error::ApplicationError, ports::security::ActorAuthenticator,
};
use async_trait::async_trait;
use std::collections::HashMap;

/// Static bearer tokens mapped to actors, loaded from configuration.
#[derive(Debug, Default, Clone)]
pub struct ApiKeyAuthenticator {
    keys: HashMap<String, Actor>,
}

impl ApiKeyAuthenticator {
    pub fn new(keys: HashMap<String, Actor>) -> Self {
        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl ActorAuthenticator for ApiKeyAuthenticator {
    async fn authenticate(&self, token: &str) -> ApplicationResult<Actor> {
        self.keys
            .get(token.trim())
            .cloned()
            .ok_or_else(|| ApplicationError::unauthorized("invalid api key"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::{Role, UserId};

    #[tokio::test]
    async fn resolves_known_keys_only() {
        let actor = Actor::new(UserId::new(7).unwrap(), "ed", Role::Editor);
        let auth = ApiKeyAuthenticator::new(HashMap::from([("k1".to_string(), actor)]));

        assert_eq!(auth.authenticate("k1").await.unwrap().username, "ed");
        assert!(matches!(
            auth.authenticate("nope").await,
            Err(ApplicationError::Unauthorized(_))
        ));
    }
}
