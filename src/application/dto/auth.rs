use crate::domain::actor::{Capability, Role, UserId};
use crate::domain::article::ChangedBy;
use std::collections::HashSet;

/// The authenticated caller of a command. Passed explicitly to every
/// operation that needs it.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub capabilities: HashSet<Capability>,
}

impl Actor {
    pub fn new(id: UserId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            capabilities: role.default_capabilities(),
        }
    }

    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }

    pub fn changed_by(&self) -> ChangedBy {
        ChangedBy::from_user(&self.username, self.id)
    }
}
