// src/domain/actor/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl UserId {
    pub fn new(id: i64) -> DomainResult<Self> {
        if id <= 0 {
            Err(DomainError::Validation("user id must be positive".into()))
        } else {
            Ok(Self(id))
        }
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capability {
    pub resource: String,
    pub action: String,
}

impl Capability {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && self.action == action
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Author => "author",
        }
    }

    /// Authors draft; editors also publish; admins may delete revision pairs.
    pub fn default_capabilities(&self) -> HashSet<Capability> {
        use Capability as Cap;
        match self {
            Role::Admin => HashSet::from([
                Cap::new("articles", "add"),
                Cap::new("articles", "change"),
                Cap::new("articles", "publish"),
                Cap::new("articles", "delete"),
                Cap::new("taxonomy", "change"),
            ]),
            Role::Editor => HashSet::from([
                Cap::new("articles", "add"),
                Cap::new("articles", "change"),
                Cap::new("articles", "publish"),
                Cap::new("taxonomy", "change"),
            ]),
            Role::Author => HashSet::from([
                Cap::new("articles", "add"),
                Cap::new("articles", "change"),
            ]),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "author" => Ok(Role::Author),
            other => Err(DomainError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_can_delete() {
        assert!(Role::Admin
            .default_capabilities()
            .iter()
            .any(|c| c.matches("articles", "delete")));
        assert!(!Role::Editor
            .default_capabilities()
            .iter()
            .any(|c| c.matches("articles", "delete")));
    }

    #[test]
    fn author_cannot_publish() {
        let caps = Role::Author.default_capabilities();
        assert!(caps.iter().any(|c| c.matches("articles", "change")));
        assert!(!caps.iter().any(|c| c.matches("articles", "publish")));
    }

    #[test]
    fn parses_roles() {
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
        assert!("owner".parse::<Role>().is_err());
    }
}
