use crate::domain::actor::UserId;
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! positive_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(id: i64) -> DomainResult<Self> {
                if id <= 0 {
                    Err(DomainError::Validation(
                        concat!($label, " id must be positive").into(),
                    ))
                } else {
                    Ok(Self(id))
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(ArticleId, "article");
positive_id!(TitleId, "title");
positive_id!(PlaceholderId, "placeholder");
positive_id!(ContentBlockId, "content block");
positive_id!(TreeId, "tree");
positive_id!(CategoryId, "category");
positive_id!(AttributeId, "attribute");
positive_id!(ImageId, "image");
positive_id!(SiteId, "site");

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(DomainError::Validation("language cannot be empty".into()));
        }
        if value.len() > 15 {
            return Err(DomainError::Validation(
                "language code is limited to 15 characters".into(),
            ));
        }
        // The ledger is stored comma-joined.
        if value.contains(',') {
            return Err(DomainError::Validation(
                "language code cannot contain ','".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleText(String);

impl TitleText {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("title cannot be empty".into()));
        }
        if value.chars().count() > 255 {
            return Err(DomainError::Validation(
                "title is limited to 255 characters".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TitleText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<TitleText> for String {
    fn from(value: TitleText) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArticleSlug(String);

impl ArticleSlug {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("slug cannot be empty".into()));
        }
        if value.contains('/') {
            return Err(DomainError::Validation("slug cannot contain '/'".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArticleSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ArticleSlug> for String {
    fn from(value: ArticleSlug) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateName(String);

impl TemplateName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("template cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a placeholder slot declared by a template, e.g. `content`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaceholderSlot(String);

impl PlaceholderSlot {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("slot cannot be empty".into()));
        }
        if value.chars().any(|c| c == '"' || c == '\'') {
            return Err(DomainError::Validation(
                "slot cannot contain quotes".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceholderSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluginType(String);

impl PluginType {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(DomainError::Validation("plugin type cannot be empty".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-language publisher state of a Title. Stored as the host framework's
/// integer codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherState {
    #[default]
    Default,
    Dirty,
    Pending,
}

impl PublisherState {
    pub fn code(self) -> i64 {
        match self {
            PublisherState::Default => 0,
            PublisherState::Dirty => 1,
            PublisherState::Pending => 4,
        }
    }

    pub fn from_code(code: i64) -> DomainResult<Self> {
        match code {
            0 => Ok(PublisherState::Default),
            1 => Ok(PublisherState::Dirty),
            4 => Ok(PublisherState::Pending),
            other => Err(DomainError::Validation(format!(
                "unknown publisher state {other}"
            ))),
        }
    }
}

/// Observable state of an (article, language) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevisionState {
    Unpublished,
    Dirty,
    Clean,
}

impl RevisionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionState::Unpublished => "unpublished",
            RevisionState::Dirty => "dirty",
            RevisionState::Clean => "clean",
        }
    }
}

const USERNAME_MAX_LENGTH: usize = 255;

/// Who created or last changed an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedBy(String);

impl ChangedBy {
    pub fn script() -> Self {
        Self("script".into())
    }

    /// The username, `script` when there is none, truncated to 255
    /// characters with the user id appended.
    pub fn from_user(username: &str, id: UserId) -> Self {
        if username.trim().is_empty() {
            return Self::script();
        }
        if username.chars().count() <= USERNAME_MAX_LENGTH {
            return Self(username.to_string());
        }
        let prefix: String = username.chars().take(USERNAME_MAX_LENGTH - 15).collect();
        Self(format!("{prefix}... (id={})", i64::from(id)))
    }

    /// Rehydrates a stored value without re-truncating it.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangedBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_positive() {
        assert!(ArticleId::new(0).is_err());
        assert!(ContentBlockId::new(-3).is_err());
        assert_eq!(i64::from(TitleId::new(7).unwrap()), 7);
    }

    #[test]
    fn language_rejects_ledger_separator() {
        assert!(LanguageCode::new("en,de").is_err());
        assert_eq!(LanguageCode::new(" de ").unwrap().as_str(), "de");
    }

    #[test]
    fn publisher_state_codes_round_trip() {
        for state in [
            PublisherState::Default,
            PublisherState::Dirty,
            PublisherState::Pending,
        ] {
            assert_eq!(PublisherState::from_code(state.code()).unwrap(), state);
        }
        assert!(PublisherState::from_code(2).is_err());
    }

    #[test]
    fn long_usernames_are_truncated_with_id() {
        let name = "x".repeat(300);
        let changed = ChangedBy::from_user(&name, UserId::new(42).unwrap());
        assert!(changed.as_str().ends_with("... (id=42)"));
        assert!(changed.as_str().starts_with(&"x".repeat(240)));
    }

    #[test]
    fn nameless_actors_are_scripts() {
        let changed = ChangedBy::from_user("  ", UserId::new(1).unwrap());
        assert_eq!(changed, ChangedBy::script());
    }
}
