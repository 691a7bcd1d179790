use std::collections::HashSet;

use crate::domain::actor::Capability;
use crate::domain::article::entity::Article;

pub trait ArticleSpecification {
    fn is_satisfied(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleAction {
    Add,
    Change,
    Publish,
    Delete,
}

impl ArticleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleAction::Add => "add",
            ArticleAction::Change => "change",
            ArticleAction::Publish => "publish",
            ArticleAction::Delete => "delete",
        }
    }
}

/// Satisfied when the capability set grants `articles:<action>`. Every
/// action except `Add` also needs the target article.
pub struct ArticleCapabilitySpec<'a> {
    capabilities: &'a HashSet<Capability>,
    article: Option<&'a Article>,
    action: ArticleAction,
}

impl<'a> ArticleCapabilitySpec<'a> {
    pub fn new(
        capabilities: &'a HashSet<Capability>,
        article: Option<&'a Article>,
        action: ArticleAction,
    ) -> Self {
        Self {
            capabilities,
            article,
            action,
        }
    }

    fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}

impl ArticleSpecification for ArticleCapabilitySpec<'_> {
    fn is_satisfied(&self) -> bool {
        match self.action {
            ArticleAction::Add => self.has_capability("articles", "add"),
            ArticleAction::Change | ArticleAction::Publish | ArticleAction::Delete => {
                self.article.is_some() && self.has_capability("articles", self.action.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actor::Role;

    #[test]
    fn add_does_not_need_an_article() {
        let caps = Role::Author.default_capabilities();
        assert!(ArticleCapabilitySpec::new(&caps, None, ArticleAction::Add).is_satisfied());
        assert!(!ArticleCapabilitySpec::new(&caps, None, ArticleAction::Change).is_satisfied());
    }

    #[test]
    fn empty_capabilities_grant_nothing() {
        let caps = HashSet::new();
        assert!(!ArticleCapabilitySpec::new(&caps, None, ArticleAction::Add).is_satisfied());
    }
}
