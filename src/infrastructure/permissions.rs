use crate::application::{dto::Actor, ports::permissions::PermissionOracle};
use crate::domain::article::{
    Article,
    specifications::{ArticleAction, ArticleCapabilitySpec, ArticleSpecification},
};

/// Grants article actions from the actor's role capabilities.
#[derive(Debug, Default, Clone)]
pub struct CapabilityPermissionOracle;

impl CapabilityPermissionOracle {
    fn check(actor: &Actor, article: Option<&Article>, action: ArticleAction) -> bool {
        ArticleCapabilitySpec::new(&actor.capabilities, article, action).is_satisfied()
    }
}

impl PermissionOracle for CapabilityPermissionOracle {
    fn has_add_permission(&self, actor: &Actor) -> bool {
        Self::check(actor, None, ArticleAction::Add)
    }

    fn has_change_permission(&self, actor: &Actor, article: &Article) -> bool {
        Self::check(actor, Some(article), ArticleAction::Change)
    }

    fn has_publish_permission(&self, actor: &Actor, article: &Article) -> bool {
        Self::check(actor, Some(article), ArticleAction::Publish)
    }

    fn has_delete_permission(&self, actor: &Actor, article: &Article) -> bool {
        Self::check(actor, Some(article), ArticleAction::Delete)
    }
}
