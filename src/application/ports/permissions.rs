use crate::application::dto::Actor;
use crate::domain::article::Article;

/// Consulted before every transition; a denial blocks it.
pub trait PermissionOracle: Send + Sync {
    fn has_add_permission(&self, actor: &Actor) -> bool;
    fn has_change_permission(&self, actor: &Actor, article: &Article) -> bool;
    fn has_publish_permission(&self, actor: &Actor, article: &Article) -> bool;
    fn has_delete_permission(&self, actor: &Actor, article: &Article) -> bool;
}
