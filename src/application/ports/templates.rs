use crate::domain::article::{PlaceholderSlot, TemplateName};

pub trait TemplateRegistry: Send + Sync {
    /// Slots declared by `template` in declaration order, `None` when the
    /// template is unknown.
    fn declared_slots(&self, template: &TemplateName) -> Option<Vec<PlaceholderSlot>>;

    fn default_template(&self) -> TemplateName;

    fn is_known(&self, template: &TemplateName) -> bool {
        self.declared_slots(template).is_some()
    }
}
