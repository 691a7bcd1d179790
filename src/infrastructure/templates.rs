use crate::application::ports::templates::TemplateRegistry;
use crate::domain::article::{PlaceholderSlot, TemplateName};

/// Templates known from configuration, in declaration order. The first one
/// is the default.
#[derive(Debug, Clone)]
pub struct ConfiguredTemplateRegistry {
    templates: Vec<(TemplateName, Vec<PlaceholderSlot>)>,
}

impl ConfiguredTemplateRegistry {
    /// `templates` must not be empty; configuration loading guarantees it.
    pub fn new(templates: Vec<(TemplateName, Vec<PlaceholderSlot>)>) -> Option<Self> {
        if templates.is_empty() {
            None
        } else {
            Some(Self { templates })
        }
    }
}

impl TemplateRegistry for ConfiguredTemplateRegistry {
    fn declared_slots(&self, template: &TemplateName) -> Option<Vec<PlaceholderSlot>> {
        self.templates
            .iter()
            .find(|(name, _)| name == template)
            .map(|(_, slots)| slots.clone())
    }

    fn default_template(&self) -> TemplateName {
        self.templates[0].0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ConfiguredTemplateRegistry {
        ConfiguredTemplateRegistry::new(vec![
            (
                TemplateName::new("cms_articles/default.html").unwrap(),
                vec![PlaceholderSlot::new("content").unwrap()],
            ),
            (
                TemplateName::new("cms_articles/wide.html").unwrap(),
                vec![
                    PlaceholderSlot::new("content").unwrap(),
                    PlaceholderSlot::new("sidebar").unwrap(),
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn first_template_is_default() {
        assert_eq!(
            registry().default_template().as_str(),
            "cms_articles/default.html"
        );
    }

    #[test]
    fn unknown_templates_declare_nothing() {
        let registry = registry();
        assert!(!registry.is_known(&TemplateName::new("other.html").unwrap()));
        assert_eq!(
            registry
                .declared_slots(&TemplateName::new("cms_articles/wide.html").unwrap())
                .map(|s| s.len()),
            Some(2)
        );
        assert!(ConfiguredTemplateRegistry::new(Vec::new()).is_none());
    }
}
