// src/domain/article/title.rs
use crate::domain::article::value_objects::{
    ArticleId, ArticleSlug, ImageId, LanguageCode, PublisherState, RevisionState, TitleId,
    TitleText,
};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};

const META_DESCRIPTION_MAX_LENGTH: usize = 155;

/// Per-language metadata of one article flavor.
#[derive(Debug, Clone)]
pub struct Title {
    pub id: TitleId,
    pub article_id: ArticleId,
    pub language: LanguageCode,
    pub title: TitleText,
    pub slug: ArticleSlug,
    pub description: String,
    pub page_title: Option<String>,
    pub menu_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_id: Option<ImageId>,
    pub creation_date: DateTime<Utc>,
    pub published: bool,
    pub is_draft: bool,
    pub public_id: Option<TitleId>,
    pub publisher_state: PublisherState,
}

impl Title {
    /// Compares the edit-tracked subset; a difference marks the language dirty.
    pub fn tracked_fields_differ(&self, other: &Title) -> bool {
        self.title != other.title
            || self.slug != other.slug
            || self.description != other.description
            || self.page_title != other.page_title
            || self.menu_title != other.menu_title
            || self.meta_description != other.meta_description
    }

    pub fn is_dirty(&self) -> bool {
        self.publisher_state == PublisherState::Dirty
    }

    pub fn revision_state(&self) -> RevisionState {
        if !self.published {
            RevisionState::Unpublished
        } else if self.is_dirty() {
            RevisionState::Dirty
        } else {
            RevisionState::Clean
        }
    }

    /// Overwrites every content field of `target` with this title's values.
    /// Identity, owner, flavor and pairing of `target` are left alone.
    pub fn copy_content_to(&self, target: &mut Title) {
        target.language = self.language.clone();
        target.title = self.title.clone();
        target.slug = self.slug.clone();
        target.description = self.description.clone();
        target.page_title = self.page_title.clone();
        target.menu_title = self.menu_title.clone();
        target.meta_description = self.meta_description.clone();
        target.image_id = self.image_id;
        target.creation_date = self.creation_date;
    }

    pub fn page_title_or_title(&self) -> &str {
        self.page_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(self.title.as_str())
    }

    pub fn menu_title_or_title(&self) -> &str {
        self.menu_title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(self.title.as_str())
    }

    pub fn meta_description_or_description(&self) -> String {
        match self.meta_description.as_deref().filter(|d| !d.is_empty()) {
            Some(meta) => meta.to_string(),
            None => strip_tags(&self.description),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewTitle {
    pub article_id: ArticleId,
    pub language: LanguageCode,
    pub title: TitleText,
    pub slug: ArticleSlug,
    pub description: String,
    pub page_title: Option<String>,
    pub menu_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_id: Option<ImageId>,
    pub creation_date: DateTime<Utc>,
    pub published: bool,
    pub is_draft: bool,
    pub public_id: Option<TitleId>,
    pub publisher_state: PublisherState,
}

impl NewTitle {
    /// A new row on the opposite flavor carrying `source`'s content.
    pub fn mirror_of(source: &Title, article_id: ArticleId, is_draft: bool) -> Self {
        Self {
            article_id,
            language: source.language.clone(),
            title: source.title.clone(),
            slug: source.slug.clone(),
            description: source.description.clone(),
            page_title: source.page_title.clone(),
            menu_title: source.menu_title.clone(),
            meta_description: source.meta_description.clone(),
            image_id: source.image_id,
            creation_date: source.creation_date,
            published: true,
            is_draft,
            public_id: Some(source.id),
            publisher_state: PublisherState::Default,
        }
    }
}

pub fn validate_meta_description(value: Option<&str>) -> DomainResult<()> {
    match value {
        Some(meta) if meta.chars().count() > META_DESCRIPTION_MAX_LENGTH => {
            Err(DomainError::Validation(format!(
                "meta description is limited to {META_DESCRIPTION_MAX_LENGTH} characters"
            )))
        }
        _ => Ok(()),
    }
}

fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_title() -> Title {
        Title {
            id: TitleId::new(1).unwrap(),
            article_id: ArticleId::new(1).unwrap(),
            language: LanguageCode::new("en").unwrap(),
            title: TitleText::new("Hello").unwrap(),
            slug: ArticleSlug::new("2024-01-hello").unwrap(),
            description: "<p>Intro <b>text</b></p>".into(),
            page_title: None,
            menu_title: Some(String::new()),
            meta_description: None,
            image_id: None,
            creation_date: Utc::now(),
            published: false,
            is_draft: true,
            public_id: None,
            publisher_state: PublisherState::Dirty,
        }
    }

    #[test]
    fn title_text_change_is_tracked() {
        let title = sample_title();
        let mut edited = title.clone();
        edited.title = TitleText::new("Hello 2").unwrap();
        assert!(title.tracked_fields_differ(&edited));
    }

    #[test]
    fn image_and_state_changes_are_not_tracked() {
        let title = sample_title();
        let mut edited = title.clone();
        edited.image_id = Some(ImageId::new(5).unwrap());
        edited.published = true;
        edited.publisher_state = PublisherState::Default;
        assert!(!title.tracked_fields_differ(&edited));
    }

    #[test]
    fn revision_state_follows_visibility_then_dirtiness() {
        let mut title = sample_title();
        assert_eq!(title.revision_state(), RevisionState::Unpublished);
        title.published = true;
        assert_eq!(title.revision_state(), RevisionState::Dirty);
        title.publisher_state = PublisherState::Default;
        assert_eq!(title.revision_state(), RevisionState::Clean);
    }

    #[test]
    fn fallbacks_for_page_metadata() {
        let title = sample_title();
        assert_eq!(title.page_title_or_title(), "Hello");
        assert_eq!(title.menu_title_or_title(), "Hello");
        assert_eq!(title.meta_description_or_description(), "Intro text");
    }

    #[test]
    fn meta_description_length_is_bounded() {
        assert!(validate_meta_description(Some(&"a".repeat(155))).is_ok());
        assert!(validate_meta_description(Some(&"a".repeat(156))).is_err());
        assert!(validate_meta_description(None).is_ok());
    }
}
