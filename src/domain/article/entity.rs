// src/domain/article/entity.rs
use crate::domain::article::ledger::LanguageLedger;
use crate::domain::article::value_objects::{
    ArticleId, AttributeId, CategoryId, ChangedBy, TemplateName, TreeId,
};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// One flavor (draft or public) of a versioned article.
#[derive(Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub tree_id: TreeId,
    pub template: TemplateName,
    pub categories: BTreeSet<CategoryId>,
    pub attributes: BTreeSet<AttributeId>,
    pub created_by: ChangedBy,
    pub changed_by: ChangedBy,
    pub creation_date: DateTime<Utc>,
    pub changed_date: DateTime<Utc>,
    pub publication_date: Option<DateTime<Utc>>,
    pub publication_end_date: Option<DateTime<Utc>>,
    pub order_date: DateTime<Utc>,
    pub login_required: bool,
    pub is_draft: bool,
    pub public_id: Option<ArticleId>,
    pub languages: LanguageLedger,
}

impl Article {
    pub fn ensure_draft(&self, action: &str) -> DomainResult<()> {
        if self.is_draft {
            Ok(())
        } else {
            Err(DomainError::PublicIsUnmodifiable(format!(
                "the public instance cannot be {action}, use the draft"
            )))
        }
    }

    /// Fields whose change on a draft marks every language dirty.
    pub fn tracked_fields_differ(&self, other: &Article) -> bool {
        self.tree_id != other.tree_id
            || self.template != other.template
            || self.publication_date != other.publication_date
            || self.publication_end_date != other.publication_end_date
            || self.login_required != other.login_required
            || self.categories != other.categories
            || self.attributes != other.attributes
    }

    /// Copies entity-level scalar fields and taxonomy; titles, content,
    /// flavor and pairing stay untouched.
    pub fn copy_scalars_to(&self, target: &mut Article) {
        target.tree_id = self.tree_id;
        target.template = self.template.clone();
        target.publication_date = self.publication_date;
        target.publication_end_date = self.publication_end_date;
        target.login_required = self.login_required;
        target.categories = self.categories.clone();
        target.attributes = self.attributes.clone();
        target.refresh_order_date();
    }

    pub fn touch(&mut self, changed_by: ChangedBy, now: DateTime<Utc>) {
        self.changed_by = changed_by;
        self.changed_date = now;
        self.refresh_order_date();
    }

    pub fn refresh_order_date(&mut self) {
        self.order_date = self.publication_date.unwrap_or(self.creation_date);
    }

    pub fn set_publication_window(
        &mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> DomainResult<()> {
        validate_publication_window(start, end)?;
        self.publication_date = start;
        self.publication_end_date = end;
        self.refresh_order_date();
        Ok(())
    }

    /// Inside the publication window at `now`.
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        self.publication_date.is_none_or(|start| start <= now)
            && self.publication_end_date.is_none_or(|end| end > now)
    }

    /// Shape of a fresh public counterpart for this draft.
    pub fn public_counterpart(&self, now: DateTime<Utc>) -> NewArticle {
        NewArticle {
            tree_id: self.tree_id,
            template: self.template.clone(),
            categories: self.categories.clone(),
            attributes: self.attributes.clone(),
            created_by: self.created_by.clone(),
            changed_by: self.changed_by.clone(),
            creation_date: now,
            publication_date: self.publication_date,
            publication_end_date: self.publication_end_date,
            login_required: self.login_required,
            is_draft: false,
            public_id: Some(self.id),
        }
    }
}

pub fn validate_publication_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> DomainResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(DomainError::Validation(
            "publication end date must be after the publication date".into(),
        )),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub tree_id: TreeId,
    pub template: TemplateName,
    pub categories: BTreeSet<CategoryId>,
    pub attributes: BTreeSet<AttributeId>,
    pub created_by: ChangedBy,
    pub changed_by: ChangedBy,
    pub creation_date: DateTime<Utc>,
    pub publication_date: Option<DateTime<Utc>>,
    pub publication_end_date: Option<DateTime<Utc>>,
    pub login_required: bool,
    pub is_draft: bool,
    pub public_id: Option<ArticleId>,
}

impl NewArticle {
    pub fn order_date(&self) -> DateTime<Utc> {
        self.publication_date.unwrap_or(self.creation_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_article() -> Article {
        let now = Utc::now();
        Article {
            id: ArticleId::new(1).unwrap(),
            tree_id: TreeId::new(1).unwrap(),
            template: TemplateName::new("cms_articles/default.html").unwrap(),
            categories: BTreeSet::new(),
            attributes: BTreeSet::new(),
            created_by: ChangedBy::script(),
            changed_by: ChangedBy::script(),
            creation_date: now,
            changed_date: now,
            publication_date: None,
            publication_end_date: None,
            order_date: now,
            login_required: false,
            is_draft: true,
            public_id: None,
            languages: LanguageLedger::new(),
        }
    }

    #[test]
    fn public_flavor_is_unmodifiable() {
        let mut article = sample_article();
        assert!(article.ensure_draft("published").is_ok());
        article.is_draft = false;
        assert!(matches!(
            article.ensure_draft("published"),
            Err(DomainError::PublicIsUnmodifiable(_))
        ));
    }

    #[test]
    fn ledger_and_audit_fields_are_not_tracked() {
        let original = sample_article();
        let mut edited = original.clone();
        edited.languages.insert(
            crate::domain::article::value_objects::LanguageCode::new("en").unwrap(),
        );
        edited.touch(ChangedBy::from_stored("alice"), Utc::now());
        assert!(!original.tracked_fields_differ(&edited));

        edited.login_required = true;
        assert!(original.tracked_fields_differ(&edited));
    }

    #[test]
    fn taxonomy_changes_are_tracked() {
        let original = sample_article();
        let mut edited = original.clone();
        edited.categories.insert(CategoryId::new(3).unwrap());
        assert!(original.tracked_fields_differ(&edited));
    }

    #[test]
    fn copy_scalars_keeps_flavor_and_pairing() {
        let mut draft = sample_article();
        draft.login_required = true;
        draft.attributes.insert(AttributeId::new(9).unwrap());
        let mut public = sample_article();
        public.id = ArticleId::new(2).unwrap();
        public.is_draft = false;
        public.public_id = Some(draft.id);

        draft.copy_scalars_to(&mut public);
        assert!(public.login_required);
        assert!(!public.is_draft);
        assert_eq!(public.public_id, Some(draft.id));
        assert!(!draft.tracked_fields_differ(&public));
    }

    #[test]
    fn publication_window_bounds() {
        let now = Utc::now();
        let mut article = sample_article();
        assert!(article.is_within_window(now));

        article
            .set_publication_window(Some(now + Duration::hours(1)), None)
            .unwrap();
        assert!(!article.is_within_window(now));
        assert_eq!(article.order_date, now + Duration::hours(1));

        article
            .set_publication_window(Some(now - Duration::hours(2)), Some(now))
            .unwrap();
        assert!(!article.is_within_window(now));
        assert!(article.is_within_window(now - Duration::hours(1)));

        assert!(article.set_publication_window(Some(now), Some(now)).is_err());
    }
}
