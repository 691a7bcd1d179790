// src/domain/article/services/slug.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::ports::util::SlugGenerator;
use crate::domain::article::repository::ArticleUnitOfWork;
use crate::domain::article::value_objects::{ArticleId, ArticleSlug, LanguageCode, TitleText};
use crate::domain::errors::DomainResult;

/// Domain service responsible for producing unique title slugs.
pub struct ArticleSlugService {
    generator: Arc<dyn SlugGenerator>,
    date_format: String,
}

impl ArticleSlugService {
    pub fn new(generator: Arc<dyn SlugGenerator>, date_format: impl Into<String>) -> Self {
        Self {
            generator,
            date_format: date_format.into(),
        }
    }

    /// `{date}-{slugified title}`, or just the slugified title when no date
    /// format is configured.
    pub fn default_slug(&self, title: &TitleText, now: DateTime<Utc>) -> String {
        let base = self.generator.slugify(title.as_str());
        let base = if base.is_empty() {
            "article".to_string()
        } else {
            base
        };
        if self.date_format.is_empty() {
            base
        } else {
            format!("{}-{}", now.format(&self.date_format), base)
        }
    }

    /// First of `base`, `base-1`, `base-2`, … not used by another article's
    /// title in `language`. Titles of the articles in `ignore` (the caller's
    /// own revision pair) never collide.
    pub async fn generate_unique_slug(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        base: &str,
        language: &LanguageCode,
        ignore: &[ArticleId],
    ) -> DomainResult<ArticleSlug> {
        let taken: HashSet<String> = uow
            .slugs_in_use(language, base, ignore)
            .await?
            .into_iter()
            .collect();

        let mut candidate = base.to_string();
        let mut counter = 1u64;
        while taken.contains(&candidate) {
            candidate = format!("{}-{}", base, counter);
            counter += 1;
        }
        ArticleSlug::new(candidate)
    }
}
