// src/domain/article/services/dirty.rs
use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::cache::{RenderCache, RenderCacheKey};
use crate::domain::article::entity::Article;
use crate::domain::article::placeholder::{ContentBlock, NewContentBlock, deletion_order};
use crate::domain::article::repository::ArticleUnitOfWork;
use crate::domain::article::services::ledger;
use crate::domain::article::title::{NewTitle, Title};
use crate::domain::article::value_objects::{
    ArticleId, LanguageCode, PlaceholderId, PublisherState, SiteId,
};
use crate::domain::errors::{DomainError, DomainResult};

/// Whether a save may flip publisher state to dirty. `Keep` is used by the
/// engine itself when it writes the output of a copy or a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateTracking {
    Track,
    Keep,
}

/// Every draft write goes through here so that edits mark the affected
/// languages dirty and stale rendered placeholders are dropped.
pub struct DirtyTracker {
    cache: Arc<dyn RenderCache>,
    site_id: SiteId,
}

impl DirtyTracker {
    pub fn new(cache: Arc<dyn RenderCache>, site_id: SiteId) -> Self {
        Self { cache, site_id }
    }

    /// Persists an existing article. A tracked draft whose edit-tracked
    /// fields changed marks all of its titles dirty. Returns whether it did.
    pub async fn save_article(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        article: &Article,
        tracking: StateTracking,
    ) -> DomainResult<bool> {
        let dirty = if article.is_draft && tracking == StateTracking::Track {
            match uow.find_article(article.id).await? {
                Some(previous) => previous.tracked_fields_differ(article),
                None => true,
            }
        } else {
            false
        };

        uow.update_article(article).await?;
        if dirty {
            for title in uow.list_titles(article.id).await? {
                self.flag_title(uow, title).await?;
            }
        }
        Ok(dirty)
    }

    /// Creates a title and records its language on the owning article. A
    /// tracked draft title starts out dirty.
    pub async fn insert_title(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        mut title: NewTitle,
        tracking: StateTracking,
    ) -> DomainResult<Title> {
        ledger::record_language(uow, title.article_id, &title.language).await?;
        if title.is_draft && tracking == StateTracking::Track {
            title.publisher_state = PublisherState::Dirty;
        }
        uow.insert_title(title).await
    }

    /// Persists an existing title. Dirtiness is never cleared here; only
    /// publish and revert do that, always with `StateTracking::Keep`.
    pub async fn save_title(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        title: &mut Title,
        tracking: StateTracking,
    ) -> DomainResult<()> {
        if title.is_draft && tracking == StateTracking::Track {
            let changed = match uow.find_title_by_id(title.id).await? {
                Some(previous) => previous.tracked_fields_differ(title),
                None => true,
            };
            if changed {
                title.publisher_state = PublisherState::Dirty;
            }
        }
        uow.update_title(title).await
    }

    pub async fn delete_title(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        title: &Title,
    ) -> DomainResult<()> {
        ledger::forget_language(uow, title.article_id, &title.language).await?;
        uow.delete_titles(&[title.id]).await
    }

    pub async fn insert_block(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        block: NewContentBlock,
    ) -> DomainResult<ContentBlock> {
        self.content_changed(uow, block.placeholder_id, &block.language, true)
            .await?;
        uow.insert_block(block).await
    }

    /// Persists a block. A block moved to another placeholder also marks the
    /// language of its former placeholder dirty.
    pub async fn save_block(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        block: &ContentBlock,
    ) -> DomainResult<()> {
        self.content_changed(uow, block.placeholder_id, &block.language, true)
            .await?;
        if let Some(previous) = uow.find_block(block.id).await? {
            if previous.placeholder_id != block.placeholder_id {
                self.content_changed(uow, previous.placeholder_id, &previous.language, false)
                    .await?;
            }
        }
        uow.update_block(block).await
    }

    /// Deletes `blocks` deepest first, marking every touched language dirty.
    pub async fn delete_blocks(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        blocks: &[ContentBlock],
    ) -> DomainResult<()> {
        let touched: BTreeSet<(PlaceholderId, LanguageCode)> = blocks
            .iter()
            .map(|b| (b.placeholder_id, b.language.clone()))
            .collect();
        for (placeholder_id, language) in &touched {
            self.content_changed(uow, *placeholder_id, language, true)
                .await?;
        }
        uow.delete_blocks(&deletion_order(blocks)).await
    }

    /// Drops the rendered output of one placeholder in one language.
    pub fn invalidate(&self, placeholder_id: PlaceholderId, language: &LanguageCode) {
        self.cache.invalidate(&RenderCacheKey {
            placeholder_id,
            language: language.clone(),
            site_id: self.site_id,
        });
    }

    /// Marks the title for `language` on the draft owning `placeholder_id`
    /// dirty. Public owners are left alone; their content only changes
    /// through the replicator.
    async fn content_changed(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        placeholder_id: PlaceholderId,
        language: &LanguageCode,
        invalidate: bool,
    ) -> DomainResult<()> {
        if invalidate {
            self.invalidate(placeholder_id, language);
        }
        let Some(placeholder) = uow.find_placeholder(placeholder_id).await? else {
            return Ok(());
        };
        let owner = owner_of(uow, placeholder.article_id).await?;
        if !owner.is_draft {
            return Ok(());
        }
        if let Some(title) = uow.find_title(owner.id, language).await? {
            self.flag_title(uow, title).await?;
        }
        Ok(())
    }

    async fn flag_title(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        mut title: Title,
    ) -> DomainResult<()> {
        if title.is_dirty() {
            return Ok(());
        }
        debug!(title_id = %title.id, language = %title.language, "marking title dirty");
        title.publisher_state = PublisherState::Dirty;
        uow.update_title(&title).await
    }
}

async fn owner_of(
    uow: &mut dyn ArticleUnitOfWork,
    article_id: ArticleId,
) -> DomainResult<Article> {
    uow.find_article(article_id).await?.ok_or_else(|| {
        DomainError::Integrity(format!("placeholder owner {article_id} is missing"))
    })
}
