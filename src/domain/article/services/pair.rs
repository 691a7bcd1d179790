// src/domain/article/services/pair.rs
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::domain::article::entity::Article;
use crate::domain::article::placeholder::{ContentBlock, Placeholder, deletion_order};
use crate::domain::article::repository::ArticleUnitOfWork;
use crate::domain::article::services::dirty::DirtyTracker;
use crate::domain::article::value_objects::{ArticleId, PlaceholderSlot};
use crate::domain::errors::{DomainError, DomainResult};

/// A draft and, once published, its public mirror.
#[derive(Debug, Clone)]
pub struct RevisionPair {
    pub draft: Article,
    pub public: Option<Article>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedPair {
    pub draft_id: ArticleId,
    pub public_id: Option<ArticleId>,
}

/// Fails with `Integrity` unless `draft` and `public` link to each other
/// with opposite flavors.
pub fn verify_pair(draft: &Article, public: &Article) -> DomainResult<()> {
    let linked = draft.is_draft
        && !public.is_draft
        && draft.public_id == Some(public.id)
        && public.public_id == Some(draft.id);
    if linked {
        Ok(())
    } else {
        Err(DomainError::Integrity(format!(
            "revision pair {} / {} is broken",
            draft.id, public.id
        )))
    }
}

/// Resolves both sides starting from either flavor.
pub async fn load_pair(
    uow: &mut dyn ArticleUnitOfWork,
    article: Article,
) -> DomainResult<RevisionPair> {
    if article.is_draft {
        let public = match article.public_id {
            Some(public_id) => {
                let public = linked(uow, article.id, public_id).await?;
                verify_pair(&article, &public)?;
                Some(public)
            }
            None => None,
        };
        return Ok(RevisionPair {
            draft: article,
            public,
        });
    }

    let draft_id = article.public_id.ok_or_else(|| {
        DomainError::Integrity(format!("public article {} has no draft", article.id))
    })?;
    let draft = linked(uow, article.id, draft_id).await?;
    verify_pair(&draft, &article)?;
    Ok(RevisionPair {
        draft,
        public: Some(article),
    })
}

/// Returns the public mirror of `draft`, creating it from the draft's
/// scalar fields when absent. A created mirror is linked on `draft` in
/// memory only; the caller saves the draft.
pub async fn get_or_create_public_counterpart(
    uow: &mut dyn ArticleUnitOfWork,
    draft: &mut Article,
    now: DateTime<Utc>,
) -> DomainResult<Article> {
    draft.ensure_draft("published")?;
    if let Some(public_id) = draft.public_id {
        let public = linked(uow, draft.id, public_id).await?;
        verify_pair(draft, &public)?;
        return Ok(public);
    }

    let public = uow.insert_article(draft.public_counterpart(now)).await?;
    draft.public_id = Some(public.id);
    info!(draft_id = %draft.id, public_id = %public.id, "created public counterpart");
    Ok(public)
}

/// Deletes both sides of the pair `article` belongs to, together with their
/// titles, placeholders and blocks. All ids are collected first and removed
/// in dependency order inside the caller's transaction.
pub async fn delete_pair(
    uow: &mut dyn ArticleUnitOfWork,
    tracker: &DirtyTracker,
    article: Article,
) -> DomainResult<DeletedPair> {
    let pair = load_pair(uow, article).await?;
    let deleted = DeletedPair {
        draft_id: pair.draft.id,
        public_id: pair.public.as_ref().map(|p| p.id),
    };
    let article_ids: Vec<ArticleId> = std::iter::once(deleted.draft_id)
        .chain(deleted.public_id)
        .collect();

    let mut title_ids = Vec::new();
    let mut placeholders: Vec<Placeholder> = Vec::new();
    let mut blocks: Vec<ContentBlock> = Vec::new();
    for id in &article_ids {
        title_ids.extend(uow.list_titles(*id).await?.into_iter().map(|t| t.id));
        for placeholder in uow.list_placeholders(*id).await? {
            blocks.extend(uow.list_blocks(placeholder.id, None).await?);
            placeholders.push(placeholder);
        }
    }

    for block in &blocks {
        tracker.invalidate(block.placeholder_id, &block.language);
    }
    uow.delete_blocks(&deletion_order(&blocks)).await?;
    let placeholder_ids: Vec<_> = placeholders.iter().map(|p| p.id).collect();
    uow.delete_placeholders(&placeholder_ids).await?;
    uow.delete_titles(&title_ids).await?;
    uow.delete_articles(&article_ids).await?;

    debug!(
        draft_id = %deleted.draft_id,
        titles = title_ids.len(),
        placeholders = placeholder_ids.len(),
        blocks = blocks.len(),
        "deleted revision pair"
    );
    Ok(deleted)
}

/// Creates the placeholders `declared` names that `article_id` lacks.
/// Existing placeholders for undeclared slots are kept.
pub async fn rescan_placeholders(
    uow: &mut dyn ArticleUnitOfWork,
    article_id: ArticleId,
    declared: &[PlaceholderSlot],
) -> DomainResult<Vec<Placeholder>> {
    let existing = uow.list_placeholders(article_id).await?;
    let mut created: Vec<Placeholder> = Vec::new();
    for slot in declared {
        let present = existing.iter().chain(created.iter()).any(|p| &p.slot == slot);
        if !present {
            created.push(uow.insert_placeholder(article_id, slot).await?);
        }
    }
    Ok(created)
}

async fn linked(
    uow: &mut dyn ArticleUnitOfWork,
    from: ArticleId,
    to: ArticleId,
) -> DomainResult<Article> {
    uow.find_article(to).await?.ok_or_else(|| {
        DomainError::Integrity(format!("article {from} links to missing article {to}"))
    })
}
