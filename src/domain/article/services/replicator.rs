// src/domain/article/services/replicator.rs
use std::collections::HashMap;

use tracing::debug;

use crate::domain::article::entity::Article;
use crate::domain::article::placeholder::{
    ContentBlock, NewContentBlock, Placeholder, deletion_order, tree_order,
};
use crate::domain::article::repository::ArticleUnitOfWork;
use crate::domain::article::services::dirty::{DirtyTracker, StateTracking};
use crate::domain::article::title::{NewTitle, Title};
use crate::domain::article::value_objects::{
    ArticleId, ContentBlockId, LanguageCode, PublisherState,
};
use crate::domain::errors::DomainResult;

/// Result of copying one language's blocks between revisions.
#[derive(Debug, Clone, Default)]
pub struct ContentCopy {
    /// Placeholders that had to be created on the target.
    pub created: Vec<Placeholder>,
    pub removed_blocks: usize,
    pub copied_blocks: usize,
}

/// Overwrites (or creates) the title for `language` on `target` with the
/// source title, links both titles to each other and marks both clean with
/// the given `published` flag. Target titles for `language` without a
/// source counterpart are removed. Returns the source title when one exists.
pub async fn copy_titles(
    uow: &mut dyn ArticleUnitOfWork,
    tracker: &DirtyTracker,
    source: &Article,
    target: &Article,
    language: &LanguageCode,
    published: bool,
) -> DomainResult<Option<Title>> {
    let existing = uow.find_title(target.id, language).await?;
    let Some(mut source_title) = uow.find_title(source.id, language).await? else {
        if let Some(leftover) = existing {
            tracker.delete_title(uow, &leftover).await?;
        }
        return Ok(None);
    };

    let target_title = match existing {
        Some(mut title) => {
            source_title.copy_content_to(&mut title);
            title.is_draft = target.is_draft;
            title.public_id = Some(source_title.id);
            title.publisher_state = PublisherState::Default;
            title.published = published;
            tracker
                .save_title(uow, &mut title, StateTracking::Keep)
                .await?;
            title
        }
        None => {
            let mut mirror = NewTitle::mirror_of(&source_title, target.id, target.is_draft);
            mirror.published = published;
            tracker
                .insert_title(uow, mirror, StateTracking::Keep)
                .await?
        }
    };

    source_title.public_id = Some(target_title.id);
    source_title.publisher_state = PublisherState::Default;
    source_title.published = published;
    tracker
        .save_title(uow, &mut source_title, StateTracking::Keep)
        .await?;
    Ok(Some(source_title))
}

/// Replaces the `language` blocks of `target` with copies of the source's,
/// slot by slot. Target blocks are removed across every target placeholder
/// first, deepest first; source blocks are then copied in tree order into
/// the same-slot target placeholder, which is created when missing.
/// Neither step marks anything dirty.
pub async fn copy_contents(
    uow: &mut dyn ArticleUnitOfWork,
    tracker: &DirtyTracker,
    source: &Article,
    target: &Article,
    language: &LanguageCode,
) -> DomainResult<ContentCopy> {
    let mut outcome = ContentCopy {
        removed_blocks: purge_language(uow, tracker, target.id, language).await?,
        ..ContentCopy::default()
    };

    let mut target_placeholders = uow.list_placeholders(target.id).await?;
    for placeholder in uow.list_placeholders(source.id).await? {
        let blocks = uow.list_blocks(placeholder.id, Some(language)).await?;
        let destination = match target_placeholders
            .iter()
            .find(|p| p.slot == placeholder.slot)
        {
            Some(existing) => existing.clone(),
            None => {
                let created = uow.insert_placeholder(target.id, &placeholder.slot).await?;
                target_placeholders.push(created.clone());
                outcome.created.push(created.clone());
                created
            }
        };
        if blocks.is_empty() {
            continue;
        }
        outcome.copied_blocks += copy_blocks(uow, blocks, &destination).await?;
        tracker.invalidate(destination.id, language);
    }

    debug!(
        source_id = %source.id,
        target_id = %target.id,
        language = %language,
        removed = outcome.removed_blocks,
        copied = outcome.copied_blocks,
        created_placeholders = outcome.created.len(),
        "replicated content"
    );
    Ok(outcome)
}

/// Removes every `language` block from every placeholder of `article_id`
/// without dirty tracking. Returns the number of removed blocks.
pub async fn purge_language(
    uow: &mut dyn ArticleUnitOfWork,
    tracker: &DirtyTracker,
    article_id: ArticleId,
    language: &LanguageCode,
) -> DomainResult<usize> {
    let mut doomed: Vec<ContentBlock> = Vec::new();
    for placeholder in uow.list_placeholders(article_id).await? {
        let blocks = uow.list_blocks(placeholder.id, Some(language)).await?;
        if !blocks.is_empty() {
            tracker.invalidate(placeholder.id, language);
            doomed.extend(blocks);
        }
    }
    if !doomed.is_empty() {
        uow.delete_blocks(&deletion_order(&doomed)).await?;
    }
    Ok(doomed.len())
}

async fn copy_blocks(
    uow: &mut dyn ArticleUnitOfWork,
    blocks: Vec<ContentBlock>,
    destination: &Placeholder,
) -> DomainResult<usize> {
    let mut remapped: HashMap<ContentBlockId, ContentBlockId> = HashMap::new();
    let mut copied = 0;
    for block in tree_order(blocks) {
        // Orphans were ordered as roots and are copied as roots.
        let parent_id = block.parent_id.and_then(|p| remapped.get(&p).copied());
        let copy = uow
            .insert_block(NewContentBlock::copy_of(&block, destination.id, parent_id))
            .await?;
        remapped.insert(block.id, copy.id);
        copied += 1;
    }
    Ok(copied)
}
