// src/application/commands/articles/content.rs
use super::{ArticleCommandService, permission::ensure_permitted};
use crate::{
    application::{
        dto::{Actor, ContentBlockDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{
        Article, ArticleId, ArticleUnitOfWork, ContentBlock, ContentBlockId,
        NewContentBlock, Placeholder, PlaceholderSlot, PluginType,
        placeholder::subtree,
        services::pair,
    },
};
use serde_json::Value;

pub struct AddContentCommand {
    pub article_id: i64,
    pub slot: String,
    pub language: String,
    pub plugin_type: String,
    pub parent_id: Option<i64>,
    pub payload: Value,
}

pub struct UpdateContentCommand {
    pub block_id: i64,
    pub payload: Value,
}

pub struct DeleteContentCommand {
    pub block_id: i64,
}

impl ArticleCommandService {
    /// Appends a block after its siblings, under `parent_id` when given.
    pub async fn add_content(
        &self,
        actor: &Actor,
        command: AddContentCommand,
    ) -> ApplicationResult<ContentBlockDto> {
        let id = ArticleId::new(command.article_id)?;
        let language = self.site_language(&command.language)?;
        let slot = PlaceholderSlot::new(command.slot)?;
        let plugin_type = PluginType::new(command.plugin_type)?;

        let mut uow = self.store.begin().await?;
        let article = self.find_draft(uow.as_mut(), id, "edited").await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &article),
            "change",
        )?;
        let placeholder = self.placeholder_for(uow.as_mut(), &article, &slot).await?;

        let siblings = uow.list_blocks(placeholder.id, Some(&language)).await?;
        let (parent_id, depth) = match command.parent_id {
            Some(raw) => {
                let parent_id = ContentBlockId::new(raw)?;
                let parent = siblings.iter().find(|b| b.id == parent_id).ok_or_else(|| {
                    ApplicationError::validation(format!(
                        "parent block {parent_id} is not in {slot} for {language}"
                    ))
                })?;
                (Some(parent_id), parent.depth + 1)
            }
            None => (None, 1),
        };
        let position = siblings
            .iter()
            .filter(|b| b.parent_id == parent_id)
            .map(|b| b.position + 1)
            .max()
            .unwrap_or(0);

        let block = self
            .tracker
            .insert_block(
                uow.as_mut(),
                NewContentBlock {
                    placeholder_id: placeholder.id,
                    parent_id,
                    language,
                    plugin_type,
                    position,
                    depth,
                    payload: command.payload,
                },
            )
            .await?;
        uow.commit().await?;
        Ok(block.into())
    }

    pub async fn update_content(
        &self,
        actor: &Actor,
        command: UpdateContentCommand,
    ) -> ApplicationResult<ContentBlockDto> {
        let block_id = ContentBlockId::new(command.block_id)?;
        let mut uow = self.store.begin().await?;
        let mut block = self.editable_block(uow.as_mut(), actor, block_id).await?;

        block.payload = command.payload;
        self.tracker.save_block(uow.as_mut(), &block).await?;
        uow.commit().await?;
        Ok(block.into())
    }

    /// Deletes a block together with its descendants.
    pub async fn delete_content(
        &self,
        actor: &Actor,
        command: DeleteContentCommand,
    ) -> ApplicationResult<()> {
        let block_id = ContentBlockId::new(command.block_id)?;
        let mut uow = self.store.begin().await?;
        let block = self.editable_block(uow.as_mut(), actor, block_id).await?;

        let blocks = uow
            .list_blocks(block.placeholder_id, Some(&block.language))
            .await?;
        let doomed = subtree(&blocks, block.id);
        self.tracker.delete_blocks(uow.as_mut(), &doomed).await?;
        uow.commit().await?;
        Ok(())
    }

    /// Same-slot placeholder of `article`, created when the template
    /// declares the slot.
    async fn placeholder_for(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        article: &Article,
        slot: &PlaceholderSlot,
    ) -> ApplicationResult<Placeholder> {
        let existing = uow.list_placeholders(article.id).await?;
        if let Some(found) = existing.into_iter().find(|p| &p.slot == slot) {
            return Ok(found);
        }
        let declared = self.declared_slots(&article.template)?;
        if !declared.contains(slot) {
            return Err(ApplicationError::validation(format!(
                "template {} declares no placeholder {slot}",
                article.template
            )));
        }
        let created = pair::rescan_placeholders(uow, article.id, &declared).await?;
        created
            .into_iter()
            .find(|p| &p.slot == slot)
            .ok_or_else(|| ApplicationError::not_found(format!("placeholder {slot}")))
    }

    /// A block owned by a draft the actor may change.
    async fn editable_block(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        actor: &Actor,
        block_id: ContentBlockId,
    ) -> ApplicationResult<ContentBlock> {
        let block = uow
            .find_block(block_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found(format!("block {block_id} not found")))?;
        let placeholder = uow
            .find_placeholder(block.placeholder_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found(format!(
                    "placeholder {} not found",
                    block.placeholder_id
                ))
            })?;
        let article = self
            .find_draft(uow, placeholder.article_id, "edited")
            .await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &article),
            "change",
        )?;
        Ok(block)
    }
}
