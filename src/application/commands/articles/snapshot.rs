use super::ArticleCommandService;
use crate::{
    application::{
        dto::{ArticleDto, PlaceholderDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{
        ArticleId, ArticleUnitOfWork, AttributeId, CategoryId, placeholder::tree_order,
    },
};
use std::collections::BTreeSet;

impl ArticleCommandService {
    /// Reads the article back through the open unit of work so the response
    /// reflects exactly what is about to be committed.
    pub(super) async fn snapshot(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        id: ArticleId,
    ) -> ApplicationResult<ArticleDto> {
        let article = self.find_article(uow, id).await?;
        let titles = uow.list_titles(id).await?;
        let mut placeholders = Vec::new();
        for placeholder in uow.list_placeholders(id).await? {
            let blocks = tree_order(uow.list_blocks(placeholder.id, None).await?);
            placeholders.push(PlaceholderDto::new(placeholder, blocks));
        }
        Ok(ArticleDto::assemble(
            article,
            &titles,
            placeholders,
            &self.columns,
        ))
    }

    /// Rejects category or attribute ids that do not exist.
    pub(super) async fn ensure_taxonomy(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        categories: &BTreeSet<CategoryId>,
        attributes: &BTreeSet<AttributeId>,
    ) -> ApplicationResult<()> {
        let categories = uow.missing_categories(categories).await?;
        if !categories.is_empty() {
            return Err(ApplicationError::validation(format!(
                "unknown categories: {}",
                join_ids(&categories)
            )));
        }
        let attributes = uow.missing_attributes(attributes).await?;
        if !attributes.is_empty() {
            return Err(ApplicationError::validation(format!(
                "unknown attributes: {}",
                join_ids(&attributes)
            )));
        }
        Ok(())
    }
}

fn join_ids<T: std::fmt::Display>(ids: &[T]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
