// src/application/commands/taxonomy.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::{Actor, AttributeDto, CategoryDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{CategoryId, TaxonomyRepository, taxonomy::validate_taxonomy_name},
};

pub struct CreateCategoryCommand {
    pub name: String,
    pub parent_id: Option<i64>,
}

pub struct CreateAttributeCommand {
    pub name: String,
}

/// Categories and attributes articles can be tagged with.
pub struct TaxonomyService {
    repo: Arc<dyn TaxonomyRepository>,
}

impl TaxonomyService {
    pub fn new(repo: Arc<dyn TaxonomyRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_category(
        &self,
        actor: &Actor,
        command: CreateCategoryCommand,
    ) -> ApplicationResult<CategoryDto> {
        ensure_capability(actor, "taxonomy", "change")?;
        let name = validate_taxonomy_name(&command.name)?;
        let parent_id = command.parent_id.map(CategoryId::new).transpose()?;
        if let Some(parent_id) = parent_id {
            let known = self.repo.list_categories().await?;
            if !known.iter().any(|c| c.id == parent_id) {
                return Err(ApplicationError::validation(format!(
                    "unknown parent category {parent_id}"
                )));
            }
        }
        Ok(self.repo.insert_category(name, parent_id).await?.into())
    }

    pub async fn list_categories(&self) -> ApplicationResult<Vec<CategoryDto>> {
        let categories = self.repo.list_categories().await?;
        Ok(categories.into_iter().map(CategoryDto::from).collect())
    }

    pub async fn create_attribute(
        &self,
        actor: &Actor,
        command: CreateAttributeCommand,
    ) -> ApplicationResult<AttributeDto> {
        ensure_capability(actor, "taxonomy", "change")?;
        let name = validate_taxonomy_name(&command.name)?;
        Ok(self.repo.insert_attribute(name).await?.into())
    }

    pub async fn list_attributes(&self) -> ApplicationResult<Vec<AttributeDto>> {
        let attributes = self.repo.list_attributes().await?;
        Ok(attributes.into_iter().map(AttributeDto::from).collect())
    }
}

fn ensure_capability(actor: &Actor, resource: &str, action: &str) -> ApplicationResult<()> {
    if actor.has_capability(resource, action) {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(format!(
            "missing capability {resource}:{action}"
        )))
    }
}
