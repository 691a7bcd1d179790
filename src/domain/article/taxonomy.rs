use crate::domain::article::value_objects::{AttributeId, CategoryId};
use crate::domain::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub parent_id: Option<CategoryId>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub id: AttributeId,
    pub name: String,
}

pub fn validate_taxonomy_name(name: &str) -> DomainResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::Validation("name cannot be empty".into()));
    }
    if name.chars().count() > 255 {
        return Err(DomainError::Validation(
            "name is limited to 255 characters".into(),
        ));
    }
    Ok(name.to_string())
}
