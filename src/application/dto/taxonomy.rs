use crate::domain::article::{Attribute, Category};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub name: String,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.into(),
            parent_id: category.parent_id.map(i64::from),
            name: category.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeDto {
    pub id: i64,
    pub name: String,
}

impl From<Attribute> for AttributeDto {
    fn from(attribute: Attribute) -> Self {
        Self {
            id: attribute.id.into(),
            name: attribute.name,
        }
    }
}
