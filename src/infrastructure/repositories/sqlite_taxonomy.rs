// src/infrastructure/repositories/sqlite_taxonomy.rs
use super::map_sqlx;
use crate::domain::article::{Attribute, AttributeId, Category, CategoryId, TaxonomyRepository};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

#[derive(Clone)]
pub struct SqliteTaxonomyRepository {
    pool: SqlitePool,
}

impl SqliteTaxonomyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    parent_id: Option<i64>,
    name: String,
}

impl TryFrom<CategoryRow> for Category {
    type Error = DomainError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: CategoryId::new(row.id)?,
            parent_id: row.parent_id.map(CategoryId::new).transpose()?,
            name: row.name,
        })
    }
}

#[derive(Debug, FromRow)]
struct AttributeRow {
    id: i64,
    name: String,
}

impl TryFrom<AttributeRow> for Attribute {
    type Error = DomainError;

    fn try_from(row: AttributeRow) -> Result<Self, Self::Error> {
        Ok(Attribute {
            id: AttributeId::new(row.id)?,
            name: row.name,
        })
    }
}

#[async_trait]
impl TaxonomyRepository for SqliteTaxonomyRepository {
    async fn insert_category(
        &self,
        name: String,
        parent_id: Option<CategoryId>,
    ) -> DomainResult<Category> {
        let row = sqlx::query_as::<_, CategoryRow>(
            "INSERT INTO categories (parent_id, name) VALUES (?, ?) RETURNING id, parent_id, name",
        )
        .bind(parent_id.map(i64::from))
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Category::try_from(row)
    }

    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, parent_id, name FROM categories ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(Category::try_from).collect()
    }

    async fn insert_attribute(&self, name: String) -> DomainResult<Attribute> {
        let row = sqlx::query_as::<_, AttributeRow>(
            "INSERT INTO attributes (name) VALUES (?) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx)?;

        Attribute::try_from(row)
    }

    async fn list_attributes(&self) -> DomainResult<Vec<Attribute>> {
        let rows =
            sqlx::query_as::<_, AttributeRow>("SELECT id, name FROM attributes ORDER BY name, id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx)?;

        rows.into_iter().map(Attribute::try_from).collect()
    }
}
