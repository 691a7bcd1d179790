use crate::domain::article::{
    Article, ArchiveMonth, ContentBlock, LanguageCode, Placeholder, RevisionState, Title,
    services::ledger::LedgerRepair,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::serde_time;

/// Per-language revision state shown next to an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageStatus {
    Unpublished,
    Dirty,
    Clean,
    Missing,
}

impl From<RevisionState> for LanguageStatus {
    fn from(value: RevisionState) -> Self {
        match value {
            RevisionState::Unpublished => LanguageStatus::Unpublished,
            RevisionState::Dirty => LanguageStatus::Dirty,
            RevisionState::Clean => LanguageStatus::Clean,
        }
    }
}

/// One status column per configured language, fixed at startup.
#[derive(Debug, Clone)]
pub struct LanguageColumns {
    languages: Vec<LanguageCode>,
}

impl LanguageColumns {
    pub fn new(languages: Vec<LanguageCode>) -> Self {
        Self { languages }
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    pub fn render(&self, titles: &[Title]) -> BTreeMap<String, LanguageStatus> {
        self.languages
            .iter()
            .map(|language| {
                let status = titles
                    .iter()
                    .find(|t| &t.language == language)
                    .map(|t| LanguageStatus::from(t.revision_state()))
                    .unwrap_or(LanguageStatus::Missing);
                (language.to_string(), status)
            })
            .collect()
    }

    /// The title for `language`, else the first configured language that
    /// has one, else any title.
    pub fn pick<'a>(
        &self,
        titles: &'a [Title],
        language: Option<&LanguageCode>,
    ) -> Option<&'a Title> {
        language
            .into_iter()
            .chain(self.languages.iter())
            .find_map(|l| titles.iter().find(|t| &t.language == l))
            .or_else(|| titles.first())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TitleDto {
    pub id: i64,
    pub language: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub page_title: String,
    pub menu_title: String,
    pub meta_description: String,
    #[serde(default)]
    pub image_id: Option<i64>,
    pub published: bool,
    pub publisher_state: i64,
    pub state: RevisionState,
    #[serde(default)]
    pub public_id: Option<i64>,
    #[serde(with = "serde_time")]
    pub creation_date: DateTime<Utc>,
}

impl From<&Title> for TitleDto {
    fn from(title: &Title) -> Self {
        Self {
            id: title.id.into(),
            language: title.language.to_string(),
            title: title.title.to_string(),
            slug: title.slug.to_string(),
            description: title.description.clone(),
            page_title: title.page_title_or_title().to_string(),
            menu_title: title.menu_title_or_title().to_string(),
            meta_description: title.meta_description_or_description(),
            image_id: title.image_id.map(i64::from),
            published: title.published,
            publisher_state: title.publisher_state.code(),
            state: title.revision_state(),
            public_id: title.public_id.map(i64::from),
            creation_date: title.creation_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentBlockDto {
    pub id: i64,
    pub placeholder_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub language: String,
    pub plugin_type: String,
    pub position: i64,
    pub depth: i64,
    pub payload: Value,
}

impl From<ContentBlock> for ContentBlockDto {
    fn from(block: ContentBlock) -> Self {
        Self {
            id: block.id.into(),
            placeholder_id: block.placeholder_id.into(),
            parent_id: block.parent_id.map(i64::from),
            language: block.language.to_string(),
            plugin_type: block.plugin_type.to_string(),
            position: block.position,
            depth: block.depth,
            payload: block.payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderDto {
    pub id: i64,
    pub slot: String,
    pub blocks: Vec<ContentBlockDto>,
}

impl PlaceholderDto {
    /// `blocks` are expected in tree order.
    pub fn new(placeholder: Placeholder, blocks: Vec<ContentBlock>) -> Self {
        Self {
            id: placeholder.id.into(),
            slot: placeholder.slot.to_string(),
            blocks: blocks.into_iter().map(ContentBlockDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleDto {
    pub id: i64,
    pub is_draft: bool,
    #[serde(default)]
    pub public_id: Option<i64>,
    pub tree_id: i64,
    pub template: String,
    pub languages: Vec<String>,
    pub categories: Vec<i64>,
    pub attributes: Vec<i64>,
    pub login_required: bool,
    pub created_by: String,
    pub changed_by: String,
    #[serde(with = "serde_time")]
    pub creation_date: DateTime<Utc>,
    #[serde(with = "serde_time")]
    pub changed_date: DateTime<Utc>,
    #[serde(default, with = "serde_time::option")]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default, with = "serde_time::option")]
    pub publication_end_date: Option<DateTime<Utc>>,
    #[serde(with = "serde_time")]
    pub order_date: DateTime<Utc>,
    pub titles: Vec<TitleDto>,
    pub placeholders: Vec<PlaceholderDto>,
    pub status: BTreeMap<String, LanguageStatus>,
}

impl ArticleDto {
    pub fn assemble(
        article: Article,
        titles: &[Title],
        placeholders: Vec<PlaceholderDto>,
        columns: &LanguageColumns,
    ) -> Self {
        Self {
            id: article.id.into(),
            is_draft: article.is_draft,
            public_id: article.public_id.map(i64::from),
            tree_id: article.tree_id.into(),
            template: article.template.to_string(),
            languages: article.languages.iter().map(|l| l.to_string()).collect(),
            categories: article.categories.iter().map(|c| i64::from(*c)).collect(),
            attributes: article.attributes.iter().map(|a| i64::from(*a)).collect(),
            login_required: article.login_required,
            created_by: article.created_by.to_string(),
            changed_by: article.changed_by.to_string(),
            creation_date: article.creation_date,
            changed_date: article.changed_date,
            publication_date: article.publication_date,
            publication_end_date: article.publication_end_date,
            order_date: article.order_date,
            titles: titles.iter().map(TitleDto::from).collect(),
            placeholders,
            status: columns.render(titles),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummaryDto {
    pub id: i64,
    #[serde(default)]
    pub public_id: Option<i64>,
    pub tree_id: i64,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(with = "serde_time")]
    pub order_date: DateTime<Utc>,
    #[serde(default, with = "serde_time::option")]
    pub publication_date: Option<DateTime<Utc>>,
    pub status: BTreeMap<String, LanguageStatus>,
}

impl ArticleSummaryDto {
    pub fn assemble(
        article: &Article,
        titles: &[Title],
        language: Option<&LanguageCode>,
        columns: &LanguageColumns,
    ) -> Self {
        let title = columns.pick(titles, language);
        Self {
            id: article.id.into(),
            public_id: article.public_id.map(i64::from),
            tree_id: article.tree_id.into(),
            language: title.map(|t| t.language.to_string()),
            title: title.map(|t| t.title.to_string()),
            slug: title.map(|t| t.slug.to_string()),
            order_date: article.order_date,
            publication_date: article.publication_date,
            status: columns.render(titles),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMonthDto {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

impl From<ArchiveMonth> for ArchiveMonthDto {
    fn from(value: ArchiveMonth) -> Self {
        Self {
            year: value.year,
            month: value.month,
            count: value.count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRepairDto {
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub drifted: bool,
}

impl From<LedgerRepair> for LedgerRepairDto {
    fn from(value: LedgerRepair) -> Self {
        Self {
            drifted: value.drifted(),
            before: value.before.iter().map(|l| l.to_string()).collect(),
            after: value.after.iter().map(|l| l.to_string()).collect(),
        }
    }
}
