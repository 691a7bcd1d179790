use super::{ArticleQueryService, ListFilterQuery};
use crate::{
    application::{dto::ArchiveMonthDto, error::ApplicationResult},
    domain::article::{LanguageCode, PublishedArticleQuery},
};

#[derive(Debug, Clone, Default)]
pub struct ArchiveQuery {
    pub filter: ListFilterQuery,
    pub language: Option<String>,
}

impl ArticleQueryService {
    /// Month buckets of currently visible public articles, newest first.
    pub async fn archive_months(
        &self,
        query: ArchiveQuery,
    ) -> ApplicationResult<Vec<ArchiveMonthDto>> {
        let published = PublishedArticleQuery {
            filter: query.filter.parse()?,
            language: query.language.map(LanguageCode::new).transpose()?,
            archive: None,
            now: self.clock.now(),
            limit: 0,
        };
        let months = self.read_repo.archive_months(&published).await?;
        Ok(months.into_iter().map(Into::into).collect())
    }
}
