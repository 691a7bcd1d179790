// src/domain/article/listing.rs
use crate::domain::article::value_objects::{CategoryId, LanguageCode, TreeId};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, NaiveDate, Utc};

/// Which published articles a list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleListFilter {
    /// Articles mounted under `tree_id`, optionally restricted to a category.
    ByTreeAndCategory {
        tree_id: TreeId,
        category_id: Option<CategoryId>,
    },
    /// Articles in `category_id` or any category below it.
    ByCategoryWithSubcategories { category_id: CategoryId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl ArchiveDate {
    /// Day without month is meaningless and is rejected.
    pub fn new(year: i32, month: Option<u32>, day: Option<u32>) -> DomainResult<Self> {
        if day.is_some() && month.is_none() {
            return Err(DomainError::Validation(
                "archive day requires a month".into(),
            ));
        }
        if NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)).is_none() {
            return Err(DomainError::Validation("invalid archive date".into()));
        }
        Ok(Self { year, month, day })
    }

    pub fn matches(&self, at: DateTime<Utc>) -> bool {
        use chrono::Datelike;
        at.year() == self.year
            && self.month.is_none_or(|m| at.month() == m)
            && self.day.is_none_or(|d| at.day() == d)
    }
}

#[derive(Debug, Clone)]
pub struct PublishedArticleQuery {
    pub filter: Option<ArticleListFilter>,
    pub language: Option<LanguageCode>,
    pub archive: Option<ArchiveDate>,
    pub now: DateTime<Utc>,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveMonth {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

/// Which flavor of titles a slug lookup considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugLookup {
    Draft,
    Preview,
    Public,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn archive_requires_month_for_day() {
        assert!(ArchiveDate::new(2024, None, Some(3)).is_err());
        assert!(ArchiveDate::new(2024, Some(2), Some(30)).is_err());
        assert!(ArchiveDate::new(2024, Some(2), Some(29)).is_ok());
    }

    #[test]
    fn archive_matches_partial_dates() {
        let at = Utc.with_ymd_and_hms(2024, 5, 17, 10, 0, 0).unwrap();
        assert!(ArchiveDate::new(2024, None, None).unwrap().matches(at));
        assert!(ArchiveDate::new(2024, Some(5), None).unwrap().matches(at));
        assert!(!ArchiveDate::new(2024, Some(5), Some(18)).unwrap().matches(at));
        assert!(!ArchiveDate::new(2023, None, None).unwrap().matches(at));
    }
}
