// src/domain/article/services/ledger.rs
use tracing::warn;

use crate::domain::article::entity::Article;
use crate::domain::article::ledger::LanguageLedger;
use crate::domain::article::repository::ArticleUnitOfWork;
use crate::domain::article::value_objects::{ArticleId, LanguageCode};
use crate::domain::errors::{DomainError, DomainResult};

/// Appends `language` to the ledger of `article_id` when missing. Ledger
/// upkeep is metadata, so the article is written without dirty tracking.
pub async fn record_language(
    uow: &mut dyn ArticleUnitOfWork,
    article_id: ArticleId,
    language: &LanguageCode,
) -> DomainResult<()> {
    let mut article = load(uow, article_id).await?;
    if article.languages.insert(language.clone()) {
        uow.update_languages(article.id, &article.languages).await?;
    }
    Ok(())
}

pub async fn forget_language(
    uow: &mut dyn ArticleUnitOfWork,
    article_id: ArticleId,
    language: &LanguageCode,
) -> DomainResult<()> {
    let mut article = load(uow, article_id).await?;
    if article.languages.remove(language) {
        uow.update_languages(article.id, &article.languages).await?;
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRepair {
    pub before: LanguageLedger,
    pub after: LanguageLedger,
}

impl LedgerRepair {
    pub fn drifted(&self) -> bool {
        !self.before.same_members(&self.after)
    }
}

/// Recomputes the ledger from the article's titles. Languages already in the
/// ledger keep their position; the rest follow in title creation order.
pub async fn rebuild(
    uow: &mut dyn ArticleUnitOfWork,
    article_id: ArticleId,
) -> DomainResult<LedgerRepair> {
    let mut article = load(uow, article_id).await?;
    let mut titles = uow.list_titles(article_id).await?;
    titles.sort_by_key(|t| (t.creation_date, t.id));

    let present: Vec<&LanguageCode> = titles.iter().map(|t| &t.language).collect();
    let kept = article.languages.iter().filter(|l| present.contains(l));
    let rebuilt = LanguageLedger::rebuild(kept.chain(present.iter().copied()));

    let repair = LedgerRepair {
        before: article.languages.clone(),
        after: rebuilt,
    };
    if repair.drifted() {
        warn!(
            article_id = %article_id,
            before = ?repair.before.to_stored(),
            after = ?repair.after.to_stored(),
            "language ledger drifted from titles; repairing"
        );
    }
    if repair.before != repair.after {
        article.languages = repair.after.clone();
        uow.update_languages(article.id, &article.languages).await?;
    }
    Ok(repair)
}

async fn load(uow: &mut dyn ArticleUnitOfWork, article_id: ArticleId) -> DomainResult<Article> {
    uow.find_article(article_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("article {article_id} not found")))
}
