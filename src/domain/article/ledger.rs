// src/domain/article/ledger.rs
use crate::domain::article::value_objects::LanguageCode;
use crate::domain::errors::DomainResult;

/// Denormalized, insertion-ordered set of the languages that have a Title on
/// an article. Persisted comma-joined; never authoritative over the Titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageLedger(Vec<LanguageCode>);

impl LanguageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(stored: Option<&str>) -> DomainResult<Self> {
        let mut ledger = Self::new();
        if let Some(raw) = stored {
            for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                ledger.insert(LanguageCode::new(part)?);
            }
        }
        Ok(ledger)
    }

    /// Rebuilds the ledger from the languages of existing Titles, keeping the
    /// order they are given in.
    pub fn rebuild<'a>(languages: impl IntoIterator<Item = &'a LanguageCode>) -> Self {
        let mut ledger = Self::new();
        for language in languages {
            ledger.insert(language.clone());
        }
        ledger
    }

    pub fn contains(&self, language: &LanguageCode) -> bool {
        self.0.iter().any(|l| l == language)
    }

    /// Returns `true` when the language was not present.
    pub fn insert(&mut self, language: LanguageCode) -> bool {
        if self.contains(&language) {
            return false;
        }
        self.0.push(language);
        true
    }

    /// Returns `true` when the language was present.
    pub fn remove(&mut self, language: &LanguageCode) -> bool {
        let before = self.0.len();
        self.0.retain(|l| l != language);
        before != self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LanguageCode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same members regardless of order.
    pub fn same_members(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().all(|l| other.contains(l))
    }

    pub fn to_stored(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            Some(
                self.0
                    .iter()
                    .map(LanguageCode::as_str)
                    .collect::<Vec<_>>()
                    .join(","),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::new(code).unwrap()
    }

    #[test]
    fn keeps_insertion_order_and_ignores_duplicates() {
        let mut ledger = LanguageLedger::new();
        assert!(ledger.insert(lang("fr")));
        assert!(ledger.insert(lang("en")));
        assert!(!ledger.insert(lang("fr")));
        assert_eq!(ledger.to_stored().as_deref(), Some("fr,en"));
    }

    #[test]
    fn removing_last_language_stores_nothing() {
        let mut ledger = LanguageLedger::parse(Some("en")).unwrap();
        assert!(ledger.remove(&lang("en")));
        assert!(!ledger.remove(&lang("en")));
        assert_eq!(ledger.to_stored(), None);
    }

    #[test]
    fn parse_tolerates_blank_entries() {
        let ledger = LanguageLedger::parse(Some("en,,de, ")).unwrap();
        assert_eq!(ledger.len(), 2);
        assert!(ledger.contains(&lang("de")));
    }

    #[test]
    fn rebuild_matches_regardless_of_order() {
        let stored = LanguageLedger::parse(Some("de,en")).unwrap();
        let titles = [lang("en"), lang("de")];
        let rebuilt = LanguageLedger::rebuild(titles.iter());
        assert!(stored.same_members(&rebuilt));
        assert_ne!(stored, rebuilt);
    }
}
