// src/config.rs
use crate::application::dto::Actor;
use crate::domain::{
    actor::{Role, UserId},
    article::{LanguageCode, PlaceholderSlot, SiteId, TemplateName},
};
use std::{collections::HashMap, env};
use thiserror::Error;

pub type TemplateSlots = Vec<(TemplateName, Vec<PlaceholderSlot>)>;

#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    site_id: SiteId,
    languages: Vec<LanguageCode>,
    templates: TemplateSlots,
    slug_date_format: String,
    api_keys: HashMap<String, Actor>,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_database_url() -> String {
    "sqlite://cms_articles.db?mode=rwc".into()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_templates() -> String {
    "cms_articles/default.html=content".into()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".into()]
}

fn invalid(key: &str, detail: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid(format!("{key}: {detail}"))
}

/// `en,de` in fallback order, duplicates rejected.
fn parse_languages(raw: &str) -> Result<Vec<LanguageCode>, ConfigError> {
    let mut languages: Vec<LanguageCode> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let language = LanguageCode::new(part).map_err(|e| invalid("LANGUAGES", e))?;
        if languages.contains(&language) {
            return Err(invalid("LANGUAGES", format!("{language} is listed twice")));
        }
        languages.push(language);
    }
    if languages.is_empty() {
        return Err(invalid("LANGUAGES", "at least one language is required"));
    }
    Ok(languages)
}

/// `name=slot1,slot2;name2=slot`.
fn parse_templates(raw: &str) -> Result<TemplateSlots, ConfigError> {
    let mut templates: TemplateSlots = Vec::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, slots) = entry
            .split_once('=')
            .ok_or_else(|| invalid("ARTICLE_TEMPLATES", format!("'{entry}' has no '='")))?;
        let name = TemplateName::new(name.trim()).map_err(|e| invalid("ARTICLE_TEMPLATES", e))?;
        if templates.iter().any(|(known, _)| known == &name) {
            return Err(invalid(
                "ARTICLE_TEMPLATES",
                format!("{name} is declared twice"),
            ));
        }
        let slots = slots
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PlaceholderSlot::new)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid("ARTICLE_TEMPLATES", e))?;
        templates.push((name, slots));
    }
    if templates.is_empty() {
        return Err(invalid("ARTICLE_TEMPLATES", "at least one template is required"));
    }
    Ok(templates)
}

/// `token=id:username:role;...`.
fn parse_api_keys(raw: &str) -> Result<HashMap<String, Actor>, ConfigError> {
    let mut keys = HashMap::new();
    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (token, identity) = entry
            .split_once('=')
            .ok_or_else(|| invalid("API_KEYS", "expected token=id:username:role"))?;
        let mut parts = identity.splitn(3, ':');
        let (Some(id), Some(username), Some(role)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid("API_KEYS", "expected token=id:username:role"));
        };
        let id = id
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid("API_KEYS", e))
            .and_then(|id| UserId::new(id).map_err(|e| invalid("API_KEYS", e)))?;
        let role = role
            .trim()
            .parse::<Role>()
            .map_err(|e| invalid("API_KEYS", e))?;
        let token = token.trim();
        if token.is_empty() || username.trim().is_empty() {
            return Err(invalid("API_KEYS", "token and username cannot be empty"));
        }
        keys.insert(token.to_string(), Actor::new(id, username.trim(), role));
    }
    Ok(keys)
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(default_database_url);
        let listen_addr = lookup("LISTEN_ADDR").unwrap_or_else(default_listen_addr);

        let site_id = match lookup("SITE_ID") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|e| invalid("SITE_ID", e))
                .and_then(|id| SiteId::new(id).map_err(|e| invalid("SITE_ID", e)))?,
            None => SiteId(1),
        };

        let languages = parse_languages(&lookup("LANGUAGES").unwrap_or_else(|| "en".into()))?;
        let templates = parse_templates(
            &lookup("ARTICLE_TEMPLATES").unwrap_or_else(default_templates),
        )?;
        let slug_date_format = lookup("SLUG_DATE_FORMAT").unwrap_or_else(|| "%Y-%m".into());
        let api_keys = parse_api_keys(&lookup("API_KEYS").unwrap_or_default())?;

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_else(default_allowed_origins);

        Ok(Self {
            database_url,
            listen_addr,
            site_id,
            languages,
            templates,
            slug_date_format,
            api_keys,
            allowed_origins,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn site_id(&self) -> SiteId {
        self.site_id
    }

    pub fn languages(&self) -> &[LanguageCode] {
        &self.languages
    }

    pub fn templates(&self) -> &TemplateSlots {
        &self.templates
    }

    pub fn slug_date_format(&self) -> &str {
        &self.slug_date_format
    }

    pub fn api_keys(&self) -> &HashMap<String, Actor> {
        &self.api_keys
    }

    /// Return the allowed CORS origins as configured.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.database_url(), "sqlite://cms_articles.db?mode=rwc");
        assert_eq!(config.site_id(), SiteId(1));
        assert_eq!(config.languages().len(), 1);
        assert_eq!(config.templates()[0].0.as_str(), "cms_articles/default.html");
        assert_eq!(config.slug_date_format(), "%Y-%m");
        assert!(config.api_keys().is_empty());
    }

    #[test]
    fn parses_templates_languages_and_keys() {
        let config = config(&[
            ("LANGUAGES", "en, de ,fr"),
            ("ARTICLE_TEMPLATES", "a.html=content,sidebar; b.html=content"),
            ("API_KEYS", "s3cret=3:alice:editor;t0k=9:bob:author"),
        ])
        .unwrap();

        let languages: Vec<&str> = config.languages().iter().map(|l| l.as_str()).collect();
        assert_eq!(languages, ["en", "de", "fr"]);
        assert_eq!(config.templates()[0].1.len(), 2);
        assert_eq!(config.api_keys()["s3cret"].role, Role::Editor);
        assert_eq!(config.api_keys()["t0k"].username, "bob");
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            config(&[("SITE_ID", "zero")]),
            Err(ConfigError::Invalid(_))
        ));
        assert!(config(&[("LANGUAGES", "en,en")]).is_err());
        assert!(config(&[("ARTICLE_TEMPLATES", "nothing")]).is_err());
        assert!(config(&[("API_KEYS", "k=1:ann:owner")]).is_err());
    }
}
