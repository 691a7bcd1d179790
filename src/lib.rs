//! Draft/public revision engine for multilingual CMS articles.
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
