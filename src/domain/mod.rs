pub mod actor;
pub mod article;
pub mod errors;
