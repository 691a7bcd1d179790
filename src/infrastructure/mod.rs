pub mod cache;
pub mod database;
pub mod events;
pub mod permissions;
pub mod repositories;
pub mod security;
pub mod templates;
pub mod time;
pub mod util;
