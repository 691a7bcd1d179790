// src/application/ports/mod.rs
pub mod cache;
pub mod events;
pub mod permissions;
pub mod security;
pub mod templates;
pub mod time;
pub mod util;

