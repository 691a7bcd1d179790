pub mod articles;
pub mod taxonomy;
