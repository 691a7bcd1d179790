mod content;
mod create;
mod delete;
mod ledger;
mod permission;
mod publish;
mod service;
mod snapshot;
mod titles;
mod update;

pub use content::{AddContentCommand, DeleteContentCommand, UpdateContentCommand};
pub use create::{CreateArticleCommand, CreateArticleCommandBuilder};
pub use delete::DeleteArticleCommand;
pub use ledger::RebuildLedgerCommand;
pub use publish::{PublishCommand, RevertCommand, UnpublishCommand};
pub use service::{ArticleCommandService, ArticleEngine};
pub use titles::{DeleteTitleCommand, SetTitleCommand};
pub use update::UpdateArticleCommand;
