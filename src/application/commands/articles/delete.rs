// src/application/commands/articles/delete.rs
use super::{ArticleCommandService, permission::ensure_permitted};
use crate::{
    application::{dto::Actor, error::ApplicationResult},
    domain::article::{ArticleEvent, ArticleId, services::pair},
};
use tracing::info;

pub struct DeleteArticleCommand {
    pub id: i64,
}

impl ArticleCommandService {
    /// Deletes the whole revision pair. Either flavor's id may be given.
    #[tracing::instrument(name = "article.delete", skip_all, fields(article_id = command.id))]
    pub async fn delete_article(
        &self,
        actor: &Actor,
        command: DeleteArticleCommand,
    ) -> ApplicationResult<()> {
        let id = ArticleId::new(command.id)?;
        let mut uow = self.store.begin().await?;
        let article = self.find_article(uow.as_mut(), id).await?;
        ensure_permitted(
            self.permissions.has_delete_permission(actor, &article),
            "delete",
        )?;

        let deleted = pair::delete_pair(uow.as_mut(), &self.tracker, article).await?;
        uow.commit().await?;
        info!(
            draft_id = %deleted.draft_id,
            public_id = ?deleted.public_id.map(i64::from),
            "deleted article"
        );
        self.emit(vec![ArticleEvent::Deleted {
            draft_id: deleted.draft_id,
            public_id: deleted.public_id,
            at: self.clock.now(),
        }]);
        Ok(())
    }
}
