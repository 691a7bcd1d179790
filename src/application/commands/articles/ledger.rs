use super::{ArticleCommandService, permission::ensure_permitted};
use crate::{
    application::{
        dto::{Actor, LedgerRepairDto},
        error::ApplicationResult,
    },
    domain::article::{ArticleId, services::ledger},
};

pub struct RebuildLedgerCommand {
    pub id: i64,
}

impl ArticleCommandService {
    /// Recomputes the language ledger of one article from its titles.
    pub async fn rebuild_ledger(
        &self,
        actor: &Actor,
        command: RebuildLedgerCommand,
    ) -> ApplicationResult<LedgerRepairDto> {
        let id = ArticleId::new(command.id)?;
        let mut uow = self.store.begin().await?;
        let article = self.find_article(uow.as_mut(), id).await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &article),
            "change",
        )?;

        let repair = ledger::rebuild(uow.as_mut(), id).await?;
        uow.commit().await?;
        Ok(repair.into())
    }
}
