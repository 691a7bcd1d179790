use crate::application::error::{ApplicationError, ApplicationResult};

/// Turns a permission oracle answer into a `Forbidden` error.
pub(super) fn ensure_permitted(granted: bool, action: &str) -> ApplicationResult<()> {
    if granted {
        Ok(())
    } else {
        Err(ApplicationError::denied(action))
    }
}
