use std::sync::Arc;

use crate::contract::error::UserInfoError;
use crate::contract::model::UserInfo;
use crate::domain::store::UserInfoStore;
use crate::ui::nav::Navigator;

/// Controller for the delete-confirmation dialog.
pub struct DeleteController {
    store: UserInfoStore,
    nav: Arc<dyn Navigator>,
    return_to: String,
}

impl DeleteController {
    pub fn new(store: UserInfoStore, nav: Arc<dyn Navigator>, return_to: impl Into<String>) -> Self {
        Self {
            store,
            nav,
            return_to: return_to.into(),
        }
    }

    /// Load the record so the dialog can show what is about to be deleted.
    pub async fn open(&self, id: i64) -> Result<UserInfo, UserInfoError> {
        self.store.fetch_one(id).await
    }

    /// Issue the delete and navigate back to the list on success.
    pub async fn confirm(&self, id: i64) -> Result<(), UserInfoError> {
        self.store.delete(id).await?;
        self.nav.navigate(self.return_to.clone());
        Ok(())
    }
}
