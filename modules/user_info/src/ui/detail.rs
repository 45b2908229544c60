use crate::contract::error::UserInfoError;
use crate::contract::model::UserInfo;
use crate::domain::store::UserInfoStore;

/// Controller for the read-only detail view.
pub struct DetailController {
    store: UserInfoStore,
}

impl DetailController {
    pub fn new(store: UserInfoStore) -> Self {
        Self { store }
    }

    /// Load the record into the selected slot for display.
    pub async fn load(&self, id: i64) -> Result<UserInfo, UserInfoError> {
        self.store.fetch_one(id).await
    }
}
