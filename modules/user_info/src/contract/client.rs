use async_trait::async_trait;
use nav_core::{Page, PageQuery};

use crate::contract::error::UserInfoError;
use crate::contract::model::{UserInfo, UserInfoPatch};

/// Remote access surface of the user-infos backend.
///
/// Implementations are thin request issuers: no retries, no caching. The
/// entity state store owns reconciliation on top of this trait.
#[async_trait]
pub trait UserInfoApi: Send + Sync {
    /// Fetch one page of user infos.
    async fn list(&self, query: &PageQuery) -> Result<Page<UserInfo>, UserInfoError>;

    /// Free-text search, routed to the `_search` endpoint.
    async fn search(&self, term: &str, query: &PageQuery) -> Result<Page<UserInfo>, UserInfoError>;

    /// Fetch a single record by id.
    async fn get(&self, id: i64) -> Result<UserInfo, UserInfoError>;

    /// Create a record; the returned record carries the assigned id.
    async fn create(&self, draft: &UserInfo) -> Result<UserInfo, UserInfoError>;

    /// Replace a record (full body, `id` taken from the entity).
    async fn update(&self, entity: &UserInfo) -> Result<UserInfo, UserInfoError>;

    /// Merge-patch a record.
    async fn partial_update(
        &self,
        id: i64,
        patch: &UserInfoPatch,
    ) -> Result<UserInfo, UserInfoError>;

    /// Delete a record by id.
    async fn delete(&self, id: i64) -> Result<(), UserInfoError>;
}
