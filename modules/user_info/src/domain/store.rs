//! The entity state store: five asynchronous CRUD operations reconciled into
//! one observable state snapshot.
//!
//! The store is constructed with its remote-access dependency and observed
//! through a `watch` channel; there is no ambient singleton. Each operation
//! class (reads, writes) draws a monotonically increasing token when it
//! starts, and a completion whose token is older than the last accepted one
//! mutates nothing, so an out-of-order network completion cannot overwrite
//! newer state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use nav_core::{Page, PageQuery};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::contract::client::UserInfoApi;
use crate::contract::error::UserInfoError;
use crate::contract::model::{UserInfo, UserInfoPatch};

/// Snapshot of the client-side entity state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityState {
    /// Current list page, in server order.
    pub entities: Vec<UserInfo>,
    /// Selected/edited entity; `None` means "empty".
    pub entity: Option<UserInfo>,
    /// A read (list/search/get) is in flight.
    pub loading: bool,
    /// A write (create/update/delete) is in flight.
    pub updating: bool,
    /// True exactly when the most recent write completed; reset on the next
    /// operation start.
    pub update_success: bool,
    /// Last error, rendered verbatim.
    pub error_message: Option<String>,
    /// Backend-reported total for the current query.
    pub total_items: u64,
}

/// Monotonic request tokens for one class of operations. `issue` hands out
/// the next token; `accept` commits it unless a newer token has already been
/// accepted.
#[derive(Debug, Default)]
struct OpSequence {
    issued: AtomicU64,
    accepted: AtomicU64,
}

impl OpSequence {
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn accept(&self, token: u64) -> bool {
        self.accepted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (token > current).then_some(token)
            })
            .is_ok()
    }
}

struct Inner {
    api: Arc<dyn UserInfoApi>,
    state: watch::Sender<EntityState>,
    reads: OpSequence,
    writes: OpSequence,
}

/// Reconciled client state for the user-infos resource.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct UserInfoStore {
    inner: Arc<Inner>,
}

impl UserInfoStore {
    pub fn new(api: Arc<dyn UserInfoApi>) -> Self {
        let (state, _) = watch::channel(EntityState::default());
        Self {
            inner: Arc::new(Inner {
                api,
                state,
                reads: OpSequence::default(),
                writes: OpSequence::default(),
            }),
        }
    }

    /// Observe state changes. The receiver always yields the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<EntityState> {
        self.inner.state.subscribe()
    }

    /// Current snapshot.
    pub fn state(&self) -> EntityState {
        self.inner.state.borrow().clone()
    }

    /// Restore the all-empty defaults (used when opening a "create new" form).
    pub fn reset(&self) {
        self.inner.state.send_modify(|s| *s = EntityState::default());
    }

    /// Fetch one page of entities.
    #[instrument(name = "user_info.store.fetch_list", skip_all)]
    pub async fn fetch_list(&self, query: &PageQuery) -> Result<Page<UserInfo>, UserInfoError> {
        let token = self.begin_read();
        let result = self.inner.api.list(query).await;
        self.finish_list(token, &result);
        result
    }

    /// Free-text search; replaces the list page the same way `fetch_list`
    /// does.
    #[instrument(name = "user_info.store.search", skip_all, fields(term = %term))]
    pub async fn search(
        &self,
        term: &str,
        query: &PageQuery,
    ) -> Result<Page<UserInfo>, UserInfoError> {
        let token = self.begin_read();
        let result = self.inner.api.search(term, query).await;
        self.finish_list(token, &result);
        result
    }

    /// Fetch a single entity into the selected slot.
    #[instrument(name = "user_info.store.fetch_one", skip_all, fields(id = %id))]
    pub async fn fetch_one(&self, id: i64) -> Result<UserInfo, UserInfoError> {
        let token = self.begin_read();
        let result = self.inner.api.get(id).await;
        match &result {
            Ok(entity) => {
                let entity = entity.clone();
                self.commit_read(token, |s| {
                    s.loading = false;
                    s.entity = Some(entity);
                });
            }
            Err(error) => self.fail(&self.inner.reads, token, error),
        }
        result
    }

    /// Create a record. On success the backing list is refreshed as a
    /// secondary task.
    #[instrument(name = "user_info.store.create", skip_all, fields(user_id = %draft.user_id))]
    pub async fn create(&self, draft: UserInfo) -> Result<UserInfo, UserInfoError> {
        let token = self.begin_write();
        let result = self.inner.api.create(&draft).await;
        self.finish_write(token, &result);
        result
    }

    /// Replace a record (full body).
    #[instrument(name = "user_info.store.update", skip_all, fields(id = ?entity.id))]
    pub async fn update(&self, entity: UserInfo) -> Result<UserInfo, UserInfoError> {
        let token = self.begin_write();
        let result = self.inner.api.update(&entity).await;
        self.finish_write(token, &result);
        result
    }

    /// Merge-patch a record.
    #[instrument(name = "user_info.store.partial_update", skip_all, fields(id = %id))]
    pub async fn partial_update(
        &self,
        id: i64,
        patch: UserInfoPatch,
    ) -> Result<UserInfo, UserInfoError> {
        let token = self.begin_write();
        let result = self.inner.api.partial_update(id, &patch).await;
        self.finish_write(token, &result);
        result
    }

    /// Delete a record; clears the selected entity and refreshes the list.
    #[instrument(name = "user_info.store.delete", skip_all, fields(id = %id))]
    pub async fn delete(&self, id: i64) -> Result<(), UserInfoError> {
        let token = self.begin_write();
        let result = self.inner.api.delete(id).await;
        match &result {
            Ok(()) => {
                if self.commit_write(token, |s| {
                    s.updating = false;
                    s.update_success = true;
                    s.entity = None;
                }) {
                    self.spawn_list_refresh();
                }
            }
            Err(error) => self.fail(&self.inner.writes, token, error),
        }
        result
    }

    // --- lifecycle plumbing ---

    fn begin_read(&self) -> u64 {
        self.inner.state.send_modify(|s| {
            s.loading = true;
            s.error_message = None;
            s.update_success = false;
        });
        self.inner.reads.issue()
    }

    fn begin_write(&self) -> u64 {
        self.inner.state.send_modify(|s| {
            s.updating = true;
            s.error_message = None;
            s.update_success = false;
        });
        self.inner.writes.issue()
    }

    fn finish_list(&self, token: u64, result: &Result<Page<UserInfo>, UserInfoError>) {
        match result {
            Ok(page) => {
                let entities = page.items.clone();
                let total = page.total;
                self.commit_read(token, |s| {
                    s.loading = false;
                    s.entities = entities;
                    s.total_items = total;
                });
            }
            Err(error) => self.fail(&self.inner.reads, token, error),
        }
    }

    fn finish_write(&self, token: u64, result: &Result<UserInfo, UserInfoError>) {
        match result {
            Ok(entity) => {
                let entity = entity.clone();
                if self.commit_write(token, |s| {
                    s.updating = false;
                    s.loading = false;
                    s.update_success = true;
                    s.entity = Some(entity);
                }) {
                    self.spawn_list_refresh();
                }
            }
            Err(error) => self.fail(&self.inner.writes, token, error),
        }
    }

    fn commit_read(&self, token: u64, apply: impl FnOnce(&mut EntityState)) -> bool {
        if !self.inner.reads.accept(token) {
            debug!(token, "discarding stale read completion");
            return false;
        }
        self.inner.state.send_modify(apply);
        true
    }

    fn commit_write(&self, token: u64, apply: impl FnOnce(&mut EntityState)) -> bool {
        if !self.inner.writes.accept(token) {
            debug!(token, "discarding stale write completion");
            return false;
        }
        self.inner.state.send_modify(apply);
        true
    }

    fn fail(&self, seq: &OpSequence, token: u64, error: &UserInfoError) {
        if !seq.accept(token) {
            debug!(token, %error, "discarding stale failed completion");
            return;
        }
        let message = error.to_string();
        self.inner.state.send_modify(|s| {
            s.loading = false;
            s.updating = false;
            s.error_message = Some(message);
        });
    }

    /// Refresh the backing list with empty parameters after a successful
    /// write, so an already-open list view converges. Runs as its own task;
    /// the write's completion signal is not delayed by it.
    fn spawn_list_refresh(&self) {
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(error) = store.fetch_list(&PageQuery::empty()).await {
                warn!(%error, "post-write list refresh failed");
            }
        });
    }
}
