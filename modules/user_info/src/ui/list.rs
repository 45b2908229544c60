use std::sync::Arc;

use nav_core::{Page, PageQuery, PaginationState};
use tracing::instrument;

use crate::config::UserInfoClientConfig;
use crate::contract::error::UserInfoError;
use crate::contract::model::UserInfo;
use crate::domain::store::UserInfoStore;
use crate::ui::nav::{query_of, Navigator};

/// Controller for the paginated, sortable, searchable list view.
///
/// Pagination state is derived from the navigational location at
/// construction and written back after every fetch, so the view stays
/// bookmarkable. Every parameter change issues exactly one fetch: `search`
/// when a term is set, `list` otherwise.
pub struct ListController {
    store: UserInfoStore,
    nav: Arc<dyn Navigator>,
    path: String,
    pagination: PaginationState,
    search: String,
}

impl ListController {
    pub fn new(
        store: UserInfoStore,
        nav: Arc<dyn Navigator>,
        path: impl Into<String>,
        config: &UserInfoClientConfig,
    ) -> Self {
        let pagination = PaginationState::new(config.page_size, config.sort_field.clone())
            .with_query_params(query_of(&nav.location()));
        Self {
            store,
            nav,
            path: path.into(),
            pagination,
            search: String::new(),
        }
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    /// The list location for the current parameters; forms and dialogs
    /// navigate back to this.
    pub fn location(&self) -> String {
        format!("{}?{}", self.path, self.pagination.query_string())
    }

    /// Fetch the current page and reflect the parameters into the location.
    #[instrument(name = "user_info.list.refresh", skip_all)]
    pub async fn refresh(&self) -> Result<Page<UserInfo>, UserInfoError> {
        let query: PageQuery = self.pagination.to_page_query();
        let result = if self.search.is_empty() {
            self.store.fetch_list(&query).await
        } else {
            self.store.search(&self.search, &query).await
        };
        self.sync_location();
        result
    }

    pub async fn set_page(&mut self, page: u32) -> Result<Page<UserInfo>, UserInfoError> {
        self.pagination.page = page.max(1);
        self.refresh().await
    }

    /// Column-header click: inactive column sorts ascending, active column
    /// flips direction.
    pub async fn sort_by(&mut self, field: &str) -> Result<Page<UserInfo>, UserInfoError> {
        self.pagination.toggle_sort(field);
        self.refresh().await
    }

    /// Start a free-text search from page 1. An empty term clears instead.
    pub async fn start_search(
        &mut self,
        term: impl Into<String>,
    ) -> Result<Page<UserInfo>, UserInfoError> {
        let term = term.into();
        if term.is_empty() {
            return self.clear_search().await;
        }
        self.search = term;
        self.pagination.page = 1;
        self.refresh().await
    }

    /// Clear the term, reset to page 1 and issue an unfiltered list fetch.
    pub async fn clear_search(&mut self) -> Result<Page<UserInfo>, UserInfoError> {
        self.search.clear();
        self.pagination.page = 1;
        self.refresh().await
    }

    /// Re-derive page and sort after an external location change (bookmark,
    /// back button) and re-fetch.
    pub async fn on_location_change(&mut self) -> Result<Page<UserInfo>, UserInfoError> {
        self.pagination = self
            .pagination
            .clone()
            .with_query_params(query_of(&self.nav.location()));
        self.refresh().await
    }

    fn sync_location(&self) {
        let location = self.location();
        if self.nav.location() != location {
            self.nav.navigate(location);
        }
    }
}
