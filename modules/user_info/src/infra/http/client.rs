use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use nav_core::{Page, PageQuery};
use reqwest::{Response, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::config::UserInfoClientConfig;
use crate::contract::client::UserInfoApi;
use crate::contract::error::UserInfoError;
use crate::contract::model::{UserInfo, UserInfoPatch};

const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Reqwest-backed implementation of [`UserInfoApi`].
///
/// Thin request issuer: builds URLs against the configured base, sends one
/// request per operation and maps failures into [`UserInfoError`]. No retry.
pub struct UserInfoRestClient {
    http: reqwest::Client,
    base: Url,
    search_base: Url,
}

impl UserInfoRestClient {
    pub fn new(http: reqwest::Client, base: Url) -> Result<Self, UserInfoError> {
        let mut search_base = base.clone();
        search_base
            .path_segments_mut()
            .map_err(|_| UserInfoError::validation("base_url", "cannot be a base"))?
            .push("_search");
        Ok(Self {
            http,
            base,
            search_base,
        })
    }

    pub fn from_config(config: &UserInfoClientConfig) -> Result<Self, UserInfoError> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| UserInfoError::validation("base_url", e.to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_sec))
            .build()
            .map_err(|e| UserInfoError::transport(e.to_string()))?;
        Self::new(http, base)
    }

    fn entity_url(&self, id: i64) -> Result<Url, UserInfoError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| UserInfoError::validation("base_url", "cannot be a base"))?
            .push(&id.to_string());
        Ok(url)
    }

    /// Append paging parameters, an optional search term and, for plain
    /// listing, the cache-defeating token.
    fn page_url(&self, query: &PageQuery, term: Option<&str>) -> Url {
        let mut url = if term.is_some() {
            self.search_base.clone()
        } else {
            self.base.clone()
        };
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(term) = term {
                pairs.append_pair("query", term);
            }
            if let Some(page) = query.page {
                pairs.append_pair("page", &page.to_string());
            }
            if let Some(size) = query.size {
                pairs.append_pair("size", &size.to_string());
            }
            if let Some(ref sort) = query.sort {
                pairs.append_pair("sort", &sort.to_param());
            }
            if term.is_none() {
                pairs.append_pair("cacheBuster", &Utc::now().timestamp_millis().to_string());
            }
        }
        url
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response, UserInfoError> {
        request
            .send()
            .await
            .map_err(|e| UserInfoError::transport(e.to_string()))
    }

    async fn read_page(&self, response: Response) -> Result<Page<UserInfo>, UserInfoError> {
        let response = check_status(response, None).await?;
        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let items: Vec<UserInfo> = response
            .json()
            .await
            .map_err(|e| UserInfoError::transport(e.to_string()))?;
        let total = total.unwrap_or(items.len() as u64);
        Ok(Page::new(items, total))
    }

    async fn read_entity(
        &self,
        response: Response,
        id: Option<i64>,
    ) -> Result<UserInfo, UserInfoError> {
        let response = check_status(response, id).await?;
        response
            .json()
            .await
            .map_err(|e| UserInfoError::transport(e.to_string()))
    }
}

/// Map a non-success status into an error; a 404 with a known id becomes
/// `NotFound`.
async fn check_status(response: Response, id: Option<i64>) -> Result<Response, UserInfoError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(UserInfoError::not_found(id));
        }
    }
    let message = error_message(response).await.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(UserInfoError::http(status.as_u16(), message))
}

/// Pull a human-readable message out of an error body. Problem-style JSON
/// contributes `detail`, then `title`, then `message`; anything else is used
/// verbatim.
async fn error_message(response: Response) -> Option<String> {
    let body = response.text().await.ok()?;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["detail", "title", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(|m| m.as_str()))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Err(_) => Some(trimmed.to_string()),
    }
}

#[async_trait]
impl UserInfoApi for UserInfoRestClient {
    #[instrument(name = "user_info.http.list", skip_all, fields(base = %self.base))]
    async fn list(&self, query: &PageQuery) -> Result<Page<UserInfo>, UserInfoError> {
        let url = self.page_url(query, None);
        let response = self.execute(self.http.get(url)).await?;
        let page = self.read_page(response).await?;
        debug!(items = page.items.len(), total = page.total, "listed user infos");
        Ok(page)
    }

    #[instrument(name = "user_info.http.search", skip_all, fields(base = %self.search_base))]
    async fn search(&self, term: &str, query: &PageQuery) -> Result<Page<UserInfo>, UserInfoError> {
        let url = self.page_url(query, Some(term));
        let response = self.execute(self.http.get(url)).await?;
        let page = self.read_page(response).await?;
        debug!(items = page.items.len(), total = page.total, "searched user infos");
        Ok(page)
    }

    #[instrument(name = "user_info.http.get", skip_all, fields(id = %id))]
    async fn get(&self, id: i64) -> Result<UserInfo, UserInfoError> {
        let url = self.entity_url(id)?;
        let response = self.execute(self.http.get(url)).await?;
        self.read_entity(response, Some(id)).await
    }

    #[instrument(name = "user_info.http.create", skip_all)]
    async fn create(&self, draft: &UserInfo) -> Result<UserInfo, UserInfoError> {
        let response = self
            .execute(self.http.post(self.base.clone()).json(draft))
            .await?;
        let created = self.read_entity(response, None).await?;
        debug!(id = ?created.id, "created user info");
        Ok(created)
    }

    #[instrument(name = "user_info.http.update", skip_all, fields(id = ?entity.id))]
    async fn update(&self, entity: &UserInfo) -> Result<UserInfo, UserInfoError> {
        let id = entity
            .id
            .ok_or_else(|| UserInfoError::validation("id", "is required for update"))?;
        let url = self.entity_url(id)?;
        let response = self.execute(self.http.put(url).json(entity)).await?;
        self.read_entity(response, Some(id)).await
    }

    #[instrument(name = "user_info.http.partial_update", skip_all, fields(id = %id))]
    async fn partial_update(
        &self,
        id: i64,
        patch: &UserInfoPatch,
    ) -> Result<UserInfo, UserInfoError> {
        let url = self.entity_url(id)?;
        let response = self.execute(self.http.patch(url).json(patch)).await?;
        self.read_entity(response, Some(id)).await
    }

    #[instrument(name = "user_info.http.delete", skip_all, fields(id = %id))]
    async fn delete(&self, id: i64) -> Result<(), UserInfoError> {
        let url = self.entity_url(id)?;
        let response = self.execute(self.http.delete(url)).await?;
        check_status(response, Some(id)).await?;
        debug!("deleted user info");
        Ok(())
    }
}
