//! In-process REST backend used by the integration tests.
//!
//! Each test spins up a fresh instance on an ephemeral port with its own
//! in-memory storage, mirroring the wire contract the client consumes:
//! paged/sorted listing with `x-total-count`, `_search`, and the CRUD verbs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};

use nav_core::{Sort, SortDir};
use user_info::model::{Gender, UserInfo, UserInfoPatch};

const API_PATH: &str = "/services/userservice/api/user-infos";

#[derive(Default)]
struct Db {
    rows: Vec<UserInfo>,
    next_id: i64,
}

/// Shared handle onto the backend's storage; cloning shares state.
#[derive(Clone, Default)]
pub struct Backend {
    inner: Arc<Mutex<Db>>,
}

impl Backend {
    /// Insert a row directly, assigning the next id. Returns the stored row.
    pub fn insert(&self, mut row: UserInfo) -> UserInfo {
        let mut db = self.inner.lock().unwrap();
        db.next_id += 1;
        row.id = Some(db.next_id);
        db.rows.push(row.clone());
        row
    }

    /// Seed `n` distinct rows.
    pub fn seed(&self, n: usize) {
        for i in 0..n {
            self.insert(sample_user(&format!("seed{i}")));
        }
    }

    pub fn ids(&self) -> Vec<i64> {
        self.inner.lock().unwrap().rows.iter().filter_map(|r| r.id).collect()
    }
}

/// A canned valid record; `tag` keeps seeded rows distinguishable.
pub fn sample_user(tag: &str) -> UserInfo {
    UserInfo {
        id: None,
        user_id: format!("uid-{tag}"),
        firstname: format!("First{tag}"),
        lastname: format!("Last{tag}"),
        alias: format!("alias-{tag}"),
        gender: Gender::Other,
        email: format!("{tag}@example.com"),
        phone: None,
        address_line_1: None,
        address_line_2: None,
        city: None,
        country: None,
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        updated_at: None,
    }
}

pub struct BackendHandle {
    pub base_url: String,
    pub backend: Backend,
}

/// Serve a fresh backend on an ephemeral port; returns the user-infos base
/// URL the client should be pointed at.
pub async fn spawn_backend() -> BackendHandle {
    let backend = Backend::default();
    let app = router(backend.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake backend");
    });
    BackendHandle {
        base_url: format!("http://{addr}{API_PATH}"),
        backend,
    }
}

fn router(backend: Backend) -> Router {
    Router::new()
        .route(API_PATH, get(list_users).post(create_user))
        .route(&format!("{API_PATH}/_search"), get(search_users))
        .route(
            &format!("{API_PATH}/{{id}}"),
            get(get_user)
                .put(update_user)
                .patch(patch_user)
                .delete(delete_user),
        )
        .with_state(backend)
}

fn paged(mut rows: Vec<UserInfo>, params: &HashMap<String, String>) -> impl IntoResponse {
    sort_rows(&mut rows, params.get("sort"));
    let total = rows.len();
    let page = params
        .get("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(0);
    let size = params
        .get("size")
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(20);
    let items: Vec<UserInfo> = rows.into_iter().skip(page * size).take(size).collect();
    ([("x-total-count", total.to_string())], Json(items))
}

fn sort_rows(rows: &mut [UserInfo], sort: Option<&String>) {
    let sort = sort
        .and_then(|s| Sort::from_param(s).ok())
        .unwrap_or_else(|| Sort::asc("id"));
    rows.sort_by(|a, b| {
        let ordering = match sort.field.as_str() {
            "firstname" => a.firstname.cmp(&b.firstname),
            "lastname" => a.lastname.cmp(&b.lastname),
            "email" => a.email.cmp(&b.email),
            "userId" => a.user_id.cmp(&b.user_id),
            _ => a.id.cmp(&b.id),
        };
        match sort.dir {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    });
}

async fn list_users(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let rows = backend.inner.lock().unwrap().rows.clone();
    paged(rows, &params)
}

async fn search_users(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let needle = params.get("query").cloned().unwrap_or_default().to_lowercase();
    let rows: Vec<UserInfo> = backend
        .inner
        .lock()
        .unwrap()
        .rows
        .iter()
        .filter(|r| {
            [&r.user_id, &r.firstname, &r.lastname, &r.alias, &r.email]
                .iter()
                .any(|f| f.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();
    paged(rows, &params)
}

async fn get_user(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
) -> Result<Json<UserInfo>, StatusCode> {
    backend
        .inner
        .lock()
        .unwrap()
        .rows
        .iter()
        .find(|r| r.id == Some(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create_user(
    State(backend): State<Backend>,
    Json(draft): Json<UserInfo>,
) -> (StatusCode, Json<UserInfo>) {
    let created = backend.insert(draft);
    (StatusCode::CREATED, Json(created))
}

async fn update_user(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(mut entity): Json<UserInfo>,
) -> Result<Json<UserInfo>, StatusCode> {
    entity.id = Some(id);
    let mut db = backend.inner.lock().unwrap();
    let row = db
        .rows
        .iter_mut()
        .find(|r| r.id == Some(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    *row = entity.clone();
    Ok(Json(entity))
}

async fn patch_user(
    State(backend): State<Backend>,
    Path(id): Path<i64>,
    Json(patch): Json<UserInfoPatch>,
) -> Result<Json<UserInfo>, StatusCode> {
    let mut db = backend.inner.lock().unwrap();
    let row = db
        .rows
        .iter_mut()
        .find(|r| r.id == Some(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    apply_patch(row, patch);
    Ok(Json(row.clone()))
}

async fn delete_user(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    let mut db = backend.inner.lock().unwrap();
    let before = db.rows.len();
    db.rows.retain(|r| r.id != Some(id));
    if db.rows.len() < before {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

fn apply_patch(row: &mut UserInfo, patch: UserInfoPatch) {
    if let Some(user_id) = patch.user_id {
        row.user_id = user_id;
    }
    if let Some(firstname) = patch.firstname {
        row.firstname = firstname;
    }
    if let Some(lastname) = patch.lastname {
        row.lastname = lastname;
    }
    if let Some(alias) = patch.alias {
        row.alias = alias;
    }
    if let Some(gender) = patch.gender {
        row.gender = gender;
    }
    if let Some(email) = patch.email {
        row.email = email;
    }
    if let Some(phone) = patch.phone {
        row.phone = Some(phone);
    }
    if let Some(line) = patch.address_line_1 {
        row.address_line_1 = Some(line);
    }
    if let Some(line) = patch.address_line_2 {
        row.address_line_2 = Some(line);
    }
    if let Some(city) = patch.city {
        row.city = Some(city);
    }
    if let Some(country) = patch.country {
        row.country = Some(country);
    }
    if let Some(updated_at) = patch.updated_at {
        row.updated_at = Some(updated_at);
    }
}
