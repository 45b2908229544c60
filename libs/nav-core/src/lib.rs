//! Pagination, sorting and navigational query-string primitives shared by
//! list-style entity views.
//!
//! The navigational convention is the one the surrounding application uses
//! everywhere: a 1-based `page` parameter and a `sort` parameter of the form
//! `field,ASC|DESC`. Wire-level requests use a 0-based page instead; the
//! conversion lives in [`PaginationState::to_page_query`].

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

mod page;
pub use page::Page;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SortParseError {
    #[error("empty sort expression")]
    Empty,
    #[error("invalid sort direction: '{0}'")]
    InvalidDirection(String),
}

/// Sort direction as written in query strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn flipped(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }
}

impl fmt::Display for SortDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDir::Asc => f.write_str("ASC"),
            SortDir::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortDir {
    type Err = SortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDir::Asc),
            "DESC" => Ok(SortDir::Desc),
            other => Err(SortParseError::InvalidDirection(other.to_string())),
        }
    }
}

/// A single sort key, e.g. `id,ASC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub dir: SortDir,
}

impl Sort {
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDir::Desc)
    }

    /// Render as a `sort` query parameter value.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.field, self.dir)
    }

    /// Parse a `sort` parameter value. A bare field name sorts ascending.
    pub fn from_param(s: &str) -> Result<Self, SortParseError> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or("").trim();
        if field.is_empty() {
            return Err(SortParseError::Empty);
        }
        let dir = match parts.next() {
            Some(d) if !d.trim().is_empty() => d.trim().parse()?,
            _ => SortDir::Asc,
        };
        Ok(Self::new(field, dir))
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.dir)
    }
}

/// Wire-level paging parameters. All fields optional: an all-`None` query
/// requests the backend's own defaults (the post-write refresh uses this).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageQuery {
    /// 0-based page index.
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<Sort>,
}

impl PageQuery {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.size.is_none() && self.sort.is_none()
    }
}

/// Pagination state as carried in the navigational location: 1-based page,
/// page size and active sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl PaginationState {
    /// Defaults: first page, ascending on `default_field`.
    pub fn new(size: u32, default_field: impl Into<String>) -> Self {
        Self {
            page: 1,
            size,
            sort: Sort::asc(default_field),
        }
    }

    /// Override page and sort from a navigational query string. Both `page`
    /// and `sort` must be present to take effect; otherwise the state is
    /// returned unchanged.
    pub fn with_query_params(mut self, query: &str) -> Self {
        let mut page = None;
        let mut sort = None;
        for (k, v) in parse_query(query) {
            match k.as_str() {
                "page" => page = v.parse::<u32>().ok().filter(|p| *p >= 1),
                "sort" => sort = Sort::from_param(&v).ok(),
                _ => {}
            }
        }
        if let (Some(page), Some(sort)) = (page, sort) {
            self.page = page;
            self.sort = sort;
        }
        self
    }

    /// Column-header toggle: an inactive column becomes the sort field
    /// ascending; the active column flips direction.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort.field == field {
            self.sort.dir = self.sort.dir.flipped();
        } else {
            self.sort = Sort::asc(field);
        }
    }

    /// Render the navigational query string, e.g. `page=2&sort=id,ASC`.
    pub fn query_string(&self) -> String {
        format!("page={}&sort={}", self.page, self.sort.to_param())
    }

    /// Convert to wire-level parameters (0-based page).
    pub fn to_page_query(&self) -> PageQuery {
        PageQuery {
            page: Some(self.page.saturating_sub(1)),
            size: Some(self.size),
            sort: Some(self.sort.clone()),
        }
    }
}

/// Decode a query string (with or without a leading `?`) into key/value
/// pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
