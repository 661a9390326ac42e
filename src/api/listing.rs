// SPDX-License-Identifier: MPL-2.0

//! HTTP client for server-paged listings.
//!
//! The wire contract is a JSON body carrying a paging envelope under
//! `data`: an array of records (hierarchical via `nested_children`), plus
//! `current_page` and `last_page`. The listing accepts an optional
//! free-text `search` parameter and a `page`/`limit` pair.

use std::marker::PhantomData;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::select::{OptionSource, OptionValue, PageMeta, SourcePage, TreeNode};

#[derive(Debug, Clone)]
pub enum ApiError {
    ConnectionFailed(String),
    RequestFailed(String),
    InvalidResponse(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            ApiError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            ApiError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingClient {
    client: reqwest::Client,
    base_url: String,
}

impl ListingClient {
    /// Create a new listing client.
    /// auth_header_type: "authorization" for Bearer token, anything else is
    /// used verbatim as a custom header name carrying the raw token.
    pub fn new(base_url: &str, auth_token: &str, auth_header_type: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        if !auth_token.is_empty() {
            match auth_header_type {
                "authorization" | "" => {
                    let auth_value = HeaderValue::from_str(&format!("Bearer {}", auth_token))
                        .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;
                    headers.insert(AUTHORIZATION, auth_value);
                }
                custom => {
                    let header_name = HeaderName::from_bytes(custom.as_bytes())
                        .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;
                    let auth_value = HeaderValue::from_str(auth_token)
                        .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;
                    headers.insert(header_name, auth_value);
                }
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        // Normalize base URL (remove trailing slash)
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    /// Fetch one page of a listing.
    ///
    /// An empty `search` omits the parameter entirely, matching servers
    /// that treat an empty string differently from an absent filter.
    pub async fn fetch_page<R: DeserializeOwned>(
        &self,
        path: &str,
        search: &str,
        page: u32,
        limit: u32,
    ) -> Result<SourcePage<R>, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut query: Vec<(&str, String)> = Vec::new();
        if !search.is_empty() {
            query.push(("search", search.to_string()));
        }
        query.push(("page", page.to_string()));
        query.push(("limit", limit.to_string()));

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| ApiError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed(format!(
                "Server returned status: {} - {}",
                status, body
            )));
        }

        let body: ListingResponse<R> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;

        Ok(into_source_page(body))
    }
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct ListingResponse<R> {
    #[serde(default)]
    data: Option<PageEnvelope<R>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "R: DeserializeOwned"))]
struct PageEnvelope<R> {
    #[serde(default)]
    data: Vec<R>,
    // Absent paging fields default to "page 1 of 1" so a malformed
    // envelope can never drive an endless pagination loop.
    #[serde(default = "first_page")]
    current_page: u32,
    #[serde(default = "first_page")]
    last_page: u32,
}

fn first_page() -> u32 {
    1
}

impl<R> PageEnvelope<R> {
    fn empty() -> Self {
        Self {
            data: Vec::new(),
            current_page: 1,
            last_page: 1,
        }
    }
}

fn into_source_page<R>(body: ListingResponse<R>) -> SourcePage<R> {
    let envelope = body.data.unwrap_or_else(PageEnvelope::empty);
    let has_more = envelope.current_page < envelope.last_page;
    SourcePage {
        records: envelope.data,
        meta: PageMeta {
            current_page: envelope.current_page,
            last_page: envelope.last_page,
            has_more,
        },
    }
}

/// One listing endpoint bound to a record type, usable as an
/// [`OptionSource`] for the select engine.
pub struct PagedEndpoint<R> {
    client: ListingClient,
    path: String,
    limit: u32,
    _record: PhantomData<fn() -> R>,
}

impl<R> PagedEndpoint<R> {
    pub fn new(client: ListingClient, path: impl Into<String>, limit: u32) -> Self {
        Self {
            client,
            path: path.into(),
            limit,
            _record: PhantomData,
        }
    }
}

impl<R> OptionSource<R> for PagedEndpoint<R>
where
    R: DeserializeOwned + Send + 'static,
{
    fn load(&self, term: &str, page: u32) -> BoxFuture<'static, Result<SourcePage<R>, String>> {
        let client = self.client.clone();
        let path = self.path.clone();
        let term = term.to_string();
        let limit = self.limit;
        async move {
            client
                .fetch_page(&path, &term, page, limit)
                .await
                .map_err(|e| e.to_string())
        }
        .boxed()
    }
}

/// A taxonomy record as served by hierarchical listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyRecord {
    pub id: i64,
    #[serde(alias = "nama")]
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub nested_children: Vec<TaxonomyRecord>,
}

impl TreeNode for TaxonomyRecord {
    fn key(&self) -> OptionValue {
        self.id.to_string()
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn children(&self) -> &[Self] {
        &self.nested_children
    }
}
