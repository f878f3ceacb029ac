//! Catalog Handlers
//!
//! Thin adapters over the GameSpot proxy: default the query, build the
//! upstream parameters, delegate to [`CatalogProxy::fetch`].
//!
//! [`CatalogProxy::fetch`]: crate::upstream::CatalogProxy::fetch

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::debug;

use crate::api::{AppState, QueryString};
use crate::error::{AppError, Result};
use crate::models::{EmptyListingResponse, GameDetailQuery, GamesQuery, ListQuery};
use crate::upstream::QueryParams;

/// Default page size for list resources.
pub const DEFAULT_LIMIT: &str = "20";
/// Default page offset.
pub const DEFAULT_OFFSET: &str = "0";

/// Per-resource defaults for the list endpoints.
#[derive(Debug, Clone, Copy)]
pub struct ListingDefaults {
    pub resource: &'static str,
    pub limit: &'static str,
    pub sort: Option<&'static str>,
    pub field_list: Option<&'static str>,
    /// Whether the caller's `filter` is forwarded
    pub accepts_filter: bool,
}

pub const REVIEWS: ListingDefaults = ListingDefaults {
    resource: "reviews",
    limit: DEFAULT_LIMIT,
    sort: Some("publish_date:desc"),
    field_list: None,
    accepts_filter: true,
};

pub const ARTICLES: ListingDefaults = ListingDefaults {
    resource: "articles",
    limit: DEFAULT_LIMIT,
    sort: Some("publish_date:desc"),
    field_list: None,
    accepts_filter: true,
};

pub const VIDEOS: ListingDefaults = ListingDefaults {
    resource: "videos",
    limit: DEFAULT_LIMIT,
    sort: Some("publish_date:desc"),
    field_list: None,
    accepts_filter: true,
};

pub const PLATFORMS: ListingDefaults = ListingDefaults {
    resource: "platforms",
    limit: "100",
    sort: Some("name:asc"),
    field_list: Some("id,name,abbreviation"),
    accepts_filter: false,
};

/// Handler for GET /api/games
pub async fn list_games(
    State(state): State<AppState>,
    QueryString(query): QueryString<GamesQuery>,
) -> Result<Response> {
    if !state.catalog.is_enabled() {
        return Ok(Json(EmptyListingResponse::not_configured()).into_response());
    }

    let params = QueryParams::new()
        .param("limit", Some(or_default(query.limit, DEFAULT_LIMIT)))
        .param("offset", Some(or_default(query.offset, DEFAULT_OFFSET)))
        .param("sort", query.sort)
        .param("field_list", query.field_list)
        .param(
            "filter",
            games_filter(
                query.search.as_deref(),
                query.platforms.as_deref(),
                query.filter.as_deref(),
            ),
        );

    let payload = state.catalog.fetch("games", &params).await?;
    Ok(Json(payload).into_response())
}

/// Handler for GET /api/games/:id
///
/// Returns the first element of a `results` list instead of the envelope.
pub async fn get_game(
    State(state): State<AppState>,
    Path(id): Path<String>,
    QueryString(query): QueryString<GameDetailQuery>,
) -> Result<Json<Value>> {
    if !state.catalog.is_enabled() {
        return Err(AppError::NotConfigured);
    }

    let params = QueryParams::new()
        .param("filter", Some(format!("id:{}", id.trim())))
        .param("field_list", query.field_list);

    let payload = state.catalog.fetch("games", &params).await?;
    debug!(game_id = %id, "game detail resolved");
    Ok(Json(first_result(payload)))
}

/// Handler for GET /api/reviews
pub async fn list_reviews(
    state: State<AppState>,
    query: QueryString<ListQuery>,
) -> Result<Response> {
    proxy_listing(state, REVIEWS, query).await
}

/// Handler for GET /api/articles
pub async fn list_articles(
    state: State<AppState>,
    query: QueryString<ListQuery>,
) -> Result<Response> {
    proxy_listing(state, ARTICLES, query).await
}

/// Handler for GET /api/videos
pub async fn list_videos(
    state: State<AppState>,
    query: QueryString<ListQuery>,
) -> Result<Response> {
    proxy_listing(state, VIDEOS, query).await
}

/// Handler for GET /api/platforms
pub async fn list_platforms(
    state: State<AppState>,
    query: QueryString<ListQuery>,
) -> Result<Response> {
    proxy_listing(state, PLATFORMS, query).await
}

async fn proxy_listing(
    State(state): State<AppState>,
    defaults: ListingDefaults,
    QueryString(query): QueryString<ListQuery>,
) -> Result<Response> {
    if !state.catalog.is_enabled() {
        return Ok(Json(EmptyListingResponse::not_configured()).into_response());
    }

    let params = listing_params(defaults, query);
    let payload = state.catalog.fetch(defaults.resource, &params).await?;
    Ok(Json(payload).into_response())
}

/// Upstream parameters for a list resource: limit, offset, sort, field_list,
/// then filter.
pub fn listing_params(defaults: ListingDefaults, query: ListQuery) -> QueryParams {
    let filter = if defaults.accepts_filter {
        query.filter
    } else {
        None
    };

    QueryParams::new()
        .param("limit", Some(or_default(query.limit, defaults.limit)))
        .param("offset", Some(or_default(query.offset, DEFAULT_OFFSET)))
        .param("sort", optional_default(query.sort, defaults.sort))
        .param("field_list", optional_default(query.field_list, defaults.field_list))
        .param("filter", filter)
}

/// Comma-joined filter clauses: `name:<search>`, `platforms:<ids>`, then the
/// caller's raw filter. None when there is nothing to filter on.
pub fn games_filter(search: Option<&str>, platforms: Option<&str>, raw: Option<&str>) -> Option<String> {
    let clauses: Vec<String> = [
        present(search).map(|term| format!("name:{}", term)),
        present(platforms).map(|ids| format!("platforms:{}", ids)),
        present(raw).map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .collect();

    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join(","))
    }
}

/// Unwraps `{results: [first, ...]}` to `first`; any other shape is returned
/// unchanged.
pub fn first_result(payload: Value) -> Value {
    let first = payload
        .get("results")
        .and_then(Value::as_array)
        .and_then(|results| results.first())
        .cloned();
    first.unwrap_or(payload)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_default(value: Option<String>, default: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| default.map(str::to_string))
}
