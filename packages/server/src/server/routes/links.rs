//! Dashboard link API.

use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::LinkId;
use crate::domains::links::activities::{
    forgotten_cutoff, pick_forgotten_link, submit_link, DEFAULT_ROULETTE_DAYS,
};
use crate::domains::links::extraction::extract_urls;
use crate::domains::links::models::{Category, Link, WEB_MANUAL_SENDER};
use crate::server::app::AxumAppState;
use crate::server::error::{ApiError, ApiResult};

const DEFAULT_PAGE_SIZE: i64 = 100;
const MAX_PAGE_SIZE: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListLinksQuery {
    limit: Option<i64>,
    offset: Option<i64>,
    category: Option<String>,
}

#[derive(Serialize)]
pub struct LinkList {
    links: Vec<Link>,
    count: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddLinkRequest {
    url: String,
}

#[derive(Serialize)]
pub struct AddLinkResponse {
    status: &'static str,
    id: LinkId,
}

#[derive(Debug, Deserialize)]
pub struct RouletteQuery {
    days_ago: Option<i64>,
}

#[derive(Serialize)]
pub struct DeleteLinkResponse {
    deleted: bool,
    id: LinkId,
}

pub async fn list_links_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<ListLinksQuery>,
) -> ApiResult<Json<LinkList>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=MAX_PAGE_SIZE).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::BadRequest("offset must not be negative".into()));
    }

    let category = match query.category.as_deref().filter(|c| !c.is_empty()) {
        None => None,
        Some(name) => match name.parse::<Category>() {
            Ok(category) => Some(category),
            // No stored link can carry an unknown category.
            Err(_) => return Ok(Json(LinkList { links: Vec::new(), count: 0 })),
        },
    };

    let links = state.deps.store.list(limit, offset, category).await?;
    Ok(Json(LinkList {
        count: links.len(),
        links,
    }))
}

/// Save a link pasted into the dashboard. Only the first URL in the text is
/// used and no chat reply is sent.
pub async fn add_link_handler(
    Extension(state): Extension<AxumAppState>,
    Json(request): Json<AddLinkRequest>,
) -> ApiResult<Json<AddLinkResponse>> {
    let extracted = extract_urls(&request.url)
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::BadRequest("No valid URL found".into()))?;

    let submitted = submit_link(&extracted, Some(WEB_MANUAL_SENDER), None, &state.deps).await?;
    info!(link_id = %submitted.link.id, "Link added from dashboard");

    Ok(Json(AddLinkResponse {
        status: "ok",
        id: submitted.link.id,
    }))
}

pub async fn roulette_handler(
    Extension(state): Extension<AxumAppState>,
    Query(query): Query<RouletteQuery>,
) -> ApiResult<Json<Link>> {
    let days_ago = query.days_ago.unwrap_or(DEFAULT_ROULETTE_DAYS);
    let cutoff = forgotten_cutoff(days_ago)
        .ok_or_else(|| ApiError::BadRequest("days_ago is out of range".into()))?;

    pick_forgotten_link(cutoff, state.deps.store.as_ref())
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No links saved yet!".into()))
}

pub async fn get_link_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Link>> {
    let id = parse_link_id(&id)?;
    state
        .deps
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(link_not_found)
}

pub async fn delete_link_handler(
    Extension(state): Extension<AxumAppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteLinkResponse>> {
    let id = parse_link_id(&id)?;
    if !state.deps.store.delete(id).await? {
        return Err(link_not_found());
    }

    info!(link_id = %id, "Link deleted");
    Ok(Json(DeleteLinkResponse { deleted: true, id }))
}

// A malformed id cannot name a stored link.
fn parse_link_id(raw: &str) -> ApiResult<LinkId> {
    LinkId::parse(raw).map_err(|_| link_not_found())
}

fn link_not_found() -> ApiError {
    ApiError::NotFound("Link not found".into())
}
