use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::alignment::AlignmentResult;
use super::domain::{Organization, OrganizationId};
use super::recommendation::RecommendationRequest;
use super::registration::OrganizationSubmission;
use super::repository::OrganizationRepository;
use super::search::SearchQuery;
use super::service::DirectoryService;
use crate::error::AppError;

/// Router builder exposing directory, search and recommendation endpoints.
pub fn directory_router<R>(service: Arc<DirectoryService<R>>) -> Router
where
    R: OrganizationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/organizations",
            get(search_handler::<R>).post(register_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:org_id",
            get(fetch_handler::<R>).put(update_handler::<R>),
        )
        .route(
            "/api/v1/organizations/:org_id/alignment/:other_id",
            get(alignment_handler::<R>),
        )
        .route("/api/v1/recommendations", post(recommend_handler::<R>))
        .with_state(service)
}

pub(crate) async fn search_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Value>, AppError>
where
    R: OrganizationRepository + 'static,
{
    let Query(query) = query?;
    let results = service.search(&query)?;

    Ok(Json(json!({
        "success": true,
        "results": results.results,
        "total": results.total,
        "focusAreas": results.focus_areas,
        "regions": results.regions,
    })))
}

pub(crate) async fn register_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Json(submission): Json<OrganizationSubmission>,
) -> Result<(StatusCode, Json<Organization>), AppError>
where
    R: OrganizationRepository + 'static,
{
    let record = service.register(submission)?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Path(org_id): Path<String>,
) -> Result<Json<Organization>, AppError>
where
    R: OrganizationRepository + 'static,
{
    let record = service.get(&OrganizationId(org_id))?;
    Ok(Json(record))
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Path(org_id): Path<String>,
    Json(submission): Json<OrganizationSubmission>,
) -> Result<Json<Organization>, AppError>
where
    R: OrganizationRepository + 'static,
{
    let record = service.update(&OrganizationId(org_id), submission)?;
    Ok(Json(record))
}

pub(crate) async fn alignment_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Path((org_id, other_id)): Path<(String, String)>,
) -> Result<Json<AlignmentResult>, AppError>
where
    R: OrganizationRepository + 'static,
{
    let result = service.align(&OrganizationId(org_id), &OrganizationId(other_id))?;
    Ok(Json(result))
}

pub(crate) async fn recommend_handler<R>(
    State(service): State<Arc<DirectoryService<R>>>,
    Json(request): Json<RecommendationRequest>,
) -> Result<Json<Value>, AppError>
where
    R: OrganizationRepository + 'static,
{
    let page = service.recommend(request)?;

    Ok(Json(json!({
        "success": true,
        "org_id": page.org_id,
        "results": page.results,
        "total": page.total,
        "limit": page.limit,
        "offset": page.offset,
    })))
}
