//! Fixed query endpoints over the course collection.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::Course;
use crate::AppState;

/// Substring matched (case-insensitively) against course titles.
const SEARCH_PATTERN: &str = "rubi";

/// Topic count the count endpoint filters on.
const COUNT_TOPICS: i32 = 3;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub cuenta: i64,
}

pub async fn search_with_regex(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.repo.search_courses(SEARCH_PATTERN).await?;
    Ok(Json(courses))
}

/// Projected list: `numberOfTopics` dropped, `slug` opted in.
pub async fn select_some_fields(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.repo.list_courses_projected().await?;
    Ok(Json(courses))
}

/// Topic count descending, then title ascending.
pub async fn search_and_order(
    State(state): State<AppState>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state.repo.list_courses_sorted().await?;
    Ok(Json(courses))
}

pub async fn count_registers(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let cuenta = state.repo.count_courses_by_topics(COUNT_TOPICS).await?;
    Ok(Json(CountResponse { cuenta }))
}

/// Offset paging: skips `page * limit` documents in natural store order.
pub async fn limit_and_skip(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Course>>, AppError> {
    let limit = parse_page_param(params.limit.as_deref(), "limit")?;
    let page = parse_page_param(params.page.as_deref(), "page")?;

    let courses = state.repo.list_courses_paged(limit, page).await?;
    Ok(Json(courses))
}

fn parse_page_param(value: Option<&str>, name: &str) -> Result<i64, AppError> {
    let parsed: u32 = value.unwrap_or_default().parse().map_err(|_| {
        AppError::BadRequest(format!(
            "Query parameter {} must be a non-negative integer",
            name
        ))
    })?;
    Ok(i64::from(parsed))
}
