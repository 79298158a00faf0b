//! Handlers for the course collection.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{Course, CourseWithVideos, CreateCourseRequest, UpdateCourseRequest};
use crate::AppState;

/// Exact title matched by the bulk delete endpoint.
const BULK_DELETE_TITLE: &str = "curso de Mongoose";

/// Body returned by the bulk delete endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub deleted_count: u64,
}

pub async fn create_course(
    State(state): State<AppState>,
    Json(request): Json<CreateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = state.repo.create_course(&request).await?;
    tracing::debug!("Created course {}: {}", course.id, course.info());
    Ok(Json(course))
}

pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseWithVideos>>, AppError> {
    let courses = state.repo.list_courses().await?;
    Ok(Json(courses))
}

/// An unknown id answers 200 with a null body rather than an error.
pub async fn get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Course>>, AppError> {
    let course = state.repo.get_course(&id).await?;
    Ok(Json(course))
}

pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let course = state.repo.update_course(&id, &request).await?;
    Ok(Json(course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = state.repo.delete_course(&id).await?;
    Ok(Json(course))
}

/// Removes every course titled exactly `curso de Mongoose`.
pub async fn delete_courses(State(state): State<AppState>) -> Result<Json<DeleteResult>, AppError> {
    let deleted_count = state
        .repo
        .delete_courses_by_title(BULK_DELETE_TITLE)
        .await?;
    Ok(Json(DeleteResult { deleted_count }))
}
