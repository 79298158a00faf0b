//! Handlers for the video collection.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::AppError;
use crate::models::{CreateVideoRequest, UpdateVideoTagRequest, Video, VideoWithCourse};
use crate::AppState;

/// Create a video, then append its id to the owning course's reference list.
/// The append is a second, independent write: when it fails the video stays
/// behind unreferenced and the failure is only logged.
pub async fn create_video(
    State(state): State<AppState>,
    Json(request): Json<CreateVideoRequest>,
) -> Result<Json<Video>, AppError> {
    let course_id = request.course_id.clone().unwrap_or_default();
    if course_id.trim().is_empty() {
        return Err(AppError::Validation("courseId is required".to_string()));
    }

    let video = state.repo.create_video(&request).await?;

    if let Err(error) = state
        .repo
        .attach_video_to_course(&course_id, &video.id)
        .await
    {
        tracing::warn!(
            "Failed to attach video {} to course {}: {}",
            video.id,
            course_id,
            error
        );
    }

    Ok(Json(video))
}

pub async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoWithCourse>>, AppError> {
    let videos = state.repo.list_videos().await?;
    Ok(Json(videos))
}

pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Video>, AppError> {
    let video = state.repo.delete_video(&id).await?;
    Ok(Json(video))
}

/// Replace (or append, when `index` equals the tag count) the tag at the
/// requested position.
pub async fn update_video_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateVideoTagRequest>,
) -> Result<Json<VideoWithCourse>, AppError> {
    let video = state
        .repo
        .update_video_tag(&id, request.index, &request.title)
        .await?;
    Ok(Json(video))
}

pub async fn delete_video_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(String, String)>,
) -> Result<Json<VideoWithCourse>, AppError> {
    let video = state.repo.delete_video_tag(&id, &tag_id).await?;
    Ok(Json(video))
}
