//! Video document model with embedded tag sub-documents.

use serde::{Deserialize, Serialize};

use super::Course;

/// A video document. Each video belongs to exactly one course; the reference
/// is stored as the course id and is never validated against the courses
/// collection after creation (dangling references are allowed to exist).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Identifier of the owning course.
    pub course: String,
    #[serde(default)]
    pub tags: Vec<VideoTag>,
}

/// A tag sub-document, owned by its video. The id is generated when the tag
/// is embedded and is only unique within the parent video's sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoTag {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A video with its `course` reference expanded to the full document.
///
/// `course` serializes as null when the reference no longer resolves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithCourse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub course: Option<Course>,
    pub tags: Vec<VideoTag>,
}

/// Tag payload accepted when creating a video.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoTagInput {
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for creating a new video.
///
/// `courseId` is optional at the wire level so that a missing reference
/// reaches the boundary check and reports as a validation failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<VideoTagInput>,
}

/// Request body for replacing a tag at a position.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVideoTagRequest {
    pub index: usize,
    pub title: String,
}
