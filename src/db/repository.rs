//! Database repository for CRUD and query operations over both collections.
//!
//! Every operation is a single method with explicit SQL. Reference expansion
//! ("populate") is an explicit secondary lookup per stored identifier, done
//! here rather than hidden behind the store.

use chrono::Utc;
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Course, CourseWithVideos, CreateCourseRequest, CreateVideoRequest, UpdateCourseRequest, Video,
    VideoTag, VideoWithCourse,
};

/// Suffix appended to a course title on every update.
pub const UPDATED_TITLE_SUFFIX: &str = "_actualizado";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== COURSE OPERATIONS ====================

    /// Create a new course. Validation derives the slug before the insert.
    pub async fn create_course(&self, request: &CreateCourseRequest) -> Result<Course, AppError> {
        let mut course = Course {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.clone().unwrap_or_default(),
            description: request.description.clone(),
            number_of_topics: Some(request.number_of_topics.unwrap_or(0)),
            published_at: None,
            slug: None,
            videos: Vec::new(),
        };
        course.validate()?;

        let videos_json = serde_json::to_string(&course.videos).unwrap_or_default();
        sqlx::query(
            "INSERT INTO courses (id, title, description, number_of_topics, published_at, slug, videos) VALUES (?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.number_of_topics)
        .bind(&course.published_at)
        .bind(&course.slug)
        .bind(&videos_json)
        .execute(&self.pool)
        .await?;

        Ok(course)
    }

    /// List all courses with their video references expanded to full
    /// documents. One lookup per reference; ids that no longer resolve are
    /// dropped from the expanded list.
    pub async fn list_courses(&self) -> Result<Vec<CourseWithVideos>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, number_of_topics, published_at, videos FROM courses ORDER BY rowid"
        )
        .fetch_all(&self.pool)
        .await?;
        let courses: Vec<Course> = rows.iter().map(course_from_row).collect();

        let mut populated = Vec::with_capacity(courses.len());
        for course in courses {
            let mut videos = Vec::with_capacity(course.videos.len());
            for video_id in &course.videos {
                if let Some(video) = self.get_video(video_id).await? {
                    videos.push(video);
                }
            }
            populated.push(CourseWithVideos {
                id: course.id,
                title: course.title,
                description: course.description,
                number_of_topics: course.number_of_topics,
                published_at: course.published_at,
                videos,
            });
        }
        Ok(populated)
    }

    /// Case-insensitive substring search on course titles.
    pub async fn search_courses(&self, pattern: &str) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, number_of_topics, published_at, videos FROM courses WHERE lower(title) LIKE '%' || lower(?) || '%' ORDER BY rowid"
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(course_from_row).collect())
    }

    /// Get a course by id with the default projection (no slug).
    pub async fn get_course(&self, id: &str) -> Result<Option<Course>, AppError> {
        let row = sqlx::query(
            "SELECT id, title, description, number_of_topics, published_at, videos FROM courses WHERE id = ?"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(course_from_row))
    }

    /// Fetch-modify-save update: overlay any provided fields, append the
    /// update marker to the title, stamp `publishedAt`, re-validate
    /// (rederiving the slug), save.
    pub async fn update_course(
        &self,
        id: &str,
        request: &UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        let mut course = self
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

        if let Some(title) = &request.title {
            course.title = title.clone();
        }
        if let Some(description) = &request.description {
            course.description = Some(description.clone());
        }
        if let Some(topics) = request.number_of_topics {
            course.number_of_topics = Some(topics);
        }

        course.title = format!("{}{}", course.title, UPDATED_TITLE_SUFFIX);
        course.published_at = Some(Utc::now().to_rfc3339());

        self.save_course(&mut course).await?;
        Ok(course)
    }

    /// Delete a course by id, returning the removed document. The referenced
    /// videos are left untouched.
    pub async fn delete_course(&self, id: &str) -> Result<Course, AppError> {
        let course = self
            .get_course(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", id)))?;

        sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(course)
    }

    /// Delete every course whose title matches exactly, returning the count.
    pub async fn delete_courses_by_title(&self, title: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM courses WHERE title = ?")
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// All courses with `numberOfTopics` excluded and `slug` opted in.
    pub async fn list_courses_projected(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, published_at, slug, videos FROM courses ORDER BY rowid"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(course_from_projected_row).collect())
    }

    /// All courses ordered by topic count descending, then title ascending.
    pub async fn list_courses_sorted(&self) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, number_of_topics, published_at, videos FROM courses ORDER BY number_of_topics DESC, title ASC"
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(course_from_row).collect())
    }

    /// Count courses with exactly `number_of_topics` topics.
    pub async fn count_courses_by_topics(&self, number_of_topics: i32) -> Result<i64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM courses WHERE number_of_topics = ?")
            .bind(number_of_topics)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("count"))
    }

    /// Page through courses in natural store order, skipping `page * limit`
    /// preceding documents.
    pub async fn list_courses_paged(&self, limit: i64, page: i64) -> Result<Vec<Course>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, description, number_of_topics, published_at, videos FROM courses ORDER BY rowid LIMIT ? OFFSET ?"
        )
        .bind(limit)
        .bind(page.saturating_mul(limit))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(course_from_row).collect())
    }

    /// Full-document save. Validation (and slug rederivation) runs on every
    /// call, so no course write path can skip it.
    async fn save_course(&self, course: &mut Course) -> Result<(), AppError> {
        course.validate()?;

        let videos_json = serde_json::to_string(&course.videos).unwrap_or_default();
        let result = sqlx::query(
            "UPDATE courses SET title = ?, description = ?, number_of_topics = ?, published_at = ?, slug = ?, videos = ? WHERE id = ?"
        )
        .bind(&course.title)
        .bind(&course.description)
        .bind(course.number_of_topics)
        .bind(&course.published_at)
        .bind(&course.slug)
        .bind(&videos_json)
        .bind(&course.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Course {} not found",
                course.id
            )));
        }
        Ok(())
    }

    // ==================== VIDEO OPERATIONS ====================

    /// Create a new video. Each embedded tag gets a freshly minted sub-id.
    pub async fn create_video(&self, request: &CreateVideoRequest) -> Result<Video, AppError> {
        let video = Video {
            id: uuid::Uuid::new_v4().to_string(),
            title: request.title.clone(),
            course: request.course_id.clone().unwrap_or_default(),
            tags: request
                .tags
                .iter()
                .map(|tag| VideoTag {
                    id: uuid::Uuid::new_v4().to_string(),
                    title: tag.title.clone(),
                })
                .collect(),
        };

        let tags_json = serde_json::to_string(&video.tags).unwrap_or_default();
        sqlx::query("INSERT INTO videos (id, title, course_id, tags) VALUES (?, ?, ?, ?)")
            .bind(&video.id)
            .bind(&video.title)
            .bind(&video.course)
            .bind(&tags_json)
            .execute(&self.pool)
            .await?;

        Ok(video)
    }

    /// Append `video_id` to the owning course's reference list and save the
    /// course. This is the second, independent write of video creation; it is
    /// not atomic with the video insert, and the caller decides what to do
    /// with a failure.
    pub async fn attach_video_to_course(
        &self,
        course_id: &str,
        video_id: &str,
    ) -> Result<(), AppError> {
        let mut course = self
            .get_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Course {} not found", course_id)))?;

        course.videos.push(video_id.to_string());
        self.save_course(&mut course).await
    }

    /// List all videos with the owning course expanded to a full document,
    /// or null when the reference is dangling.
    pub async fn list_videos(&self) -> Result<Vec<VideoWithCourse>, AppError> {
        let rows = sqlx::query("SELECT id, title, course_id, tags FROM videos ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;
        let videos: Vec<Video> = rows.iter().map(video_from_row).collect();

        let mut populated = Vec::with_capacity(videos.len());
        for video in videos {
            let course = self.get_course(&video.course).await?;
            populated.push(VideoWithCourse {
                id: video.id,
                title: video.title,
                course,
                tags: video.tags,
            });
        }
        Ok(populated)
    }

    /// Get a video by id.
    pub async fn get_video(&self, id: &str) -> Result<Option<Video>, AppError> {
        let row = sqlx::query("SELECT id, title, course_id, tags FROM videos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(video_from_row))
    }

    /// Delete a video by id, returning the removed document. The owning
    /// course's reference list is left untouched.
    pub async fn delete_video(&self, id: &str) -> Result<Video, AppError> {
        let video = self
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        sqlx::query("DELETE FROM videos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(video)
    }

    /// Replace the tag at `index` with a new tag carrying `title` and a fresh
    /// sub-id. `index == tags.len()` appends; anything beyond is rejected.
    pub async fn update_video_tag(
        &self,
        id: &str,
        index: usize,
        title: &str,
    ) -> Result<VideoWithCourse, AppError> {
        let mut video = self
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        if index > video.tags.len() {
            return Err(AppError::Validation(format!(
                "Tag index {} is out of range for {} tags",
                index,
                video.tags.len()
            )));
        }

        let tag = VideoTag {
            id: uuid::Uuid::new_v4().to_string(),
            title: Some(title.to_string()),
        };
        if index == video.tags.len() {
            video.tags.push(tag);
        } else {
            video.tags[index] = tag;
        }

        self.save_video(&video).await?;

        let course = self.get_course(&video.course).await?;
        Ok(VideoWithCourse {
            id: video.id,
            title: video.title,
            course,
            tags: video.tags,
        })
    }

    /// Remove the tag whose sub-id equals `tag_id`, preserving the relative
    /// order of the remaining tags.
    pub async fn delete_video_tag(
        &self,
        id: &str,
        tag_id: &str,
    ) -> Result<VideoWithCourse, AppError> {
        let mut video = self
            .get_video(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))?;

        let tag_count = video.tags.len();
        video.tags.retain(|tag| tag.id != tag_id);
        if video.tags.len() == tag_count {
            return Err(AppError::NotFound(format!(
                "Tag {} not found on video {}",
                tag_id, id
            )));
        }

        self.save_video(&video).await?;

        let course = self.get_course(&video.course).await?;
        Ok(VideoWithCourse {
            id: video.id,
            title: video.title,
            course,
            tags: video.tags,
        })
    }

    /// Full-document save for a video. The video model defines no validation
    /// hooks, so this writes as-is.
    async fn save_video(&self, video: &Video) -> Result<(), AppError> {
        let tags_json = serde_json::to_string(&video.tags).unwrap_or_default();
        let result =
            sqlx::query("UPDATE videos SET title = ?, course_id = ?, tags = ? WHERE id = ?")
                .bind(&video.title)
                .bind(&video.course)
                .bind(&tags_json)
                .bind(&video.id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Video {} not found", video.id)));
        }
        Ok(())
    }
}

// Helper functions for row conversion

fn course_from_row(row: &sqlx::sqlite::SqliteRow) -> Course {
    let videos_str: String = row.get("videos");
    Course {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        number_of_topics: Some(row.get("number_of_topics")),
        published_at: row.get("published_at"),
        slug: None,
        videos: parse_json_array(&videos_str),
    }
}

fn course_from_projected_row(row: &sqlx::sqlite::SqliteRow) -> Course {
    let videos_str: String = row.get("videos");
    Course {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        number_of_topics: None,
        published_at: row.get("published_at"),
        slug: Some(row.get("slug")),
        videos: parse_json_array(&videos_str),
    }
}

fn video_from_row(row: &sqlx::sqlite::SqliteRow) -> Video {
    let tags_str: String = row.get("tags");
    Video {
        id: row.get("id"),
        title: row.get("title"),
        course: row.get("course_id"),
        tags: parse_tags(&tags_str),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

fn parse_tags(s: &str) -> Vec<VideoTag> {
    serde_json::from_str(s).unwrap_or_default()
}
