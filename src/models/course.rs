//! Course document model with slug derivation and write-time validation.

use serde::{Deserialize, Serialize};

use super::Video;
use crate::errors::AppError;

/// Allowed length range for a course description, when one is present.
pub const MIN_DESCRIPTION_LENGTH: usize = 50;
pub const MAX_DESCRIPTION_LENGTH: usize = 300;

/// Allowed range for the number of topics.
pub const MIN_TOPICS: i32 = 0;
pub const MAX_TOPICS: i32 = 100;

/// A course document.
///
/// `slug` is only populated when a query explicitly selects it (and on the
/// documents returned by create/update, where it has just been derived).
/// `numberOfTopics` is only absent under the projected read that excludes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_topics: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Identifiers of the videos that reference this course.
    #[serde(default)]
    pub videos: Vec<String>,
}

/// A course with its `videos` references expanded to full documents.
///
/// Identifiers that no longer resolve are dropped from the expanded list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithVideos {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_topics: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub videos: Vec<Video>,
}

impl Course {
    /// Normalize and check the document before any create or full save.
    ///
    /// The slug is rederived from the current title first, so it can never go
    /// stale with respect to a title change on the same write.
    pub fn validate(&mut self) -> Result<(), AppError> {
        self.slug = Some(slugify(&self.title));

        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Course title is required".to_string()));
        }
        if self.slug.as_deref().unwrap_or_default().is_empty() {
            return Err(AppError::Validation(
                "Course title must contain at least one alphanumeric character".to_string(),
            ));
        }
        if let Some(description) = &self.description {
            let length = description.chars().count();
            if length < MIN_DESCRIPTION_LENGTH {
                return Err(AppError::Validation(format!(
                    "Description must be at least {} characters (got {})",
                    MIN_DESCRIPTION_LENGTH, length
                )));
            }
            if length > MAX_DESCRIPTION_LENGTH {
                return Err(AppError::Validation(format!(
                    "Description must be at most {} characters (got {})",
                    MAX_DESCRIPTION_LENGTH, length
                )));
            }
        }
        if let Some(topics) = self.number_of_topics {
            if !(MIN_TOPICS..=MAX_TOPICS).contains(&topics) {
                return Err(AppError::Validation(format!(
                    "numberOfTopics must be between {} and {} (got {})",
                    MIN_TOPICS, MAX_TOPICS, topics
                )));
            }
        }
        Ok(())
    }

    /// Human-readable summary, computed on access and never stored.
    ///
    /// Absent values render as the literal text `undefined`.
    pub fn info(&self) -> String {
        let description = self.description.as_deref().unwrap_or("undefined");
        let topics = self
            .number_of_topics
            .map(|n| n.to_string())
            .unwrap_or_else(|| "undefined".to_string());
        let published_at = self.published_at.as_deref().unwrap_or("undefined");
        format!(
            "{}. Temas: {}. Fecha de lanzamiento: {}.",
            description, topics, published_at
        )
    }
}

/// Derive a URL-safe slug from a title.
///
/// Lowercases, collapses every run of non-alphanumeric characters to a single
/// hyphen, and trims separators from both ends. Deterministic and
/// collision-prone on purpose; uniqueness is not enforced anywhere.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Request body for creating a new course.
///
/// `title` is optional at the wire level so that a missing title reaches
/// validation and reports as a validation failure, not a parse failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_topics: Option<i32>,
}

/// Request body for updating an existing course.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_topics: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(title: &str) -> Course {
        Course {
            id: "c-1".to_string(),
            title: title.to_string(),
            description: None,
            number_of_topics: Some(0),
            published_at: None,
            slug: None,
            videos: Vec::new(),
        }
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Mongoose 101"), "mongoose-101");
        assert_eq!(slugify("curso de Mongoose"), "curso-de-mongoose");
    }

    #[test]
    fn test_slugify_collapses_separator_runs() {
        assert_eq!(slugify("Hola   Mundo!!"), "hola-mundo");
        assert_eq!(slugify("a - b -- c"), "a-b-c");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  padded  "), "padded");
        assert_eq!(slugify("(parens)"), "parens");
    }

    #[test]
    fn test_slugify_is_idempotent() {
        let once = slugify("Rust: From Zero to Prod");
        assert_eq!(slugify(&once), once);
    }

    #[test]
    fn test_validate_recomputes_slug() {
        let mut course = course("Mongoose 101");
        course.slug = Some("stale-slug".to_string());
        course.validate().unwrap();
        assert_eq!(course.slug.as_deref(), Some("mongoose-101"));

        course.title = "Renamed Course".to_string();
        course.validate().unwrap();
        assert_eq!(course.slug.as_deref(), Some("renamed-course"));
    }

    #[test]
    fn test_validate_rejects_blank_title() {
        assert!(course("").validate().is_err());
        assert!(course("   ").validate().is_err());
        assert!(course("!!!").validate().is_err());
    }

    #[test]
    fn test_validate_description_bounds() {
        let mut ok_min = course("t");
        ok_min.description = Some("x".repeat(MIN_DESCRIPTION_LENGTH));
        assert!(ok_min.validate().is_ok());

        let mut ok_max = course("t");
        ok_max.description = Some("x".repeat(MAX_DESCRIPTION_LENGTH));
        assert!(ok_max.validate().is_ok());

        let mut too_short = course("t");
        too_short.description = Some("x".repeat(MIN_DESCRIPTION_LENGTH - 1));
        assert!(too_short.validate().is_err());

        let mut too_long = course("t");
        too_long.description = Some("x".repeat(MAX_DESCRIPTION_LENGTH + 1));
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_validate_topics_bounds() {
        for ok in [MIN_TOPICS, 3, MAX_TOPICS] {
            let mut c = course("t");
            c.number_of_topics = Some(ok);
            assert!(c.validate().is_ok(), "{} should be accepted", ok);
        }
        for bad in [MIN_TOPICS - 1, MAX_TOPICS + 1] {
            let mut c = course("t");
            c.number_of_topics = Some(bad);
            assert!(c.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_info_renders_current_values() {
        let description = "a".repeat(52);
        let mut c = course("Mongoose 101");
        c.description = Some(description.clone());
        c.number_of_topics = Some(5);
        assert_eq!(
            c.info(),
            format!("{}. Temas: 5. Fecha de lanzamiento: undefined.", description)
        );

        c.published_at = Some("2024-03-01T00:00:00+00:00".to_string());
        assert_eq!(
            c.info(),
            format!(
                "{}. Temas: 5. Fecha de lanzamiento: 2024-03-01T00:00:00+00:00.",
                description
            )
        );
    }

    #[test]
    fn test_info_renders_absent_fields_as_undefined() {
        let mut c = course("bare");
        c.number_of_topics = None;
        assert_eq!(
            c.info(),
            "undefined. Temas: undefined. Fecha de lanzamiento: undefined."
        );
    }
}
