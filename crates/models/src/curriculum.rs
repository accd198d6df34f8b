//! Nested curriculum payloads
//!
//! A course body carries an ordered list of variants (sections), each with an
//! ordered list of lecture items. Public codes select rows to update in place;
//! entries without a code are created.

use serde::{Deserialize, Serialize};

use crate::{
    money::Cents,
    status::{Language, Level, TeacherCourseStatus},
    text::is_issued_url,
};

/// Course fields a teacher submits when creating or editing a course
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CourseDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ignored on update unless it names an existing category
    #[serde(default)]
    pub category_id: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    /// Price in cents
    #[serde(default)]
    pub price: Cents,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub teacher_course_status: TeacherCourseStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub variants: Vec<CurriculumVariant>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CurriculumVariant {
    /// Public code of an existing variant; omitted for a new one
    #[serde(default)]
    pub variant_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub items: Vec<CurriculumItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CurriculumItem {
    /// Public code of an existing lecture; omitted for a new one
    #[serde(default)]
    pub variant_item_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Media reference; an already issued URL keeps the stored media
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub preview: bool,
    /// Length reported by the media pipeline
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// Decides the stored media reference after an edit
///
/// `None` clears the field, an issued URL leaves the stored value alone and
/// anything else is a fresh upload reference.
pub fn resolve_media(existing: Option<String>, incoming: Option<String>) -> Option<String> {
    match incoming {
        None => None,
        Some(value) if is_issued_url(&value) => existing,
        Some(value) => Some(value),
    }
}
