use chrono::NaiveDateTime;
use database::{
    entities::{course, review, teacher, variant_item},
    services::{CategorySummary, CourseDetail, Curriculum},
};
use models::status::{Language, Level};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Public view of a course; prices are in cents
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: i32,
    pub code: String,
    pub slug: Option<String>,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub file: Option<String>,
    pub price: i64,
    pub level: Level,
    pub language: Language,
    pub featured: bool,
    pub category_id: Option<i32>,
    pub teacher_id: i32,
    pub created_at: NaiveDateTime,
}

impl From<course::Model> for CourseResponse {
    fn from(course: course::Model) -> Self {
        Self {
            id: course.id,
            code: course.code,
            slug: course.slug,
            title: course.title,
            description: course.description,
            image: course.image,
            file: course.file,
            price: course.price,
            level: course.level,
            language: course.language,
            featured: course.featured,
            category_id: course.category_id,
            teacher_id: course.teacher_id,
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub title: String,
    pub image: Option<String>,
    pub slug: Option<String>,
    pub course_count: u64,
}

impl From<CategorySummary> for CategoryResponse {
    fn from(summary: CategorySummary) -> Self {
        Self {
            id: summary.category.id,
            title: summary.category.title,
            image: summary.category.image,
            slug: summary.category.slug,
            course_count: summary.course_count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherResponse {
    pub id: i32,
    pub full_name: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub about: Option<String>,
    pub country: Option<String>,
}

impl From<teacher::Model> for TeacherResponse {
    fn from(teacher: teacher::Model) -> Self {
        Self {
            id: teacher.id,
            full_name: teacher.full_name,
            bio: teacher.bio,
            image: teacher.image,
            about: teacher.about,
            country: teacher.country,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LessonResponse {
    pub variant_item_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Withheld on the public page unless the lesson is a preview
    pub file: Option<String>,
    pub duration_seconds: Option<f64>,
    pub content_duration: Option<String>,
    pub preview: bool,
}

impl LessonResponse {
    fn new(item: variant_item::Model, public: bool) -> Self {
        let file = if public && !item.preview {
            None
        } else {
            item.file
        };

        Self {
            variant_item_id: item.code,
            title: item.title,
            description: item.description,
            file,
            duration_seconds: item.duration_seconds,
            content_duration: item.content_duration,
            preview: item.preview,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariantResponse {
    pub variant_id: String,
    pub title: String,
    pub items: Vec<LessonResponse>,
}

/// Curriculum as nested sections; `public` hides non-preview media
pub fn curriculum_response(curriculum: Curriculum, public: bool) -> Vec<VariantResponse> {
    curriculum
        .into_iter()
        .map(|(variant, items)| VariantResponse {
            variant_id: variant.code,
            title: variant.title,
            items: items
                .into_iter()
                .map(|item| LessonResponse::new(item, public))
                .collect(),
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub user_id: Option<i32>,
    pub course_id: i32,
    pub rating: i32,
    pub review: String,
    pub reply: Option<String>,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<review::Model> for ReviewResponse {
    fn from(review: review::Model) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            course_id: review.course_id,
            rating: review.rating,
            review: review.review,
            reply: review.reply,
            active: review.active,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    pub teacher: Option<TeacherResponse>,
    pub curriculum: Vec<VariantResponse>,
    pub lecture_count: usize,
    pub reviews: Vec<ReviewResponse>,
    pub average_rating: Option<f64>,
    pub rating_count: usize,
}

impl From<CourseDetail> for CourseDetailResponse {
    fn from(detail: CourseDetail) -> Self {
        let rating_count = detail.rating_count();
        let lecture_count = detail
            .curriculum
            .iter()
            .map(|(_, items)| items.len())
            .sum();

        Self {
            course: detail.course.into(),
            teacher: detail.teacher.map(Into::into),
            curriculum: curriculum_response(detail.curriculum, true),
            lecture_count,
            reviews: detail.reviews.into_iter().map(Into::into).collect(),
            average_rating: detail.average_rating,
            rating_count,
        }
    }
}

/// A course as its teacher edits it, media included
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseEditorResponse {
    pub course: CourseResponse,
    pub curriculum: Vec<VariantResponse>,
}

impl From<(course::Model, Curriculum)> for CourseEditorResponse {
    fn from((course, curriculum): (course::Model, Curriculum)) -> Self {
        Self {
            course: course.into(),
            curriculum: curriculum_response(curriculum, false),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Case-insensitive substring of the course title
    pub query: String,
}
