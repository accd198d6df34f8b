use crate::{
    ServiceError,
    entities::{category, course, review, teacher, variant, variant_item},
};
use models::status::{PlatformStatus, TeacherCourseStatus};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
    prelude::Expr,
    sea_query::Func,
};
use serde::Serialize;
use std::collections::HashMap;

/// Variants of a course in creation order, each with its lecture items
pub type Curriculum = Vec<(variant::Model, Vec<variant_item::Model>)>;

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    #[serde(flatten)]
    pub category: category::Model,
    pub course_count: u64,
}

/// Everything the public course page shows
#[derive(Debug, Clone)]
pub struct CourseDetail {
    pub course: course::Model,
    pub teacher: Option<teacher::Model>,
    pub curriculum: Curriculum,
    pub reviews: Vec<review::Model>,
    pub average_rating: Option<f64>,
}

impl CourseDetail {
    pub fn rating_count(&self) -> usize {
        self.reviews.len()
    }
}

pub struct CatalogService;

impl CatalogService {
    /// Condition matching courses both the platform and the teacher published
    pub fn published() -> Condition {
        Condition::all()
            .add(course::Column::PlatformStatus.eq(PlatformStatus::Published))
            .add(course::Column::TeacherCourseStatus.eq(TeacherCourseStatus::Published))
    }

    /// Active categories ordered by title, with how many courses each holds
    pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<CategorySummary>, DbErr> {
        let categories = category::Entity::find()
            .filter(category::Column::Active.eq(true))
            .order_by_asc(category::Column::Title)
            .all(db)
            .await?;

        let mut summaries = Vec::with_capacity(categories.len());
        for category in categories {
            let course_count = course::Entity::find()
                .filter(course::Column::CategoryId.eq(category.id))
                .count(db)
                .await?;
            summaries.push(CategorySummary {
                category,
                course_count,
            });
        }

        Ok(summaries)
    }

    pub async fn list_published_courses(
        db: &DatabaseConnection,
    ) -> Result<Vec<course::Model>, DbErr> {
        course::Entity::find()
            .filter(Self::published())
            .order_by_desc(course::Column::CreatedAt)
            .order_by_desc(course::Column::Id)
            .all(db)
            .await
    }

    /// Case-insensitive title search over published courses
    pub async fn search_courses(
        db: &DatabaseConnection,
        query: &str,
    ) -> Result<Vec<course::Model>, DbErr> {
        let pattern = format!("%{}%", query.trim().to_lowercase());

        course::Entity::find()
            .filter(Self::published())
            .filter(Expr::expr(Func::lower(Expr::col(course::Column::Title))).like(pattern))
            .order_by_asc(course::Column::Title)
            .all(db)
            .await
    }

    /// Published course page by slug
    pub async fn course_detail(
        db: &DatabaseConnection,
        slug: &str,
    ) -> Result<CourseDetail, ServiceError> {
        let course = course::Entity::find()
            .filter(Self::published())
            .filter(course::Column::Slug.eq(slug))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("course"))?;

        let teacher = teacher::Entity::find_by_id(course.teacher_id).one(db).await?;
        let curriculum = Self::curriculum(db, course.id).await?;
        let reviews = review::Entity::find()
            .filter(review::Column::CourseId.eq(course.id))
            .filter(review::Column::Active.eq(true))
            .order_by_desc(review::Column::CreatedAt)
            .all(db)
            .await?;

        let average_rating = average_rating(&reviews);

        Ok(CourseDetail {
            course,
            teacher,
            curriculum,
            reviews,
            average_rating,
        })
    }

    /// Get the variants and lecture items of a single course
    pub async fn curriculum<C: ConnectionTrait>(
        db: &C,
        course_id: i32,
    ) -> Result<Curriculum, DbErr> {
        let mut by_course = Self::curricula(db, vec![course_id]).await?;
        Ok(by_course.remove(&course_id).unwrap_or_default())
    }

    /// Batch fetch the curricula of several courses, keyed by course id
    pub async fn curricula<C: ConnectionTrait>(
        db: &C,
        course_ids: Vec<i32>,
    ) -> Result<HashMap<i32, Curriculum>, DbErr> {
        if course_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let variants = variant::Entity::find()
            .filter(variant::Column::CourseId.is_in(course_ids))
            .order_by_asc(variant::Column::Id)
            .all(db)
            .await?;

        let variant_ids: Vec<i32> = variants.iter().map(|v| v.id).collect();

        let items = if variant_ids.is_empty() {
            vec![]
        } else {
            variant_item::Entity::find()
                .filter(variant_item::Column::VariantId.is_in(variant_ids))
                .order_by_asc(variant_item::Column::Id)
                .all(db)
                .await?
        };

        // Build lookup maps
        let mut items_by_variant: HashMap<i32, Vec<variant_item::Model>> = HashMap::new();
        for item in items {
            items_by_variant
                .entry(item.variant_id)
                .or_default()
                .push(item);
        }

        let mut curricula: HashMap<i32, Curriculum> = HashMap::new();
        for variant in variants {
            let variant_items = items_by_variant.remove(&variant.id).unwrap_or_default();
            curricula
                .entry(variant.course_id)
                .or_default()
                .push((variant, variant_items));
        }

        Ok(curricula)
    }
}

/// Mean rating rounded to one decimal place
pub(crate) fn average_rating(reviews: &[review::Model]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }

    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    let mean = sum as f64 / reviews.len() as f64;
    Some((mean * 10.0).round() / 10.0)
}
