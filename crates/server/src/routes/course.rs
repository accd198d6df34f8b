use axum::{
    Json,
    extract::{Path, Query, State},
};
use database::services::CatalogService;

use crate::{
    dtos::catalog::{CategoryResponse, CourseDetailResponse, CourseResponse, SearchParams},
    error::ApiError,
    state::AppState,
};

/// Active categories with their number of published courses
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError> {
    let categories = CatalogService::list_categories(&state.db).await?;

    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// Every published course, newest first
#[utoipa::path(
    get,
    path = "/courses",
    responses(
        (status = 200, description = "Courses retrieved successfully", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = CatalogService::list_published_courses(&state.db).await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Published courses whose title contains the query
#[utoipa::path(
    get,
    path = "/courses/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching courses", body = Vec<CourseResponse>),
        (status = 400, description = "Missing query"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn search_courses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = CatalogService::search_courses(&state.db, &params.query).await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Course page with curriculum and reviews
#[utoipa::path(
    get,
    path = "/courses/{slug}",
    params(
        ("slug" = String, Path, description = "Course slug")
    ),
    responses(
        (status = 200, description = "Course found", body = CourseDetailResponse),
        (status = 404, description = "Course not found or not published"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CourseDetailResponse>, ApiError> {
    let detail = CatalogService::course_detail(&state.db, &slug).await?;

    Ok(Json(detail.into()))
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestApp;
    use axum::http::{Method, StatusCode};
    use database::services::CurriculumService;
    use models::curriculum::{CourseDraft, CurriculumItem, CurriculumVariant};
    use payments::CardPaymentStatus;
    use testresult::TestResult;

    #[tokio::test]
    async fn test_course_page_hides_paid_media() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;
        let ada = app.teacher("ada").await?;
        let (course, _) = CurriculumService::create_course(
            &app.db,
            ada.id,
            CourseDraft {
                title: "Async Rust".to_string(),
                price: 40_00,
                variants: vec![CurriculumVariant {
                    title: "Futures".to_string(),
                    items: vec![
                        CurriculumItem {
                            title: "Trailer".to_string(),
                            file: Some("trailer.mp4".to_string()),
                            preview: true,
                            ..Default::default()
                        },
                        CurriculumItem {
                            title: "Pinning".to_string(),
                            file: Some("pinning.mp4".to_string()),
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                }],
                ..Default::default()
            },
        )
        .await?;
        let slug = course.slug.ok_or("course without slug")?;

        let (status, _, detail) = app
            .send(Method::GET, &format!("/api/v1/courses/{slug}"), None)
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["lecture_count"], 2);
        let items = &detail["curriculum"][0]["items"];
        assert_eq!(items[0]["file"], "trailer.mp4");
        assert!(items[1]["file"].is_null());

        Ok(())
    }

    #[tokio::test]
    async fn test_search_and_missing_course() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;
        let ada = app.teacher("ada").await?;
        app.course(ada.id, "Intro to Rust", 10_00).await?;
        app.course(ada.id, "Cooking", 10_00).await?;

        let (_, _, found) = app
            .send(Method::GET, "/api/v1/courses/search?query=RUST", None)
            .await?;
        assert_eq!(found.as_array().map(Vec::len), Some(1));
        assert_eq!(found[0]["title"], "Intro to Rust");

        let (status, _, body) = app
            .send(Method::GET, "/api/v1/courses/no-such-course-9", None)
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "course not found");

        Ok(())
    }
}
