use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::CurriculumService;
use models::curriculum::CourseDraft;

use crate::{dtos::catalog::CourseEditorResponse, error::ApiError, state::AppState};

/// Create a course together with its sections and lessons
#[utoipa::path(
    post,
    path = "/teacher/{teacher_id}/courses",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    request_body = CourseDraft,
    responses(
        (status = 201, description = "Course created", body = CourseEditorResponse),
        (status = 400, description = "Missing title or negative price"),
        (status = 404, description = "Teacher not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Curriculum"
)]
pub async fn create_course(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
    Json(draft): Json<CourseDraft>,
) -> Result<(StatusCode, Json<CourseEditorResponse>), ApiError> {
    let created = CurriculumService::create_course(&state.db, teacher_id, draft).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update course fields and merge the submitted curriculum
///
/// Sections and lessons carrying a known id are updated in place, the rest
/// are created. Nothing is deleted.
#[utoipa::path(
    put,
    path = "/teacher/{teacher_id}/courses/{course_code}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("course_code" = String, Path, description = "Public course code")
    ),
    request_body = CourseDraft,
    responses(
        (status = 200, description = "Course updated", body = CourseEditorResponse),
        (status = 400, description = "Missing title or negative price"),
        (status = 404, description = "Course not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Curriculum"
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path((teacher_id, course_code)): Path<(i32, String)>,
    Json(draft): Json<CourseDraft>,
) -> Result<Json<CourseEditorResponse>, ApiError> {
    let updated =
        CurriculumService::update_course(&state.db, teacher_id, &course_code, draft).await?;

    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/teacher/{teacher_id}/courses/{course_code}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("course_code" = String, Path, description = "Public course code")
    ),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Course not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Curriculum"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path((teacher_id, course_code)): Path<(i32, String)>,
) -> Result<StatusCode, ApiError> {
    CurriculumService::delete_course(&state.db, teacher_id, &course_code).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a section and its lessons
#[utoipa::path(
    delete,
    path = "/teacher/{teacher_id}/courses/{course_code}/variants/{variant_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("course_code" = String, Path, description = "Public course code"),
        ("variant_id" = String, Path, description = "Public section id")
    ),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 404, description = "Course or section not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Curriculum"
)]
pub async fn delete_variant(
    State(state): State<AppState>,
    Path((teacher_id, course_code, variant_id)): Path<(i32, String, String)>,
) -> Result<StatusCode, ApiError> {
    CurriculumService::delete_variant(&state.db, teacher_id, &course_code, &variant_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/teacher/{teacher_id}/courses/{course_code}/variants/{variant_id}/items/{item_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("course_code" = String, Path, description = "Public course code"),
        ("variant_id" = String, Path, description = "Public section id"),
        ("item_id" = String, Path, description = "Public lesson id")
    ),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 404, description = "Course, section or lesson not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Curriculum"
)]
pub async fn delete_variant_item(
    State(state): State<AppState>,
    Path((teacher_id, course_code, variant_id, item_id)): Path<(i32, String, String, String)>,
) -> Result<StatusCode, ApiError> {
    CurriculumService::delete_variant_item(
        &state.db,
        teacher_id,
        &course_code,
        &variant_id,
        &item_id,
    )
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
