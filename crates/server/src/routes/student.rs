use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::{LessonToggle, StudentService, WishlistToggle};

use crate::{
    dtos::{
        MessageResponse,
        catalog::ReviewResponse,
        student::{
            EnrollmentDetailResponse, EnrollmentResponse, LessonToggleBody, NoteBody,
            NoteResponse, QuestionBody, QuestionMessageBody, QuestionResponse, ReviewBody,
            ReviewUpdateBody, StudentSummaryResponse, WishlistBody, WishlistResponse,
        },
    },
    error::ApiError,
    state::AppState,
};

/// Counts shown on the student dashboard
#[utoipa::path(
    get,
    path = "/student/{user_id}/summary",
    params(("user_id" = i32, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Dashboard counts", body = StudentSummaryResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<StudentSummaryResponse>, ApiError> {
    let summary = StudentService::summary(&state.db, user_id).await?;

    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/student/{user_id}/courses",
    params(("user_id" = i32, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Enrolled courses", body = Vec<EnrollmentResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_enrolled_courses(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let enrollments = StudentService::enrolled_courses(&state.db, user_id).await?;

    Ok(Json(
        enrollments
            .into_iter()
            .map(|(enrollment, course)| EnrollmentResponse::new(enrollment, course))
            .collect(),
    ))
}

/// Curriculum, progress, notes, questions and review of one enrollment
#[utoipa::path(
    get,
    path = "/student/{user_id}/courses/{enrollment_id}",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id")
    ),
    responses(
        (status = 200, description = "Enrollment detail", body = EnrollmentDetailResponse),
        (status = 403, description = "Not enrolled"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_enrolled_course(
    State(state): State<AppState>,
    Path((user_id, enrollment_id)): Path<(i32, String)>,
) -> Result<Json<EnrollmentDetailResponse>, ApiError> {
    let detail = StudentService::enrolled_course_detail(&state.db, user_id, &enrollment_id).await?;

    Ok(Json(detail.into()))
}

/// Mark a lesson complete, or undo it when already complete
#[utoipa::path(
    post,
    path = "/student/{user_id}/lessons/toggle",
    params(("user_id" = i32, Path, description = "Student user id")),
    request_body = LessonToggleBody,
    responses(
        (status = 200, description = "Lesson completion toggled", body = MessageResponse),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Lesson not found in this course"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn toggle_lesson(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<LessonToggleBody>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = match StudentService::toggle_lesson(
        &state.db,
        user_id,
        body.course_id,
        &body.variant_item_id,
    )
    .await?
    {
        LessonToggle::Completed(_) => "Course Marked As Completed",
        LessonToggle::Uncompleted => "Course Marked As Not Completed",
    };

    Ok(Json(MessageResponse::new(message)))
}

#[utoipa::path(
    get,
    path = "/student/{user_id}/courses/{enrollment_id}/notes",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id")
    ),
    responses(
        (status = 200, description = "Notes of the enrollment", body = Vec<NoteResponse>),
        (status = 403, description = "Not enrolled"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_notes(
    State(state): State<AppState>,
    Path((user_id, enrollment_id)): Path<(i32, String)>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    let notes = StudentService::list_notes(&state.db, user_id, &enrollment_id).await?;

    Ok(Json(notes.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/student/{user_id}/courses/{enrollment_id}/notes",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id")
    ),
    request_body = NoteBody,
    responses(
        (status = 201, description = "Note created", body = NoteResponse),
        (status = 403, description = "Not enrolled"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn create_note(
    State(state): State<AppState>,
    Path((user_id, enrollment_id)): Path<(i32, String)>,
    Json(body): Json<NoteBody>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let note =
        StudentService::create_note(&state.db, user_id, &enrollment_id, body.title, body.note)
            .await?;

    Ok((StatusCode::CREATED, Json(note.into())))
}

#[utoipa::path(
    get,
    path = "/student/{user_id}/courses/{enrollment_id}/notes/{note_id}",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id"),
        ("note_id" = String, Path, description = "Public note id")
    ),
    responses(
        (status = 200, description = "Note found", body = NoteResponse),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_note(
    State(state): State<AppState>,
    Path((user_id, enrollment_id, note_id)): Path<(i32, String, String)>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = StudentService::get_note(&state.db, user_id, &enrollment_id, &note_id).await?;

    Ok(Json(note.into()))
}

#[utoipa::path(
    put,
    path = "/student/{user_id}/courses/{enrollment_id}/notes/{note_id}",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id"),
        ("note_id" = String, Path, description = "Public note id")
    ),
    request_body = NoteBody,
    responses(
        (status = 200, description = "Note updated", body = NoteResponse),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn update_note(
    State(state): State<AppState>,
    Path((user_id, enrollment_id, note_id)): Path<(i32, String, String)>,
    Json(body): Json<NoteBody>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = StudentService::update_note(
        &state.db,
        user_id,
        &enrollment_id,
        &note_id,
        body.title,
        body.note,
    )
    .await?;

    Ok(Json(note.into()))
}

#[utoipa::path(
    delete,
    path = "/student/{user_id}/courses/{enrollment_id}/notes/{note_id}",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("enrollment_id" = String, Path, description = "Public enrollment id"),
        ("note_id" = String, Path, description = "Public note id")
    ),
    responses(
        (status = 204, description = "Note deleted"),
        (status = 403, description = "Not enrolled"),
        (status = 404, description = "Note not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn delete_note(
    State(state): State<AppState>,
    Path((user_id, enrollment_id, note_id)): Path<(i32, String, String)>,
) -> Result<StatusCode, ApiError> {
    StudentService::delete_note(&state.db, user_id, &enrollment_id, &note_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/student/{user_id}/reviews",
    params(("user_id" = i32, Path, description = "Student user id")),
    request_body = ReviewBody,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Rating outside 1 to 5"),
        (status = 404, description = "User or course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn rate_course(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let review =
        StudentService::rate_course(&state.db, user_id, body.course_id, body.rating, body.review)
            .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

#[utoipa::path(
    put,
    path = "/student/{user_id}/reviews/{review_id}",
    params(
        ("user_id" = i32, Path, description = "Student user id"),
        ("review_id" = i32, Path, description = "Review id")
    ),
    request_body = ReviewUpdateBody,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Rating outside 1 to 5"),
        (status = 404, description = "Review not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn update_review(
    State(state): State<AppState>,
    Path((user_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<ReviewUpdateBody>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review =
        StudentService::update_review(&state.db, user_id, review_id, body.rating, body.review)
            .await?;

    Ok(Json(review.into()))
}

#[utoipa::path(
    get,
    path = "/student/{user_id}/wishlist",
    params(("user_id" = i32, Path, description = "Student user id")),
    responses(
        (status = 200, description = "Wishlisted courses", body = Vec<WishlistResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<Vec<WishlistResponse>>, ApiError> {
    let entries = StudentService::wishlist(&state.db, user_id).await?;

    Ok(Json(
        entries
            .into_iter()
            .map(|(entry, course)| WishlistResponse::new(entry, course))
            .collect(),
    ))
}

/// Add the course to the wishlist, or remove it when already there
#[utoipa::path(
    post,
    path = "/student/{user_id}/wishlist",
    params(("user_id" = i32, Path, description = "Student user id")),
    request_body = WishlistBody,
    responses(
        (status = 201, description = "Added to wishlist", body = MessageResponse),
        (status = 200, description = "Removed from wishlist", body = MessageResponse),
        (status = 404, description = "User or course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<WishlistBody>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let toggled = StudentService::toggle_wishlist(&state.db, user_id, body.course_id).await?;
    let (status, message) = match toggled {
        WishlistToggle::Added => (StatusCode::CREATED, "Wishlist Created"),
        WishlistToggle::Removed => (StatusCode::OK, "Wishlist Deleted"),
    };

    Ok((status, Json(MessageResponse::new(message))))
}

/// Q&A threads of a course with their messages
#[utoipa::path(
    get,
    path = "/questions/{course_id}",
    params(("course_id" = i32, Path, description = "Course id")),
    responses(
        (status = 200, description = "Question threads", body = Vec<QuestionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_questions(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let threads = StudentService::questions(&state.db, course_id).await?;

    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

/// Start a question thread with its first message
#[utoipa::path(
    post,
    path = "/student/{user_id}/questions",
    params(("user_id" = i32, Path, description = "Asking user id")),
    request_body = QuestionBody,
    responses(
        (status = 201, description = "Question created", body = QuestionResponse),
        (status = 403, description = "Neither enrolled nor the course teacher"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn ask_question(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
    Json(body): Json<QuestionBody>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    let thread =
        StudentService::ask_question(&state.db, body.course_id, user_id, body.title, body.message)
            .await?;

    Ok((StatusCode::CREATED, Json(thread.into())))
}

/// Reply in a thread; returns the whole thread
#[utoipa::path(
    post,
    path = "/student/{user_id}/questions/{qa_id}/messages",
    params(
        ("user_id" = i32, Path, description = "Replying user id"),
        ("qa_id" = String, Path, description = "Public thread id")
    ),
    request_body = QuestionMessageBody,
    responses(
        (status = 200, description = "Updated thread", body = QuestionResponse),
        (status = 403, description = "Neither enrolled nor the course teacher"),
        (status = 404, description = "Thread not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn send_message(
    State(state): State<AppState>,
    Path((user_id, qa_id)): Path<(i32, String)>,
    Json(body): Json<QuestionMessageBody>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let thread =
        StudentService::send_message(&state.db, body.course_id, &qa_id, user_id, body.message)
            .await?;

    Ok(Json(thread.into()))
}
