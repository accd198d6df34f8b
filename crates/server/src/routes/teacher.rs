use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::TeacherService;

use crate::{
    dtos::{
        catalog::{CourseResponse, ReviewResponse},
        student::QuestionResponse,
        teacher::{
            BestSellingCourseResponse, CouponBody, MonthlyEarningResponse, NotificationResponse,
            ReviewReplyBody, SoldItemResponse, TeacherCouponResponse, TeacherStudentResponse,
            TeacherSummaryResponse,
        },
    },
    error::ApiError,
    state::AppState,
};

/// Courses, students and revenue of a teacher
#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/summary",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Dashboard figures", body = TeacherSummaryResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_summary(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<TeacherSummaryResponse>, ApiError> {
    let summary = TeacherService::summary(&state.db, teacher_id).await?;

    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/courses",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "All courses of the teacher, any status", body = Vec<CourseResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_courses(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = TeacherService::courses(&state.db, teacher_id).await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

/// Items the teacher sold in paid orders
#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/order-items",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Sold items, newest first", body = Vec<SoldItemResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_order_items(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<SoldItemResponse>>, ApiError> {
    let items = TeacherService::order_items(&state.db, teacher_id).await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/earnings",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Revenue per calendar month", body = Vec<MonthlyEarningResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_monthly_earnings(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<MonthlyEarningResponse>>, ApiError> {
    let earnings = TeacherService::monthly_earnings(&state.db, teacher_id).await?;

    Ok(Json(earnings.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/best-selling-courses",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Courses by revenue", body = Vec<BestSellingCourseResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_best_selling_courses(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<BestSellingCourseResponse>>, ApiError> {
    let courses = TeacherService::best_selling_courses(&state.db, teacher_id).await?;

    Ok(Json(courses.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/students",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Distinct enrolled students", body = Vec<TeacherStudentResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_students(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<TeacherStudentResponse>>, ApiError> {
    let students = TeacherService::students(&state.db, teacher_id).await?;

    Ok(Json(students.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/reviews",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Reviews of the teacher's courses", body = Vec<ReviewResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_reviews(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = TeacherService::reviews(&state.db, teacher_id).await?;

    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// Reply to a review and optionally hide or show it
#[utoipa::path(
    patch,
    path = "/teacher/{teacher_id}/reviews/{review_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("review_id" = i32, Path, description = "Review id")
    ),
    request_body = ReviewReplyBody,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 404, description = "Review not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn reply_review(
    State(state): State<AppState>,
    Path((teacher_id, review_id)): Path<(i32, i32)>,
    Json(body): Json<ReviewReplyBody>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review =
        TeacherService::reply_review(&state.db, teacher_id, review_id, body.reply, body.active)
            .await?;

    Ok(Json(review.into()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/questions",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Q&A threads across the teacher's courses", body = Vec<QuestionResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_questions(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<QuestionResponse>>, ApiError> {
    let threads = TeacherService::questions(&state.db, teacher_id).await?;

    Ok(Json(threads.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/coupons",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Coupons of the teacher", body = Vec<TeacherCouponResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_coupons(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<TeacherCouponResponse>>, ApiError> {
    let coupons = TeacherService::coupons(&state.db, teacher_id).await?;

    Ok(Json(coupons.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/teacher/{teacher_id}/coupons",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    request_body = CouponBody,
    responses(
        (status = 201, description = "Coupon created", body = TeacherCouponResponse),
        (status = 400, description = "Invalid code or discount"),
        (status = 404, description = "Teacher not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn create_coupon(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
    Json(body): Json<CouponBody>,
) -> Result<(StatusCode, Json<TeacherCouponResponse>), ApiError> {
    let coupon = TeacherService::create_coupon(&state.db, teacher_id, body.into()).await?;

    Ok((StatusCode::CREATED, Json(coupon.into())))
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/coupons/{coupon_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("coupon_id" = i32, Path, description = "Coupon id")
    ),
    responses(
        (status = 200, description = "Coupon found", body = TeacherCouponResponse),
        (status = 404, description = "Coupon not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_coupon(
    State(state): State<AppState>,
    Path((teacher_id, coupon_id)): Path<(i32, i32)>,
) -> Result<Json<TeacherCouponResponse>, ApiError> {
    let coupon = TeacherService::coupon(&state.db, teacher_id, coupon_id).await?;

    Ok(Json(coupon.into()))
}

#[utoipa::path(
    put,
    path = "/teacher/{teacher_id}/coupons/{coupon_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("coupon_id" = i32, Path, description = "Coupon id")
    ),
    request_body = CouponBody,
    responses(
        (status = 200, description = "Coupon updated", body = TeacherCouponResponse),
        (status = 400, description = "Invalid code or discount"),
        (status = 404, description = "Coupon not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn update_coupon(
    State(state): State<AppState>,
    Path((teacher_id, coupon_id)): Path<(i32, i32)>,
    Json(body): Json<CouponBody>,
) -> Result<Json<TeacherCouponResponse>, ApiError> {
    let coupon =
        TeacherService::update_coupon(&state.db, teacher_id, coupon_id, body.into()).await?;

    Ok(Json(coupon.into()))
}

#[utoipa::path(
    delete,
    path = "/teacher/{teacher_id}/coupons/{coupon_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("coupon_id" = i32, Path, description = "Coupon id")
    ),
    responses(
        (status = 204, description = "Coupon deleted"),
        (status = 404, description = "Coupon not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn delete_coupon(
    State(state): State<AppState>,
    Path((teacher_id, coupon_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    TeacherService::delete_coupon(&state.db, teacher_id, coupon_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/teacher/{teacher_id}/notifications",
    params(("teacher_id" = i32, Path, description = "Teacher id")),
    responses(
        (status = 200, description = "Unseen notifications", body = Vec<NotificationResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn get_notifications(
    State(state): State<AppState>,
    Path(teacher_id): Path<i32>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let notifications = TeacherService::unseen_notifications(&state.db, teacher_id).await?;

    Ok(Json(notifications.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    patch,
    path = "/teacher/{teacher_id}/notifications/{notification_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("notification_id" = i32, Path, description = "Notification id")
    ),
    responses(
        (status = 200, description = "Notification marked seen", body = NotificationResponse),
        (status = 404, description = "Notification not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn mark_notification_seen(
    State(state): State<AppState>,
    Path((teacher_id, notification_id)): Path<(i32, i32)>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let notification =
        TeacherService::mark_notification_seen(&state.db, teacher_id, notification_id).await?;

    Ok(Json(notification.into()))
}

#[utoipa::path(
    delete,
    path = "/teacher/{teacher_id}/notifications/{notification_id}",
    params(
        ("teacher_id" = i32, Path, description = "Teacher id"),
        ("notification_id" = i32, Path, description = "Notification id")
    ),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 404, description = "Notification not found for this teacher"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Teacher"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    Path((teacher_id, notification_id)): Path<(i32, i32)>,
) -> Result<StatusCode, ApiError> {
    TeacherService::delete_notification(&state.db, teacher_id, notification_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
