use axum::http::StatusCode;

/// Points visitors at the API documentation
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", content_type = "text/plain", body = String)
    ),
    tag = "Health"
)]
pub async fn root() -> (StatusCode, &'static str) {
    (
        StatusCode::OK,
        "Course marketplace API, documentation at /docs",
    )
}
