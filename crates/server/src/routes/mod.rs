pub mod cart;
pub mod course;
pub mod curriculum;
pub mod health;
pub mod order;
pub mod payment;
pub mod root;
pub mod student;
pub mod teacher;

use axum::Router;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::{doc::ApiDoc, state::AppState};

/// Versioned API routes, documented as they are registered
fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        // catalog
        .routes(routes!(course::get_categories))
        .routes(routes!(course::get_courses))
        .routes(routes!(course::search_courses))
        .routes(routes!(course::get_course))
        // cart
        .routes(routes!(cart::add_to_cart))
        .routes(routes!(cart::get_cart))
        .routes(routes!(cart::get_cart_stats))
        .routes(routes!(cart::delete_cart_item))
        // orders and payment
        .routes(routes!(order::create_order))
        .routes(routes!(order::get_checkout))
        .routes(routes!(order::apply_coupon))
        .routes(routes!(payment::create_checkout))
        .routes(routes!(payment::confirm_payment))
        // student dashboard
        .routes(routes!(student::get_summary))
        .routes(routes!(student::get_enrolled_courses))
        .routes(routes!(student::get_enrolled_course))
        .routes(routes!(student::toggle_lesson))
        .routes(routes!(student::get_notes, student::create_note))
        .routes(routes!(
            student::get_note,
            student::update_note,
            student::delete_note
        ))
        .routes(routes!(student::rate_course))
        .routes(routes!(student::update_review))
        .routes(routes!(student::get_wishlist, student::toggle_wishlist))
        .routes(routes!(student::get_questions))
        .routes(routes!(student::ask_question))
        .routes(routes!(student::send_message))
        // teacher dashboard
        .routes(routes!(teacher::get_summary))
        .routes(routes!(teacher::get_courses, curriculum::create_course))
        .routes(routes!(teacher::get_order_items))
        .routes(routes!(teacher::get_monthly_earnings))
        .routes(routes!(teacher::get_best_selling_courses))
        .routes(routes!(teacher::get_students))
        .routes(routes!(teacher::get_reviews))
        .routes(routes!(teacher::reply_review))
        .routes(routes!(teacher::get_questions))
        .routes(routes!(teacher::get_coupons, teacher::create_coupon))
        .routes(routes!(
            teacher::get_coupon,
            teacher::update_coupon,
            teacher::delete_coupon
        ))
        .routes(routes!(teacher::get_notifications))
        .routes(routes!(
            teacher::mark_notification_seen,
            teacher::delete_notification
        ))
        // curriculum editing
        .routes(routes!(curriculum::update_course, curriculum::delete_course))
        .routes(routes!(curriculum::delete_variant))
        .routes(routes!(curriculum::delete_variant_item))
}

/// The complete application: API, OpenAPI document, Swagger UI and
/// response compression
pub fn router(state: AppState) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(root::root))
        .routes(routes!(health::health))
        .nest("/api/v1", api_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestApp;
    use axum::http::{Method, StatusCode, header};
    use payments::CardPaymentStatus;
    use serde_json::json;
    use testresult::TestResult;

    #[tokio::test]
    async fn test_health_and_openapi() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;

        let (status, _, _) = app.send(Method::GET, "/health", None).await?;
        assert_eq!(status, StatusCode::OK);

        let (status, _, doc) = app
            .send(Method::GET, "/api-docs/openapi.json", None)
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/v1/cart"].is_object());
        assert!(doc["paths"]["/api/v1/payments/confirm"]["post"].is_object());

        Ok(())
    }

    #[tokio::test]
    async fn test_purchase_flow() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;
        let ada = app.teacher("ada").await?;
        let rust = app.course(ada.id, "Rust", 110_00).await?;
        let sql = app.course(ada.id, "SQL", 55_00).await?;
        let student = app.user("student").await?;

        for course in [&rust, &sql, &rust] {
            app.send(
                Method::POST,
                "/api/v1/cart",
                Some(json!({
                    "cart_id": "cart-42",
                    "course_id": course.id,
                    "user_id": student.id,
                    "price": course.price,
                    "country": "Nowhere",
                })),
            )
            .await?;
        }

        let (_, _, cart) = app.send(Method::GET, "/api/v1/cart/cart-42", None).await?;
        assert_eq!(cart["items"].as_array().map(Vec::len), Some(2));
        assert_eq!(cart["stats"]["total"], 165_00);

        let (status, _, created) = app
            .send(
                Method::POST,
                "/api/v1/orders",
                Some(json!({
                    "full_name": "Student",
                    "email": "student@example.com",
                    "country": "Nowhere",
                    "cart_id": "cart-42",
                    "user_id": student.id,
                })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);
        let oid = created["order_oid"].as_str().ok_or("missing order oid")?.to_string();

        let (status, _, _) = app
            .send(
                Method::POST,
                &format!("/api/v1/teacher/{}/coupons", ada.id),
                Some(json!({ "code": "SAVE20", "discount": 20 })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED);

        let coupon_uri = format!("/api/v1/orders/{oid}/coupon");
        let (_, _, applied) = app
            .send(
                Method::POST,
                &coupon_uri,
                Some(json!({ "coupon_code": "save20" })),
            )
            .await?;
        assert_eq!(applied["discount"], 22_00);
        assert_eq!(applied["order"]["total"], 143_00);

        let (_, _, again) = app
            .send(
                Method::POST,
                &coupon_uri,
                Some(json!({ "coupon_code": "SAVE20" })),
            )
            .await?;
        assert_eq!(again["message"], "Coupon Already Applied");

        let (status, headers, _) = app
            .send(Method::POST, &format!("/api/v1/payments/{oid}/checkout"), None)
            .await?;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(
            headers
                .get(header::LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(format!("https://checkout.test/{oid}").as_str())
        );

        let confirmation = json!({ "order_oid": oid, "session_id": format!("cs_{oid}") });
        let (status, _, paid) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(confirmation.clone()),
            )
            .await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(paid["message"], "Payment Successful");
        assert_eq!(paid["order"]["payment_status"], "Paid");

        let (_, _, repeated) = app
            .send(Method::POST, "/api/v1/payments/confirm", Some(confirmation))
            .await?;
        assert_eq!(repeated["message"], "Already Paid");

        let (_, _, enrolled) = app
            .send(
                Method::GET,
                &format!("/api/v1/student/{}/courses", student.id),
                None,
            )
            .await?;
        assert_eq!(enrolled.as_array().map(Vec::len), Some(2));

        let (_, _, summary) = app
            .send(
                Method::GET,
                &format!("/api/v1/teacher/{}/summary", ada.id),
                None,
            )
            .await?;
        assert_eq!(summary["total_courses"], 2);
        assert_eq!(summary["total_students"], 1);

        Ok(())
    }
}
