use axum::{
    Json,
    extract::{Path, State},
    response::Redirect,
};
use log::info;
use payments::{ConfirmPayment, ConfirmationOutcome, PaymentError};

use crate::{
    dtos::payment::{ConfirmPaymentBody, PaymentResponse},
    error::ApiError,
    state::AppState,
};

/// Open a hosted card checkout for the order and redirect to it
#[utoipa::path(
    post,
    path = "/payments/{oid}/checkout",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    responses(
        (status = 303, description = "Redirect to the hosted checkout page"),
        (status = 400, description = "Order already paid"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Payment processor unavailable; safe to retry"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payments"
)]
pub async fn create_checkout(
    State(state): State<AppState>,
    Path(oid): Path<String>,
) -> Result<Redirect, ApiError> {
    let session = state.payments.create_checkout(&state.db, &oid).await?;
    let url = session.url.ok_or_else(|| {
        PaymentError::Gateway(format!("session {} has no checkout url", session.id))
    })?;

    Ok(Redirect::to(&url))
}

/// Check the processor's status for the order and settle it when paid
#[utoipa::path(
    post,
    path = "/payments/confirm",
    request_body = ConfirmPaymentBody,
    responses(
        (status = 200, description = "Payment settled now or earlier", body = PaymentResponse),
        (status = 400, description = "Missing or conflicting rail ids"),
        (status = 402, description = "Payment not completed"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Payment processor unavailable"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Payments"
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(body): Json<ConfirmPaymentBody>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let request = ConfirmPayment {
        order_oid: body.order_oid,
        session_id: body.session_id,
        paypal_order_id: body.paypal_order_id,
    };

    match state.payments.confirm(&state.db, &request).await? {
        ConfirmationOutcome::Paid { order, enrollments } => {
            info!("Order {} paid, {enrollments} enrollments", order.oid);
            Ok(Json(PaymentResponse {
                message: "Payment Successful".to_string(),
                order: order.into(),
            }))
        }
        ConfirmationOutcome::AlreadyPaid(order) => Ok(Json(PaymentResponse {
            message: "Already Paid".to_string(),
            order: order.into(),
        })),
        ConfirmationOutcome::Unpaid => Err(ApiError::PaymentRequired(
            "You have not paid".to_string(),
        )),
        ConfirmationOutcome::Cancelled(_) => Err(ApiError::PaymentRequired(
            "Your payment was canceled".to_string(),
        )),
        ConfirmationOutcome::NotCompleted(status) => Err(ApiError::PaymentRequired(format!(
            "Payment failed, processor status {status}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::TestApp;
    use axum::http::{Method, StatusCode};
    use database::services::{CartLineRequest, CartService, NewOrder, OrderService};
    use models::status::PaymentStatus;
    use payments::CardPaymentStatus;
    use serde_json::json;
    use testresult::TestResult;

    async fn guest_order(app: &TestApp) -> TestResult<String> {
        let ada = app.teacher("ada").await?;
        let course = app.course(ada.id, "Rust", 110_00).await?;
        CartService::upsert_line(
            &app.db,
            CartLineRequest {
                cart_id: "guest".to_string(),
                course_id: course.id,
                user_id: None,
                price: course.price,
                country: "Nowhere".to_string(),
            },
        )
        .await?;

        let order = OrderService::create_order(
            &app.db,
            NewOrder {
                full_name: "Guest".to_string(),
                email: "guest@example.com".to_string(),
                country: "Nowhere".to_string(),
                cart_id: "guest".to_string(),
                user_id: None,
            },
        )
        .await?;

        Ok(order.oid)
    }

    #[tokio::test]
    async fn test_unpaid_session_is_payment_required() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Unpaid).await?;
        let oid = guest_order(&app).await?;
        let uri = format!("/api/v1/payments/{oid}/checkout");
        let (status, _, _) = app.send(Method::POST, &uri, None).await?;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (status, _, body) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(json!({ "order_oid": oid, "session_id": format!("cs_{oid}") })),
            )
            .await?;

        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["message"], "You have not paid");

        Ok(())
    }

    #[tokio::test]
    async fn test_confirmation_errors() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;
        let oid = guest_order(&app).await?;

        let (status, _, _) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(json!({ "order_oid": oid, "session_id": "cs_1", "paypal_order_id": "PP1" })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, body) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(json!({ "order_oid": "DMISSING", "paypal_order_id": "PP1" })),
            )
            .await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "order not found");

        Ok(())
    }

    #[tokio::test]
    async fn test_session_without_checkout_is_rejected() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Paid).await?;
        let oid = guest_order(&app).await?;

        let (status, _, _) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(json!({ "order_oid": oid, "session_id": "cs_DOTHER" })),
            )
            .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let order = OrderService::find_by_oid(&app.db, &oid).await?;
        assert_eq!(order.payment_status, PaymentStatus::Processing);

        Ok(())
    }

    #[tokio::test]
    async fn test_wallet_confirmation_settles_guest_order() -> TestResult {
        let app = TestApp::new(CardPaymentStatus::Unpaid).await?;
        let oid = guest_order(&app).await?;

        let (status, _, body) = app
            .send(
                Method::POST,
                "/api/v1/payments/confirm",
                Some(json!({ "order_oid": oid, "paypal_order_id": "PP1" })),
            )
            .await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["order"]["payment_status"], "Paid");
        assert_eq!(body["order"]["student_id"], serde_json::Value::Null);

        Ok(())
    }
}
