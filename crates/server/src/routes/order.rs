use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::{CouponOutcome, CouponService, NewOrder, OrderService};

use crate::{
    dtos::{
        known_user,
        order::{
            ApplyCouponBody, CheckoutResponse, CouponResponse, CreateOrderBody,
            OrderCreatedResponse,
        },
    },
    error::ApiError,
    state::AppState,
};

/// Turn every line of a cart into an order awaiting payment
#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderBody,
    responses(
        (status = 201, description = "Order created", body = OrderCreatedResponse),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(body): Json<CreateOrderBody>,
) -> Result<(StatusCode, Json<OrderCreatedResponse>), ApiError> {
    let order = OrderService::create_order(
        &state.db,
        NewOrder {
            full_name: body.full_name,
            email: body.email,
            country: body.country,
            cart_id: body.cart_id,
            user_id: known_user(body.user_id),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            message: "Order Created Successfully".to_string(),
            order_oid: order.oid,
        }),
    ))
}

/// Order with items, applied coupons and teachers
#[utoipa::path(
    get,
    path = "/orders/{oid}",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    responses(
        (status = 200, description = "Order found", body = CheckoutResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders"
)]
pub async fn get_checkout(
    State(state): State<AppState>,
    Path(oid): Path<String>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let detail = OrderService::checkout(&state.db, &oid).await?;

    Ok(Json(detail.into()))
}

/// Apply a teacher's coupon to the first matching item of the order
#[utoipa::path(
    post,
    path = "/orders/{oid}/coupon",
    params(
        ("oid" = String, Path, description = "Public order code")
    ),
    request_body = ApplyCouponBody,
    responses(
        (status = 200, description = "Coupon applied, already applied, or not applicable", body = CouponResponse),
        (status = 404, description = "Order or coupon not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Orders"
)]
pub async fn apply_coupon(
    State(state): State<AppState>,
    Path(oid): Path<String>,
    Json(body): Json<ApplyCouponBody>,
) -> Result<Json<CouponResponse>, ApiError> {
    let response = match CouponService::apply(&state.db, &oid, &body.coupon_code).await? {
        CouponOutcome::Applied {
            order, discount, ..
        } => CouponResponse {
            message: "Coupon Found and Activated".to_string(),
            discount: Some(discount),
            order: Some(order.into()),
        },
        CouponOutcome::AlreadyApplied => CouponResponse {
            message: "Coupon Already Applied".to_string(),
            discount: None,
            order: None,
        },
        CouponOutcome::NoEligibleItems => CouponResponse {
            message: "Coupon does not apply to any course in this order".to_string(),
            discount: None,
            order: None,
        },
    };

    Ok(Json(response))
}
