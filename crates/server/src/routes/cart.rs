use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::{CartLineRequest, CartService, CartUpsert};

use crate::{
    dtos::{
        cart::{
            CartLineBody, CartLineResponse, CartQuery, CartResponse, CartStatsResponse,
            CartUpsertResponse,
        },
        known_user,
    },
    error::ApiError,
    state::AppState,
};

/// Add a course to a cart, or refresh its price and tax if already there
#[utoipa::path(
    post,
    path = "/cart",
    request_body = CartLineBody,
    responses(
        (status = 201, description = "Added to cart", body = CartUpsertResponse),
        (status = 200, description = "Cart updated", body = CartUpsertResponse),
        (status = 400, description = "Invalid price"),
        (status = 404, description = "Course or user not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(body): Json<CartLineBody>,
) -> Result<(StatusCode, Json<CartUpsertResponse>), ApiError> {
    let upsert = CartService::upsert_line(
        &state.db,
        CartLineRequest {
            cart_id: body.cart_id,
            course_id: body.course_id,
            user_id: known_user(body.user_id),
            price: body.price,
            country: body.country,
        },
    )
    .await?;

    let (status, message, line) = match upsert {
        CartUpsert::Created(line) => (StatusCode::CREATED, "Added To Cart Successfully", line),
        CartUpsert::Updated(line) => (StatusCode::OK, "Cart Updated Successfully", line),
    };

    Ok((
        status,
        Json(CartUpsertResponse {
            message: message.to_string(),
            line: CartLineResponse::new(line, None),
        }),
    ))
}

/// Lines of a cart together with its totals
#[utoipa::path(
    get,
    path = "/cart/{cart_id}",
    params(
        ("cart_id" = String, Path, description = "Client cart id"),
        CartQuery
    ),
    responses(
        (status = 200, description = "Cart contents", body = CartResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cart"
)]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Query(query): Query<CartQuery>,
) -> Result<Json<CartResponse>, ApiError> {
    let user_id = known_user(query.user_id);
    let lines = CartService::list(&state.db, &cart_id, user_id).await?;
    let stats = CartService::stats(&state.db, &cart_id, user_id).await?;

    Ok(Json(CartResponse {
        items: lines
            .into_iter()
            .map(|(line, course)| CartLineResponse::new(line, course))
            .collect(),
        stats: stats.into(),
    }))
}

/// Price, tax and total summed over the cart
#[utoipa::path(
    get,
    path = "/cart/{cart_id}/stats",
    params(
        ("cart_id" = String, Path, description = "Client cart id"),
        CartQuery
    ),
    responses(
        (status = 200, description = "Cart totals in cents", body = CartStatsResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cart"
)]
pub async fn get_cart_stats(
    State(state): State<AppState>,
    Path(cart_id): Path<String>,
    Query(query): Query<CartQuery>,
) -> Result<Json<CartStatsResponse>, ApiError> {
    let stats = CartService::stats(&state.db, &cart_id, known_user(query.user_id)).await?;

    Ok(Json(stats.into()))
}

#[utoipa::path(
    delete,
    path = "/cart/{cart_id}/items/{item_id}",
    params(
        ("cart_id" = String, Path, description = "Client cart id"),
        ("item_id" = i32, Path, description = "Cart line id")
    ),
    responses(
        (status = 204, description = "Removed from cart"),
        (status = 404, description = "Cart item not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Cart"
)]
pub async fn delete_cart_item(
    State(state): State<AppState>,
    Path((cart_id, item_id)): Path<(String, i32)>,
) -> Result<StatusCode, ApiError> {
    CartService::delete_line(&state.db, &cart_id, item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
