use database::{
    entities::{cart, course},
    services::CartStats,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::catalog::CourseResponse;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CartLineBody {
    /// Client-generated cart identifier
    pub cart_id: String,
    pub course_id: i32,
    pub user_id: Option<i32>,
    /// Unit price in cents
    pub price: i64,
    pub country: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CartQuery {
    /// Also include lines the user added from other carts
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineResponse {
    pub id: i32,
    pub cart_id: String,
    pub course_id: i32,
    pub user_id: Option<i32>,
    pub price: i64,
    pub tax_fee: i64,
    pub total: i64,
    pub country: Option<String>,
    pub course: Option<CourseResponse>,
}

impl CartLineResponse {
    pub fn new(line: cart::Model, course: Option<course::Model>) -> Self {
        Self {
            id: line.id,
            cart_id: line.cart_id,
            course_id: line.course_id,
            user_id: line.user_id,
            price: line.price,
            tax_fee: line.tax_fee,
            total: line.total,
            country: line.country,
            course: course.map(Into::into),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartStatsResponse {
    pub price: i64,
    pub tax: i64,
    pub total: i64,
}

impl From<CartStats> for CartStatsResponse {
    fn from(stats: CartStats) -> Self {
        Self {
            price: stats.price,
            tax: stats.tax,
            total: stats.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartResponse {
    pub items: Vec<CartLineResponse>,
    pub stats: CartStatsResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartUpsertResponse {
    pub message: String,
    pub line: CartLineResponse,
}
