use chrono::NaiveDateTime;
use database::{
    entities::{cart_order, cart_order_item, course},
    services::OrderDetail,
};
use models::status::PaymentStatus;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::{CourseResponse, TeacherResponse};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderBody {
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub cart_id: String,
    /// `0` or absent for a guest checkout
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderCreatedResponse {
    pub message: String,
    pub order_oid: String,
}

/// Order totals in cents
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub oid: String,
    pub student_id: Option<i32>,
    pub sub_total: i64,
    pub tax_fee: i64,
    pub total: i64,
    pub initial_total: i64,
    pub saved: i64,
    pub payment_status: PaymentStatus,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<cart_order::Model> for OrderResponse {
    fn from(order: cart_order::Model) -> Self {
        Self {
            oid: order.oid,
            student_id: order.student_id,
            sub_total: order.sub_total,
            tax_fee: order.tax_fee,
            total: order.total,
            initial_total: order.initial_total,
            saved: order.saved,
            payment_status: order.payment_status,
            full_name: order.full_name,
            email: order.email,
            country: order.country,
            created_at: order.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderItemResponse {
    pub oid: String,
    pub course_id: i32,
    pub teacher_id: i32,
    pub price: i64,
    pub tax_fee: i64,
    pub total: i64,
    pub initial_total: i64,
    pub saved: i64,
    pub applied_coupon: bool,
    pub course: Option<CourseResponse>,
}

impl OrderItemResponse {
    pub fn new(item: cart_order_item::Model, course: Option<course::Model>) -> Self {
        Self {
            oid: item.oid,
            course_id: item.course_id,
            teacher_id: item.teacher_id,
            price: item.price,
            tax_fee: item.tax_fee,
            total: item.total,
            initial_total: item.initial_total,
            saved: item.saved,
            applied_coupon: item.applied_coupon,
            course: course.map(Into::into),
        }
    }
}

/// Everything the checkout page shows
#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
    /// Codes of the coupons applied so far
    pub coupons: Vec<String>,
    pub teachers: Vec<TeacherResponse>,
}

impl From<OrderDetail> for CheckoutResponse {
    fn from(detail: OrderDetail) -> Self {
        Self {
            order: detail.order.into(),
            items: detail
                .items
                .into_iter()
                .map(|(item, course)| OrderItemResponse::new(item, course))
                .collect(),
            coupons: detail.coupons.into_iter().map(|c| c.code).collect(),
            teachers: detail.teachers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyCouponBody {
    pub coupon_code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CouponResponse {
    pub message: String,
    /// Amount taken off, in cents, when the coupon was applied
    pub discount: Option<i64>,
    pub order: Option<OrderResponse>,
}
