use chrono::NaiveDateTime;
use database::{
    entities::{cart_order_item, coupon, notification},
    services::{BestSellingCourse, CouponDraft, MonthlyEarning, TeacherStudent, TeacherSummary},
};
use models::status::NotificationType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::CourseResponse;

/// Revenue figures are in cents
#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherSummaryResponse {
    pub total_courses: u64,
    pub total_students: u64,
    pub total_revenue: i64,
    pub monthly_revenue: i64,
}

impl From<TeacherSummary> for TeacherSummaryResponse {
    fn from(summary: TeacherSummary) -> Self {
        Self {
            total_courses: summary.total_courses,
            total_students: summary.total_students,
            total_revenue: summary.total_revenue,
            monthly_revenue: summary.monthly_revenue,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SoldItemResponse {
    pub oid: String,
    pub course_id: i32,
    pub price: i64,
    pub total: i64,
    pub saved: i64,
    pub created_at: NaiveDateTime,
}

impl From<cart_order_item::Model> for SoldItemResponse {
    fn from(item: cart_order_item::Model) -> Self {
        Self {
            oid: item.oid,
            course_id: item.course_id,
            price: item.price,
            total: item.total,
            saved: item.saved,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthlyEarningResponse {
    pub year: i32,
    pub month: u32,
    pub total: i64,
}

impl From<MonthlyEarning> for MonthlyEarningResponse {
    fn from(earning: MonthlyEarning) -> Self {
        Self {
            year: earning.year,
            month: earning.month,
            total: earning.total,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BestSellingCourseResponse {
    pub course: CourseResponse,
    pub sales: u64,
    pub revenue: i64,
}

impl From<BestSellingCourse> for BestSellingCourseResponse {
    fn from(best: BestSellingCourse) -> Self {
        Self {
            course: best.course.into(),
            sales: best.sales,
            revenue: best.revenue,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherStudentResponse {
    pub user_id: i32,
    pub full_name: String,
    pub image: Option<String>,
    pub country: Option<String>,
    pub enrolled_at: NaiveDateTime,
}

impl From<TeacherStudent> for TeacherStudentResponse {
    fn from(student: TeacherStudent) -> Self {
        Self {
            user_id: student.user_id,
            full_name: student.full_name,
            image: student.image,
            country: student.country,
            enrolled_at: student.enrolled_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewReplyBody {
    pub reply: String,
    /// Hide or show the review on the course page
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CouponBody {
    pub code: String,
    /// Whole percent, 1 to 100
    pub discount: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl From<CouponBody> for CouponDraft {
    fn from(body: CouponBody) -> Self {
        Self {
            code: body.code,
            discount: body.discount,
            active: body.active,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TeacherCouponResponse {
    pub id: i32,
    pub code: String,
    pub discount: i32,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

impl From<coupon::Model> for TeacherCouponResponse {
    fn from(coupon: coupon::Model) -> Self {
        Self {
            id: coupon.id,
            code: coupon.code,
            discount: coupon.discount,
            active: coupon.active,
            created_at: coupon.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    pub kind: NotificationType,
    pub user_id: Option<i32>,
    pub order_id: Option<i32>,
    pub order_item_id: Option<i32>,
    pub review_id: Option<i32>,
    pub seen: bool,
    pub created_at: NaiveDateTime,
}

impl From<notification::Model> for NotificationResponse {
    fn from(notification: notification::Model) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            user_id: notification.user_id,
            order_id: notification.order_id,
            order_item_id: notification.order_item_id,
            review_id: notification.review_id,
            seen: notification.seen,
            created_at: notification.created_at,
        }
    }
}
