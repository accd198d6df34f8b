mod cart;
mod catalog;
mod coupon;
mod curriculum;
mod order;
mod settlement;
mod student;
mod teacher;

pub use cart::{CartLineRequest, CartService, CartStats, CartUpsert, FALLBACK_COUNTRY};
pub use catalog::{CatalogService, CategorySummary, CourseDetail, Curriculum};
pub use coupon::{CouponOutcome, CouponService};
pub use curriculum::CurriculumService;
pub use order::{NewOrder, OrderDetail, OrderService};
pub use settlement::{Settlement, SettlementService};
pub use student::{
    EnrollmentDetail, LessonToggle, QuestionThread, StudentService, StudentSummary, WishlistToggle,
};
pub use teacher::{
    BestSellingCourse, CouponDraft, MonthlyEarning, TeacherService, TeacherStudent, TeacherSummary,
};

use sea_orm::prelude::DateTime;

/// Timestamp written into `created_at` columns
pub(crate) fn now() -> DateTime {
    chrono::Utc::now().naive_utc()
}
