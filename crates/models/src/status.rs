use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[cfg(feature = "database")]
use sea_orm::entity::prelude::{DeriveActiveEnum, EnumIter};

/// Lifecycle of an order's payment
///
/// Orders are created in `Processing`; only a confirmed `Processing -> Paid`
/// transition fans out notifications and enrollments.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PaymentStatus {
    #[serde(rename = "initiated")]
    #[strum(serialize = "initiated")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "initiated"))]
    Initiated,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Processing"))]
    Processing,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Paid"))]
    Paid,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Failed"))]
    Failed,
}

/// Platform-level moderation status of a course
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum PlatformStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "Draft"))]
    Draft,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Disabled"))]
    Disabled,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Rejected"))]
    Rejected,
    #[serde(rename = "In Review")]
    #[strum(serialize = "In Review")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "In Review"))]
    InReview,
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "Published"))]
    Published,
}

/// Teacher-controlled visibility of a course
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum TeacherCourseStatus {
    #[cfg_attr(feature = "database", sea_orm(string_value = "Draft"))]
    Draft,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Disabled"))]
    Disabled,
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "Published"))]
    Published,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Level {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "Beginner"))]
    Beginner,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Intermediate"))]
    Intermediate,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Advanced"))]
    Advanced,
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Language {
    #[default]
    #[cfg_attr(feature = "database", sea_orm(string_value = "English"))]
    English,
    #[cfg_attr(feature = "database", sea_orm(string_value = "Spanish"))]
    Spanish,
    #[cfg_attr(feature = "database", sea_orm(string_value = "French"))]
    French,
}

/// Kind of event a notification reports
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[cfg_attr(feature = "database", derive(EnumIter, DeriveActiveEnum))]
#[cfg_attr(feature = "database", sea_orm(rs_type = "String", db_type = "Text"))]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum NotificationType {
    #[serde(rename = "New Order")]
    #[strum(serialize = "New Order")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "New Order"))]
    NewOrder,
    #[serde(rename = "New Review")]
    #[strum(serialize = "New Review")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "New Review"))]
    NewReview,
    #[serde(rename = "New Course Question")]
    #[strum(serialize = "New Course Question")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "New Course Question"))]
    NewCourseQuestion,
    #[serde(rename = "Course Published")]
    #[strum(serialize = "Course Published")]
    #[cfg_attr(feature = "database", sea_orm(string_value = "Course Published"))]
    CoursePublished,
}

/// Both the platform and the teacher must publish a course before the
/// public catalog shows it
pub fn is_publicly_visible(platform: PlatformStatus, teacher: TeacherCourseStatus) -> bool {
    platform == PlatformStatus::Published && teacher == TeacherCourseStatus::Published
}
