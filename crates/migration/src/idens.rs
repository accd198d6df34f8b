//! Table and column identifiers shared by the migrations

use sea_orm_migration::prelude::*;

#[derive(Iden)]
pub enum Users {
    Table,
    Id,
    Username,
    Email,
    FullName,
    Image,
    CreatedAt,
}

#[derive(Iden)]
pub enum Teachers {
    Table,
    Id,
    UserId,
    FullName,
    Bio,
    Image,
    About,
    Country,
    CreatedAt,
}

#[derive(Iden)]
pub enum Categories {
    Table,
    Id,
    Title,
    Image,
    Slug,
    Active,
}

#[derive(Iden)]
pub enum Countries {
    Table,
    Id,
    Name,
    TaxRate,
    Active,
}

#[derive(Iden)]
pub enum Courses {
    Table,
    Id,
    Code,
    CategoryId,
    TeacherId,
    Title,
    Description,
    Image,
    File,
    Price,
    Level,
    Language,
    PlatformStatus,
    TeacherCourseStatus,
    Featured,
    Slug,
    CreatedAt,
}

#[derive(Iden)]
pub enum Variants {
    Table,
    Id,
    CourseId,
    Code,
    Title,
    CreatedAt,
}

#[derive(Iden)]
pub enum VariantItems {
    Table,
    Id,
    VariantId,
    Code,
    Title,
    Description,
    File,
    DurationSeconds,
    ContentDuration,
    Preview,
    CreatedAt,
}

#[derive(Iden)]
pub enum Carts {
    Table,
    Id,
    CartId,
    CourseId,
    UserId,
    Price,
    TaxFee,
    Total,
    Country,
    CreatedAt,
}

#[derive(Iden)]
pub enum CartOrders {
    Table,
    Id,
    Oid,
    StudentId,
    SubTotal,
    TaxFee,
    Total,
    InitialTotal,
    Saved,
    PaymentStatus,
    FullName,
    Email,
    Country,
    StripeSessionId,
    CreatedAt,
}

#[derive(Iden)]
pub enum CartOrderItems {
    Table,
    Id,
    Oid,
    OrderId,
    CourseId,
    TeacherId,
    Price,
    TaxFee,
    Total,
    InitialTotal,
    Saved,
    AppliedCoupon,
    CreatedAt,
}

#[derive(Iden)]
pub enum OrderTeachers {
    Table,
    Id,
    OrderId,
    TeacherId,
}

#[derive(Iden)]
pub enum Coupons {
    Table,
    Id,
    TeacherId,
    Code,
    Discount,
    Active,
    CreatedAt,
}

#[derive(Iden)]
pub enum OrderCoupons {
    Table,
    Id,
    OrderId,
    CouponId,
}

#[derive(Iden)]
pub enum OrderItemCoupons {
    Table,
    Id,
    OrderItemId,
    CouponId,
}

#[derive(Iden)]
pub enum CouponUsers {
    Table,
    Id,
    CouponId,
    UserId,
}

#[derive(Iden)]
pub enum EnrolledCourses {
    Table,
    Id,
    EnrollmentId,
    CourseId,
    UserId,
    TeacherId,
    OrderItemId,
    CreatedAt,
}

#[derive(Iden)]
pub enum Notifications {
    Table,
    Id,
    UserId,
    TeacherId,
    OrderId,
    OrderItemId,
    ReviewId,
    Kind,
    Seen,
    CreatedAt,
}

#[derive(Iden)]
pub enum CompletedLessons {
    Table,
    Id,
    CourseId,
    UserId,
    VariantItemId,
    CreatedAt,
}

#[derive(Iden)]
pub enum Notes {
    Table,
    Id,
    Code,
    UserId,
    CourseId,
    Title,
    Note,
    CreatedAt,
}

#[derive(Iden)]
pub enum Reviews {
    Table,
    Id,
    UserId,
    CourseId,
    Review,
    Rating,
    Reply,
    Active,
    CreatedAt,
}

#[derive(Iden)]
pub enum QuestionAnswers {
    Table,
    Id,
    QaId,
    CourseId,
    UserId,
    Title,
    CreatedAt,
}

#[derive(Iden)]
pub enum QuestionAnswerMessages {
    Table,
    Id,
    QamId,
    CourseId,
    UserId,
    QuestionId,
    Message,
    CreatedAt,
}

#[derive(Iden)]
pub enum Wishlists {
    Table,
    Id,
    UserId,
    CourseId,
}

#[derive(Iden)]
pub enum Certificates {
    Table,
    Id,
    CertificateId,
    CourseId,
    UserId,
    CreatedAt,
}
