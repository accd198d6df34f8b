use sea_orm_migration::prelude::*;

use crate::idens::{
    CartOrderItems, Carts, CompletedLessons, CouponUsers, Coupons, Courses, EnrolledCourses,
    Notifications, OrderCoupons, OrderItemCoupons, OrderTeachers, VariantItems, Variants, Wishlists,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Carts lines are upserted by (cart id, course)
        manager
            .create_index(
                Index::create()
                    .name("idx_carts_cart_id_course_id")
                    .table(Carts::Table)
                    .col(Carts::CartId)
                    .col(Carts::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_carts_user_id")
                    .table(Carts::Table)
                    .col(Carts::UserId)
                    .to_owned(),
            )
            .await?;

        // Order items are always read per order
        manager
            .create_index(
                Index::create()
                    .name("idx_cart_order_items_order_id")
                    .table(CartOrderItems::Table)
                    .col(CartOrderItems::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cart_order_items_teacher_id")
                    .table(CartOrderItems::Table)
                    .col(CartOrderItems::TeacherId)
                    .to_owned(),
            )
            .await?;

        // Junction tables hold each pair at most once
        manager
            .create_index(
                Index::create()
                    .name("idx_order_teachers_order_id_teacher_id")
                    .table(OrderTeachers::Table)
                    .col(OrderTeachers::OrderId)
                    .col(OrderTeachers::TeacherId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_coupons_order_id_coupon_id")
                    .table(OrderCoupons::Table)
                    .col(OrderCoupons::OrderId)
                    .col(OrderCoupons::CouponId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_order_item_coupons_order_item_id_coupon_id")
                    .table(OrderItemCoupons::Table)
                    .col(OrderItemCoupons::OrderItemId)
                    .col(OrderItemCoupons::CouponId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_coupon_users_coupon_id_user_id")
                    .table(CouponUsers::Table)
                    .col(CouponUsers::CouponId)
                    .col(CouponUsers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_wishlists_user_id_course_id")
                    .table(Wishlists::Table)
                    .col(Wishlists::UserId)
                    .col(Wishlists::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_completed_lessons_user_id_variant_item_id")
                    .table(CompletedLessons::Table)
                    .col(CompletedLessons::UserId)
                    .col(CompletedLessons::VariantItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Coupon lookups go through the code
        manager
            .create_index(
                Index::create()
                    .name("idx_coupons_code")
                    .table(Coupons::Table)
                    .col(Coupons::Code)
                    .to_owned(),
            )
            .await?;

        // Dashboards filter enrollments by student and by teacher
        manager
            .create_index(
                Index::create()
                    .name("idx_enrolled_courses_user_id")
                    .table(EnrolledCourses::Table)
                    .col(EnrolledCourses::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrolled_courses_teacher_id")
                    .table(EnrolledCourses::Table)
                    .col(EnrolledCourses::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_notifications_teacher_id")
                    .table(Notifications::Table)
                    .col(Notifications::TeacherId)
                    .to_owned(),
            )
            .await?;

        // Public course pages are addressed by slug
        manager
            .create_index(
                Index::create()
                    .name("idx_courses_slug")
                    .table(Courses::Table)
                    .col(Courses::Slug)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variants_course_id")
                    .table(Variants::Table)
                    .col(Variants::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_variant_items_variant_id")
                    .table(VariantItems::Table)
                    .col(VariantItems::VariantId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_variant_items_variant_id")
                    .table(VariantItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_variants_course_id")
                    .table(Variants::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_courses_slug")
                    .table(Courses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_notifications_teacher_id")
                    .table(Notifications::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrolled_courses_teacher_id")
                    .table(EnrolledCourses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_enrolled_courses_user_id")
                    .table(EnrolledCourses::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_coupons_code")
                    .table(Coupons::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_completed_lessons_user_id_variant_item_id")
                    .table(CompletedLessons::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_wishlists_user_id_course_id")
                    .table(Wishlists::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_coupon_users_coupon_id_user_id")
                    .table(CouponUsers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_order_item_coupons_order_item_id_coupon_id")
                    .table(OrderItemCoupons::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_order_coupons_order_id_coupon_id")
                    .table(OrderCoupons::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_order_teachers_order_id_teacher_id")
                    .table(OrderTeachers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_cart_order_items_teacher_id")
                    .table(CartOrderItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_cart_order_items_order_id")
                    .table(CartOrderItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_carts_user_id")
                    .table(Carts::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_carts_cart_id_course_id")
                    .table(Carts::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
