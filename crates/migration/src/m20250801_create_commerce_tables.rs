use sea_orm_migration::prelude::*;

use crate::idens::{
    CartOrderItems, CartOrders, Carts, CouponUsers, Coupons, Courses, EnrolledCourses, OrderCoupons,
    OrderItemCoupons, OrderTeachers, Teachers, Users,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create carts table; one row per (cart id, course)
        manager
            .create_table(
                Table::create()
                    .table(Carts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Carts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Carts::CartId).string().not_null())
                    .col(ColumnDef::new(Carts::CourseId).integer().not_null())
                    .col(ColumnDef::new(Carts::UserId).integer())
                    .col(ColumnDef::new(Carts::Price).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Carts::TaxFee).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Carts::Total).big_integer().not_null().default(0))
                    .col(ColumnDef::new(Carts::Country).string())
                    .col(
                        ColumnDef::new(Carts::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-carts-course_id")
                            .from(Carts::Table, Carts::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-carts-user_id")
                            .from(Carts::Table, Carts::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cart_orders table; amounts are stored in cents
        manager
            .create_table(
                Table::create()
                    .table(CartOrders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartOrders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartOrders::Oid).string().not_null().unique_key())
                    .col(ColumnDef::new(CartOrders::StudentId).integer())
                    .col(ColumnDef::new(CartOrders::SubTotal).big_integer().not_null().default(0))
                    .col(ColumnDef::new(CartOrders::TaxFee).big_integer().not_null().default(0))
                    .col(ColumnDef::new(CartOrders::Total).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CartOrders::InitialTotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CartOrders::Saved).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CartOrders::PaymentStatus)
                            .text()
                            .not_null()
                            .default("initiated"),
                    )
                    .col(ColumnDef::new(CartOrders::FullName).string())
                    .col(ColumnDef::new(CartOrders::Email).string())
                    .col(ColumnDef::new(CartOrders::Country).string())
                    .col(ColumnDef::new(CartOrders::StripeSessionId).string())
                    .col(
                        ColumnDef::new(CartOrders::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_orders-student_id")
                            .from(CartOrders::Table, CartOrders::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cart_order_items table
        manager
            .create_table(
                Table::create()
                    .table(CartOrderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CartOrderItems::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CartOrderItems::Oid).string().not_null().unique_key())
                    .col(ColumnDef::new(CartOrderItems::OrderId).integer().not_null())
                    .col(ColumnDef::new(CartOrderItems::CourseId).integer().not_null())
                    .col(ColumnDef::new(CartOrderItems::TeacherId).integer().not_null())
                    .col(ColumnDef::new(CartOrderItems::Price).big_integer().not_null().default(0))
                    .col(ColumnDef::new(CartOrderItems::TaxFee).big_integer().not_null().default(0))
                    .col(ColumnDef::new(CartOrderItems::Total).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CartOrderItems::InitialTotal)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(CartOrderItems::Saved).big_integer().not_null().default(0))
                    .col(
                        ColumnDef::new(CartOrderItems::AppliedCoupon)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CartOrderItems::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_order_items-order_id")
                            .from(CartOrderItems::Table, CartOrderItems::OrderId)
                            .to(CartOrders::Table, CartOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_order_items-course_id")
                            .from(CartOrderItems::Table, CartOrderItems::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-cart_order_items-teacher_id")
                            .from(CartOrderItems::Table, CartOrderItems::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create order_teachers junction table
        manager
            .create_table(
                Table::create()
                    .table(OrderTeachers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderTeachers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderTeachers::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderTeachers::TeacherId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_teachers-order_id")
                            .from(OrderTeachers::Table, OrderTeachers::OrderId)
                            .to(CartOrders::Table, CartOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_teachers-teacher_id")
                            .from(OrderTeachers::Table, OrderTeachers::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create coupons table; discount is a whole percentage
        manager
            .create_table(
                Table::create()
                    .table(Coupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Coupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Coupons::TeacherId).integer())
                    .col(ColumnDef::new(Coupons::Code).string().not_null())
                    .col(ColumnDef::new(Coupons::Discount).integer().not_null().default(1))
                    .col(ColumnDef::new(Coupons::Active).boolean().not_null().default(false))
                    .col(
                        ColumnDef::new(Coupons::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coupons-teacher_id")
                            .from(Coupons::Table, Coupons::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create order_coupons junction table
        manager
            .create_table(
                Table::create()
                    .table(OrderCoupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderCoupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderCoupons::OrderId).integer().not_null())
                    .col(ColumnDef::new(OrderCoupons::CouponId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_coupons-order_id")
                            .from(OrderCoupons::Table, OrderCoupons::OrderId)
                            .to(CartOrders::Table, CartOrders::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_coupons-coupon_id")
                            .from(OrderCoupons::Table, OrderCoupons::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create order_item_coupons junction table
        manager
            .create_table(
                Table::create()
                    .table(OrderItemCoupons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderItemCoupons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderItemCoupons::OrderItemId).integer().not_null())
                    .col(ColumnDef::new(OrderItemCoupons::CouponId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_item_coupons-order_item_id")
                            .from(OrderItemCoupons::Table, OrderItemCoupons::OrderItemId)
                            .to(CartOrderItems::Table, CartOrderItems::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_item_coupons-coupon_id")
                            .from(OrderItemCoupons::Table, OrderItemCoupons::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create coupon_users junction table (used_by)
        manager
            .create_table(
                Table::create()
                    .table(CouponUsers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CouponUsers::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CouponUsers::CouponId).integer().not_null())
                    .col(ColumnDef::new(CouponUsers::UserId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coupon_users-coupon_id")
                            .from(CouponUsers::Table, CouponUsers::CouponId)
                            .to(Coupons::Table, Coupons::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-coupon_users-user_id")
                            .from(CouponUsers::Table, CouponUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create enrolled_courses table
        manager
            .create_table(
                Table::create()
                    .table(EnrolledCourses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EnrolledCourses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(EnrolledCourses::EnrollmentId)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(EnrolledCourses::CourseId).integer().not_null())
                    .col(ColumnDef::new(EnrolledCourses::UserId).integer())
                    .col(ColumnDef::new(EnrolledCourses::TeacherId).integer())
                    .col(ColumnDef::new(EnrolledCourses::OrderItemId).integer())
                    .col(
                        ColumnDef::new(EnrolledCourses::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-course_id")
                            .from(EnrolledCourses::Table, EnrolledCourses::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-user_id")
                            .from(EnrolledCourses::Table, EnrolledCourses::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-teacher_id")
                            .from(EnrolledCourses::Table, EnrolledCourses::TeacherId)
                            .to(Teachers::Table, Teachers::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrolled_courses-order_item_id")
                            .from(EnrolledCourses::Table, EnrolledCourses::OrderItemId)
                            .to(CartOrderItems::Table, CartOrderItems::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order due to foreign key constraints
        manager
            .drop_table(Table::drop().table(EnrolledCourses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CouponUsers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OrderItemCoupons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OrderCoupons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Coupons::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(OrderTeachers::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CartOrderItems::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(CartOrders::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Carts::Table).to_owned())
            .await?;

        Ok(())
    }
}
