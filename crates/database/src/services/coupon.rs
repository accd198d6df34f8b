use crate::{
    ServiceError,
    entities::{cart_order, cart_order_item, coupon, coupon_user, order_coupon, order_item_coupon},
};
use log::info;
use models::money::{Cents, coupon_discount};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::Expr,
    sea_query::Func,
};

/// Business result of applying a coupon; none of these is an error
#[derive(Debug, Clone)]
pub enum CouponOutcome {
    /// The discount was taken off one item and the order
    Applied {
        order: cart_order::Model,
        item: cart_order_item::Model,
        discount: Cents,
    },
    /// The first eligible item already carries this coupon
    AlreadyApplied,
    /// No item of the order belongs to the coupon's teacher
    NoEligibleItems,
}

pub struct CouponService;

impl CouponService {
    /// Active coupon with a case-insensitively matching code
    pub async fn find_active<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<coupon::Model>, DbErr> {
        coupon::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(coupon::Column::Code)))
                    .eq(code.trim().to_lowercase()),
            )
            .filter(coupon::Column::Active.eq(true))
            .order_by_desc(coupon::Column::CreatedAt)
            .order_by_desc(coupon::Column::Id)
            .one(db)
            .await
    }

    /// Apply a teacher's percentage coupon to an order
    ///
    /// Only the first of the order's items taught by the coupon's teacher is
    /// considered; the call returns after discounting it, so further items
    /// from the same teacher keep their price. Item and order totals move by
    /// the same amount while `initial_total` stays untouched.
    pub async fn apply(
        db: &DatabaseConnection,
        oid: &str,
        code: &str,
    ) -> Result<CouponOutcome, ServiceError> {
        let txn = db.begin().await?;

        let order = cart_order::Entity::find()
            .filter(cart_order::Column::Oid.eq(oid))
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("order"))?;

        let coupon = Self::find_active(&txn, code)
            .await?
            .ok_or(ServiceError::NotFound("coupon"))?;

        let Some(teacher_id) = coupon.teacher_id else {
            return Ok(CouponOutcome::NoEligibleItems);
        };

        let Some(item) = cart_order_item::Entity::find()
            .filter(cart_order_item::Column::OrderId.eq(order.id))
            .filter(cart_order_item::Column::TeacherId.eq(teacher_id))
            .order_by_asc(cart_order_item::Column::Id)
            .one(&txn)
            .await?
        else {
            return Ok(CouponOutcome::NoEligibleItems);
        };

        let already_applied = order_item_coupon::Entity::find()
            .filter(order_item_coupon::Column::OrderItemId.eq(item.id))
            .filter(order_item_coupon::Column::CouponId.eq(coupon.id))
            .count(&txn)
            .await?
            > 0;
        if already_applied {
            return Ok(CouponOutcome::AlreadyApplied);
        }

        let discount = coupon_discount(item.total, coupon.discount)?;

        let mut active_item: cart_order_item::ActiveModel = item.clone().into();
        active_item.total = Set(item.total - discount);
        active_item.price = Set(item.price - discount);
        active_item.saved = Set(item.saved + discount);
        active_item.applied_coupon = Set(true);
        let item = active_item.update(&txn).await?;

        order_item_coupon::ActiveModel {
            order_item_id: Set(item.id),
            coupon_id: Set(coupon.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let order_has_coupon = order_coupon::Entity::find()
            .filter(order_coupon::Column::OrderId.eq(order.id))
            .filter(order_coupon::Column::CouponId.eq(coupon.id))
            .count(&txn)
            .await?
            > 0;
        if !order_has_coupon {
            order_coupon::ActiveModel {
                order_id: Set(order.id),
                coupon_id: Set(coupon.id),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        if let Some(student_id) = order.student_id {
            let used = coupon_user::Entity::find()
                .filter(coupon_user::Column::CouponId.eq(coupon.id))
                .filter(coupon_user::Column::UserId.eq(student_id))
                .count(&txn)
                .await?
                > 0;
            if !used {
                coupon_user::ActiveModel {
                    coupon_id: Set(coupon.id),
                    user_id: Set(student_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        let mut active_order: cart_order::ActiveModel = order.clone().into();
        active_order.total = Set(order.total - discount);
        active_order.sub_total = Set(order.sub_total - discount);
        active_order.saved = Set(order.saved + discount);
        let order = active_order.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Applied coupon {} to order {} item {}: -{}",
            coupon.code, order.oid, item.oid, discount
        );
        Ok(CouponOutcome::Applied {
            order,
            item,
            discount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{CartLineRequest, CartService, NewOrder, OrderService},
        test::{TestDb, fixtures},
    };
    use testresult::TestResult;

    /// Order holding 110.00 and 55.00 items from one teacher (10% tax)
    async fn two_item_order(db: &TestDb) -> TestResult<(i32, cart_order::Model)> {
        fixtures::country(db, "Canada", 10).await?;
        let teacher = fixtures::teacher(db, "ada").await?;
        let student = fixtures::user(db, "bob").await?;
        let rust = fixtures::course(db, teacher.id, "Rust", 100_00).await?;
        let go = fixtures::course(db, teacher.id, "Go", 50_00).await?;

        for (course_id, price) in [(rust.id, 100_00), (go.id, 50_00)] {
            CartService::upsert_line(
                db,
                CartLineRequest {
                    cart_id: "c1".to_string(),
                    course_id,
                    user_id: Some(student.id),
                    price,
                    country: "Canada".to_string(),
                },
            )
            .await?;
        }

        let order = OrderService::create_order(
            db,
            NewOrder {
                full_name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                country: "Canada".to_string(),
                cart_id: "c1".to_string(),
                user_id: Some(student.id),
            },
        )
        .await?;

        Ok((teacher.id, order))
    }

    async fn items(db: &TestDb, order_id: i32) -> Result<Vec<cart_order_item::Model>, DbErr> {
        cart_order_item::Entity::find()
            .filter(cart_order_item::Column::OrderId.eq(order_id))
            .order_by_asc(cart_order_item::Column::Id)
            .all(&**db)
            .await
    }

    #[tokio::test]
    async fn test_coupon_discounts_only_first_eligible_item() -> TestResult {
        let db = TestDb::new().await?;
        let (teacher_id, order) = two_item_order(&db).await?;
        assert_eq!(order.total, 165_00);
        fixtures::coupon(&db, teacher_id, "SPRING20", 20).await?;

        let outcome = CouponService::apply(&db, &order.oid, "spring20").await?;

        let (updated, discount) = match outcome {
            CouponOutcome::Applied {
                order, discount, ..
            } => (order, discount),
            other => panic!("expected the coupon to apply, got {other:?}"),
        };
        assert_eq!(discount, 22_00);
        assert_eq!(updated.total, 143_00);
        assert_eq!(updated.sub_total, 150_00 - 22_00);
        assert_eq!(updated.saved, 22_00);
        assert_eq!(updated.initial_total, 165_00);

        let items = items(&db, order.id).await?;
        assert_eq!(items[0].total, 88_00);
        assert_eq!(items[0].saved, 22_00);
        assert!(items[0].applied_coupon);
        assert_eq!(items[1].total, 55_00);
        assert!(!items[1].applied_coupon);

        let item_sum: i64 = items.iter().map(|i| i.total).sum();
        assert_eq!(updated.total, item_sum);

        Ok(())
    }

    #[tokio::test]
    async fn test_reapplying_is_reported_without_mutation() -> TestResult {
        let db = TestDb::new().await?;
        let (teacher_id, order) = two_item_order(&db).await?;
        fixtures::coupon(&db, teacher_id, "SPRING20", 20).await?;

        CouponService::apply(&db, &order.oid, "SPRING20").await?;
        let again = CouponService::apply(&db, &order.oid, "SPRING20").await?;

        assert!(matches!(again, CouponOutcome::AlreadyApplied));
        let reloaded = OrderService::find_by_oid(&db, &order.oid).await?;
        assert_eq!(reloaded.total, 143_00);
        assert_eq!(coupon_user::Entity::find().count(&*db).await?, 1);
        assert_eq!(order_coupon::Entity::find().count(&*db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_coupon_from_other_teacher_has_no_eligible_items() -> TestResult {
        let db = TestDb::new().await?;
        let (_, order) = two_item_order(&db).await?;
        let other = fixtures::teacher(&db, "grace").await?;
        fixtures::coupon(&db, other.id, "GRACE10", 10).await?;

        let outcome = CouponService::apply(&db, &order.oid, "GRACE10").await?;

        assert!(matches!(outcome, CouponOutcome::NoEligibleItems));
        assert_eq!(OrderService::find_by_oid(&db, &order.oid).await?.total, 165_00);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_or_inactive_coupon_is_not_found() -> TestResult {
        let db = TestDb::new().await?;
        let (teacher_id, order) = two_item_order(&db).await?;
        let coupon = fixtures::coupon(&db, teacher_id, "OFF", 50).await?;
        let mut inactive: coupon::ActiveModel = coupon.into();
        inactive.active = Set(false);
        inactive.update(&*db).await?;

        let unknown = CouponService::apply(&db, &order.oid, "NOPE").await;
        assert!(matches!(unknown, Err(ServiceError::NotFound("coupon"))));

        let disabled = CouponService::apply(&db, &order.oid, "OFF").await;
        assert!(matches!(disabled, Err(ServiceError::NotFound("coupon"))));

        Ok(())
    }
}
