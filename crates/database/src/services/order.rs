use crate::{
    ServiceError,
    entities::{cart, cart_order, cart_order_item, coupon, course, order_teacher, teacher, user},
    services::now,
};
use log::info;
use models::{codes, status::PaymentStatus};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashSet;

/// Buyer details submitted at checkout
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub full_name: String,
    pub email: String,
    pub country: String,
    pub cart_id: String,
    /// Anonymous checkout when absent
    pub user_id: Option<i32>,
}

/// An order with its items, applied coupons and teachers
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: cart_order::Model,
    pub items: Vec<(cart_order_item::Model, Option<course::Model>)>,
    pub coupons: Vec<coupon::Model>,
    pub teachers: Vec<teacher::Model>,
}

pub struct OrderService;

impl OrderService {
    /// Snapshot every line of a cart into a new order
    ///
    /// Runs in a single transaction: the order, its items and teacher links
    /// either all persist or none do.
    pub async fn create_order(
        db: &DatabaseConnection,
        request: NewOrder,
    ) -> Result<cart_order::Model, ServiceError> {
        let txn = db.begin().await?;

        if let Some(user_id) = request.user_id
            && user::Entity::find_by_id(user_id).one(&txn).await?.is_none()
        {
            return Err(ServiceError::NotFound("user"));
        }

        let order = cart_order::ActiveModel {
            oid: Set(codes::order_code()),
            student_id: Set(request.user_id),
            sub_total: Set(0),
            tax_fee: Set(0),
            total: Set(0),
            initial_total: Set(0),
            saved: Set(0),
            payment_status: Set(PaymentStatus::Processing),
            full_name: Set(Some(request.full_name)),
            email: Set(Some(request.email)),
            country: Set(Some(request.country)),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let lines = cart::Entity::find()
            .filter(cart::Column::CartId.eq(request.cart_id.as_str()))
            .order_by_asc(cart::Column::Id)
            .find_also_related(course::Entity)
            .all(&txn)
            .await?;

        let mut sub_total = 0;
        let mut tax_fee = 0;
        let mut total = 0;
        let mut teachers = HashSet::new();

        for (line, course) in lines {
            let course = course.ok_or(ServiceError::NotFound("course"))?;

            cart_order_item::ActiveModel {
                oid: Set(codes::order_code()),
                order_id: Set(order.id),
                course_id: Set(course.id),
                teacher_id: Set(course.teacher_id),
                price: Set(line.price),
                tax_fee: Set(line.tax_fee),
                total: Set(line.total),
                initial_total: Set(line.total),
                saved: Set(0),
                applied_coupon: Set(false),
                created_at: Set(now()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            if teachers.insert(course.teacher_id) {
                order_teacher::ActiveModel {
                    order_id: Set(order.id),
                    teacher_id: Set(course.teacher_id),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }

            sub_total += line.price;
            tax_fee += line.tax_fee;
            total += line.total;
        }

        let mut active: cart_order::ActiveModel = order.into();
        active.sub_total = Set(sub_total);
        active.tax_fee = Set(tax_fee);
        active.total = Set(total);
        active.initial_total = Set(total);
        let order = active.update(&txn).await?;

        txn.commit().await?;

        info!(
            "Created order {} from cart {} with total {}",
            order.oid, request.cart_id, order.total
        );
        Ok(order)
    }

    pub async fn find_by_oid(
        db: &DatabaseConnection,
        oid: &str,
    ) -> Result<cart_order::Model, ServiceError> {
        cart_order::Entity::find()
            .filter(cart_order::Column::Oid.eq(oid))
            .one(db)
            .await?
            .ok_or(ServiceError::NotFound("order"))
    }

    /// Order summary shown on the checkout page
    pub async fn checkout(db: &DatabaseConnection, oid: &str) -> Result<OrderDetail, ServiceError> {
        let order = Self::find_by_oid(db, oid).await?;

        let items = cart_order_item::Entity::find()
            .filter(cart_order_item::Column::OrderId.eq(order.id))
            .order_by_asc(cart_order_item::Column::Id)
            .find_also_related(course::Entity)
            .all(db)
            .await?;
        let coupons = order.find_related(coupon::Entity).all(db).await?;
        let teachers = order.find_related(teacher::Entity).all(db).await?;

        Ok(OrderDetail {
            order,
            items,
            coupons,
            teachers,
        })
    }

    /// Remembers the hosted checkout session that will pay for the order
    pub async fn attach_session(
        db: &DatabaseConnection,
        order: cart_order::Model,
        session_id: String,
    ) -> Result<cart_order::Model, DbErr> {
        let mut active: cart_order::ActiveModel = order.into();
        active.stripe_session_id = Set(Some(session_id));
        active.update(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{CartLineRequest, CartService},
        test::{TestDb, fixtures},
    };
    use testresult::TestResult;

    async fn add_line(
        db: &DatabaseConnection,
        cart_id: &str,
        course_id: i32,
        price: i64,
    ) -> TestResult {
        CartService::upsert_line(
            db,
            CartLineRequest {
                cart_id: cart_id.to_string(),
                course_id,
                user_id: None,
                price,
                country: "Canada".to_string(),
            },
        )
        .await?;
        Ok(())
    }

    fn new_order(cart_id: &str, user_id: Option<i32>) -> NewOrder {
        NewOrder {
            full_name: "Bob Student".to_string(),
            email: "bob@example.com".to_string(),
            country: "Canada".to_string(),
            cart_id: cart_id.to_string(),
            user_id,
        }
    }

    #[tokio::test]
    async fn test_order_total_is_sum_of_items() -> TestResult {
        let db = TestDb::new().await?;
        fixtures::country(&db, "Canada", 10).await?;
        let ada = fixtures::teacher(&db, "ada").await?;
        let grace = fixtures::teacher(&db, "grace").await?;
        let student = fixtures::user(&db, "bob").await?;
        let rust = fixtures::course(&db, ada.id, "Rust", 100_00).await?;
        let go = fixtures::course(&db, ada.id, "Go", 50_00).await?;
        let cobol = fixtures::course(&db, grace.id, "COBOL", 33_33).await?;

        add_line(&db, "c1", rust.id, 100_00).await?;
        add_line(&db, "c1", go.id, 50_00).await?;
        add_line(&db, "c1", cobol.id, 33_33).await?;
        add_line(&db, "someone-else", rust.id, 100_00).await?;

        let order = OrderService::create_order(&db, new_order("c1", Some(student.id))).await?;
        let detail = OrderService::checkout(&db, &order.oid).await?;

        let item_total: i64 = detail.items.iter().map(|(item, _)| item.total).sum();
        assert_eq!(detail.items.len(), 3);
        assert_eq!(order.total, item_total);
        assert_eq!(order.initial_total, order.total);
        assert_eq!(order.sub_total, 183_33);
        assert_eq!(order.tax_fee, 18_33);
        assert_eq!(order.payment_status, PaymentStatus::Processing);
        assert_eq!(order.student_id, Some(student.id));
        assert_eq!(detail.teachers.len(), 2);
        assert!(detail.coupons.is_empty());

        let go_item = detail
            .items
            .iter()
            .find(|(item, _)| item.course_id == go.id)
            .map(|(item, _)| item);
        assert_eq!(go_item.map(|i| i.teacher_id), Some(ada.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_creates_zero_order() -> TestResult {
        let db = TestDb::new().await?;

        let order = OrderService::create_order(&db, new_order("nothing", None)).await?;

        assert_eq!(order.total, 0);
        assert_eq!(order.student_id, None);
        assert!(OrderService::checkout(&db, &order.oid).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_user_leaves_nothing_behind() -> TestResult {
        let db = TestDb::new().await?;
        let teacher = fixtures::teacher(&db, "ada").await?;
        let course = fixtures::course(&db, teacher.id, "Rust", 10_00).await?;
        add_line(&db, "c1", course.id, 10_00).await?;

        let result = OrderService::create_order(&db, new_order("c1", Some(4242))).await;

        assert!(matches!(result, Err(ServiceError::NotFound("user"))));
        assert!(cart_order::Entity::find().all(&*db).await?.is_empty());
        assert!(cart_order_item::Entity::find().all(&*db).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_unknown_order() -> TestResult {
        let db = TestDb::new().await?;

        let result = OrderService::checkout(&db, "DNOPE").await;
        assert!(matches!(result, Err(ServiceError::NotFound("order"))));

        Ok(())
    }
}
