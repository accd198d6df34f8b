use crate::{
    ServiceError,
    entities::{cart_order, cart_order_item, enrolled_course, notification},
    services::{OrderService, now},
};
use log::{info, warn};
use models::{
    codes,
    status::{NotificationType, PaymentStatus},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::Expr,
};

/// Result of settling a confirmed payment
#[derive(Debug, Clone)]
pub enum Settlement {
    /// The order moved to `Paid` and its fan-out records were written
    Paid {
        order: cart_order::Model,
        enrollments: Vec<enrolled_course::Model>,
        notifications: usize,
    },
    /// A previous confirmation already settled the order
    AlreadyPaid(cart_order::Model),
}

pub struct SettlementService;

impl SettlementService {
    /// Flip a `Processing` order to `Paid` and fan out notifications and
    /// enrollments
    ///
    /// The status flip is a conditional update inside the same transaction as
    /// the fan-out, so two concurrent confirmations cannot both enroll.
    pub async fn mark_paid(db: &DatabaseConnection, oid: &str) -> Result<Settlement, ServiceError> {
        let order = OrderService::find_by_oid(db, oid).await?;
        if order.payment_status == PaymentStatus::Paid {
            return Ok(Settlement::AlreadyPaid(order));
        }

        let txn = db.begin().await?;

        let flipped = cart_order::Entity::update_many()
            .col_expr(
                cart_order::Column::PaymentStatus,
                Expr::value(PaymentStatus::Paid),
            )
            .filter(cart_order::Column::Id.eq(order.id))
            .filter(cart_order::Column::PaymentStatus.eq(PaymentStatus::Processing))
            .exec(&txn)
            .await?;

        if flipped.rows_affected == 0 {
            let current = cart_order::Entity::find_by_id(order.id)
                .one(&txn)
                .await?
                .ok_or(ServiceError::NotFound("order"))?;
            txn.rollback().await?;

            return match current.payment_status {
                PaymentStatus::Paid => Ok(Settlement::AlreadyPaid(current)),
                status => Err(ServiceError::Validation(format!(
                    "order {} is {status}, not awaiting payment",
                    current.oid
                ))),
            };
        }

        let (enrollments, notifications) = Self::fan_out(&txn, &order).await?;

        let order = cart_order::Entity::find_by_id(order.id)
            .one(&txn)
            .await?
            .ok_or(ServiceError::NotFound("order"))?;

        txn.commit().await?;

        info!(
            "Order {} paid: {} enrollments, {} notifications",
            order.oid,
            enrollments.len(),
            notifications
        );
        Ok(Settlement::Paid {
            order,
            enrollments,
            notifications,
        })
    }

    /// One notification for the student, and per item a teacher notification
    /// and an enrollment
    async fn fan_out(
        txn: &DatabaseTransaction,
        order: &cart_order::Model,
    ) -> Result<(Vec<enrolled_course::Model>, usize), ServiceError> {
        let mut notifications = 0;

        if let Some(student_id) = order.student_id {
            Self::notify(txn, Some(student_id), None, order.id, None).await?;
            notifications += 1;
        }

        let items = cart_order_item::Entity::find()
            .filter(cart_order_item::Column::OrderId.eq(order.id))
            .order_by_asc(cart_order_item::Column::Id)
            .all(txn)
            .await?;

        let mut enrollments = Vec::with_capacity(items.len());
        for item in items {
            Self::notify(txn, None, Some(item.teacher_id), order.id, Some(item.id)).await?;
            notifications += 1;

            let enrollment = enrolled_course::ActiveModel {
                enrollment_id: Set(codes::enrollment_code()),
                course_id: Set(item.course_id),
                user_id: Set(order.student_id),
                teacher_id: Set(Some(item.teacher_id)),
                order_item_id: Set(Some(item.id)),
                created_at: Set(now()),
                ..Default::default()
            }
            .insert(txn)
            .await?;
            enrollments.push(enrollment);
        }

        Ok((enrollments, notifications))
    }

    async fn notify(
        txn: &DatabaseTransaction,
        user_id: Option<i32>,
        teacher_id: Option<i32>,
        order_id: i32,
        order_item_id: Option<i32>,
    ) -> Result<notification::Model, ServiceError> {
        let created = notification::ActiveModel {
            user_id: Set(user_id),
            teacher_id: Set(teacher_id),
            order_id: Set(Some(order_id)),
            order_item_id: Set(order_item_id),
            kind: Set(NotificationType::NewOrder),
            seen: Set(false),
            created_at: Set(now()),
            ..Default::default()
        }
        .insert(txn)
        .await?;

        Ok(created)
    }

    /// Move a `Processing` order to `Failed`; other states are left alone
    pub async fn mark_failed(
        db: &DatabaseConnection,
        oid: &str,
    ) -> Result<cart_order::Model, ServiceError> {
        let order = OrderService::find_by_oid(db, oid).await?;

        let flipped = cart_order::Entity::update_many()
            .col_expr(
                cart_order::Column::PaymentStatus,
                Expr::value(PaymentStatus::Failed),
            )
            .filter(cart_order::Column::Id.eq(order.id))
            .filter(cart_order::Column::PaymentStatus.eq(PaymentStatus::Processing))
            .exec(db)
            .await?;

        if flipped.rows_affected == 0 {
            warn!(
                "Order {} is {}, leaving it unchanged",
                order.oid, order.payment_status
            );
            return Ok(order);
        }

        info!("Order {} payment failed", order.oid);
        OrderService::find_by_oid(db, oid).await
    }
}
