use std::sync::Arc;

use database::{
    entities::cart_order,
    services::{OrderService, Settlement, SettlementService},
};
use log::{info, warn};
use models::status::PaymentStatus;
use sea_orm::DatabaseConnection;

use crate::{
    CardGateway, CardPaymentStatus, CheckoutRequest, CheckoutSession, PaymentConfig, PaymentError,
    PaypalClient, StripeClient, WalletGateway,
};

/// Confirmation posted by the client after it returns from a processor;
/// exactly one of the rail identifiers must be present
#[derive(Debug, Clone, Default)]
pub struct ConfirmPayment {
    pub order_oid: String,
    pub session_id: Option<String>,
    pub paypal_order_id: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ConfirmationOutcome {
    /// This confirmation settled the order
    Paid {
        order: cart_order::Model,
        enrollments: usize,
    },
    /// The order had been settled before; nothing was written
    AlreadyPaid(cart_order::Model),
    /// The card session exists but has not been paid yet
    Unpaid,
    /// The card session was canceled and the order marked failed
    Cancelled(cart_order::Model),
    /// The wallet order is in a non-final state, e.g. `APPROVED`
    NotCompleted(String),
}

enum Rail<'a> {
    Card(&'a str),
    Wallet(&'a str),
}

/// Connects orders to the card and wallet processors
#[derive(Clone)]
pub struct PaymentBridge {
    config: PaymentConfig,
    card: Arc<dyn CardGateway>,
    wallet: Arc<dyn WalletGateway>,
}

impl PaymentBridge {
    /// Bridge backed by the real processor clients
    pub fn new(config: PaymentConfig) -> Self {
        let card = Arc::new(StripeClient::new(config.stripe.clone()));
        let wallet = Arc::new(PaypalClient::new(config.paypal.clone()));

        Self::with_gateways(config, card, wallet)
    }

    pub fn with_gateways(
        config: PaymentConfig,
        card: Arc<dyn CardGateway>,
        wallet: Arc<dyn WalletGateway>,
    ) -> Self {
        Self {
            config,
            card,
            wallet,
        }
    }

    /// Open a hosted card checkout for the order's current total
    ///
    /// The session id is stored on the order only after the processor
    /// accepted the request; a processor failure leaves the order untouched.
    pub async fn create_checkout(
        &self,
        db: &DatabaseConnection,
        oid: &str,
    ) -> Result<CheckoutSession, PaymentError> {
        let order = OrderService::find_by_oid(db, oid).await?;
        if order.payment_status == PaymentStatus::Paid {
            return Err(PaymentError::InvalidRequest(format!(
                "order {oid} is already paid"
            )));
        }

        let request = CheckoutRequest {
            order_oid: order.oid.clone(),
            customer_email: order.email.clone(),
            description: match &order.full_name {
                Some(name) => format!("Order {} for {name}", order.oid),
                None => format!("Order {}", order.oid),
            },
            amount: order.total,
            currency: self.config.currency.clone(),
            success_url: self.config.success_url(&order.oid),
            cancel_url: self.config.cancel_url(&order.oid),
        };

        let session = self.card.create_session(&request).await?;
        OrderService::attach_session(db, order, session.id.clone())
            .await
            .map_err(database::ServiceError::from)?;
        info!("Checkout session {} opened for order {oid}", session.id);

        Ok(session)
    }

    /// Ask the processor for the authoritative status and settle the order
    ///
    /// A card session must be the one stored on the order by
    /// [`Self::create_checkout`] and must reference the order at the processor.
    /// Repeated confirmations of a paid order report `AlreadyPaid` and never
    /// write a second round of enrollments.
    pub async fn confirm(
        &self,
        db: &DatabaseConnection,
        request: &ConfirmPayment,
    ) -> Result<ConfirmationOutcome, PaymentError> {
        let rail = match (
            non_empty(&request.session_id),
            non_empty(&request.paypal_order_id),
        ) {
            (Some(session_id), None) => Rail::Card(session_id),
            (None, Some(order_id)) => Rail::Wallet(order_id),
            (Some(_), Some(_)) => {
                return Err(PaymentError::InvalidRequest(
                    "provide either a session id or a wallet order id, not both".to_string(),
                ));
            }
            (None, None) => {
                return Err(PaymentError::InvalidRequest(
                    "a session id or a wallet order id is required".to_string(),
                ));
            }
        };

        let order = OrderService::find_by_oid(db, &request.order_oid).await?;

        match rail {
            Rail::Card(session_id) => {
                if order.stripe_session_id.as_deref() != Some(session_id) {
                    return Err(PaymentError::InvalidRequest(format!(
                        "session does not belong to order {}",
                        order.oid
                    )));
                }

                let session = self.card.session_status(session_id).await?;
                if session.client_reference_id.as_deref() != Some(order.oid.as_str()) {
                    warn!(
                        "Session {session_id} references {:?}, not order {}",
                        session.client_reference_id, order.oid
                    );
                    return Err(PaymentError::InvalidRequest(format!(
                        "session does not belong to order {}",
                        order.oid
                    )));
                }

                match session.status {
                    CardPaymentStatus::Paid => settle(db, &order.oid).await,
                    CardPaymentStatus::Unpaid => Ok(ConfirmationOutcome::Unpaid),
                    CardPaymentStatus::Canceled => {
                        let order = SettlementService::mark_failed(db, &order.oid).await?;
                        Ok(ConfirmationOutcome::Cancelled(order))
                    }
                }
            }
            Rail::Wallet(order_id) => {
                let status = self.wallet.order_status(order_id).await?;
                if status.is_completed() {
                    settle(db, &order.oid).await
                } else {
                    warn!(
                        "Wallet order {order_id} for {} is {}",
                        order.oid, status.0
                    );
                    Ok(ConfirmationOutcome::NotCompleted(status.0))
                }
            }
        }
    }
}

async fn settle(db: &DatabaseConnection, oid: &str) -> Result<ConfirmationOutcome, PaymentError> {
    Ok(match SettlementService::mark_paid(db, oid).await? {
        Settlement::Paid {
            order, enrollments, ..
        } => ConfirmationOutcome::Paid {
            order,
            enrollments: enrollments.len(),
        },
        Settlement::AlreadyPaid(order) => ConfirmationOutcome::AlreadyPaid(order),
    })
}

/// Clients send the literal `"null"` for an absent identifier
fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty() && *value != "null")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PaypalConfig, SessionState, StripeConfig, WalletStatus};
    use async_trait::async_trait;
    use database::{
        entities::{enrolled_course, teacher, user},
        services::{CartLineRequest, CartService, CurriculumService, NewOrder},
    };
    use migration::{Migrator, MigratorTrait};
    use models::curriculum::CourseDraft;
    use sea_orm::{
        ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectOptions, Database, EntityTrait,
        PaginatorTrait, QueryFilter,
    };
    use std::sync::Mutex;
    use testresult::TestResult;

    struct FakeCard {
        status: CardPaymentStatus,
        reachable: bool,
        requests: Mutex<Vec<CheckoutRequest>>,
    }

    impl FakeCard {
        fn new(status: CardPaymentStatus) -> Self {
            Self {
                status,
                reachable: true,
                requests: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl CardGateway for FakeCard {
        async fn create_session(
            &self,
            request: &CheckoutRequest,
        ) -> Result<CheckoutSession, PaymentError> {
            if !self.reachable {
                return Err(PaymentError::Gateway("connection refused".to_string()));
            }
            self.requests.lock().unwrap().push(request.clone());

            Ok(CheckoutSession {
                id: format!("cs_{}", request.order_oid),
                url: Some(format!("https://checkout.example.com/{}", request.order_oid)),
            })
        }

        async fn session_status(&self, session_id: &str) -> Result<SessionState, PaymentError> {
            Ok(SessionState {
                status: self.status.clone(),
                client_reference_id: session_id.strip_prefix("cs_").map(str::to_string),
            })
        }
    }

    struct FakeWallet(&'static str);

    #[async_trait]
    impl WalletGateway for FakeWallet {
        async fn order_status(&self, _: &str) -> Result<WalletStatus, PaymentError> {
            Ok(WalletStatus(self.0.to_string()))
        }
    }

    fn bridge(card: FakeCard, wallet: FakeWallet) -> PaymentBridge {
        let config = PaymentConfig {
            site_url: "https://learn.example.com".to_string(),
            currency: "usd".to_string(),
            stripe: StripeConfig {
                secret_key: String::new(),
                api_base: String::new(),
            },
            paypal: PaypalConfig {
                client_id: String::new(),
                secret_id: String::new(),
                api_base: String::new(),
            },
        };

        PaymentBridge::with_gateways(config, Arc::new(card), Arc::new(wallet))
    }

    async fn database() -> TestResult<DatabaseConnection> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;
        Ok(db)
    }

    async fn account(db: &DatabaseConnection, username: &str) -> TestResult<user::Model> {
        Ok(user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            full_name: Set(username.to_string()),
            created_at: Set(Default::default()),
            ..Default::default()
        }
        .insert(db)
        .await?)
    }

    /// A processing order for one 110.00 course bought by `student`
    async fn processing_order(db: &DatabaseConnection) -> TestResult<cart_order::Model> {
        let owner = account(db, "ada").await?;
        let profile = teacher::ActiveModel {
            user_id: Set(owner.id),
            full_name: Set("Ada".to_string()),
            created_at: Set(Default::default()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        let student = account(db, "student").await?;

        let (course, _) = CurriculumService::create_course(
            db,
            profile.id,
            CourseDraft {
                title: "Systems Programming".to_string(),
                price: 110_00,
                ..Default::default()
            },
        )
        .await?;

        CartService::upsert_line(
            db,
            CartLineRequest {
                cart_id: "cart-1".to_string(),
                course_id: course.id,
                user_id: Some(student.id),
                price: course.price,
                country: "Nowhere".to_string(),
            },
        )
        .await?;

        Ok(OrderService::create_order(
            db,
            NewOrder {
                full_name: "Student".to_string(),
                email: "student@example.com".to_string(),
                country: "Nowhere".to_string(),
                cart_id: "cart-1".to_string(),
                user_id: Some(student.id),
            },
        )
        .await?)
    }

    #[tokio::test]
    async fn test_card_confirmation_enrolls_once() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let bridge = bridge(FakeCard::new(CardPaymentStatus::Paid), FakeWallet("COMPLETED"));
        bridge.create_checkout(&db, &order.oid).await?;
        let request = ConfirmPayment {
            order_oid: order.oid.clone(),
            session_id: Some(format!("cs_{}", order.oid)),
            paypal_order_id: Some("null".to_string()),
        };

        let first = bridge.confirm(&db, &request).await?;
        assert!(matches!(
            first,
            ConfirmationOutcome::Paid { enrollments: 1, .. }
        ));

        let second = bridge.confirm(&db, &request).await?;
        assert!(matches!(second, ConfirmationOutcome::AlreadyPaid(_)));
        assert_eq!(enrolled_course::Entity::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unpaid_session_leaves_order_processing() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let bridge = bridge(FakeCard::new(CardPaymentStatus::Unpaid), FakeWallet("COMPLETED"));
        bridge.create_checkout(&db, &order.oid).await?;

        let outcome = bridge
            .confirm(
                &db,
                &ConfirmPayment {
                    order_oid: order.oid.clone(),
                    session_id: Some(format!("cs_{}", order.oid)),
                    paypal_order_id: None,
                },
            )
            .await?;

        assert!(matches!(outcome, ConfirmationOutcome::Unpaid));
        let reloaded = OrderService::find_by_oid(&db, &order.oid).await?;
        assert_eq!(reloaded.payment_status, PaymentStatus::Processing);
        assert_eq!(enrolled_course::Entity::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_canceled_session_fails_order() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let bridge = bridge(FakeCard::new(CardPaymentStatus::Canceled), FakeWallet("COMPLETED"));
        bridge.create_checkout(&db, &order.oid).await?;

        let outcome = bridge
            .confirm(
                &db,
                &ConfirmPayment {
                    order_oid: order.oid.clone(),
                    session_id: Some(format!("cs_{}", order.oid)),
                    paypal_order_id: None,
                },
            )
            .await?;

        match outcome {
            ConfirmationOutcome::Cancelled(order) => {
                assert_eq!(order.payment_status, PaymentStatus::Failed)
            }
            other => panic!("expected a cancellation, got {other:?}"),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_wallet_rail() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let request = ConfirmPayment {
            order_oid: order.oid.clone(),
            session_id: None,
            paypal_order_id: Some("5O190127TN364715T".to_string()),
        };

        let pending = bridge(FakeCard::new(CardPaymentStatus::Paid), FakeWallet("APPROVED"));
        match pending.confirm(&db, &request).await? {
            ConfirmationOutcome::NotCompleted(status) => assert_eq!(status, "APPROVED"),
            other => panic!("expected an incomplete wallet order, got {other:?}"),
        }

        let completed = bridge(FakeCard::new(CardPaymentStatus::Paid), FakeWallet("COMPLETED"));
        let outcome = completed.confirm(&db, &request).await?;
        assert!(matches!(
            outcome,
            ConfirmationOutcome::Paid { enrollments: 1, .. }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_confirmation_requires_exactly_one_rail() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let bridge = bridge(FakeCard::new(CardPaymentStatus::Paid), FakeWallet("COMPLETED"));

        for (session_id, paypal_order_id) in [
            (None, None),
            (Some("null"), Some("")),
            (Some("cs_test_1"), Some("5O190127TN364715T")),
        ] {
            let result = bridge
                .confirm(
                    &db,
                    &ConfirmPayment {
                        order_oid: order.oid.clone(),
                        session_id: session_id.map(str::to_string),
                        paypal_order_id: paypal_order_id.map(str::to_string),
                    },
                )
                .await;
            assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_stores_session() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let card = FakeCard::new(CardPaymentStatus::Unpaid);
        let bridge = bridge(card, FakeWallet("COMPLETED"));

        let session = bridge.create_checkout(&db, &order.oid).await?;

        assert_eq!(session.id, format!("cs_{}", order.oid));
        let reloaded = OrderService::find_by_oid(&db, &order.oid).await?;
        assert_eq!(reloaded.stripe_session_id, Some(session.id));

        let mismatched = bridge
            .confirm(
                &db,
                &ConfirmPayment {
                    order_oid: order.oid.clone(),
                    session_id: Some("cs_other".to_string()),
                    paypal_order_id: None,
                },
            )
            .await;
        assert!(matches!(mismatched, Err(PaymentError::InvalidRequest(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_session_of_another_order_is_rejected() -> TestResult {
        let db = database().await?;
        let paid = processing_order(&db).await?;
        let bridge = bridge(FakeCard::new(CardPaymentStatus::Paid), FakeWallet("COMPLETED"));
        let session = bridge.create_checkout(&db, &paid.oid).await?;
        bridge
            .confirm(
                &db,
                &ConfirmPayment {
                    order_oid: paid.oid.clone(),
                    session_id: Some(session.id.clone()),
                    paypal_order_id: None,
                },
            )
            .await?;

        let student = paid.student_id.ok_or("order without student")?;
        let owner = teacher::Entity::find()
            .one(&db)
            .await?
            .ok_or("no teacher")?;
        let (course, _) = CurriculumService::create_course(
            &db,
            owner.id,
            CourseDraft {
                title: "Async Rust".to_string(),
                price: 50_00,
                ..Default::default()
            },
        )
        .await?;
        CartService::upsert_line(
            &db,
            CartLineRequest {
                cart_id: "cart-2".to_string(),
                course_id: course.id,
                user_id: Some(student),
                price: course.price,
                country: "Nowhere".to_string(),
            },
        )
        .await?;
        let other = OrderService::create_order(
            &db,
            NewOrder {
                full_name: "Student".to_string(),
                email: "student@example.com".to_string(),
                country: "Nowhere".to_string(),
                cart_id: "cart-2".to_string(),
                user_id: Some(student),
            },
        )
        .await?;
        let replay = ConfirmPayment {
            order_oid: other.oid.clone(),
            session_id: Some(session.id.clone()),
            paypal_order_id: None,
        };

        // no checkout was opened for the second order
        let result = bridge.confirm(&db, &replay).await;
        assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));

        // a stored id that the processor ties to a different order
        OrderService::attach_session(&db, other.clone(), session.id.clone()).await?;
        let result = bridge.confirm(&db, &replay).await;
        assert!(matches!(result, Err(PaymentError::InvalidRequest(_))));

        let reloaded = OrderService::find_by_oid(&db, &other.oid).await?;
        assert_eq!(reloaded.payment_status, PaymentStatus::Processing);
        assert_eq!(enrolled_course::Entity::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_failure_keeps_order() -> TestResult {
        let db = database().await?;
        let order = processing_order(&db).await?;
        let mut card = FakeCard::new(CardPaymentStatus::Unpaid);
        card.reachable = false;
        let bridge = bridge(card, FakeWallet("COMPLETED"));

        let result = bridge.create_checkout(&db, &order.oid).await;

        assert!(matches!(result, Err(PaymentError::Gateway(_))));
        let reloaded = cart_order::Entity::find()
            .filter(cart_order::Column::Oid.eq(order.oid.as_str()))
            .one(&db)
            .await?
            .ok_or("order vanished")?;
        assert_eq!(reloaded, order);

        Ok(())
    }
}
