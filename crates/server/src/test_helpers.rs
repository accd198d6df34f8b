//! Router harness backed by an in-memory database and fake processors

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use database::{
    entities::{course, teacher, user},
    services::CurriculumService,
};
use migration::{Migrator, MigratorTrait};
use models::curriculum::CourseDraft;
use payments::{
    CardGateway, CardPaymentStatus, CheckoutRequest, CheckoutSession, PaymentBridge,
    PaymentConfig, PaymentError, PaypalConfig, SessionState, StripeConfig, WalletGateway,
    WalletStatus,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use testresult::TestResult;
use tower::ServiceExt;

use crate::{routes, state::AppState};

pub struct FakeCard(pub CardPaymentStatus);

#[async_trait]
impl CardGateway for FakeCard {
    async fn create_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        Ok(CheckoutSession {
            id: format!("cs_{}", request.order_oid),
            url: Some(format!("https://checkout.test/{}", request.order_oid)),
        })
    }

    async fn session_status(&self, session_id: &str) -> Result<SessionState, PaymentError> {
        Ok(SessionState {
            status: self.0.clone(),
            client_reference_id: session_id.strip_prefix("cs_").map(str::to_string),
        })
    }
}

pub struct FakeWallet(pub &'static str);

#[async_trait]
impl WalletGateway for FakeWallet {
    async fn order_status(&self, _: &str) -> Result<WalletStatus, PaymentError> {
        Ok(WalletStatus(self.0.to_string()))
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

impl TestApp {
    pub async fn new(card: CardPaymentStatus) -> TestResult<Self> {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await?;
        Migrator::up(&db, None).await?;

        let config = PaymentConfig {
            site_url: "https://learn.test".to_string(),
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
        let bridge = PaymentBridge::with_gateways(
            config,
            Arc::new(FakeCard(card)),
            Arc::new(FakeWallet("COMPLETED")),
        );

        Ok(Self {
            router: routes::router(AppState::new(db.clone(), bridge)),
            db,
        })
    }

    /// Sends a request and decodes the JSON body, `Value::Null` when empty
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResult<(StatusCode, HeaderMap, Value)> {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => request.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        Ok((status, headers, json))
    }

    pub async fn user(&self, username: &str) -> TestResult<user::Model> {
        Ok(user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            full_name: Set(username.to_string()),
            created_at: Set(Default::default()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    pub async fn teacher(&self, username: &str) -> TestResult<teacher::Model> {
        let user = self.user(username).await?;

        Ok(teacher::ActiveModel {
            user_id: Set(user.id),
            full_name: Set(user.full_name),
            created_at: Set(Default::default()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// A published course with one section and one lesson
    pub async fn course(
        &self,
        teacher_id: i32,
        title: &str,
        price: i64,
    ) -> TestResult<course::Model> {
        let draft: CourseDraft = serde_json::from_value(serde_json::json!({
            "title": title,
            "price": price,
            "variants": [{ "title": "Basics", "items": [{ "title": "Welcome" }] }],
        }))?;
        let (course, _) = CurriculumService::create_course(&self.db, teacher_id, draft).await?;

        Ok(course)
    }
}
