use payments::PaymentBridge;
use sea_orm::DatabaseConnection;

/// Shared by every handler; both fields are cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub payments: PaymentBridge,
}

impl AppState {
    pub fn new(db: DatabaseConnection, payments: PaymentBridge) -> Self {
        Self { db, payments }
    }
}
