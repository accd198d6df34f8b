use async_trait::async_trait;
use models::money::Cents;

use crate::PaymentError;

/// Everything the card rail needs to open a hosted checkout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub order_oid: String,
    pub customer_email: Option<String>,
    pub description: String,
    /// Minor units of `currency`
    pub amount: Cents,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted page the buyer is redirected to
    pub url: Option<String>,
}

/// Payment state of a hosted checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardPaymentStatus {
    Paid,
    Unpaid,
    Canceled,
}

impl CardPaymentStatus {
    /// Maps the processor's `payment_status` and session `status` fields
    pub fn from_session(payment_status: &str, status: Option<&str>) -> Self {
        match (payment_status, status) {
            ("paid" | "no_payment_required", _) => Self::Paid,
            ("canceled", _) | (_, Some("expired")) => Self::Canceled,
            _ => Self::Unpaid,
        }
    }
}

/// What the card processor reports about a checkout session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub status: CardPaymentStatus,
    /// Order code the session was opened for
    pub client_reference_id: Option<String>,
}

/// Status string of a wallet order, e.g. `"COMPLETED"` or `"APPROVED"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletStatus(pub String);

impl WalletStatus {
    pub fn is_completed(&self) -> bool {
        self.0 == "COMPLETED"
    }
}

/// Hosted card checkout processor
#[async_trait]
pub trait CardGateway: Send + Sync {
    async fn create_session(&self, request: &CheckoutRequest)
    -> Result<CheckoutSession, PaymentError>;

    async fn session_status(&self, session_id: &str) -> Result<SessionState, PaymentError>;
}

/// Third-party wallet processor
#[async_trait]
pub trait WalletGateway: Send + Sync {
    async fn order_status(&self, order_id: &str) -> Result<WalletStatus, PaymentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_status_mapping() {
        assert_eq!(
            CardPaymentStatus::from_session("paid", Some("complete")),
            CardPaymentStatus::Paid
        );
        assert_eq!(
            CardPaymentStatus::from_session("unpaid", Some("open")),
            CardPaymentStatus::Unpaid
        );
        assert_eq!(
            CardPaymentStatus::from_session("unpaid", Some("expired")),
            CardPaymentStatus::Canceled
        );
        assert_eq!(
            CardPaymentStatus::from_session("canceled", None),
            CardPaymentStatus::Canceled
        );
    }

    #[test]
    fn test_wallet_completion() {
        assert!(WalletStatus("COMPLETED".to_string()).is_completed());
        assert!(!WalletStatus("APPROVED".to_string()).is_completed());
        assert!(!WalletStatus("completed".to_string()).is_completed());
    }
}
