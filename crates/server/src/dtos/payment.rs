use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::order::OrderResponse;

/// Sent by the client after the processor redirected back
#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmPaymentBody {
    pub order_oid: String,
    /// Card checkout session id
    pub session_id: Option<String>,
    /// Wallet order id
    pub paypal_order_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResponse {
    pub message: String,
    pub order: OrderResponse,
}
