//! Payment bridge between orders and the external processors
//!
//! Two rails are supported: a hosted card checkout session and a wallet
//! order. The bridge always asks the processor for the authoritative status
//! before settling an order.

mod bridge;
mod config;
mod error;
mod gateway;
mod paypal;
mod stripe;

pub use bridge::{ConfirmPayment, ConfirmationOutcome, PaymentBridge};
pub use config::{PaymentConfig, PaypalConfig, StripeConfig};
pub use error::PaymentError;
pub use gateway::{
    CardGateway, CardPaymentStatus, CheckoutRequest, CheckoutSession, SessionState, WalletGateway,
    WalletStatus,
};
pub use paypal::PaypalClient;
pub use stripe::StripeClient;
