pub mod cart;
pub mod catalog;
pub mod order;
pub mod payment;
pub mod student;
pub mod teacher;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Human-readable outcome shown by the client
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Clients send `0` for a signed-out visitor
pub fn known_user(user_id: Option<i32>) -> Option<i32> {
    user_id.filter(|id| *id > 0)
}
