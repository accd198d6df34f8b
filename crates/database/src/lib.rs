//! Persistence layer of the marketplace: sea-orm entities and the services
//! that implement the cart, order, coupon, payment settlement, dashboard and
//! curriculum operations on top of them.

pub mod db;
pub mod entities;
pub mod error;
pub mod services;

#[cfg(test)]
mod test;

pub use error::ServiceError;
