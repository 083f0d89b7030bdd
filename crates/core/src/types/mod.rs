//! Core types for Coffee Delivery.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod payment;
pub mod price;

pub use id::CoffeeId;
pub use payment::{PaymentMethod, PaymentMethodError};
pub use price::Price;
