//! Coffee Delivery Core - Shared types library.
//!
//! This crate provides the domain types used across Coffee Delivery
//! components:
//! - `storefront` - Public-facing coffee storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no
//! rendering. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and the
//!   payment method enumeration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
