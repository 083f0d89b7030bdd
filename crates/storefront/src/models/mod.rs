//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod session;

pub use cart::{Cart, CartLine};
pub use order::{Address, ConfirmedOrder, CostSummary, DELIVERY_FEE};
