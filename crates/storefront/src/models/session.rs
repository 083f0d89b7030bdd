//! Session-stored state.
//!
//! The session record is the storefront's only persistence: the live cart,
//! the last confirmed order and the remembered postal code all live here.

/// Session keys for storefront data.
pub mod keys {
    /// Key for the live shopping cart.
    pub const CART: &str = "cart";

    /// Key for the last confirmed order snapshot.
    pub const LAST_ORDER: &str = "last_order";

    /// Key for the postal code remembered from the last confirmation.
    pub const POSTAL_CODE: &str = "postal_code";
}
