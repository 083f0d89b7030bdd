//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Catalog (browse) page, ?q= text filter
//! GET  /health                 - Health check
//!
//! # Cart (HTMX fragments)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add coffee (returns count badge, triggers cart-updated)
//! POST /cart/update            - Adjust quantity (returns cart_items fragment)
//! POST /cart/remove            - Remove line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Address + payment form
//! GET  /checkout/address       - Postal-code lookup fragment (HTMX)
//! POST /checkout               - Validate and confirm the order
//!
//! # Confirmation
//! GET  /success                - Confirmation screen (redirects to /checkout
//!                                when no order was confirmed)
//! ```

pub mod cart;
pub mod checkout;
pub mod confirmation;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Browse page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        .route("/checkout/address", get(checkout::address_lookup))
        // Confirmation
        .route("/success", get(confirmation::show))
}
