//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself is stored in the session record; every handler reads it,
//! mutates it and writes it back within the request.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use coffee_delivery_core::CoffeeId;

use crate::catalog::Catalog;
use crate::filters;
use crate::models::cart::Cart;
use crate::models::order::DELIVERY_FEE;
use crate::models::session::keys;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
    pub item_count: u32,
    pub is_empty: bool,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            subtotal: "R$ 0,00".to_string(),
            delivery_fee: "R$ 0,00".to_string(),
            total: "R$ 0,00".to_string(),
            item_count: 0,
            is_empty: true,
        }
    }

    /// Project a cart onto display data, pricing lines from the catalog.
    ///
    /// The delivery fee and total show as zero for an empty cart, matching
    /// the checkout summary.
    #[must_use]
    pub fn build(cart: &Cart, catalog: &Catalog) -> Self {
        if cart.is_empty() {
            return Self::empty();
        }

        let items = cart
            .lines()
            .iter()
            .filter_map(|line| {
                catalog.get(&line.coffee_id).map(|coffee| CartItemView {
                    id: coffee.id.to_string(),
                    name: coffee.name.clone(),
                    quantity: line.quantity,
                    price: coffee.price.to_string(),
                    line_price: coffee.price.times(line.quantity).to_string(),
                    image: coffee.image.clone(),
                })
            })
            .collect();

        let subtotal = cart.subtotal(catalog);

        Self {
            items,
            subtotal: subtotal.to_string(),
            delivery_fee: DELIVERY_FEE.to_string(),
            total: (subtotal + DELIVERY_FEE).to_string(),
            item_count: cart.item_count(),
            is_empty: false,
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session, defaulting to an empty one.
pub(crate) async fn load_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub coffee_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub coffee_id: String,
    pub delta: i32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub coffee_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Display cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        cart: CartView::build(&cart, state.catalog()),
    }
}

/// Add a coffee to the cart (HTMX).
///
/// Inserts a new line or increments an existing one, then returns the cart
/// count badge with an HTMX trigger so other fragments refresh.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let coffee_id = CoffeeId::from(form.coffee_id);

    // Unknown ids never enter the cart
    if state.catalog().get(&coffee_id).is_none() {
        tracing::debug!(%coffee_id, "add ignored: coffee not in catalog");
        let cart = load_cart(&session).await;
        return CartCountTemplate {
            count: cart.item_count(),
        }
        .into_response();
    }

    let mut cart = load_cart(&session).await;
    cart.add(coffee_id, form.quantity.unwrap_or(1));

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.item_count(),
        },
    )
        .into_response()
}

/// Adjust a line's quantity (HTMX).
///
/// The quantity is clamped to a minimum of one; lines are only deleted via
/// [`remove`]. Unknown ids leave the cart untouched.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let coffee_id = CoffeeId::from(form.coffee_id);

    let mut cart = load_cart(&session).await;
    cart.change_quantity(&coffee_id, form.delta);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&cart, state.catalog()),
        },
    )
        .into_response()
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let coffee_id = CoffeeId::from(form.coffee_id);

    let mut cart = load_cart(&session).await;
    cart.remove(&coffee_id);

    if let Err(e) = save_cart(&session, &cart).await {
        tracing::error!("Failed to save cart to session: {e}");
    }

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::build(&cart, state.catalog()),
        },
    )
        .into_response()
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    CartCountTemplate {
        count: cart.item_count(),
    }
}
