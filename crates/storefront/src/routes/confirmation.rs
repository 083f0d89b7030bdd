//! Order confirmation screen.
//!
//! Pure read of the session's confirmed-order snapshot. Visiting without a
//! confirmed order (fresh session, expired session, direct link) redirects
//! back to checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::{IntoResponse, Redirect, Response};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::models::order::ConfirmedOrder;
use crate::models::session::keys;

/// Fixed delivery estimate shown on the confirmation screen.
const DELIVERY_ESTIMATE: &str = "20 min - 30 min";

/// Confirmed order display data for templates.
pub struct OrderView {
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    pub region: String,
    pub payment_label: &'static str,
    pub delivery_estimate: &'static str,
}

impl From<&ConfirmedOrder> for OrderView {
    fn from(order: &ConfirmedOrder) -> Self {
        Self {
            street: order.address.street.clone(),
            number: order.address.number.clone(),
            district: order.address.district.clone(),
            city: order.address.city.clone(),
            region: order.address.region.clone(),
            payment_label: order.payment_method.label(),
            delivery_estimate: DELIVERY_ESTIMATE,
        }
    }
}

/// Confirmation page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/success.html")]
pub struct SuccessTemplate {
    pub order: OrderView,
}

/// Display the confirmation screen, or redirect to checkout when no order
/// has been confirmed in this session.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Response {
    let order = session
        .get::<ConfirmedOrder>(keys::LAST_ORDER)
        .await
        .ok()
        .flatten();

    match order {
        Some(order) => SuccessTemplate {
            order: OrderView::from(&order),
        }
        .into_response(),
        None => Redirect::to("/checkout").into_response(),
    }
}
