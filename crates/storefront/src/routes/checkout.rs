//! Checkout route handlers.
//!
//! The checkout form collects the delivery address and payment method,
//! auto-fills address fields from a postal-code lookup (HTMX fragment), and
//! on a valid submit writes the confirmed-order snapshot to the session,
//! clears the cart, remembers the postal code and redirects to `/success`.

use std::sync::LazyLock;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use coffee_delivery_core::PaymentMethod;

use crate::filters;
use crate::models::cart::Cart;
use crate::models::order::{Address, ConfirmedOrder, CostSummary};
use crate::models::session::keys;
use crate::routes::cart::{CartView, load_cart};
use crate::state::AppState;

/// Required shape of a postal code: five digits, hyphen, three digits.
static POSTAL_CODE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{3}$").expect("postal code regex is valid"));

// Field-level validation messages
const MSG_POSTAL_CODE: &str = "Insira um CEP válido";
const MSG_POSTAL_CODE_NOT_FOUND: &str = "CEP não encontrado";
const MSG_STREET: &str = "Insira a rua do endereço de entrega";
const MSG_NUMBER: &str = "Insira o número do endereço de entrega";
const MSG_DISTRICT: &str = "Insira o bairro do endereço de entrega";
const MSG_CITY: &str = "Insira a cidade do endereço de entrega";
const MSG_REGION: &str = "Insira o UF do endereço de entrega";

/// Checkout form data, exactly as submitted.
///
/// Kept as raw strings so an invalid submission re-renders with the
/// visitor's input intact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub complement: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Per-field validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub postal_code: Option<&'static str>,
    pub street: Option<&'static str>,
    pub number: Option<&'static str>,
    pub district: Option<&'static str>,
    pub city: Option<&'static str>,
    pub region: Option<&'static str>,
}

impl FieldErrors {
    /// Whether every field passed validation.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.postal_code.is_none()
            && self.street.is_none()
            && self.number.is_none()
            && self.district.is_none()
            && self.city.is_none()
            && self.region.is_none()
    }
}

impl CheckoutForm {
    /// Validate the form, producing a clean [`Address`] or the per-field
    /// errors to render inline.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] with a message for every failing field.
    pub fn validate(&self) -> Result<Address, FieldErrors> {
        let mut errors = FieldErrors::default();

        if !POSTAL_CODE_SHAPE.is_match(self.postal_code.trim()) {
            errors.postal_code = Some(MSG_POSTAL_CODE);
        }
        if self.street.trim().is_empty() {
            errors.street = Some(MSG_STREET);
        }
        if self.number.trim().is_empty() {
            errors.number = Some(MSG_NUMBER);
        }
        if self.district.trim().is_empty() {
            errors.district = Some(MSG_DISTRICT);
        }
        if self.city.trim().is_empty() {
            errors.city = Some(MSG_CITY);
        }
        if self.region.trim().chars().count() != 2 {
            errors.region = Some(MSG_REGION);
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let complement = self.complement.trim();
        Ok(Address {
            postal_code: self.postal_code.trim().to_string(),
            street: self.street.trim().to_string(),
            number: self.number.trim().to_string(),
            complement: (!complement.is_empty()).then(|| complement.to_string()),
            district: self.district.trim().to_string(),
            city: self.city.trim().to_string(),
            region: self.region.trim().to_uppercase(),
        })
    }
}

/// A payment method radio option for templates.
#[derive(Clone)]
pub struct PaymentOptionView {
    pub value: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

/// All payment options with the given one selected.
fn payment_options(selected: PaymentMethod) -> Vec<PaymentOptionView> {
    [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::Cash,
    ]
    .into_iter()
    .map(|method| PaymentOptionView {
        value: method.as_str(),
        label: method.label(),
        checked: method == selected,
    })
    .collect()
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub form: CheckoutForm,
    pub errors: FieldErrors,
    pub payment_options: Vec<PaymentOptionView>,
    pub cart: CartView,
}

/// Address fields fragment template (for HTMX postal-code auto-fill).
#[derive(Template, WebTemplate)]
#[template(path = "partials/address_fields.html")]
pub struct AddressFieldsTemplate {
    pub street: String,
    pub district: String,
    pub city: String,
    pub region: String,
    pub postal_code_error: Option<&'static str>,
}

impl AddressFieldsTemplate {
    fn empty_with_error(error: Option<&'static str>) -> Self {
        Self {
            street: String::new(),
            district: String::new(),
            city: String::new(),
            region: String::new(),
            postal_code_error: error,
        }
    }
}

/// Postal-code lookup query parameters.
#[derive(Debug, Deserialize)]
pub struct AddressLookupQuery {
    #[serde(default)]
    pub postal_code: String,
}

/// Display the checkout form.
///
/// When a postal code was remembered from a previous confirmation it is
/// pre-filled and resolved, pre-populating the address fields.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> impl IntoResponse {
    let cart = load_cart(&session).await;

    let mut form = CheckoutForm::default();
    let mut errors = FieldErrors::default();

    let remembered = session
        .get::<String>(keys::POSTAL_CODE)
        .await
        .ok()
        .flatten();

    if let Some(postal_code) = remembered {
        form.postal_code.clone_from(&postal_code);

        match state.cep().lookup(&postal_code).await {
            Ok(address) => {
                form.street = address.street;
                form.region = address.region;
                form.district = address.district;
                form.city = address.city;
            }
            Err(e) if e.is_not_found() => {
                errors.postal_code = Some(MSG_POSTAL_CODE_NOT_FOUND);
            }
            Err(e) => {
                // Leave the fields unfilled; the visitor types them in
                tracing::warn!(postal_code, error = %e, "postal-code lookup failed");
            }
        }
    }

    let payment_options = payment_options(form.payment_method);

    CheckoutTemplate {
        form,
        errors,
        payment_options,
        cart: CartView::build(&cart, state.catalog()),
    }
}

/// Resolve a postal code to address fields (HTMX).
///
/// Returns the street/district/city/region inputs filled from the lookup,
/// or a field error on the postal code when the service does not know it.
/// The input is wired with `hx-sync="this:replace"` so a newer lookup
/// aborts an in-flight one; the latest request wins.
#[instrument(skip(state))]
pub async fn address_lookup(
    State(state): State<AppState>,
    Query(query): Query<AddressLookupQuery>,
) -> impl IntoResponse {
    let postal_code = query.postal_code.trim();

    if !POSTAL_CODE_SHAPE.is_match(postal_code) {
        return AddressFieldsTemplate::empty_with_error(Some(MSG_POSTAL_CODE));
    }

    match state.cep().lookup(postal_code).await {
        Ok(address) => AddressFieldsTemplate {
            street: address.street,
            district: address.district,
            city: address.city,
            region: address.region,
            postal_code_error: None,
        },
        Err(e) if e.is_not_found() => {
            AddressFieldsTemplate::empty_with_error(Some(MSG_POSTAL_CODE_NOT_FOUND))
        }
        Err(e) => {
            tracing::warn!(postal_code, error = %e, "postal-code lookup failed");
            AddressFieldsTemplate::empty_with_error(None)
        }
    }
}

/// Validate the form and confirm the order.
///
/// On success: write the snapshot, clear the cart, remember the postal code
/// and redirect to `/success`. Invalid input re-renders the form with
/// inline errors; an empty cart can never be confirmed.
#[instrument(skip(state, session))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let cart = load_cart(&session).await;

    let address = match form.validate() {
        Ok(address) => address,
        Err(errors) => {
            let payment_options = payment_options(form.payment_method);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutTemplate {
                    form,
                    errors,
                    payment_options,
                    cart: CartView::build(&cart, state.catalog()),
                },
            )
                .into_response();
        }
    };

    // The confirm button is disabled for an empty cart, but the control is
    // advisory only; re-check here.
    if cart.is_empty() {
        return Redirect::to("/checkout").into_response();
    }

    let cost = CostSummary::from_subtotal(cart.subtotal(state.catalog()));
    let order = ConfirmedOrder {
        address,
        payment_method: form.payment_method,
        cost,
    };

    if let Err(e) = session.insert(keys::LAST_ORDER, &order).await {
        tracing::error!("Failed to store confirmed order: {e}");
        return crate::error::AppError::Internal(e.to_string()).into_response();
    }
    if let Err(e) = session
        .insert(keys::POSTAL_CODE, &order.address.postal_code)
        .await
    {
        tracing::error!("Failed to remember postal code: {e}");
    }
    if let Err(e) = session.remove::<Cart>(keys::CART).await {
        tracing::error!("Failed to clear cart: {e}");
    }

    tracing::info!(
        total = %order.cost.total,
        payment_method = %order.payment_method,
        "order confirmed"
    );

    Redirect::to("/success").into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::header::LOCATION;
    use tower_sessions::MemoryStore;

    use coffee_delivery_core::{CoffeeId, Price};

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::routes::cart::save_cart;

    fn test_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            postal_code: "01001-000".to_string(),
            street: "Praça da Sé".to_string(),
            number: "100".to_string(),
            complement: String::new(),
            district: "Sé".to_string(),
            city: "São Paulo".to_string(),
            region: "SP".to_string(),
            payment_method: PaymentMethod::default(),
        }
    }

    #[test]
    fn test_valid_form_passes() {
        let address = valid_form().validate().expect("valid form");
        assert_eq!(address.postal_code, "01001-000");
        assert_eq!(address.complement, None);
        assert_eq!(address.region, "SP");
    }

    #[test]
    fn test_postal_code_shape_is_enforced() {
        for bad in ["", "01001000", "0100-1000", "abcde-fgh", "01001-00"] {
            let form = CheckoutForm {
                postal_code: bad.to_string(),
                ..valid_form()
            };
            let errors = form.validate().expect_err("shape must fail");
            assert_eq!(errors.postal_code, Some(MSG_POSTAL_CODE));
        }
    }

    #[test]
    fn test_required_fields() {
        let form = CheckoutForm {
            street: "  ".to_string(),
            number: String::new(),
            district: String::new(),
            city: String::new(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("must fail");
        assert_eq!(errors.street, Some(MSG_STREET));
        assert_eq!(errors.number, Some(MSG_NUMBER));
        assert_eq!(errors.district, Some(MSG_DISTRICT));
        assert_eq!(errors.city, Some(MSG_CITY));
        assert_eq!(errors.postal_code, None);
    }

    #[test]
    fn test_region_must_be_two_characters() {
        for bad in ["", "S", "SPA"] {
            let form = CheckoutForm {
                region: bad.to_string(),
                ..valid_form()
            };
            let errors = form.validate().expect_err("region must fail");
            assert_eq!(errors.region, Some(MSG_REGION));
        }
    }

    #[test]
    fn test_region_is_uppercased() {
        let form = CheckoutForm {
            region: "sp".to_string(),
            ..valid_form()
        };
        let address = form.validate().expect("valid form");
        assert_eq!(address.region, "SP");
    }

    #[test]
    fn test_complement_is_optional() {
        let with = CheckoutForm {
            complement: "Apto 12".to_string(),
            ..valid_form()
        };
        let address = with.validate().expect("valid form");
        assert_eq!(address.complement.as_deref(), Some("Apto 12"));
    }

    #[test]
    fn test_payment_options_mark_selection() {
        let options = payment_options(PaymentMethod::Cash);
        assert_eq!(options.len(), 3);
        let checked: Vec<_> = options.iter().filter(|o| o.checked).collect();
        assert_eq!(checked.len(), 1);
        assert_eq!(checked.first().map(|o| o.value), Some("cash"));
    }

    #[test]
    fn test_default_payment_option_is_credit_card() {
        let options = payment_options(PaymentMethod::default());
        let checked = options.iter().find(|o| o.checked).expect("one checked");
        assert_eq!(checked.value, "credit_card");
    }

    #[tokio::test]
    async fn test_submit_with_empty_cart_redirects_back() {
        let state = AppState::new(StorefrontConfig::default());
        let session = test_session();

        let response = submit(State(state), session.clone(), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location"),
            "/checkout"
        );
        let snapshot = session
            .get::<ConfirmedOrder>(keys::LAST_ORDER)
            .await
            .expect("session read");
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn test_submit_snapshots_order_and_clears_cart() {
        let state = AppState::new(StorefrontConfig::default());
        let session = test_session();

        // 2 × 9,90 + 1 × 8,90 = 28,70
        let mut cart = Cart::default();
        cart.add(CoffeeId::from("expresso-tradicional"), 2);
        cart.add(CoffeeId::from("capuccino"), 1);
        save_cart(&session, &cart).await.expect("save cart");

        let response = submit(State(state), session.clone(), Form(valid_form())).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location"),
            "/success"
        );

        let order = session
            .get::<ConfirmedOrder>(keys::LAST_ORDER)
            .await
            .expect("session read")
            .expect("snapshot present");
        assert_eq!(order.address, valid_form().validate().expect("valid form"));
        assert_eq!(order.payment_method, PaymentMethod::CreditCard);
        assert_eq!(order.cost.subtotal, Price::from_cents(2870));
        assert_eq!(order.cost.delivery_fee, Price::from_cents(350));
        assert_eq!(order.cost.total, Price::from_cents(3220));

        assert!(load_cart(&session).await.is_empty());
        let remembered = session
            .get::<String>(keys::POSTAL_CODE)
            .await
            .expect("session read");
        assert_eq!(remembered.as_deref(), Some("01001-000"));
    }

    #[tokio::test]
    async fn test_submit_invalid_form_is_unprocessable() {
        let state = AppState::new(StorefrontConfig::default());
        let session = test_session();

        let form = CheckoutForm {
            postal_code: "123".to_string(),
            ..valid_form()
        };
        let response = submit(State(state), session.clone(), Form(form)).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let snapshot = session
            .get::<ConfirmedOrder>(keys::LAST_ORDER)
            .await
            .expect("session read");
        assert!(snapshot.is_none());
    }
}
