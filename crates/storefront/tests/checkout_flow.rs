//! Checkout flow tests over the full storefront router.
//!
//! Drives `routes::routes()` with the session layer attached, threading the
//! session cookie between requests the way a browser would.

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use tower::ServiceExt;

use coffee_delivery_storefront::config::StorefrontConfig;
use coffee_delivery_storefront::middleware::create_session_layer;
use coffee_delivery_storefront::routes;
use coffee_delivery_storefront::state::AppState;

const VALID_FORM: &str = "postal_code=01001-000&street=Rua+das+Laranjeiras&number=42\
                          &complement=&district=Centro&city=Sao+Paulo&region=SP\
                          &payment_method=cash";

fn app() -> Router {
    let config = StorefrontConfig::default();
    let state = AppState::new(config.clone());

    routes::routes()
        .layer(create_session_layer(&config))
        .with_state(state)
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

fn post_form(uri: &str, body: &'static str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).expect("request")
}

fn session_cookie(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .expect("ascii cookie")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

#[tokio::test]
async fn success_without_confirmed_order_redirects_to_checkout() {
    let response = app()
        .oneshot(get("/success", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/checkout"
    );
}

#[tokio::test]
async fn valid_submit_with_empty_cart_is_not_confirmed() {
    let response = app()
        .oneshot(post_form("/checkout", VALID_FORM, None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/checkout"
    );
}

#[tokio::test]
async fn checkout_flow_confirms_order_and_empties_cart() {
    let app = app();

    // Add two coffees; the response sets the session cookie
    let response = app
        .clone()
        .oneshot(post_form(
            "/cart/add",
            "coffee_id=expresso-tradicional&quantity=2",
            None,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    // Confirm the order
    let response = app
        .clone()
        .oneshot(post_form("/checkout", VALID_FORM, Some(&cookie)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).expect("location"),
        "/success"
    );

    // The confirmation screen renders the submitted address and payment
    let response = app
        .clone()
        .oneshot(get("/success", Some(&cookie)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Rua das Laranjeiras, 42"));
    assert!(page.contains("Dinheiro"));

    // The cart was cleared by the confirmation
    let response = app
        .oneshot(get("/cart/count", Some(&cookie)))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await.trim(), "0");
}

#[tokio::test]
async fn malformed_postal_code_lookup_returns_field_error() {
    let response = app()
        .oneshot(get("/checkout/address?postal_code=123", None))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let fragment = body_text(response).await;
    assert!(fragment.contains("Insira um CEP válido"));
}

#[tokio::test]
async fn invalid_submit_rerenders_form_with_errors() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_form(
            "/cart/add",
            "coffee_id=expresso-tradicional&quantity=1",
            None,
        ))
        .await
        .expect("response");
    let cookie = session_cookie(&response);

    let response = app
        .oneshot(post_form(
            "/checkout",
            "postal_code=123&street=&number=&complement=&district=&city=&region=\
             &payment_method=credit_card",
            Some(&cookie),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = body_text(response).await;
    assert!(page.contains("Insira um CEP válido"));
    assert!(page.contains("Insira a rua do endereço de entrega"));
}
