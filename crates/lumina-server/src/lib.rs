#![forbid(unsafe_code)]
//! HTTP surface of the Lumina bookstore: router, gates, and handlers.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use lumina_auth::TokenIssuer;
use lumina_payments::PaymentGateway;
use lumina_store::Store;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

mod config;
mod http;
mod middleware;

pub use config::{Config, INSECURE_JWT_SECRET, PLACEHOLDER_STRIPE_KEY};

pub const CRATE_NAME: &str = "lumina-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub tokens: Arc<TokenIssuer>,
    pub payments: Arc<dyn PaymentGateway>,
    pub config: Arc<Config>,
    pub request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Store, payments: Arc<dyn PaymentGateway>, config: Config) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
            payments,
            config: Arc::new(config),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/healthz", get(http::healthz_handler))
        .route("/api/auth/signup", post(http::auth::signup_handler))
        .route("/api/auth/login", post(http::auth::login_handler))
        .route("/api/books", get(http::books::list_books_handler))
        .route("/api/books/:id", get(http::books::get_book_handler))
        .route(
            "/api/payment/create-intent",
            post(http::payments::create_intent_handler),
        );

    let authed = Router::new()
        .route("/api/books/:id/reviews", post(http::books::add_review_handler))
        .route("/api/user/wishlist", get(http::wishlist::list_wishlist_handler))
        .route(
            "/api/user/wishlist/:book_id",
            post(http::wishlist::toggle_wishlist_handler),
        )
        .route("/api/orders", post(http::orders::create_order_handler))
        .route("/api/orders/my-orders", get(http::orders::my_orders_handler))
        .route("/api/orders/:id/confirm", post(http::orders::confirm_order_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // The admin gate is layered after (and blindly trusts) the authenticated
    // gate; layers added later run first.
    let admin = Router::new()
        .route("/api/books", post(http::books::create_book_handler))
        .route(
            "/api/books/:id",
            put(http::books::update_book_handler).delete(http::books::delete_book_handler),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_admin,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    public
        .merge(authed)
        .merge(admin)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing::request_tracing_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.config.max_body_bytes))
        .with_state(state)
}
