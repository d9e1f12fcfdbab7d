use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod error;
pub mod orders;
pub mod state;
pub mod tables;
pub mod tenants;
pub mod webhooks;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .route(
            "/v1/orders",
            post(orders::admit_order).get(orders::list_orders),
        )
        .route("/v1/orders/{id}", get(orders::get_order))
        .route("/v1/orders/{id}/transition", post(orders::transition_order))
        .route("/v1/orders/{id}/items", post(orders::append_items))
        .route("/v1/tables/{id}/transition", post(tables::transition_table))
        .route(
            "/v1/tenants/{id}/tables",
            get(tables::list_tables).post(tables::create_table),
        )
        .route("/v1/tenants/{id}/usage", get(tenants::get_usage))
        .route(
            "/v1/tenants/{id}/entitlements",
            get(tenants::get_entitlements),
        )
        .route(
            "/v1/tenants/{id}/delivery-tiers",
            put(tenants::replace_delivery_tiers),
        )
        .route("/v1/tenants/{id}/close-cycle", post(tenants::close_cycle))
        .route("/v1/webhooks/billing", post(webhooks::handle_billing_webhook))
        .route("/v1/admin/tenants", post(admin::create_tenant))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
