use std::net::SocketAddr;
use std::sync::Arc;

use comanda_api::{app, AppState};
use comanda_order::{AdmissionGateway, BillingOrchestrator, MockCheckoutAdapter};
use comanda_store::{EventLog, InMemoryPlanRepository, InMemoryTenantRepository, InMemoryTierRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comanda_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = comanda_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Comanda API on port {}", config.server.port);

    let plans = Arc::new(InMemoryPlanRepository::new());
    let tenants = Arc::new(InMemoryTenantRepository::new());
    let tiers = Arc::new(InMemoryTierRepository::new());

    // Checkout provider adapter; swapped for the real gateway in deployment
    let billing = BillingOrchestrator::new(
        Arc::new(MockCheckoutAdapter),
        config.business_rules.top_up_price_cents,
    );

    let gateway = AdmissionGateway::new(
        plans.clone(),
        tenants.clone(),
        tiers,
        billing,
        config.business_rules.retain_over_limit,
    );

    let app_state = AppState {
        gateway: Arc::new(gateway),
        plans,
        tenants,
        telemetry: Arc::new(EventLog::new()),
        business_rules: config.business_rules.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
