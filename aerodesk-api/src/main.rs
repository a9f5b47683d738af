use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use aerodesk_api::{
    app,
    state::{AppState, AuthSettings},
};
use aerodesk_checkin::{CabinSpec, DeskSettings, SeatLayout};
use aerodesk_store::app_config::CabinConfig;
use aerodesk_store::{
    DbClient, PostgresBoardingRepository, PostgresEmployeeRepository, PostgresFlightRepository,
    PostgresPassengerRepository, PostgresServiceRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aerodesk_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = aerodesk_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Aerodesk API on port {}", config.server.port);

    let db = DbClient::connect(&config.database)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let layout = SeatLayout::from_cabins(
        &cabin_spec(&config.seating.business),
        &cabin_spec(&config.seating.economy),
    )
    .expect("Invalid seat layout configuration");
    tracing::info!("Seat layout loaded with {} seats", layout.len());

    let app_state = AppState {
        passengers: Arc::new(PostgresPassengerRepository::new(db.pool.clone())),
        flights: Arc::new(PostgresFlightRepository::new(db.pool.clone())),
        boardings: Arc::new(PostgresBoardingRepository::new(db.pool.clone())),
        services: Arc::new(PostgresServiceRepository::new(db.pool.clone())),
        employees: Arc::new(PostgresEmployeeRepository::new(db.pool.clone())),
        layout: Arc::new(layout),
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            expiration_seconds: config.auth.jwt_expiration_seconds,
        },
        desk_settings: DeskSettings {
            store_timeout: Duration::from_millis(config.checkin.store_timeout_ms),
            default_baggage_kg: config.checkin.default_baggage_kg,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}

fn cabin_spec(cfg: &CabinConfig) -> CabinSpec {
    CabinSpec {
        first_row: cfg.first_row,
        last_row: cfg.last_row,
        letters: cfg.letters.clone(),
    }
}
