use std::sync::Arc;
use anyhow::Context;
use chrono::Utc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;
mod seed;

use appointment_cell::{booking_service_from_config, handlers::AppointmentCellState, AppointmentBook};
use medical_services_cell::MedicalServiceClient;
use queue_cell::{handlers::QueueCellState, QueueBoard};
use schedule_cell::{handlers::ScheduleCellState, ScheduleBoard};
use session_cell::{handlers::SessionCellState, UserDirectory};
use shared_config::AppConfig;
use shared_utils::session::{FileStore, MemoryStore, SessionManager, SessionStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Carepoint Hospital API server");

    // Load configuration
    let config = AppConfig::from_env();

    // Restore the signed-in user, if any
    let store: Arc<dyn SessionStore> = match &config.session_store_path {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::new()),
    };
    let sessions = Arc::new(SessionManager::new(store));
    sessions.init().await;

    // Boards
    let now = Utc::now();
    let today = now.date_naive();

    let booking_service = booking_service_from_config(&config, seed::appointments(today, now));
    let appointments = match booking_service.fetch_appointments().await {
        Ok(appointments) => appointments,
        Err(e) => {
            warn!("Starting with an empty appointment book: {}", e);
            Vec::new()
        }
    };
    let book = AppointmentBook::with_appointments(appointments).context("invalid appointment data")?;
    let queue = QueueBoard::with_items(seed::queue(now)).context("invalid queue seed")?;
    let schedule = ScheduleBoard::with_slots(seed::schedule(today)).context("invalid schedule seed")?;

    let state = router::AppState {
        session: Arc::new(SessionCellState {
            sessions: sessions.clone(),
            directory: UserDirectory::demo(),
        }),
        queue: Arc::new(QueueCellState::new(sessions.clone(), queue)),
        appointments: Arc::new(AppointmentCellState::new(
            sessions.clone(),
            book,
            booking_service,
            config.calendar_cell_limit,
        )),
        schedules: Arc::new(ScheduleCellState::new(sessions, schedule, config.calendar_cell_limit)),
        medical_services: Arc::new(MedicalServiceClient::from_config(&config)),
    };

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
