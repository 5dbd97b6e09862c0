//! # Folio API
//!
//! The web server behind the portfolio site. It serves the content documents
//! the pages render, the admin endpoints that edit them, the contact form and
//! the meeting scheduler.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Authentication and error mapping
//! - **Session**: In-memory admin sessions with change notifications
//! - **Config**: Environment configuration
//!
//! Content documents and busy intervals are reached through the
//! [`ContentStore`] and [`CalendarBackend`] traits, so the server runs against
//! PostgreSQL or an external calendar service in production and against
//! in-memory doubles in tests.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;
/// Admin session tracking
pub mod session;

use std::{sync::Arc, time::Duration};

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderValue, Method, StatusCode, header},
};
use eyre::Result;
use folio_calendar::HttpCalendarBackend;
use folio_core::{calendar::CalendarBackend, store::ContentStore};
use folio_db::repositories::{appointment::AppointmentCalendar, content::PgContentStore};
use serde_json::{Value, json};
use sqlx::PgPool;
use tokio::{net::TcpListener, task::JoinHandle};
use tower::{BoxError, ServiceBuilder};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

use config::{AdminCredentials, ApiConfig, ScheduleSettings};
use session::{SessionEvent, SessionStore};

/// How often expired admin sessions are swept.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// PostgreSQL connection pool for database operations
    pub db_pool: PgPool,
    /// Site content documents
    pub content: Arc<dyn ContentStore>,
    /// Where busy intervals come from and bookings go to
    pub calendar: Arc<dyn CalendarBackend>,
    /// Signed-in admins
    pub sessions: SessionStore,
    /// Offered meeting slots
    pub schedule: ScheduleSettings,
    /// The admin account
    pub admin: AdminCredentials,
}

/// Assembles every route on top of `state`.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .merge(routes::health::routes())
        .merge(routes::auth::routes())
        .merge(routes::content::routes())
        .merge(routes::contact::routes())
        .merge(routes::schedule::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring malformed CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_origin(origins)
        .allow_credentials(true)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    }
}

/// Logs session changes until the store goes away or the task is aborted.
pub fn spawn_session_logger(sessions: &SessionStore) -> JoinHandle<()> {
    let mut subscription = sessions.subscribe();
    tokio::spawn(async move {
        while let Some(event) = subscription.next().await {
            match event {
                SessionEvent::SignedIn { email } => info!("Admin session opened for {}", email),
                SessionEvent::SignedOut { email } => info!("Admin session closed for {}", email),
                SessionEvent::Expired { email } => info!("Admin session for {} expired", email),
            }
        }
        subscription.unsubscribe();
    })
}

fn spawn_session_sweeper(sessions: SessionStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                info!("Purged {} expired admin sessions", purged);
            }
        }
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Starts the API server with the provided configuration and database connection
///
/// Installs the log subscriber, picks the calendar backend (the external
/// service when `CALENDAR_API_URL` is set, otherwise the local appointment
/// table) and serves until Ctrl-C.
pub async fn start_server(config: ApiConfig, db_pool: PgPool) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let calendar: Arc<dyn CalendarBackend> = match &config.calendar {
        Some(calendar_config) => {
            info!("Using calendar service at {}", calendar_config.base_url);
            Arc::new(HttpCalendarBackend::new(calendar_config.clone())?)
        }
        None => {
            info!("No calendar service configured, storing appointments in the database");
            Arc::new(AppointmentCalendar::new(db_pool.clone()))
        }
    };

    let sessions = SessionStore::new(chrono::Duration::minutes(config.session_ttl_minutes));
    let session_logger = spawn_session_logger(&sessions);
    let session_sweeper = spawn_session_sweeper(sessions.clone());

    let state = Arc::new(ApiState {
        content: Arc::new(PgContentStore::new(db_pool.clone())),
        db_pool,
        calendar,
        sessions,
        schedule: config.schedule.clone(),
        admin: config.admin.clone(),
    });

    let app = build_router(state);

    let app = match &config.cors_origins {
        Some(origins) => app.layer(cors_layer(origins)),
        None => app,
    };

    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_middleware_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    session_sweeper.abort();
    session_logger.abort();
    info!("Server stopped");

    Ok(())
}
