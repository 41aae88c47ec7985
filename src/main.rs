use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pulseboard::config::Config;
use pulseboard::services::query_gate;
use pulseboard::utils::ScheduledExecutor;
use pulseboard::{AppState, ChartRenderer, SamplerService, SessionState, StoreExecutor, handlers, models};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::query::run_query,
        handlers::query::rerun_last,
        handlers::chart::line_chart,
        handlers::chart::pie_chart,
    ),
    components(
        schemas(models::QueryRequest, models::QueryResponse, models::QueryResult, models::Summary)
    ),
    tags(
        (name = "Query Console", description = "Restricted read-only SQL console"),
        (name = "Charts", description = "Server-rendered chart images"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Load configuration first
    let config = Config::load()?;

    // Initialize logging
    let log_filter = tracing_subscriber::EnvFilter::new(&config.logging.level);
    let registry = tracing_subscriber::registry().with(log_filter);

    // Keep the non-blocking appender guard alive for the process lifetime.
    let mut _appender_guard = None;
    if let Some(log_file) = &config.logging.file {
        let log_path = std::path::Path::new(log_file);
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let log_dir = log_path.parent().and_then(|p| p.to_str()).unwrap_or("logs");
        let file_name = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("pulseboard.log");
        // Rolling appender adds its own date suffix
        let file_prefix = file_name.strip_suffix(".log").unwrap_or(file_name);

        let file_appender = tracing_appender::rolling::daily(log_dir, file_prefix);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        _appender_guard = Some(guard);
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
            .with(tracing_subscriber::fmt::layer())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
    tracing::info!("Pulseboard starting up");

    // The configured default query goes through the same gate as user input,
    // so a misconfigured deployment fails here instead of on first poll.
    let default_query =
        query_gate::sanitize(&config.dashboard.default_query, config.dashboard.max_points)
            .map_err(|e| format!("Invalid dashboard.default_query: {}", e))?;

    let executor = Arc::new(StoreExecutor::new(&config.database));
    let session = Arc::new(SessionState::new(default_query));
    let renderer = Arc::new(ChartRenderer::new(
        Arc::clone(&executor),
        config.dashboard.max_points,
    ));

    let app_state = Arc::new(AppState {
        executor: Arc::clone(&executor),
        session,
        renderer,
        dashboard: config.dashboard.clone(),
    });

    // Start the host sampler (configurable interval)
    if config.sampler.enabled {
        if let Err(e) = executor.ensure_schema().await {
            tracing::warn!("Could not provision stats table yet: {} (sampler will retry inserts)", e);
        }

        let interval = std::time::Duration::from_secs(config.sampler.interval_secs);
        tracing::info!("Starting host sampler with interval: {}s", config.sampler.interval_secs);
        let sampler = Arc::new(SamplerService::new(Arc::clone(&executor)));
        let sampler_executor = ScheduledExecutor::new("host-sampler", interval);
        tokio::spawn(async move {
            sampler_executor.start(sampler).await;
        });
    } else {
        tracing::warn!("Host sampler disabled by configuration");
    }

    let api_routes = Router::new()
        .route(
            "/api/query",
            post(handlers::query::run_query).get(handlers::query::rerun_last),
        )
        .route("/chart/line", get(handlers::chart::line_chart))
        .route("/chart/pie", get(handlers::chart::pie_chart))
        .route("/", get(handlers::dashboard::index))
        .with_state(Arc::clone(&app_state));

    let health_routes = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check));

    // Embedded dashboard assets as the fallback for everything else
    let static_routes = Router::new().fallback(handlers::dashboard::serve_static_files);

    let app = Router::new()
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_routes)
        .merge(health_routes)
        .merge(static_routes);

    let app = app
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::cors::CorsLayer::permissive());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API documentation available at http://{}/api-docs", addr);
    tracing::info!("Pulseboard is ready to serve requests");

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

async fn ready_check() -> &'static str {
    "READY"
}
