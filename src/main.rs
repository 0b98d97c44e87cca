use axum::{routing::get, Router};
use serde_json::{json, Value};
use tower_http::{services::ServeDir, trace::TraceLayer};

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod media;
mod middleware;
mod state;

use state::AppState;

/// Multipart bodies above this are rejected before the handler runs.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SESSION_SECRET, CLD_*, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Gallery API in {:?} mode", config.environment);

    let pool = database::manager::connect(&config.database)
        .await
        .unwrap_or_else(|e| panic!("failed to connect database: {}", e));

    let media = media::from_config(&config.media)
        .unwrap_or_else(|e| panic!("failed to initialize media store: {}", e));

    let app = app(AppState { pool, media });

    // Allow tests or deployments to override port via env
    let port = std::env::var("GALLERY_API_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(config.server.port);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Gallery API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    let config = crate::config::config();

    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Versioned API
        .nest(
            "/api/v1",
            Router::new()
                .merge(auth_public_routes())
                .merge(session_routes())
                .merge(post_routes()),
        );

    // The local media store's durable URLs resolve against this server
    if config.media.provider == crate::config::MediaProvider::Local {
        router = router.nest_service("/media", ServeDir::new(&config.media.local_dir));
    }

    router
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
}

fn session_routes() -> Router<AppState> {
    use handlers::protected::auth;

    Router::new()
        .route("/me", get(auth::session_me))
        .route("/auth/logout", get(auth::session_logout))
        .layer(axum::middleware::from_fn(middleware::session_auth_middleware))
}

fn post_routes() -> Router<AppState> {
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{delete, post};
    use handlers::protected::post;

    Router::new()
        .route("/post/create", post(post::post_create))
        .route("/post/:id", delete(post::post_delete))
        .layer(axum::middleware::from_fn(middleware::session_auth_middleware))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

fn cors_layer() -> tower_http::cors::CorsLayer {
    use axum::http::{header, HeaderValue, Method};

    // Cookie auth requires credentialed CORS with explicit origins
    let origins: Vec<HeaderValue> = crate::config::config()
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    tower_http::cors::CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Gallery API",
            "version": version,
            "description": "Photo gallery backend API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "register": "POST /api/v1/auth/register (public)",
                "login": "POST /api/v1/auth/login (public)",
                "logout": "GET /api/v1/auth/logout (session)",
                "me": "GET /api/v1/me (session)",
                "post_create": "POST /api/v1/post/create (session, multipart)",
                "post_delete": "DELETE /api/v1/post/:id (session)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "message": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
