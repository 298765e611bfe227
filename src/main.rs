pub mod api;
mod config;
mod models;
mod services;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::Config;

#[derive(OpenApi)]
#[openapi(
    info(title = "Route Editor API", version = "0.1.0"),
    paths(
        api::users::list::list_users,
        api::users::routes::list_user_routes,
        api::users::routes::list_route_points,
        api::users::points::place_point,
        api::users::points::delete_point,
        api::health::health_check,
    ),
    components(schemas(
        api::ErrorResponse,
        api::users::list::UserListResponse,
        api::users::routes::RouteListResponse,
        api::users::routes::RoutePointsResponse,
        api::users::points::PlacePointRequest,
        api::users::points::PlacePointResponse,
        api::users::points::DeletePointResponse,
        api::health::HealthResponse,
        models::User,
        models::TrackPoint,
        models::RouteSummary,
    )),
    tags(
        (name = "users", description = "Users with recorded location history"),
        (name = "routes", description = "Daily route listings and their points"),
        (name = "points", description = "Manual point placement and deletion"),
        (name = "health", description = "Service health check")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info,sqlx=warn".into()),
        )
        .init();

    // Load config
    let config = Config::load("config.yaml").expect("Failed to load config");

    // Build CORS layer based on config
    let cors_layer = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode explicitly enabled (all origins allowed) - DO NOT USE IN PRODUCTION");
        CorsLayer::permissive()
    } else if !config.cors_origins.is_empty() {
        tracing::info!(origins = ?config.cors_origins, "CORS: Restricting to configured origins");
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
    } else {
        panic!("CORS configuration error: Either set 'cors_origins' with allowed origins, or set 'cors_permissive: true' for development");
    };

    // Initialize SQLite database
    let db_file = std::path::Path::new(&config.database_path);
    if let Some(dir) = db_file.parent() {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!("Could not create database directory: {}", e);
        }
    }
    let db_url = format!("sqlite:{}?mode=rwc", db_file.display());
    let pool = SqlitePool::connect(&db_url)
        .await
        .expect("Failed to connect to SQLite database");

    // Run migrations
    let migrator = sqlx::migrate!("./migrations");
    migrator.run(&pool).await.expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    // Build the app
    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api::router(pool.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!("Server running on http://{}", config.listen_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui", config.listen_addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

async fn root() -> &'static str {
    "Route Editor API"
}
