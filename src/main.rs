mod core;
mod features;
mod modules;
mod shared;

use crate::core::config::Config;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::core::{database, middleware};
use crate::features::auth::models::User;
use crate::features::auth::routes as auth_routes;
use crate::features::auth::{AuthService, SessionSigner};
use crate::features::comments::models::Comment;
use crate::features::comments::{routes as comments_routes, CommentService};
use crate::features::media::models::Media;
use crate::features::media::{routes as media_routes, MediaService};
use crate::modules::storage::DiskStorage;
use crate::modules::store::{DynCollection, MemoryCollection, PgCollection};
use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use std::sync::Arc;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn main() -> anyhow::Result<()> {
    // Build Tokio runtime with configurable worker threads
    let worker_threads = std::env::var("TOKIO_WORKER_THREADS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
        });

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .max_blocking_threads(worker_threads * 4)
        .enable_all()
        .build()?;

    runtime.block_on(async_main(worker_threads))
}

async fn async_main(worker_threads: usize) -> anyhow::Result<()> {
    // Load .env file BEFORE initializing logger so RUST_LOG is available
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    // Log system info
    let available_cpus = std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(1);
    tracing::info!(
        "System info: available_cpus={}, tokio_worker_threads={}, pid={}",
        available_cpus,
        worker_threads,
        std::process::id()
    );

    tracing::info!("Configuration loaded successfully");

    // Select the store backend once, from configuration presence.
    // Every service sees the same Collection contract either way.
    let (users, media, comments): (
        DynCollection<User>,
        DynCollection<Media>,
        DynCollection<Comment>,
    ) = match &config.database {
        Some(db_config) => {
            let pool = database::create_pool(db_config).await?;
            tracing::info!("Database connection pool created");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
            tracing::info!("Document collections ready (postgres backend)");

            (
                Arc::new(PgCollection::new(pool.clone(), "users")) as DynCollection<User>,
                Arc::new(PgCollection::new(pool.clone(), "media")) as DynCollection<Media>,
                Arc::new(PgCollection::new(pool, "comments")) as DynCollection<Comment>,
            )
        }
        None => {
            tracing::warn!(
                "DATABASE_URL not set, using in-memory collections (single-process development only)"
            );
            (
                Arc::new(MemoryCollection::new()) as DynCollection<User>,
                Arc::new(MemoryCollection::new()) as DynCollection<Media>,
                Arc::new(MemoryCollection::new()) as DynCollection<Comment>,
            )
        }
    };

    // Initialize file storage
    let storage = Arc::new(DiskStorage::new(&config.storage).await?);
    tracing::info!("Disk storage initialized");

    // Initialize session signing
    let sessions = Arc::new(SessionSigner::new(&config.session));
    tracing::info!("Session signer initialized");

    // Initialize services
    let auth_service = Arc::new(AuthService::new(users));
    tracing::info!("Auth service initialized");

    let media_service = Arc::new(MediaService::new(media, Arc::clone(&storage)));
    tracing::info!("Media service initialized");

    let comment_service = Arc::new(CommentService::new(comments));
    tracing::info!("Comment service initialized");

    // Build application router with dynamic swagger config
    let swagger_modifier = SwaggerInfoModifier {
        title: config.swagger.title.clone(),
        version: config.swagger.version.clone(),
        description: config.swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    // Build swagger router
    let swagger = if let Some(credentials) = config.swagger.credentials() {
        tracing::info!("Swagger UI basic auth enabled");
        Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
            .layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
    } else {
        tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
    };

    // Simple health check endpoint (no auth required)
    async fn health_check() -> axum::http::StatusCode {
        axum::http::StatusCode::OK
    }
    let health_route = Router::new().route("/health", axum::routing::get(health_check));

    // Session-gated routes: the SessionUser extractor bounces anonymous
    // callers to /login
    let gated_routes = Router::new()
        .merge(media_routes::routes(
            Arc::clone(&media_service),
            Arc::clone(&comment_service),
        ))
        .merge(comments_routes::routes(Arc::clone(&comment_service)));

    // Public routes (no session required)
    let public_routes = Router::new()
        .merge(auth_routes::routes(auth_service, Arc::clone(&sessions)))
        .merge(media_routes::public_routes(media_service, comment_service));

    let app = Router::new()
        .merge(swagger)
        .merge(gated_routes)
        .merge(public_routes)
        .merge(health_route)
        // Decode the session cookie into a request extension on every request
        .layer(from_fn_with_state(
            Arc::clone(&sessions),
            middleware::session_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.app.max_request_body_size))
        .layer(middleware::cors_layer(
            config.app.cors_allowed_origins.clone(),
        ))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid));

    // Start server
    let addr = config.app.server_address();
    let socket_addr: std::net::SocketAddr = addr
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid address: {}", e))?;

    // Use socket2 for TCP listener configuration
    let socket = socket2::Socket::new(
        socket2::Domain::for_address(socket_addr),
        socket2::Type::STREAM,
        Some(socket2::Protocol::TCP),
    )?;

    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_nodelay(true)?;

    socket.set_recv_buffer_size(256 * 1024)?;
    socket.set_send_buffer_size(256 * 1024)?;

    #[cfg(target_os = "linux")]
    {
        let keepalive = socket2::TcpKeepalive::new()
            .with_time(std::time::Duration::from_secs(60))
            .with_interval(std::time::Duration::from_secs(10))
            .with_retries(3);
        socket.set_tcp_keepalive(&keepalive)?;
    }
    #[cfg(not(target_os = "linux"))]
    {
        let keepalive = socket2::TcpKeepalive::new().with_time(std::time::Duration::from_secs(60));
        socket.set_tcp_keepalive(&keepalive)?;
    }

    socket.set_nonblocking(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(65535)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;
    tracing::info!("Server listening on {}", format!("http://{}", addr));
    tracing::info!(
        "Swagger UI available at {}",
        format!("http://{}/swagger-ui/", addr)
    );

    axum::serve(listener, app).await?;

    Ok(())
}
