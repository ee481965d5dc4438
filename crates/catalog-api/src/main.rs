//! Catalog API 서버 진입점.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{http::StatusCode, middleware, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use catalog_api::auth::{Argon2PasswordHasher, PasswordHasher, TokenCodec};
use catalog_api::repository::{
    run_migrations, CredentialStore, MemoryCredentialStore, MemoryProductStore, PgCredentialStore,
    PgProductStore, ProductStore,
};
use catalog_api::{create_router, metrics_layer, seed, setup_metrics_recorder, AppState};
use catalog_core::{init_logging, AppConfig, LogConfig, ServerConfig};

/// CORS 레이어 생성.
///
/// `server.cors_origins`가 설정되어 있으면 해당 origin만 허용하고,
/// 없으면 개발 모드로 간주하여 모든 origin을 허용합니다.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect();

    let restricted = !origins.is_empty();
    let allow_origin = if restricted {
        info!("CORS configured with {} allowed origins", origins.len());
        AllowOrigin::list(origins)
    } else {
        warn!("CORS origins not configured, allowing any origin (development mode)");
        AllowOrigin::any()
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(restricted)
        .max_age(Duration::from_secs(3600))
}

/// 미들웨어까지 포함한 전체 앱 생성.
fn build_app(
    state: Arc<AppState>,
    metrics_handle: PrometheusHandle,
    config: &ServerConfig,
) -> Router {
    create_router(state, metrics_handle)
        .layer(middleware::from_fn(metrics_layer))
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer(config))
}

/// OpenAPI 스펙 내보내기 처리.
///
/// `--export-openapi` 플래그 또는 `EXPORT_OPENAPI` 환경변수가 설정된 경우
/// OpenAPI JSON 스펙을 stdout으로 출력하고 `true`를 반환합니다.
fn handle_export_openapi() -> anyhow::Result<bool> {
    use catalog_api::openapi::ApiDoc;
    use utoipa::OpenApi as _;

    let export_flag = std::env::args().any(|arg| arg == "--export-openapi");
    let export_env = std::env::var("EXPORT_OPENAPI")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    if export_flag || export_env {
        println!("{}", serde_json::to_string_pretty(&ApiDoc::openapi())?);
        return Ok(true);
    }

    Ok(false)
}

/// 설정 로드 (`--config <path>` 또는 `CATALOG_CONFIG`, 없으면 `config/default.toml`).
fn load_config() -> catalog_core::CoreResult<AppConfig> {
    let explicit = std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .or_else(|| std::env::var("CATALOG_CONFIG").ok());

    match explicit {
        Some(path) => AppConfig::load(path),
        None => AppConfig::load_default(),
    }
}

/// 저장소 연결. 데이터베이스 URL이 없으면 메모리 저장소를 사용합니다.
async fn connect_storage(
    config: &AppConfig,
) -> anyhow::Result<(
    Arc<dyn CredentialStore>,
    Arc<dyn ProductStore>,
    Option<sqlx::PgPool>,
)> {
    let Some(url) = config.database.url.as_deref() else {
        warn!("No database URL configured, using in-memory storage (data is not persisted)");
        return Ok((
            Arc::new(MemoryCredentialStore::new()),
            Arc::new(MemoryProductStore::new()),
            None,
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(Duration::from_secs(config.database.connection_timeout_secs))
        .connect(url)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations applied");

    Ok((
        Arc::new(PgCredentialStore::new(pool.clone())),
        Arc::new(PgProductStore::new(pool.clone())),
        Some(pool),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    if handle_export_openapi()? {
        return Ok(());
    }

    let config = load_config()?;

    init_logging(LogConfig::from_config(&config.logging))
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.auth.uses_default_secret() {
        warn!("Using the built-in development token secret, set CATALOG__AUTH__JWT_SECRET in production");
    }

    let metrics_handle = setup_metrics_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))?;

    let codec = TokenCodec::from_config(&config.auth)?;
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());
    let (users, products, db_pool) = connect_storage(&config).await?;

    let mut state = AppState::new(codec, users, products, hasher)?
        .with_login_failure_status(config.auth.login_failure_status);
    if let Some(pool) = db_pool {
        state = state.with_db_pool(pool);
    }

    if config.seed.demo_accounts {
        let created = seed::seed_demo_accounts(state.users.as_ref(), state.hasher.as_ref()).await?;
        info!(created, "Demo account seeding finished");
    }
    if config.seed.sample_products {
        let created = seed::seed_sample_products(state.products.as_ref()).await?;
        info!(created, "Sample product seeding finished");
    }

    let storage = state.storage_label();
    let app = build_app(Arc::new(state), metrics_handle, &config.server);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.bind_address()))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, storage, "Catalog API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기 (Ctrl+C 또는 SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
