use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use jobsoko_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::cors::cors_layer,
    routes,
    storage::LocalObjectStore,
    store::Stores,
    AppSettings, AppState,
};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Room for multipart framing on top of the file itself.
const BODY_HEADROOM: usize = 64 * 1024;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("jobsoko_backend=info,tower_http=info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    let pool = create_pool(config).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let storage = LocalObjectStore::new(
        PathBuf::from(&config.uploads_dir),
        config.public_base_url.clone(),
        config.max_upload_bytes,
    )
    .await?;
    let uploads_dir = storage.base_path().to_path_buf();

    let app_state = AppState::new(
        AppSettings::from(config),
        Stores::postgres(pool),
        Arc::new(storage),
    );

    {
        let state = app_state.clone();
        let every = Duration::from_secs(config.expiry_sweep_secs.max(1));
        tokio::spawn(async move {
            loop {
                if let Err(e) = state.job_service.close_expired().await {
                    tracing::error!(error = %e, "deadline sweep failed");
                }
                tokio::time::sleep(every).await;
            }
        });
    }

    info!("Serving uploads from: {}", uploads_dir.display());

    let app = routes::router(app_state, config.api_rps, config.public_rps)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(cors_layer(&config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + BODY_HEADROOM));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
