use job_admin::{
    config::{get_config, init_config},
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    init_config()?;
    let config = get_config();

    let app_state = AppState::new(config)?;

    match app_state.job_list.load_jobs().await {
        Ok(jobs) => info!(count = jobs.len(), "Initial job list loaded"),
        Err(e) => tracing::warn!(error = %e, "Initial job list unavailable"),
    }

    let app = routes::app(app_state, config.max_upload_bytes());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Job admin console listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
