use std::{net::SocketAddr, path::Path, sync::Arc};

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{data::repository::DocumentRepository, runtime, storage::JsonFileStore};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn load_bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    let raw = cfg.bind_addr();
    raw.parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {raw}: {e}")))
}

/// Router backed by the JSON file at `data_file`.
pub fn build_app(data_file: &Path) -> Router {
    let repo: Arc<dyn DocumentRepository> = Arc::new(JsonFileStore::new(data_file));
    routes::build_router(build_cors(), ServerState::new(repo))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    // 数据文件路径只在启动时解析一次，请求处理期间不再读取环境变量
    let data_file = cfg.storage.resolve_data_file();
    runtime::ensure_env(&data_file).await?;

    let app = build_app(&data_file);

    let addr = load_bind_addr(&cfg)?;
    info!(%addr, data_file = %data_file.display(), "starting data store server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
