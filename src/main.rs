// ==========================================
// 生产订单跟踪系统 - HTTP 主入口
// ==========================================
// 启动顺序: 日志 → 配置 → 数据库 schema → 路由 → 监听
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use production_control::app::{router, AppState};
use production_control::config::AppConfig;
use production_control::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", production_control::APP_NAME);
    tracing::info!("系统版本: {}", production_control::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);
    if let Some(dir) = &config.report_dir {
        tracing::info!("报表落盘目录: {}", dir.display());
    }

    let state = Arc::new(AppState::new(&config).context("无法初始化AppState")?);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("无法监听 {}", config.bind_addr))?;
    tracing::info!("监听地址: {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP 服务异常退出")?;

    tracing::info!("服务已退出");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("无法监听退出信号: {}", e);
    }
}
