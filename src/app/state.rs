// ==========================================
// 生产订单跟踪系统 - 应用状态
// ==========================================
// 职责: 进程启动时一次性构建共享状态，并交给 HTTP 路由
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::Context;

use crate::api::OrderLedger;
use crate::clock::{Clock, LocalClock};
use crate::config::{AppConfig, ConfigManager};
use crate::db::{init_schema, open_sqlite_connection, read_schema_version, CURRENT_SCHEMA_VERSION};
use crate::report::{CsvReportSink, ReportSink};
use crate::repository::ProductionOrderRepository;

/// 应用状态
///
/// 包含台账实例和共享资源，由 main 构建后注入路由
pub struct AppState {
    /// 订单台账
    pub ledger: Arc<OrderLedger>,

    /// 配置管理器（日产能配额）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 使用本地时钟创建AppState
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Self::with_clock(config, Arc::new(LocalClock))
    }

    /// 创建AppState实例
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开数据库并初始化 schema（幂等）
    /// 2. 初始化 Repository / ConfigManager / ReportSink
    /// 3. 创建 OrderLedger
    pub fn with_clock(config: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        tracing::info!("初始化AppState，数据库路径: {}", config.db_path);

        let conn = open_sqlite_connection(&config.db_path)
            .with_context(|| format!("无法打开数据库: {}", config.db_path))?;

        init_schema(&conn).context("数据库 schema 初始化失败")?;
        match read_schema_version(&conn).context("读取 schema_version 失败")? {
            Some(v) if v == CURRENT_SCHEMA_VERSION => {}
            Some(v) => tracing::warn!(
                "schema_version 不一致: 数据库={}, 期望={}",
                v,
                CURRENT_SCHEMA_VERSION
            ),
            None => tracing::warn!("schema_version 表缺失"),
        }

        // 共享连接：同一进程内的写操作串行化
        let conn = Arc::new(Mutex::new(conn));

        let order_repo = Arc::new(ProductionOrderRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));
        let report_sink: Arc<dyn ReportSink> = Arc::new(CsvReportSink::new(config.report_dir.clone()));

        match config_manager.quota() {
            Ok(quota) => tracing::info!(
                pieces_per_hour = quota.pieces_per_hour,
                working_hours = quota.working_hours(),
                daily_target = quota.daily_target(),
                "日产能配额"
            ),
            Err(e) => tracing::warn!("日产能配额无效: {}", e),
        }

        let ledger = Arc::new(OrderLedger::new(
            order_repo,
            config_manager.clone(),
            report_sink,
            clock,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            ledger,
            config_manager,
        })
    }
}
