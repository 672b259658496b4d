// ==========================================
// 生产订单跟踪系统 - 核心库
// ==========================================
// 技术栈: axum + Rust + SQLite
// 系统定位: 生产订单台账（计件、完工、日报导出）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与生命周期规则
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 日产能配额与进程配置
pub mod config;

// 报表层 - CSV 导出
pub mod report;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日期来源
pub mod clock;

// 日志系统
pub mod logging;

// API 层 - 订单台账
pub mod api;

// 应用层 - HTTP 集成
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

pub use api::{ApiError, ApiResult, OrderLedger};
pub use domain::{DailyQuota, DailySummary, OrderStatus, ProductionOrder, ProgressColor};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产订单跟踪系统";
