// ==========================================
// 生产订单跟踪系统 - 配置层
// ==========================================
// 职责: 日产能配额 (config_kv 表) 与进程级配置 (环境变量)
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置
pub use app_config::{get_default_db_path, AppConfig};
pub use config_manager::{config_keys, ConfigError, ConfigManager, ConfigResult};
