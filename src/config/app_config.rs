// ==========================================
// 生产订单跟踪系统 - 进程级配置
// ==========================================
// 职责: 从环境变量读取数据库路径、监听地址、报表目录
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PRODUCTION_CONTROL_DB_PATH";
/// 监听地址环境变量
pub const BIND_ADDR_ENV: &str = "PRODUCTION_CONTROL_BIND_ADDR";
/// 报表输出目录环境变量
pub const REPORT_DIR_ENV: &str = "PRODUCTION_CONTROL_REPORT_DIR";

/// 默认监听地址
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// 进程级配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 数据库文件路径
    pub db_path: String,
    /// HTTP 监听地址
    pub bind_addr: String,
    /// 报表落盘目录（None 表示只在内存中生成）
    pub report_dir: Option<PathBuf>,
}

impl AppConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            db_path: non_empty(DB_PATH_ENV).unwrap_or_else(get_default_db_path),
            bind_addr: non_empty(BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            report_dir: non_empty(REPORT_DIR_ENV).map(PathBuf::from),
        }
    }
}

/// 获取默认数据库路径
///
/// # 返回
/// - 用户数据目录/production-control/production.db
/// - 无法获取用户数据目录时: ./production.db
pub fn get_default_db_path() -> String {
    let mut path = PathBuf::from("./production.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("production-control");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("production.db");
        }
    }

    path.to_string_lossy().to_string()
}
