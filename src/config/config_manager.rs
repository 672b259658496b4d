// ==========================================
// 生产订单跟踪系统 - 配置管理器
// ==========================================
// 职责: 日产能配额的读取与覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::domain::summary::DailyQuota;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// 全局配置作用域
pub const GLOBAL_SCOPE: &str = "global";

/// 配置键
pub mod config_keys {
    /// 每小时件数
    pub const PIECES_PER_HOUR: &str = "pieces_per_hour";
    /// 上班时刻 (0-24，含)
    pub const WORK_START_HOUR: &str = "work_start_hour";
    /// 下班时刻 (0-24，不含)
    pub const WORK_END_HOUR: &str = "work_end_hour";
}

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置存储错误: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("配置锁获取失败: {0}")]
    Lock(String),

    #[error("配置值无效 (key={key}, value={value}): {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> ConfigResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| ConfigError::Lock(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES (?1, ?2, ?3, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::info!(key, value, "配置已更新");
        Ok(())
    }

    /// 读取整数配置，缺省时返回默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> ConfigResult<i64> {
        match self.get_config_value(key)? {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }

    fn get_hour_or_default(&self, key: &str, default: u32) -> ConfigResult<u32> {
        let value = self.get_i64_or_default(key, i64::from(default))?;
        if !(0..=24).contains(&value) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "小时必须在 0-24 之间".to_string(),
            });
        }
        Ok(value as u32)
    }

    /// 读取日产能配额
    ///
    /// # 默认值
    /// - pieces_per_hour = 8
    /// - work_start_hour = 8, work_end_hour = 18
    pub fn quota(&self) -> ConfigResult<DailyQuota> {
        let defaults = DailyQuota::default();

        let pieces_per_hour =
            self.get_i64_or_default(config_keys::PIECES_PER_HOUR, defaults.pieces_per_hour)?;
        if pieces_per_hour < 0 {
            return Err(ConfigError::InvalidValue {
                key: config_keys::PIECES_PER_HOUR.to_string(),
                value: pieces_per_hour.to_string(),
                reason: "每小时件数不能为负".to_string(),
            });
        }

        let work_start_hour =
            self.get_hour_or_default(config_keys::WORK_START_HOUR, defaults.work_start_hour)?;
        let work_end_hour =
            self.get_hour_or_default(config_keys::WORK_END_HOUR, defaults.work_end_hour)?;
        if work_end_hour < work_start_hour {
            return Err(ConfigError::InvalidValue {
                key: config_keys::WORK_END_HOUR.to_string(),
                value: work_end_hour.to_string(),
                reason: format!("下班时刻早于上班时刻 {}", work_start_hour),
            });
        }

        Ok(DailyQuota {
            pieces_per_hour,
            work_start_hour,
            work_end_hour,
        })
    }

    /// 日产目标
    pub fn daily_target(&self) -> ConfigResult<i64> {
        Ok(self.quota()?.daily_target())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_quota_默认值() {
        let manager = setup();
        assert_eq!(manager.quota().unwrap(), DailyQuota::default());
        assert_eq!(manager.daily_target().unwrap(), 80);
    }

    #[test]
    fn test_quota_覆写() {
        let manager = setup();
        manager.set_config_value(config_keys::PIECES_PER_HOUR, "12").unwrap();
        manager.set_config_value(config_keys::WORK_END_HOUR, "16").unwrap();
        // 覆盖已存在的键
        manager.set_config_value(config_keys::WORK_END_HOUR, "17").unwrap();

        assert_eq!(manager.daily_target().unwrap(), 12 * 9);
    }

    #[test]
    fn test_quota_非法值() {
        let manager = setup();
        manager.set_config_value(config_keys::PIECES_PER_HOUR, "abc").unwrap();
        assert!(matches!(manager.quota(), Err(ConfigError::InvalidValue { .. })));

        manager.set_config_value(config_keys::PIECES_PER_HOUR, "8").unwrap();
        manager.set_config_value(config_keys::WORK_START_HOUR, "19").unwrap();
        assert!(manager.quota().is_err());
    }

    #[test]
    fn test_quota_零工时() {
        let manager = setup();
        manager.set_config_value(config_keys::WORK_START_HOUR, "8").unwrap();
        manager.set_config_value(config_keys::WORK_END_HOUR, "8").unwrap();
        assert_eq!(manager.daily_target().unwrap(), 0);
    }
}
