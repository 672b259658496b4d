// ==========================================
// 台账集成测试辅助工具
// ==========================================
// 职责: 在临时数据库上构建完整的 AppState / OrderLedger
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use production_control::api::OrderLedger;
use production_control::app::AppState;
use production_control::clock::Clock;
use production_control::config::{AppConfig, ConfigManager};

// ==========================================
// 可调时钟
// ==========================================

/// 可在测试中切换日期的时钟
pub struct TestClock {
    today: Mutex<NaiveDate>,
}

impl TestClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }
}

impl Clock for TestClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}

/// 测试默认日期
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

// ==========================================
// 台账测试环境
// ==========================================

/// 台账测试环境
pub struct LedgerTestEnv {
    pub db_path: String,
    pub state: Arc<AppState>,
    pub ledger: Arc<OrderLedger>,
    pub config_manager: Arc<ConfigManager>,
    pub clock: Arc<TestClock>,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl LedgerTestEnv {
    /// 创建测试环境（日期为 test_today）
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_report_dir(None)
    }

    /// 创建测试环境，并指定报表落盘目录
    pub fn with_report_dir(report_dir: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        production_control::logging::init_test();

        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file.path().to_string_lossy().to_string();

        let config = AppConfig {
            db_path: db_path.clone(),
            bind_addr: "127.0.0.1:0".to_string(),
            report_dir,
        };

        let clock = Arc::new(TestClock::new(test_today()));
        let state = Arc::new(AppState::with_clock(&config, clock.clone())?);

        Ok(Self {
            db_path,
            ledger: state.ledger.clone(),
            config_manager: state.config_manager.clone(),
            state,
            clock,
            _temp_file: temp_file,
        })
    }

    /// 在同一数据库文件上再打开一个独立的 AppState（独立连接）
    pub fn open_second_state(&self) -> Result<Arc<AppState>, Box<dyn std::error::Error>> {
        let config = AppConfig {
            db_path: self.db_path.clone(),
            bind_addr: "127.0.0.1:0".to_string(),
            report_dir: None,
        };
        Ok(Arc::new(AppState::with_clock(&config, self.clock.clone())?))
    }
}
