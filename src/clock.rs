// ==========================================
// 生产订单跟踪系统 - 日期来源
// ==========================================
// 职责: 提供“今天”的本地日期
// 说明: 台账的完工戳、日报汇总、报表导出共用同一时钟
// ==========================================

use chrono::NaiveDate;

/// 日期来源接口
pub trait Clock: Send + Sync {
    /// 当前本地日期
    fn today(&self) -> NaiveDate;
}

/// 系统本地时钟
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// 日期戳格式（与 data_finalizacao 列一致）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 将日期格式化为 YYYY-MM-DD
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
