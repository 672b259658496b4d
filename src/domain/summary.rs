// ==========================================
// 生产订单跟踪系统 - 日报汇总
// ==========================================
// 职责: 日产目标与进度计算（纯函数，不含数据访问）
// 说明: total_produced 统计全部订单（不限当天），与日产目标对比
// ==========================================

use crate::domain::types::ProgressColor;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// DailyQuota - 日产能配额
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuota {
    pub pieces_per_hour: i64, // 每小时件数
    pub work_start_hour: u32, // 上班时刻 (含)
    pub work_end_hour: u32,   // 下班时刻 (不含)
}

impl Default for DailyQuota {
    fn default() -> Self {
        Self {
            pieces_per_hour: 8,
            work_start_hour: 8,
            work_end_hour: 18,
        }
    }
}

impl DailyQuota {
    /// 工作小时数
    pub fn working_hours(&self) -> i64 {
        i64::from(self.work_end_hour.saturating_sub(self.work_start_hour))
    }

    /// 日产目标 = 每小时件数 × 工作小时数
    pub fn daily_target(&self) -> i64 {
        self.pieces_per_hour.saturating_mul(self.working_hours())
    }
}

// ==========================================
// DailySummary - 当日汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub today: NaiveDate,
    pub completed_count: i64,
    pub total_produced: i64,
    pub daily_target: i64,
    pub progress_percent: u8,
    pub progress_color: ProgressColor,
}

impl DailySummary {
    /// 由聚合值计算汇总
    pub fn compute(
        today: NaiveDate,
        completed_count: i64,
        total_produced: i64,
        daily_target: i64,
    ) -> Self {
        let progress_percent = progress_percent(total_produced, daily_target);
        Self {
            today,
            completed_count,
            total_produced,
            daily_target,
            progress_percent,
            progress_color: ProgressColor::from_percent(progress_percent),
        }
    }
}

/// 进度百分比: floor(total / target * 100)，上限 100；target <= 0 时为 0
pub fn progress_percent(total_produced: i64, daily_target: i64) -> u8 {
    if daily_target <= 0 || total_produced <= 0 {
        return 0;
    }
    let pct = i128::from(total_produced) * 100 / i128::from(daily_target);
    pct.min(100) as u8
}
