// ==========================================
// 生产订单跟踪系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单状态 (Order Status)
// ==========================================
// 单向流转: OPEN → COMPLETED
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Open,      // 生产中
    Completed, // 已完工
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "OPEN"),
            OrderStatus::Completed => write!(f, "COMPLETED"),
        }
    }
}

// ==========================================
// 进度颜色标签 (Progress Color)
// ==========================================
// AT_OR_ABOVE_TARGET 当且仅当 progress_percent >= 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressColor {
    AtOrAboveTarget,
    BelowTarget,
}

impl ProgressColor {
    /// 由进度百分比判定颜色标签
    pub fn from_percent(progress_percent: u8) -> Self {
        if progress_percent >= 100 {
            ProgressColor::AtOrAboveTarget
        } else {
            ProgressColor::BelowTarget
        }
    }

    /// 页面展示用的 CSS 颜色
    pub fn css_color(&self) -> &'static str {
        match self {
            ProgressColor::AtOrAboveTarget => "green",
            ProgressColor::BelowTarget => "red",
        }
    }
}

impl fmt::Display for ProgressColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressColor::AtOrAboveTarget => write!(f, "AT_OR_ABOVE_TARGET"),
            ProgressColor::BelowTarget => write!(f, "BELOW_TARGET"),
        }
    }
}
