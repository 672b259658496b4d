// ==========================================
// 生产订单跟踪系统 - 订单台账 API
// ==========================================
// 职责: 订单创建、计件、强制完工、日报汇总、日报导出
// 红线: 完工单不再计件；完工状态不可回退
// ==========================================

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::clock::Clock;
use crate::config::ConfigManager;
use crate::domain::order::{OrderLifecycle, PieceOutcome, ProductionOrder};
use crate::domain::summary::DailySummary;
use crate::report::{DailyReport, ReportSink};
use crate::repository::ProductionOrderRepository;

// ==========================================
// OrderLedger - 订单台账
// ==========================================

/// 订单台账
///
/// 职责：
/// 1. 订单生命周期（创建 → 计件 / 强制完工）
/// 2. 当日汇总（全部订单产量 vs 日产目标）
/// 3. 当日完工订单报表
pub struct OrderLedger {
    order_repo: Arc<ProductionOrderRepository>,
    config_manager: Arc<ConfigManager>,
    report_sink: Arc<dyn ReportSink>,
    clock: Arc<dyn Clock>,
}

impl OrderLedger {
    /// 创建新的OrderLedger实例
    pub fn new(
        order_repo: Arc<ProductionOrderRepository>,
        config_manager: Arc<ConfigManager>,
        report_sink: Arc<dyn ReportSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            order_repo,
            config_manager,
            report_sink,
            clock,
        }
    }

    /// 台账使用的“今天”
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// 创建订单
    ///
    /// # 参数
    /// - target: 目标件数（>= 1）
    ///
    /// # 返回
    /// - Ok(ProductionOrder): produced=0, completed=false 的新订单
    /// - Err(ApiError::InvalidInput): target < 1
    pub fn create_order(&self, target: i64) -> ApiResult<ProductionOrder> {
        if target < 1 {
            return Err(ApiError::InvalidInput(format!(
                "目标件数必须为正整数: {}",
                target
            )));
        }

        let order = self.order_repo.insert(&ProductionOrder::new(target))?;
        tracing::info!(order_id = order.id, target_pieces = target, "创建生产订单");
        Ok(order)
    }

    /// 查询单个订单
    pub fn get_order(&self, order_id: i64) -> ApiResult<ProductionOrder> {
        self.order_repo
            .find_by_id(order_id)?
            .ok_or_else(|| not_found(order_id))
    }

    /// 查询全部订单（按 id 升序）
    pub fn list_orders(&self) -> ApiResult<Vec<ProductionOrder>> {
        Ok(self.order_repo.list_all()?)
    }

    /// 计件 +1
    ///
    /// # 返回
    /// - Ok(ProductionOrder): 更新后的订单；已完工订单原样返回
    /// - Err(ApiError::NotFound): 订单不存在
    pub fn increment_produced(&self, order_id: i64) -> ApiResult<ProductionOrder> {
        let today = self.today();
        let mut outcome = PieceOutcome::AlreadyCompleted;

        let (order, _) = self
            .order_repo
            .update_with(order_id, |order| {
                outcome = order.record_piece(today);
                outcome.is_mutation()
            })?
            .ok_or_else(|| not_found(order_id))?;

        match outcome {
            PieceOutcome::Recorded => {
                tracing::info!(order_id, produced = order.produced, target_pieces = order.target, "计件");
            }
            PieceOutcome::Completed => {
                tracing::info!(order_id, produced = order.produced, date = %today, "订单达到目标，完工");
            }
            PieceOutcome::AlreadyCompleted => {
                tracing::debug!(order_id, "订单已完工，忽略计件");
            }
        }

        Ok(order)
    }

    /// 强制完工
    ///
    /// 不论是否达到目标件数；重复调用会把完工日期改写为今天。
    pub fn force_complete(&self, order_id: i64) -> ApiResult<ProductionOrder> {
        let today = self.today();

        let (order, _) = self
            .order_repo
            .update_with(order_id, |order| {
                order.force_complete(today);
                true
            })?
            .ok_or_else(|| not_found(order_id))?;

        tracing::info!(
            order_id,
            produced = order.produced,
            target_pieces = order.target,
            date = %today,
            "强制完工"
        );
        Ok(order)
    }

    /// 当日汇总
    ///
    /// 统计范围为全部订单，日产目标来自配置。
    pub fn daily_summary(&self, today: NaiveDate) -> ApiResult<DailySummary> {
        let completed_count = self.order_repo.count_completed()?;
        let total_produced = self.order_repo.sum_produced()?;
        let daily_target = self.config_manager.daily_target()?;

        Ok(DailySummary::compute(
            today,
            completed_count,
            total_produced,
            daily_target,
        ))
    }

    /// 列表 + 汇总视图
    pub fn overview(&self, today: NaiveDate) -> ApiResult<LedgerOverview> {
        let orders = self.list_orders()?;
        let summary = self.daily_summary(today)?;

        Ok(LedgerOverview {
            today: today.to_string(),
            orders: orders.into_iter().map(OrderInfo::from).collect(),
            summary,
        })
    }

    /// 导出当日完工订单报表
    ///
    /// 无当日完工订单时返回只有表头的文件。
    pub fn export_daily_report(&self, today: NaiveDate) -> ApiResult<DailyReport> {
        let orders = self.order_repo.find_by_completion_date(today)?;
        let report = self.report_sink.write_daily(today, &orders)?;
        tracing::info!(date = %today, rows = report.row_count, file = %report.file_name, "导出日报");
        Ok(report)
    }
}

fn not_found(order_id: i64) -> ApiError {
    ApiError::NotFound(format!("ProductionOrder(id={})不存在", order_id))
}

/// 解析表单中的目标件数
///
/// # 返回
/// - Ok(i64): 正整数
/// - Err(ApiError::InvalidInput): 缺失、非数字或非正数
pub fn parse_target(raw: Option<&str>) -> ApiResult<i64> {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(ApiError::InvalidInput("目标件数不能为空".to_string()));
    }

    let target: i64 = raw
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("目标件数不是整数: {}", raw)))?;
    if target < 1 {
        return Err(ApiError::InvalidInput(format!(
            "目标件数必须为正整数: {}",
            target
        )));
    }
    Ok(target)
}

// ==========================================
// DTO 类型定义
// ==========================================

/// 订单信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderInfo {
    pub id: i64,
    pub target: i64,
    pub produced: i64,
    pub completed: bool,
    pub completion_date: Option<String>,
    /// 订单状态 (OPEN / COMPLETED)
    pub status: String,
    /// 剩余件数
    pub remaining: i64,
}

impl From<ProductionOrder> for OrderInfo {
    fn from(order: ProductionOrder) -> Self {
        Self {
            id: order.id,
            target: order.target,
            produced: order.produced,
            completed: order.completed,
            completion_date: order.completion_date.map(|d| d.to_string()),
            status: order.status().to_string(),
            remaining: order.remaining(),
        }
    }
}

/// 列表 + 汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerOverview {
    pub today: String,
    pub orders: Vec<OrderInfo>,
    pub summary: DailySummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(Some("3")).unwrap(), 3);
        assert_eq!(parse_target(Some(" 12 ")).unwrap(), 12);
        assert!(matches!(parse_target(None), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_target(Some("")), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_target(Some("abc")), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_target(Some("0")), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_target(Some("-4")), Err(ApiError::InvalidInput(_))));
        assert!(matches!(parse_target(Some("2.5")), Err(ApiError::InvalidInput(_))));
    }
}
