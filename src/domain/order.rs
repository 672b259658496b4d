// ==========================================
// 生产订单跟踪系统 - 生产订单领域模型
// ==========================================
// 红线: 完工后不可回退，完工后产量不再变化
// 对齐: ordem_producao 表
// ==========================================

use crate::domain::types::OrderStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionOrder - 生产订单
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: i64,                              // 主键 (存储分配)
    pub target: i64,                          // 目标件数 (total)
    pub produced: i64,                        // 已产件数 (produzidas)
    pub completed: bool,                      // 是否完工 (finalizada)
    pub completion_date: Option<NaiveDate>,   // 完工日期 (data_finalizacao)
}

// ==========================================
// 单次变更的结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceOutcome {
    /// 件数 +1，订单仍在生产中
    Recorded,
    /// 件数 +1 且达到目标，订单完工
    Completed,
    /// 订单已完工，未做任何修改
    AlreadyCompleted,
}

impl PieceOutcome {
    /// 是否产生了需要持久化的变更
    pub fn is_mutation(&self) -> bool {
        !matches!(self, PieceOutcome::AlreadyCompleted)
    }
}

// ==========================================
// Trait: OrderLifecycle
// ==========================================
// 用途: 订单生命周期规则接口，不含数据访问
pub trait OrderLifecycle {
    /// 登记一件产出
    ///
    /// # 规则
    /// - 已完工: 不做修改
    /// - 未完工: produced += 1；若 produced >= target 则完工并打上 today
    fn record_piece(&mut self, today: NaiveDate) -> PieceOutcome;

    /// 强制完工
    ///
    /// 不论 produced 与 target 的关系，一律完工并打上 today。
    /// 对已完工订单重复调用会把完工日期改为 today。
    fn force_complete(&mut self, today: NaiveDate);

    /// 当前状态
    fn status(&self) -> OrderStatus;
}

impl OrderLifecycle for ProductionOrder {
    fn record_piece(&mut self, today: NaiveDate) -> PieceOutcome {
        if self.completed {
            return PieceOutcome::AlreadyCompleted;
        }

        self.produced += 1;
        if self.produced >= self.target {
            self.completed = true;
            self.completion_date = Some(today);
            PieceOutcome::Completed
        } else {
            PieceOutcome::Recorded
        }
    }

    fn force_complete(&mut self, today: NaiveDate) {
        self.completed = true;
        self.completion_date = Some(today);
    }

    fn status(&self) -> OrderStatus {
        if self.completed {
            OrderStatus::Completed
        } else {
            OrderStatus::Open
        }
    }
}

// ==========================================
// 辅助方法
// ==========================================
impl ProductionOrder {
    /// 创建尚未持久化的新订单（id 由存储分配，此处为 0）
    pub fn new(target: i64) -> Self {
        Self {
            id: 0,
            target,
            produced: 0,
            completed: false,
            completion_date: None,
        }
    }

    /// 剩余件数（强制完工的订单可能仍大于 0）
    pub fn remaining(&self) -> i64 {
        (self.target - self.produced).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[test]
    fn test_new_order_初始状态() {
        let order = ProductionOrder::new(5);
        assert_eq!(order.produced, 0);
        assert!(!order.completed);
        assert_eq!(order.completion_date, None);
        assert_eq!(order.status(), OrderStatus::Open);
        assert_eq!(order.remaining(), 5);
    }

    #[test]
    fn test_record_piece_目标为3() {
        let mut order = ProductionOrder::new(3);

        assert_eq!(order.record_piece(day(14)), PieceOutcome::Recorded);
        assert_eq!(order.produced, 1);
        assert!(!order.completed);

        assert_eq!(order.record_piece(day(14)), PieceOutcome::Recorded);
        assert_eq!(order.record_piece(day(14)), PieceOutcome::Completed);
        assert_eq!(order.produced, 3);
        assert!(order.completed);
        assert_eq!(order.completion_date, Some(day(14)));
    }

    #[test]
    fn test_record_piece_已完工不变() {
        let mut order = ProductionOrder::new(1);
        order.record_piece(day(14));

        let outcome = order.record_piece(day(15));
        assert_eq!(outcome, PieceOutcome::AlreadyCompleted);
        assert!(!outcome.is_mutation());
        assert_eq!(order.produced, 1);
        assert_eq!(order.completion_date, Some(day(14)));
    }

    #[test]
    fn test_force_complete_未达目标() {
        let mut order = ProductionOrder::new(10);
        order.record_piece(day(14));
        order.force_complete(day(14));

        assert_eq!(order.produced, 1);
        assert!(order.completed);
        assert_eq!(order.remaining(), 9);
        assert_eq!(order.status(), OrderStatus::Completed);
    }

    #[test]
    fn test_force_complete_重复调用改写日期() {
        let mut order = ProductionOrder::new(2);
        order.force_complete(day(13));
        order.force_complete(day(14));

        assert!(order.completed);
        assert_eq!(order.completion_date, Some(day(14)));
    }
}
