// ==========================================
// 生产订单跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、生命周期规则
// 红线: 不含数据访问逻辑
// ==========================================

pub mod order;
pub mod summary;
pub mod types;

// 重导出核心类型
pub use order::{OrderLifecycle, PieceOutcome, ProductionOrder};
pub use summary::{DailyQuota, DailySummary};
pub use types::{OrderStatus, ProgressColor};
