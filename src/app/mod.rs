// ==========================================
// 生产订单跟踪系统 - 应用层
// ==========================================
// 职责: HTTP 集成,连接浏览器与台账
// ==========================================

pub mod routes;
pub mod state;
pub mod view;

// 重导出
pub use routes::router;
pub use state::AppState;
