// ==========================================
// 生产订单跟踪系统 - 报表层
// ==========================================
// 职责: 当日完工订单导出
// ==========================================

pub mod csv_report;

pub use csv_report::{
    report_file_name, CsvReportSink, DailyReport, ReportError, ReportResult, ReportSink,
    REPORT_HEADER,
};
