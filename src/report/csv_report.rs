// ==========================================
// 生产订单跟踪系统 - CSV 日报导出
// ==========================================
// 列: data,id_ordem,total_pecas,produzidas,finalizada
// 文件名: relatorio_<YYYY-MM-DD>.csv
// ==========================================

use crate::clock::format_date;
use crate::domain::order::ProductionOrder;
use chrono::NaiveDate;
use csv::WriterBuilder;
use std::path::PathBuf;
use thiserror::Error;

/// 报表表头
pub const REPORT_HEADER: [&str; 5] = ["data", "id_ordem", "total_pecas", "produzidas", "finalizada"];

/// 报表层错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),

    #[error("报表文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;

/// 生成完毕的日报
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    /// 下载文件名
    pub file_name: String,
    /// CSV 内容
    pub bytes: Vec<u8>,
    /// 数据行数（不含表头）
    pub row_count: usize,
}

impl DailyReport {
    pub const CONTENT_TYPE: &'static str = "text/csv; charset=utf-8";
}

/// 日报文件名
pub fn report_file_name(today: NaiveDate) -> String {
    format!("relatorio_{}.csv", format_date(today))
}

// ==========================================
// ReportSink - 报表输出接口
// ==========================================
pub trait ReportSink: Send + Sync {
    /// 写出当日完工订单报表
    fn write_daily(&self, today: NaiveDate, orders: &[ProductionOrder]) -> ReportResult<DailyReport>;
}

/// CSV 报表输出
///
/// output_dir 为 Some 时同时落盘一份，否则只在内存中生成。
#[derive(Debug, Clone, Default)]
pub struct CsvReportSink {
    output_dir: Option<PathBuf>,
}

impl CsvReportSink {
    pub fn new(output_dir: Option<PathBuf>) -> Self {
        Self { output_dir }
    }

    /// 仅内存输出
    pub fn in_memory() -> Self {
        Self::default()
    }

    fn render(orders: &[ProductionOrder]) -> ReportResult<Vec<u8>> {
        let mut writer = WriterBuilder::new().from_writer(Vec::new());
        writer.write_record(REPORT_HEADER)?;

        for order in orders {
            writer.write_record([
                order.completion_date.map(format_date).unwrap_or_default(),
                order.id.to_string(),
                order.target.to_string(),
                order.produced.to_string(),
                bool_cell(order.completed).to_string(),
            ])?;
        }

        writer.into_inner().map_err(|e| ReportError::Io(e.into_error()))
    }
}

impl ReportSink for CsvReportSink {
    fn write_daily(&self, today: NaiveDate, orders: &[ProductionOrder]) -> ReportResult<DailyReport> {
        let bytes = Self::render(orders)?;
        let file_name = report_file_name(today);

        if let Some(dir) = &self.output_dir {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(&file_name);
            std::fs::write(&path, &bytes)?;
            tracing::info!(path = %path.display(), rows = orders.len(), "日报已落盘");
        }

        Ok(DailyReport {
            file_name,
            bytes,
            row_count: orders.len(),
        })
    }
}

// 与历史报表保持一致: True / False
fn bool_cell(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_report_无订单只有表头() {
        let report = CsvReportSink::in_memory().write_daily(today(), &[]).unwrap();
        assert_eq!(report.file_name, "relatorio_2026-10-14.csv");
        assert_eq!(report.row_count, 0);
        assert_eq!(
            String::from_utf8(report.bytes).unwrap(),
            "data,id_ordem,total_pecas,produzidas,finalizada\n"
        );
    }

    #[test]
    fn test_report_行格式() {
        let order = ProductionOrder {
            id: 7,
            target: 10,
            produced: 4,
            completed: true,
            completion_date: Some(today()),
        };
        let report = CsvReportSink::in_memory().write_daily(today(), &[order]).unwrap();
        let text = String::from_utf8(report.bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2026-10-14,7,10,4,True");
    }

    #[test]
    fn test_report_落盘() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvReportSink::new(Some(dir.path().join("reports")));

        let report = sink.write_daily(today(), &[]).unwrap();
        let on_disk = std::fs::read(dir.path().join("reports").join(&report.file_name)).unwrap();
        assert_eq!(on_disk, report.bytes);
    }
}
