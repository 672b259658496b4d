// ==========================================
// 生产订单跟踪系统 - 页面渲染
// ==========================================
// 职责: 把台账返回的数据渲染为 HTML，不含业务规则
// ==========================================

use std::fmt::Write;

use crate::api::{LedgerOverview, OrderInfo};

const STYLE: &str = r#"
    body { font-family: Arial; max-width: 900px; margin: 20px auto; }
    .ordem { border: 1px solid #ccc; padding: 15px; margin-bottom: 10px; border-radius: 5px; }
    .finalizada { background-color: #d4edda; }
    button { padding: 10px 15px; margin: 5px; font-size: 16px; }
    .resumo { background-color: #f0f0f0; padding: 15px; border-radius: 5px; }
    .barra-progresso { width: 100%; background-color: #ddd; border-radius: 5px; overflow: hidden; height: 25px; margin-top: 10px; }
    .progresso { height: 100%; text-align: center; color: white; font-weight: bold; line-height: 25px; }
"#;

/// 渲染首页（汇总 + 新建表单 + 订单列表 + 报表入口）
pub fn render_index(overview: &LedgerOverview) -> String {
    let summary = &overview.summary;
    let mut html = String::with_capacity(4096);

    html.push_str("<!doctype html>\n<html lang=\"pt\">\n<head>\n  <meta charset=\"UTF-8\">\n");
    html.push_str("  <title>Controle de Produção</title>\n");
    let _ = write!(html, "  <style>{}</style>\n</head>\n<body>\n", STYLE);
    html.push_str("  <h1>Controle de Produção</h1>\n");

    let _ = write!(
        html,
        r#"  <div class="resumo">
    <strong>Resumo do Dia ({today}):</strong><br>
    Ordens finalizadas: {completed}<br>
    Peças produzidas hoje: {produced} / {target}
    <div class="barra-progresso">
      <div class="progresso" style="width: {pct}%; background-color: {color};">{pct}%</div>
    </div>
  </div>
"#,
        today = escape(&overview.today),
        completed = summary.completed_count,
        produced = summary.total_produced,
        target = summary.daily_target,
        pct = summary.progress_percent,
        color = summary.progress_color.css_color(),
    );

    html.push_str(
        r#"  <h2>Nova Ordem</h2>
  <form method="post" action="/nova_ordem">
    Quantidade de peças: <input type="number" name="total" min="1" required>
    <button type="submit">Adicionar</button>
  </form>
  <h2>Ordens</h2>
"#,
    );

    for order in &overview.orders {
        render_order(&mut html, order);
    }

    html.push_str("  <a href=\"/gerar_relatorio\"><button>Gerar Relatório CSV</button></a>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn render_order(html: &mut String, order: &OrderInfo) {
    let class = if order.completed { "ordem finalizada" } else { "ordem" };
    let _ = write!(
        html,
        "  <div class=\"{}\">\n    <strong>Ordem {}</strong><br>\n    Peças: {} / {}<br>\n",
        class, order.id, order.produced, order.target
    );

    if order.completed {
        html.push_str("    Finalizada\n");
    } else {
        let _ = write!(
            html,
            "    <a href=\"/adicionar_peca/{id}\"><button>+1 Peça</button></a>\n    <a href=\"/finalizar_ordem/{id}\"><button>Finalizar</button></a>\n",
            id = order.id
        );
    }
    html.push_str("  </div>\n");
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::summary::DailySummary;
    use chrono::NaiveDate;

    fn overview(orders: Vec<OrderInfo>) -> LedgerOverview {
        let today = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        LedgerOverview {
            today: today.to_string(),
            orders,
            summary: DailySummary::compute(today, 1, 40, 80),
        }
    }

    fn order(id: i64, completed: bool) -> OrderInfo {
        OrderInfo {
            id,
            target: 5,
            produced: if completed { 5 } else { 2 },
            completed,
            completion_date: None,
            status: String::new(),
            remaining: 0,
        }
    }

    #[test]
    fn test_render_index_汇总与按钮() {
        let html = render_index(&overview(vec![order(1, false), order(2, true)]));

        assert!(html.contains("Resumo do Dia (2026-10-14)"));
        assert!(html.contains("40 / 80"));
        assert!(html.contains("width: 50%; background-color: red;"));
        assert!(html.contains("/adicionar_peca/1"));
        assert!(html.contains("/finalizar_ordem/1"));
        // 已完工订单不再显示操作按钮
        assert!(!html.contains("/adicionar_peca/2"));
        assert!(html.contains("ordem finalizada"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a&\"b\">"), "&lt;a&amp;&quot;b&quot;&gt;");
    }
}
