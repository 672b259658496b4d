// ==========================================
// 生产订单跟踪系统 - HTTP 路由
// ==========================================
// 职责: 把 HTTP 请求映射为台账操作
// 说明: 台账调用为阻塞 SQLite 访问，统一放到 spawn_blocking 中执行
// ==========================================

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{
        rejection::{FormRejection, PathRejection},
        Path, Request, State,
    },
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower::ServiceBuilder;

use crate::api::{parse_target, ApiError, ApiResult};
use crate::app::state::AppState;
use crate::app::view;
use crate::report::DailyReport;

type SharedState = Arc<AppState>;

/// 构建路由
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/nova_ordem", post(create_order))
        .route("/adicionar_peca/:id", get(add_piece))
        .route("/finalizar_ordem/:id", get(finish_order))
        .route("/gerar_relatorio", get(export_report))
        .route("/api/orders", get(list_orders))
        .route("/api/orders/:id", get(get_order))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().layer(middleware::from_fn(log_request)))
        .with_state(state)
}

// ==========================================
// 错误映射
// ==========================================

fn status_of(err: &ApiError) -> StatusCode {
    match err {
        ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self);
        if status.is_server_error() {
            tracing::error!(code = self.code(), "请求失败: {}", self);
        }
        (
            status,
            Json(json!({
                "error": self.code(),
                "message": self.to_string(),
            })),
        )
            .into_response()
    }
}

/// 在阻塞线程池中执行台账调用
async fn run_blocking<T, F>(f: F) -> ApiResult<T>
where
    F: FnOnce() -> ApiResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::InternalError(format!("任务执行失败: {}", e)))?
}

// 路径中的订单 id 不是整数时按不存在处理
fn order_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::NotFound(format!("订单 id 无效: {}", e.body_text())))
}

// 未知订单静默忽略，其余错误照常返回
fn redirect_home(result: ApiResult<()>) -> Response {
    match result {
        Ok(()) => Redirect::to("/").into_response(),
        Err(ApiError::NotFound(msg)) => {
            tracing::debug!("忽略未知订单: {}", msg);
            Redirect::to("/").into_response()
        }
        Err(e) => e.into_response(),
    }
}

// ==========================================
// 页面路由
// ==========================================

async fn index(State(state): State<SharedState>) -> Result<Html<String>, ApiError> {
    let overview = run_blocking(move || {
        let today = state.ledger.today();
        state.ledger.overview(today)
    })
    .await?;
    Ok(Html(view::render_index(&overview)))
}

#[derive(Debug, Deserialize)]
struct CreateOrderForm {
    total: Option<String>,
}

async fn create_order(
    State(state): State<SharedState>,
    form: Result<Form<CreateOrderForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(e) => {
            return ApiError::InvalidInput(format!("表单无法解析: {}", e.body_text())).into_response()
        }
    };

    let target = match parse_target(form.total.as_deref()) {
        Ok(target) => target,
        Err(e) => return e.into_response(),
    };

    let result = run_blocking(move || state.ledger.create_order(target).map(|_| ())).await;
    redirect_home(result)
}

async fn add_piece(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match order_id(path) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let result = run_blocking(move || state.ledger.increment_produced(id).map(|_| ())).await;
    redirect_home(result)
}

async fn finish_order(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Response {
    let id = match order_id(path) {
        Ok(id) => id,
        Err(e) => return e.into_response(),
    };
    let result = run_blocking(move || state.ledger.force_complete(id).map(|_| ())).await;
    redirect_home(result)
}

async fn export_report(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let report: DailyReport = run_blocking(move || {
        let today = state.ledger.today();
        state.ledger.export_daily_report(today)
    })
    .await?;

    let headers = [
        (header::CONTENT_TYPE, DailyReport::CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.file_name),
        ),
    ];
    Ok((StatusCode::OK, headers, report.bytes).into_response())
}

// ==========================================
// JSON 路由
// ==========================================

async fn list_orders(State(state): State<SharedState>) -> Result<Response, ApiError> {
    let overview = run_blocking(move || {
        let today = state.ledger.today();
        state.ledger.overview(today)
    })
    .await?;
    Ok((StatusCode::OK, Json(overview)).into_response())
}

async fn get_order(
    State(state): State<SharedState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiError> {
    let id = order_id(path)?;
    let order = run_blocking(move || state.ledger.get_order(id)).await?;
    Ok((StatusCode::OK, Json(crate::api::OrderInfo::from(order))).into_response())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

// ==========================================
// 请求日志
// ==========================================

async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "HTTP 请求"
    );
    response
}
