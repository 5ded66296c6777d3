use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::models::{ApiResponse, FIELD_TABLE_VERSION};
use crate::services::dashboard::FetchState;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthInfo {
    pub fetch: FetchState,
    pub rows: usize,
    pub favorites_degraded: bool,
    /// 字段拼写表版本
    pub field_table: u32,
}

/// GET /api/v1/health
///
/// 拉取失败不影响健康状态，只在返回体中体现
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let dashboard = state.dashboard.lock().await;
    let info = HealthInfo {
        fetch: dashboard.status().state,
        rows: dashboard.rows().len(),
        favorites_degraded: dashboard.favorites().is_degraded(),
        field_table: FIELD_TABLE_VERSION,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(info)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
