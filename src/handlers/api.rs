//! JSON 接口
//!
//! - GET /api/v1/rows    - 当前视图下的结构化表格
//! - GET /api/v1/summary - 状态、日期和汇总指标

use actix_web::{web, HttpResponse, Result};

use crate::models::ApiResponse;
use crate::state::AppState;

pub async fn rows(state: web::Data<AppState>) -> Result<HttpResponse> {
    let table = state.dashboard.lock().await.table();
    Ok(HttpResponse::Ok().json(ApiResponse::success(table)))
}

pub async fn summary(state: web::Data<AppState>) -> Result<HttpResponse> {
    let status = state.dashboard.lock().await.status();
    Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/rows", web::get().to(rows))
        .route("/summary", web::get().to(summary));
}
