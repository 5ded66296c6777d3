//! 页面和视图操作
//!
//! - GET  /              - 完整页面
//! - POST /search        - 设置搜索词（表单字段 q）
//! - POST /sort/{key}    - 点击表头排序
//! - POST /preset/{name} - 快捷按钮：gainers / losers / volume
//! - POST /refresh       - 重新拉取数据

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use super::{back_to_page, html};
use crate::models::{ApiResponse, Field, Preset};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub q: String,
}

pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse> {
    let dashboard = state.dashboard.lock().await;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html::render_page(&dashboard)))
}

pub async fn search(state: web::Data<AppState>, form: web::Form<SearchForm>) -> Result<HttpResponse> {
    state.dashboard.lock().await.set_search(&form.q);
    Ok(back_to_page())
}

pub async fn sort(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let key = path.into_inner();

    let Some(field) = Field::from_key(&key).filter(|f| Field::SORTABLE.contains(f)) else {
        let response = ApiResponse::<()>::error(format!("未知的排序列: {}", key));
        return Ok(HttpResponse::BadRequest().json(response));
    };

    state.dashboard.lock().await.sort_by_header(field);
    Ok(back_to_page())
}

pub async fn preset(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    match path.into_inner().parse::<Preset>() {
        Ok(preset) => {
            log::debug!("快捷按钮: {}", preset);
            state.dashboard.lock().await.apply_preset(preset);
            Ok(back_to_page())
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(e))),
    }
}

/// 相当于整页刷新：等待拉取结束后再回到页面
pub async fn refresh(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.refresh().await;
    Ok(back_to_page())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/search", web::post().to(search))
        .route("/sort/{key}", web::post().to(sort))
        .route("/preset/{name}", web::post().to(preset))
        .route("/refresh", web::post().to(refresh));
}
