//! 自选操作
//!
//! - POST /favorites/toggle        - 切换收藏（表单字段 symbol）
//! - POST /favorites/clear         - 清空自选
//! - POST /favorites/only          - 仅看自选（表单字段 enabled）
//! - POST /favorites/select        - 从弹窗选中代码（表单字段 symbol）
//! - POST /favorites/popup/{open|close}

use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

use super::back_to_page;
use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SymbolForm {
    pub symbol: String,
}

#[derive(Debug, Deserialize)]
pub struct OnlyForm {
    #[serde(default)]
    pub enabled: bool,
}

pub async fn toggle(state: web::Data<AppState>, form: web::Form<SymbolForm>) -> Result<HttpResponse> {
    let now_on = state.dashboard.lock().await.toggle_favorite(&form.symbol);
    log::info!("自选 {} -> {}", form.symbol, if now_on { "添加" } else { "移除" });
    Ok(back_to_page())
}

pub async fn clear(state: web::Data<AppState>) -> Result<HttpResponse> {
    state.dashboard.lock().await.clear_favorites();
    Ok(back_to_page())
}

pub async fn only(state: web::Data<AppState>, form: web::Form<OnlyForm>) -> Result<HttpResponse> {
    state.dashboard.lock().await.set_favorites_only(form.enabled);
    Ok(back_to_page())
}

pub async fn select(state: web::Data<AppState>, form: web::Form<SymbolForm>) -> Result<HttpResponse> {
    state.dashboard.lock().await.select_favorite(&form.symbol);
    Ok(back_to_page())
}

pub async fn popup(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let mut dashboard = state.dashboard.lock().await;
    match path.as_str() {
        "open" => dashboard.open_popup(),
        "close" => dashboard.close_popup(),
        other => {
            let response = ApiResponse::<()>::error(format!("未知的弹窗操作: {}", other));
            return Ok(HttpResponse::BadRequest().json(response));
        }
    }
    Ok(back_to_page())
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/favorites")
            .route("/toggle", web::post().to(toggle))
            .route("/clear", web::post().to(clear))
            .route("/only", web::post().to(only))
            .route("/select", web::post().to(select))
            .route("/popup/{action}", web::post().to(popup)),
    );
}
