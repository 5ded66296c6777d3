use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web, HttpResponse, Result,
};

use crate::models::ApiResponse;
use crate::services::export::CSV_FILE_NAME;
use crate::state::AppState;

/// GET /table_data.csv
///
/// 导出当前视图下可见的表格
pub async fn download_csv(state: web::Data<AppState>) -> Result<HttpResponse> {
    let csv = match state.dashboard.lock().await.export_csv() {
        Ok(csv) => csv,
        Err(e) => {
            log::error!("导出 CSV 失败: {:#}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error(format!("导出 CSV 失败: {}", e))));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type("text/csv;charset=utf-8;")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(CSV_FILE_NAME.to_string())],
        })
        .body(csv))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route(&format!("/{}", CSV_FILE_NAME), web::get().to(download_csv));
}
