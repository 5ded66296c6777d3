pub mod api;
pub mod export;
pub mod favorites;
pub mod health;
pub mod html;
pub mod page;

use actix_web::{http::header, web, HttpResponse};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.configure(page::config)
        .configure(favorites::config)
        .configure(export::config)
        .service(
            web::scope("/api/v1")
                .configure(health::config)
                .configure(api::config),
        );
}

/// 表单操作完成后回到首页
pub(crate) fn back_to_page() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}
