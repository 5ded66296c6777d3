//! 测试用的上游服务

use actix_web::{dev::ServerHandle, http::StatusCode, web, App, HttpResponse, HttpServer};

/// 在随机端口启动一个返回固定内容的上游服务，返回 (行数据地址, 句柄)
pub async fn upstream(status: u16, body: &'static str) -> (String, ServerHandle) {
    let server = HttpServer::new(move || {
        App::new().route(
            "/rows",
            web::get().to(move || async move {
                HttpResponse::build(StatusCode::from_u16(status).unwrap())
                    .content_type("application/json")
                    .body(body)
            }),
        )
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    let server = server.run();
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (format!("http://{}/rows", addr), handle)
}
