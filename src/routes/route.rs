use crate::openapi::ApiDoc;
use crate::routes::{
    checkout::checkout_route, connect::connect_route, order::order_route, payment::payment_route,
    webhook::webhook_route,
};
use crate::schemas::GenericResponse;
use actix_web::{web, HttpResponse};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(GenericResponse::success("Running", Some(())))
}

pub fn main_route(cfg: &mut web::ServiceConfig) {
    let openapi = ApiDoc::openapi();
    cfg.route("/health_check", web::get().to(health_check));
    cfg.service(web::scope("/checkout").configure(checkout_route))
        .service(web::scope("/payment").configure(payment_route))
        .service(web::scope("/webhook").configure(webhook_route))
        .service(web::scope("/connect").configure(connect_route))
        .service(web::scope("/order").configure(order_route))
        .service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", openapi.clone()));
}
