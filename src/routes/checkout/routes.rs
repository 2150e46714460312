use actix_web::web;

use super::handlers::{checkout_create, checkout_intent};

pub fn checkout_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create").route(web::post().to(checkout_create)));
    cfg.service(web::resource("/intent").route(web::post().to(checkout_intent)));
}
