use actix_web::web;

use super::handlers::payment_refund;
use crate::middleware::RequireAuth;

pub fn payment_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/refund").route(web::post().to(payment_refund).wrap(RequireAuth)));
}
