use actix_web::web;

use super::handlers::stripe_webhook;

pub fn webhook_route(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stripe").route(web::post().to(stripe_webhook)));
}
