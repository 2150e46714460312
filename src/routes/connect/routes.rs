use actix_web::web;

use super::handlers::{connect_onboard, connect_sync};
use crate::middleware::RequireAuth;

pub fn connect_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/onboard").route(web::post().to(connect_onboard).wrap(RequireAuth)),
    );
    cfg.service(web::resource("/sync").route(web::post().to(connect_sync).wrap(RequireAuth)));
}
