use actix_web::web;

use super::handlers::{order_fetch, order_list};
use crate::middleware::RequireAuth;

pub fn order_route(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/fetch/{order_id}").route(web::get().to(order_fetch).wrap(RequireAuth)),
    );
    cfg.service(web::resource("/list").route(web::post().to(order_list).wrap(RequireAuth)));
}
