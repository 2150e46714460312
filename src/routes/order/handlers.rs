use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::errors::OrderError;
use super::schemas::{OrderData, OrderListFilter, OrderListRequest};
use super::utils::{get_order_by_order_id, get_order_list};
use crate::constants::ORDER_ID_PATTERN;
use crate::errors::GenericError;
use crate::routes::product::utils::get_custom_link;
use crate::schemas::{GenericResponse, UserAccount};

#[utoipa::path(
    get,
    path = "/order/fetch/{order_id}",
    tag = "Order",
    description = "Fetches a single order by its human-readable order id.",
    summary = "Order Fetch Request",
    params(
        ("order_id" = String, Path, description = "Human-readable order id")
    ),
    responses(
        (status=200, description= "Order Fetch Response", body= GenericResponse<OrderData>),
        (status=400, description= "Invalid Request", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=403, description= "Insufficient Privilege", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order fetch", skip(pool), fields(user_id=%user_account.id))]
pub async fn order_fetch(
    path: web::Path<String>,
    pool: web::Data<PgPool>,
    user_account: UserAccount,
) -> Result<web::Json<GenericResponse<OrderData>>, GenericError> {
    let order_id = path.into_inner();
    if !ORDER_ID_PATTERN.is_match(&order_id) {
        return Err(OrderError::ValidationError(format!(
            "{} is not a valid order id",
            order_id
        )))?;
    }

    let order = get_order_by_order_id(&pool, &order_id)
        .await
        .map_err(|e| OrderError::DatabaseError("Failed to fetch order".to_string(), e))?
        .ok_or_else(|| OrderError::DataNotFound(format!("{} is not found", order_id)))?;

    let link = get_custom_link(&pool, order.custom_link_id)
        .await
        .map_err(|e| OrderError::DatabaseError("Failed to fetch custom link".to_string(), e))?
        .ok_or_else(|| {
            OrderError::DataNotFound("The product for this order no longer exists".to_string())
        })?;
    if link.seller_id != user_account.id {
        return Err(GenericError::InsufficientPrivilegeError(
            "This order belongs to another seller".to_string(),
        ));
    }

    Ok(web::Json(GenericResponse::success(
        "Successfully fetched order",
        Some(order),
    )))
}

#[utoipa::path(
    post,
    path = "/order/list",
    tag = "Order",
    description = "Lists the seller's orders with optional status, link and date filters.",
    summary = "Order List Request",
    request_body(content = OrderListRequest, description = "Request Body"),
    responses(
        (status=200, description= "Order List Response", body= GenericResponse<Vec<OrderData>>),
        (status=400, description= "Invalid Request body", body= GenericResponse<TupleUnit>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "order list", skip(pool), fields(user_id=%user_account.id))]
pub async fn order_list(
    body: OrderListRequest,
    pool: web::Data<PgPool>,
    user_account: UserAccount,
) -> Result<web::Json<GenericResponse<Vec<OrderData>>>, GenericError> {
    let filter = OrderListFilter::new(body, user_account.id);
    let orders = get_order_list(&pool, filter)
        .await
        .map_err(|e| OrderError::DatabaseError("Failed to fetch order list".to_string(), e))?;

    Ok(web::Json(GenericResponse::success(
        "Successfully fetched orders",
        Some(orders),
    )))
}
