use chrono::Utc;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::OrderModel;
use super::schemas::{OrderData, OrderListFilter};
use crate::utils::generate_order_id;

#[allow(clippy::too_many_arguments)]
#[tracing::instrument(name = "Save checkout order", skip(transaction, form_responses))]
pub async fn save_order(
    transaction: &mut Transaction<'_, Postgres>,
    custom_link_id: Uuid,
    buyer_name: Option<&str>,
    buyer_email: Option<&str>,
    buyer_phone: Option<&str>,
    form_responses: Option<&Value>,
    email_automation_enabled: bool,
) -> Result<(Uuid, String), anyhow::Error> {
    let id = Uuid::new_v4();
    let order_id = generate_order_id();
    sqlx::query(
        r#"
        INSERT INTO checkout_order (id, order_id, custom_link_id, buyer_name, buyer_email,
            buyer_phone, form_responses, email_automation_enabled, created_on)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(&order_id)
    .bind(custom_link_id)
    .bind(buyer_name)
    .bind(buyer_email)
    .bind(buyer_phone)
    .bind(form_responses)
    .bind(email_automation_enabled)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while saving checkout order to database")
    })?;
    Ok((id, order_id))
}

#[tracing::instrument(name = "Get order by order id", skip(pool))]
pub async fn get_order_by_order_id(
    pool: &PgPool,
    order_id: &str,
) -> Result<Option<OrderData>, anyhow::Error> {
    let row = sqlx::query_as::<_, OrderModel>(
        r#"
        SELECT id, order_id, custom_link_id, order_status, buyer_name, buyer_email, buyer_phone,
               form_responses, email_automation_enabled, created_on, completed_on, cancelled_on
        FROM checkout_order
        WHERE order_id = $1
        "#,
    )
    .bind(order_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching checkout order from database")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

#[tracing::instrument(name = "Get order with lock", skip(transaction))]
pub async fn get_order_with_lock(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<OrderData>, anyhow::Error> {
    let row = sqlx::query_as::<_, OrderModel>(
        r#"
        SELECT id, order_id, custom_link_id, order_status, buyer_name, buyer_email, buyer_phone,
               form_responses, email_automation_enabled, created_on, completed_on, cancelled_on
        FROM checkout_order
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching checkout order with lock")
    })?;
    Ok(row.map(|model| model.into_schema()))
}

/// Completes an order exactly once. Returns whether this call performed the
/// transition, so the caller can gate one-shot side effects on it.
#[tracing::instrument(name = "Mark order completed", skip(transaction))]
pub async fn mark_order_completed(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"
        UPDATE checkout_order
        SET order_status = 'completed', completed_on = $2, updated_on = $2
        WHERE id = $1 AND order_status = 'pending'
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while marking checkout order as completed")
    })?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(name = "Mark order cancelled", skip(transaction))]
pub async fn mark_order_cancelled(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> Result<bool, anyhow::Error> {
    let result = sqlx::query(
        r#"
        UPDATE checkout_order
        SET order_status = 'cancelled', cancelled_on = $2, updated_on = $2
        WHERE id = $1 AND order_status != 'cancelled'
        "#,
    )
    .bind(id)
    .bind(Utc::now())
    .execute(&mut **transaction)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while marking checkout order as cancelled")
    })?;
    Ok(result.rows_affected() == 1)
}

#[tracing::instrument(name = "Get order list", skip(pool))]
pub async fn get_order_list(
    pool: &PgPool,
    filter: OrderListFilter,
) -> Result<Vec<OrderData>, anyhow::Error> {
    let rows = sqlx::query_as::<_, OrderModel>(
        r#"
        SELECT co.id, co.order_id, co.custom_link_id, co.order_status, co.buyer_name,
               co.buyer_email, co.buyer_phone, co.form_responses, co.email_automation_enabled,
               co.created_on, co.completed_on, co.cancelled_on
        FROM checkout_order co
        JOIN custom_link cl ON cl.id = co.custom_link_id
        WHERE cl.seller_id = $1
        AND ($2::order_status_type IS NULL OR co.order_status = $2)
        AND ($3::uuid IS NULL OR co.custom_link_id = $3)
        AND ($4::timestamptz IS NULL OR co.created_on >= $4)
        AND ($5::timestamptz IS NULL OR co.created_on <= $5)
        ORDER BY co.created_on DESC
        OFFSET $6 LIMIT $7
        "#,
    )
    .bind(filter.seller_id)
    .bind(filter.order_status)
    .bind(filter.custom_link_id)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.offset)
    .bind(filter.limit)
    .fetch_all(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching checkout order list")
    })?;
    Ok(rows.into_iter().map(|model| model.into_schema()).collect())
}
