use actix_web::web;
use sqlx::PgPool;
use utoipa::TupleUnit;

use super::errors::ConnectAccountError;
use super::schemas::{currency_from_stripe, ConnectAccountData, OnboardingLinkData};
use super::utils::{apply_account_status, get_connect_account_by_user, save_connect_account};
use crate::configuration::StripeSetting;
use crate::errors::GenericError;
use crate::schemas::{CurrencyType, GenericResponse, UserAccount};
use crate::stripe_client::StripeClient;

#[utoipa::path(
    post,
    path = "/connect/onboard",
    tag = "Connect Account",
    description = "Creates the seller's payment account on first call and returns a fresh onboarding link.",
    summary = "Connect Onboarding Request",
    responses(
        (status=200, description= "Onboarding Link Response", body= GenericResponse<OnboardingLinkData>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "connect onboarding", skip(pool, stripe_client), fields(user_id=%user_account.id))]
pub async fn connect_onboard(
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
    stripe_setting: web::Data<StripeSetting>,
    user_account: UserAccount,
) -> Result<web::Json<GenericResponse<OnboardingLinkData>>, GenericError> {
    let existing_account = get_connect_account_by_user(&pool, user_account.id)
        .await
        .map_err(|e| {
            ConnectAccountError::DatabaseError("Failed to fetch connect account".to_string(), e)
        })?;

    let account_id = match existing_account {
        Some(account) => {
            if !account.is_active {
                return Err(ConnectAccountError::ValidationError(
                    "Connect account is deactivated".to_string(),
                ))?;
            }
            account.account_id
        }
        None => {
            let stripe_account = stripe_client
                .create_express_account(&user_account.email)
                .await
                .map_err(|e| ConnectAccountError::UnexpectedCustomError(e.to_string()))?;
            let currency_code = stripe_account
                .default_currency
                .as_deref()
                .and_then(currency_from_stripe)
                .unwrap_or(CurrencyType::Usd);
            save_connect_account(
                &pool,
                user_account.id,
                &stripe_account.id,
                &currency_code,
                &stripe_setting.default_platform_fee_percentage,
            )
            .await
            .map_err(|e| {
                ConnectAccountError::DatabaseError("Failed to save connect account".to_string(), e)
            })?;
            stripe_account.id
        }
    };

    let account_link = stripe_client
        .create_account_link(
            &account_id,
            &stripe_setting.onboarding_refresh_url,
            &stripe_setting.onboarding_return_url,
        )
        .await
        .map_err(|e| ConnectAccountError::UnexpectedCustomError(e.to_string()))?;

    Ok(web::Json(GenericResponse::success(
        "Successfully created onboarding link",
        Some(OnboardingLinkData {
            account_id,
            onboarding_url: account_link.url,
            expires_at: account_link.expires_at,
        }),
    )))
}

#[utoipa::path(
    post,
    path = "/connect/sync",
    tag = "Connect Account",
    description = "Fetches the authoritative account state from the payment provider and overwrites the local record.",
    summary = "Connect Account Sync Request",
    responses(
        (status=200, description= "Connect Account Response", body= GenericResponse<ConnectAccountData>),
        (status=401, description= "Invalid Token", body= GenericResponse<TupleUnit>),
        (status=410, description= "Data not found", body= GenericResponse<TupleUnit>),
        (status=500, description= "Internal Server Error", body= GenericResponse<TupleUnit>),
    )
)]
#[tracing::instrument(name = "connect account sync", skip(pool, stripe_client), fields(user_id=%user_account.id))]
pub async fn connect_sync(
    pool: web::Data<PgPool>,
    stripe_client: web::Data<StripeClient>,
    user_account: UserAccount,
) -> Result<web::Json<GenericResponse<ConnectAccountData>>, GenericError> {
    let account = get_connect_account_by_user(&pool, user_account.id)
        .await
        .map_err(|e| {
            ConnectAccountError::DatabaseError("Failed to fetch connect account".to_string(), e)
        })?
        .ok_or_else(|| {
            GenericError::DataNotFound("No connect account exists for this user".to_string())
        })?;

    let stripe_account = stripe_client
        .retrieve_account(&account.account_id)
        .await
        .map_err(|e| ConnectAccountError::UnexpectedCustomError(e.to_string()))?;

    let updated_account = apply_account_status(pool.get_ref(), &stripe_account)
        .await
        .map_err(|e| {
            ConnectAccountError::DatabaseError(
                "Failed to update connect account status".to_string(),
                e,
            )
        })?
        .ok_or_else(|| {
            ConnectAccountError::UnexpectedCustomError(
                "Connect account disappeared during status sync".to_string(),
            )
        })?;

    if updated_account.is_fully_enabled() && account.onboarding_completed_at.is_none() {
        tracing::info!(
            "Connect account {} completed onboarding",
            updated_account.account_id
        );
    }

    Ok(web::Json(GenericResponse::success(
        "Successfully synced connect account",
        Some(updated_account),
    )))
}
