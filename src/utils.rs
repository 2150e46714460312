use jsonwebtoken::{decode, Algorithm as JWTAlgorithm, DecodingKey, Validation};
use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use uuid::Uuid;

use crate::constants::{ORDER_ID_PREFIX, ORDER_ID_SUFFIX_LENGTH};
use crate::errors::CustomJWTTokenError;
use crate::schemas::{JWTClaims, UserAccount};

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[tracing::instrument(name = "Decode JWT token", skip(secret))]
pub fn decode_token<T: Into<String> + std::fmt::Debug>(
    token: T,
    secret: &SecretString,
) -> Result<Uuid, CustomJWTTokenError> {
    let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let decoded = decode::<JWTClaims>(
        &token.into(),
        &decoding_key,
        &Validation::new(JWTAlgorithm::HS256),
    );
    match decoded {
        Ok(token) => Ok(token.claims.sub),
        Err(e) => match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(CustomJWTTokenError::Expired),
            _ => Err(CustomJWTTokenError::Invalid("Invalid Token".to_string())),
        },
    }
}

/// Human-readable order reference, generated once at order creation.
pub fn generate_order_id() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::rng();
    let suffix: String = (0..ORDER_ID_SUFFIX_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();
    format!("{}-{}", ORDER_ID_PREFIX, suffix)
}

#[tracing::instrument(name = "Get user account", skip(pool))]
pub async fn get_user(pool: &PgPool, user_id: Uuid) -> Result<Option<UserAccount>, anyhow::Error> {
    let row = sqlx::query_as::<_, UserAccount>(
        r#"
        SELECT id, username, display_name, email, is_active, is_deleted, created_on
        FROM user_account
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to execute query: {:?}", e);
        anyhow::Error::new(e)
            .context("A database failure occurred while fetching user account from database")
    })?;
    Ok(row)
}
