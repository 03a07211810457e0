use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

/// What a single-use token is good for. Stored as text in
/// `auth_tokens.purpose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    pub fn ttl(self) -> Duration {
        match self {
            TokenPurpose::EmailVerification => Duration::hours(24),
            TokenPurpose::PasswordReset => Duration::minutes(30),
        }
    }
}

/// 32 bytes from the OS RNG, hex-encoded. The secret leaves this module
/// exactly once, in the return value of `issue`; only its digest is stored.
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Persist a fresh token for the user and hand back the raw secret.
pub async fn issue(db: &PgPool, user_id: Uuid, purpose: TokenPurpose) -> anyhow::Result<String> {
    let secret = generate_secret();
    let expires_at = OffsetDateTime::now_utc() + purpose.ttl();
    sqlx::query(
        r#"
        INSERT INTO auth_tokens (user_id, token_hash, purpose, expires_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(user_id)
    .bind(hash_secret(&secret))
    .bind(purpose)
    .bind(expires_at)
    .execute(db)
    .await?;
    info!(user_id = %user_id, purpose = ?purpose, "single-use token issued");
    Ok(secret)
}

/// Consume a token. The single UPDATE both checks and flips `used`, so two
/// concurrent redemptions of the same secret cannot both succeed; the
/// `expires_at` predicate re-checks expiry rather than trusting the purge
/// task. Returns the owning user id, or None on any miss (unknown secret,
/// wrong purpose, already used, expired) without distinguishing the cases.
pub async fn redeem(
    db: &PgPool,
    secret: &str,
    purpose: TokenPurpose,
) -> anyhow::Result<Option<Uuid>> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        UPDATE auth_tokens
        SET used = true
        WHERE token_hash = $1 AND purpose = $2 AND used = false AND expires_at > now()
        RETURNING user_id
        "#,
    )
    .bind(hash_secret(secret))
    .bind(purpose)
    .fetch_optional(db)
    .await?;
    Ok(row.map(|(user_id,)| user_id))
}

/// Mark every outstanding token of this purpose consumed, e.g. before
/// issuing a replacement or after a successful password reset.
pub async fn invalidate_for_user(
    db: &PgPool,
    user_id: Uuid,
    purpose: TokenPurpose,
) -> anyhow::Result<u64> {
    let result = sqlx::query(
        r#"
        UPDATE auth_tokens
        SET used = true
        WHERE user_id = $1 AND purpose = $2 AND used = false
        "#,
    )
    .bind(user_id)
    .bind(purpose)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}

pub async fn purge_expired(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query(r#"DELETE FROM auth_tokens WHERE expires_at < now()"#)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Hourly sweep of expired rows. Redemption never depends on this having run.
pub fn spawn_purge_task(db: PgPool) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            match purge_expired(&db).await {
                Ok(0) => {}
                Ok(purged) => info!(purged, "expired auth tokens purged"),
                Err(e) => warn!(error = %e, "auth token purge failed"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_64_hex_chars_and_unique() {
        let a = generate_secret();
        let b = generate_secret();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_deterministic_sha256_hex() {
        let secret = "0f".repeat(32);
        let first = hash_secret(&secret);
        let second = hash_secret(&secret);
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
        assert_ne!(first, secret, "digest must differ from the secret");
        assert_ne!(first, hash_secret("other"), "digests differ per secret");
    }

    #[test]
    fn ttl_policy() {
        assert_eq!(TokenPurpose::EmailVerification.ttl(), Duration::hours(24));
        assert_eq!(TokenPurpose::PasswordReset.ttl(), Duration::minutes(30));
    }
}
