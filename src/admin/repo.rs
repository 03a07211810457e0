use sqlx::PgPool;

pub async fn count_users(db: &PgPool) -> anyhow::Result<i64> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users"#)
        .fetch_one(db)
        .await?;
    Ok(count)
}

pub async fn count_blocked_users(db: &PgPool) -> anyhow::Result<i64> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM users WHERE is_blocked = true"#)
        .fetch_one(db)
        .await?;
    Ok(count)
}
