use sqlx::PgPool;

use crate::contact::repo_types::Message;

pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub is_report: bool,
}

pub async fn insert(db: &PgPool, new: NewMessage) -> anyhow::Result<Message> {
    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (name, email, subject, message, is_report)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, subject, message, is_report, status, created_at
        "#,
    )
    .bind(new.name)
    .bind(new.email)
    .bind(new.subject)
    .bind(new.message)
    .bind(new.is_report)
    .fetch_one(db)
    .await?;
    Ok(message)
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT id, name, email, subject, message, is_report, status, created_at
        FROM messages
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(messages)
}
