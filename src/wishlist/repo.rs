use sqlx::PgPool;
use uuid::Uuid;

use crate::products::repo_types::ProductWithSeller;

/// Wishlist ids in insertion order, the shape toggle responses return.
pub async fn product_ids_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT product_id
        FROM wishlist_items
        WHERE user_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(ids)
}

pub async fn contains(db: &PgPool, user_id: Uuid, product_id: Uuid) -> anyhow::Result<bool> {
    let found: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM wishlist_items WHERE user_id = $1 AND product_id = $2
        )
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_one(db)
    .await?;
    Ok(found)
}

pub async fn add(db: &PgPool, user_id: Uuid, product_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO wishlist_items (user_id, product_id)
        VALUES ($1, $2)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn remove(db: &PgPool, user_id: Uuid, product_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        DELETE FROM wishlist_items
        WHERE user_id = $1 AND product_id = $2
        "#,
    )
    .bind(user_id)
    .bind(product_id)
    .execute(db)
    .await?;
    Ok(())
}

/// Wishlisted listings joined with their sellers, insertion order. No
/// status filter: listings removed after being saved stay on the list.
pub async fn list_products(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<ProductWithSeller>> {
    let rows = sqlx::query_as::<_, ProductWithSeller>(
        r#"
        SELECT p.id, p.seller_id, p.title, p.description, p.price, p.is_free, p.category,
               p.condition, p.location, p.images, p.status, p.created_at, p.updated_at,
               u.name AS seller_name, u.email AS seller_email, u.is_verified AS seller_is_verified
        FROM wishlist_items w
        JOIN products p ON p.id = w.product_id
        JOIN users u ON u.id = p.seller_id
        WHERE w.user_id = $1
        ORDER BY w.created_at ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
