use sqlx::PgPool;
use uuid::Uuid;

use crate::products::repo_types::{Category, Condition, ListingStatus, Product, ProductWithSeller};

/// Insert payload for a new listing.
pub struct NewListing {
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_free: bool,
    pub category: Category,
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>,
}

/// Row offset for a 1-based page. Saturates so an absurd page number from
/// the query string skips past every row instead of overflowing.
fn feed_offset(page: i64, limit: i64) -> i64 {
    page.saturating_sub(1).saturating_mul(limit)
}

impl Product {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, seller_id, title, description, price, is_free, category, condition,
                   location, images, status, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn find_with_seller(db: &PgPool, id: Uuid) -> anyhow::Result<Option<ProductWithSeller>> {
        let row = sqlx::query_as::<_, ProductWithSeller>(
            r#"
            SELECT p.id, p.seller_id, p.title, p.description, p.price, p.is_free, p.category,
                   p.condition, p.location, p.images, p.status, p.created_at, p.updated_at,
                   u.name AS seller_name, u.email AS seller_email, u.is_verified AS seller_is_verified
            FROM products p
            JOIN users u ON u.id = p.seller_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// One page of the public feed: active listings from unblocked sellers,
    /// newest first, plus the total for pagination.
    pub async fn feed_page(
        db: &PgPool,
        page: i64,
        limit: i64,
    ) -> anyhow::Result<(Vec<ProductWithSeller>, i64)> {
        let offset = feed_offset(page, limit);

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products p
            JOIN users u ON u.id = p.seller_id
            WHERE p.status = $1 AND u.is_blocked = false
            "#,
        )
        .bind(ListingStatus::Active)
        .fetch_one(db)
        .await?;

        let rows = sqlx::query_as::<_, ProductWithSeller>(
            r#"
            SELECT p.id, p.seller_id, p.title, p.description, p.price, p.is_free, p.category,
                   p.condition, p.location, p.images, p.status, p.created_at, p.updated_at,
                   u.name AS seller_name, u.email AS seller_email, u.is_verified AS seller_is_verified
            FROM products p
            JOIN users u ON u.id = p.seller_id
            WHERE p.status = $1 AND u.is_blocked = false
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(ListingStatus::Active)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok((rows, total))
    }

    /// The caller's own listings, hiding only soft-deleted ones.
    pub async fn list_mine(db: &PgPool, seller_id: Uuid) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, seller_id, title, description, price, is_free, category, condition,
                   location, images, status, created_at, updated_at
            FROM products
            WHERE seller_id = $1 AND status <> $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(seller_id)
        .bind(ListingStatus::Removed)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Every listing regardless of status, for the moderation surface.
    pub async fn list_all_with_sellers(db: &PgPool) -> anyhow::Result<Vec<ProductWithSeller>> {
        let rows = sqlx::query_as::<_, ProductWithSeller>(
            r#"
            SELECT p.id, p.seller_id, p.title, p.description, p.price, p.is_free, p.category,
                   p.condition, p.location, p.images, p.status, p.created_at, p.updated_at,
                   u.name AS seller_name, u.email AS seller_email, u.is_verified AS seller_is_verified
            FROM products p
            JOIN users u ON u.id = p.seller_id
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn insert(db: &PgPool, listing: NewListing) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (seller_id, title, description, price, is_free, category,
                                  condition, location, images)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, seller_id, title, description, price, is_free, category, condition,
                      location, images, status, created_at, updated_at
            "#,
        )
        .bind(listing.seller_id)
        .bind(listing.title)
        .bind(listing.description)
        .bind(listing.price)
        .bind(listing.is_free)
        .bind(listing.category)
        .bind(listing.condition)
        .bind(listing.location)
        .bind(listing.images)
        .fetch_one(db)
        .await?;
        Ok(product)
    }

    /// Persist the mutable columns of an edited listing.
    pub async fn update(db: &PgPool, product: &Product) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE products
            SET title = $2, description = $3, price = $4, is_free = $5, category = $6,
                condition = $7, location = $8, images = $9, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.title)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.is_free)
        .bind(product.category)
        .bind(product.condition)
        .bind(&product.location)
        .bind(&product.images)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Status transition; false when the id is unknown.
    pub async fn set_status(db: &PgPool, id: Uuid, status: ListingStatus) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET status = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_status(db: &PgPool, status: ListingStatus) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM products WHERE status = $1"#)
            .bind(status)
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}
