use axum::{
    extract::{Path, State},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    admin::{
        dto::{AdminUserView, StatsCounts, StatsResponse, UserListResponse},
        repo,
    },
    auth::{dto::MessageResponse, extractors::AuthUser, policy, repo_types::User},
    error::ApiError,
    products::{
        dto::{ProductListResponse, ProductView},
        repo_types::{ListingStatus, Product},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/products", get(list_products))
        .route("/admin/products/:id/remove", patch(remove_product))
        .route("/admin/products/:id/restore", patch(restore_product))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id/block", patch(block_user))
        .route("/admin/users/:id/unblock", patch(unblock_user))
        .route("/admin/stats", get(stats))
}

#[instrument(skip(state, user))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProductListResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    let rows = Product::list_all_with_sellers(&state.db).await?;
    let products = rows
        .into_iter()
        .map(|row| ProductView::from_row(row, true))
        .collect();
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

#[instrument(skip(state, user))]
pub async fn remove_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    if !Product::set_status(&state.db, id, ListingStatus::Removed).await? {
        return Err(ApiError::NotFound("Product not found".into()));
    }
    info!(product_id = %id, moderator = %user.id, "listing removed by moderation");
    Ok(Json(MessageResponse::ok("Product removed")))
}

#[instrument(skip(state, user))]
pub async fn restore_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    if !Product::set_status(&state.db, id, ListingStatus::Active).await? {
        return Err(ApiError::NotFound("Product not found".into()));
    }
    info!(product_id = %id, moderator = %user.id, "listing restored by moderation");
    Ok(Json(MessageResponse::ok("Product restored")))
}

#[instrument(skip(state, user))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserListResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    let users = User::list_all(&state.db)
        .await?
        .into_iter()
        .map(AdminUserView::of)
        .collect();
    Ok(Json(UserListResponse {
        success: true,
        users,
    }))
}

#[instrument(skip(state, user))]
pub async fn block_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    if User::set_blocked(&state.db, id, true).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }
    info!(target = %id, moderator = %user.id, "user blocked");
    Ok(Json(MessageResponse::ok("User blocked")))
}

#[instrument(skip(state, user))]
pub async fn unblock_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    if User::set_blocked(&state.db, id, false).await?.is_none() {
        return Err(ApiError::NotFound("User not found".into()));
    }
    info!(target = %id, moderator = %user.id, "user unblocked");
    Ok(Json(MessageResponse::ok("User unblocked")))
}

#[instrument(skip(state, user))]
pub async fn stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<StatsResponse>, ApiError> {
    policy::authorize(&user, policy::MODERATE)?;

    let total_users = repo::count_users(&state.db).await?;
    let blocked_users = repo::count_blocked_users(&state.db).await?;
    let active_listings = Product::count_by_status(&state.db, ListingStatus::Active).await?;
    let removed_listings = Product::count_by_status(&state.db, ListingStatus::Removed).await?;

    Ok(Json(StatsResponse {
        success: true,
        stats: StatsCounts {
            total_users,
            blocked_users,
            active_listings,
            removed_listings,
        },
    }))
}
