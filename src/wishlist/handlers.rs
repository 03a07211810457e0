use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{extractors::AuthUser, policy},
    error::ApiError,
    products::{dto::ProductView, repo_types::Product},
    state::AppState,
    wishlist::{
        dto::{ToggleResponse, WishlistResponse},
        repo,
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wishlist", get(my_wishlist))
        .route("/wishlist/toggle/:product_id", post(toggle))
}

#[instrument(skip(state, user))]
pub async fn toggle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(product_id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    policy::authorize(&user, policy::PARTICIPATE)?;

    Product::find_by_id(&state.db, product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    let was_wishlisted = repo::contains(&state.db, user.id, product_id).await?;
    if was_wishlisted {
        repo::remove(&state.db, user.id, product_id).await?;
    } else {
        repo::add(&state.db, user.id, product_id).await?;
    }

    let wishlist = repo::product_ids_for_user(&state.db, user.id).await?;
    Ok(Json(ToggleResponse {
        success: true,
        is_wishlisted: !was_wishlisted,
        wishlist,
    }))
}

#[instrument(skip(state, user))]
pub async fn my_wishlist(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<WishlistResponse>, ApiError> {
    let rows = repo::list_products(&state.db, user.id).await?;
    let wishlist = rows
        .into_iter()
        .map(|row| ProductView::from_row(row, false))
        .collect();
    Ok(Json(WishlistResponse {
        success: true,
        wishlist,
    }))
}
