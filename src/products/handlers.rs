use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{
        dto::MessageResponse,
        extractors::{AuthUser, MaybeAuthUser},
        policy,
    },
    error::ApiError,
    products::{
        dto::{
            FeedQuery, FeedResponse, MutationResponse, PaginationMeta, ProductDetailResponse,
            ProductListResponse, ProductSummary, ProductView,
        },
        repo::NewListing,
        repo_types::{Category, Condition, ListingStatus, Product},
        service,
    },
    state::AppState,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

pub fn read_router() -> Router<AppState> {
    Router::new()
        .route("/products", get(feed))
        .route("/products/my", get(my_products))
        .route("/products/:id", get(product_detail))
}

pub fn write_router() -> Router<AppState> {
    Router::new()
        .route("/products", post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .route("/products/:id/sold", patch(mark_sold))
        .layer(DefaultBodyLimit::max(12 * 1024 * 1024))
}

#[instrument(skip(state))]
pub async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<FeedResponse>, ApiError> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let (rows, total) = Product::feed_page(&state.db, page, limit).await?;
    let products = rows
        .into_iter()
        .map(|row| ProductView::from_row(row, false))
        .collect();

    Ok(Json(FeedResponse {
        success: true,
        products,
        pagination: PaginationMeta::new(total, page, limit),
    }))
}

#[instrument(skip(state, user))]
pub async fn my_products(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProductListResponse>, ApiError> {
    let rows = Product::list_mine(&state.db, user.id).await?;
    let products = rows
        .into_iter()
        .map(|p| ProductView::from_owned(p, &user))
        .collect();
    Ok(Json(ProductListResponse {
        success: true,
        products,
    }))
}

/// Detail honors an optional bearer: hidden listings stay reachable for
/// their seller and for admins.
#[instrument(skip(state, viewer))]
pub async fn product_detail(
    State(state): State<AppState>,
    MaybeAuthUser(viewer): MaybeAuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDetailResponse>, ApiError> {
    let row = Product::find_with_seller(&state.db, id)
        .await?
        .filter(|row| row.product.is_visible_to(viewer.as_ref()))
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;

    Ok(Json(ProductDetailResponse {
        success: true,
        product: ProductView::from_row(row, true),
    }))
}

#[instrument(skip(state, user, mp))]
pub async fn create_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    mut mp: Multipart,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    policy::authorize(&user, policy::SELL)?;

    let form = service::read_listing_form(&mut mp).await?;

    let (Some(title), Some(description), Some(category_raw), Some(condition_raw), Some(location)) = (
        form.effective_title().map(str::to_string),
        service::non_empty(&form.description).map(str::to_string),
        service::non_empty(&form.category).map(str::to_string),
        service::non_empty(&form.condition).map(str::to_string),
        service::non_empty(&form.location).map(str::to_string),
    ) else {
        return Err(ApiError::Validation("All core fields are required".into()));
    };

    if form.images.is_empty() {
        return Err(ApiError::Validation("At least one image is required".into()));
    }

    let category = Category::parse(&category_raw)
        .ok_or_else(|| ApiError::Validation("Invalid category".into()))?;
    let condition = Condition::parse(&condition_raw)
        .ok_or_else(|| ApiError::Validation("Invalid condition".into()))?;
    service::validate_title(&title)?;
    service::validate_description(&description)?;

    let is_free = form.is_free.as_deref() == Some("true");
    let price = service::resolve_price(is_free, form.price.as_deref())?;

    let images = service::upload_images(&state, user.id, form.images).await?;

    let product = Product::insert(
        &state.db,
        NewListing {
            seller_id: user.id,
            title,
            description,
            price,
            is_free,
            category,
            condition,
            location,
            images,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse {
            success: true,
            message: "Product created successfully",
            product: ProductSummary::of(&product),
        }),
    ))
}

#[instrument(skip(state, user, mp))]
pub async fn update_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<Json<MutationResponse>, ApiError> {
    policy::authorize(&user, policy::SELL)?;

    let mut product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    policy::authorize_owner_or_admin(&user, product.seller_id)?;

    let form = service::read_listing_form(&mut mp).await?;

    if let Some(title) = form.title.as_deref() {
        product.title = title.trim().to_string();
    }
    if let Some(description) = form.description.as_deref() {
        product.description = description.trim().to_string();
    }
    if let Some(raw) = form.category.as_deref() {
        product.category =
            Category::parse(raw).ok_or_else(|| ApiError::Validation("Invalid category".into()))?;
    }
    if let Some(raw) = form.condition.as_deref() {
        product.condition = Condition::parse(raw)
            .ok_or_else(|| ApiError::Validation("Invalid condition".into()))?;
    }
    if let Some(location) = form.location.as_deref() {
        product.location = location.trim().to_string();
    }

    let uploaded = service::upload_images(&state, user.id, form.images).await?;
    let merged = service::merge_images(form.existing_images.as_deref(), &product.images, uploaded);
    product.images = merged;

    service::apply_price_update(&mut product, form.is_free.as_deref(), form.price.as_deref())?;

    service::validate_title(&product.title)?;
    service::validate_description(&product.description)?;
    if product.location.is_empty() {
        return Err(ApiError::Validation("Location is required".into()));
    }

    Product::update(&state.db, &product).await?;

    Ok(Json(MutationResponse {
        success: true,
        message: "Product updated successfully",
        product: ProductSummary::of(&product),
    }))
}

/// Soft delete. The row stays behind for moderation and restore.
#[instrument(skip(state, user))]
pub async fn delete_product(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    policy::authorize(&user, policy::PARTICIPATE)?;

    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    policy::authorize_owner_or_admin(&user, product.seller_id)?;

    Product::set_status(&state.db, id, ListingStatus::Removed).await?;
    Ok(Json(MessageResponse::ok("Product removed")))
}

#[instrument(skip(state, user))]
pub async fn mark_sold(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MutationResponse>, ApiError> {
    policy::authorize(&user, policy::PARTICIPATE)?;

    let mut product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".into()))?;
    policy::authorize_owner_or_admin(&user, product.seller_id)?;

    if product.status != ListingStatus::Active {
        return Err(ApiError::Validation(
            "Only active listings can be marked as sold".into(),
        ));
    }

    Product::set_status(&state.db, id, ListingStatus::Sold).await?;
    product.status = ListingStatus::Sold;

    Ok(Json(MutationResponse {
        success: true,
        message: "Product marked as sold",
        product: ProductSummary::of(&product),
    }))
}
