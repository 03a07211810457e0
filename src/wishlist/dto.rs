use serde::Serialize;
use uuid::Uuid;

use crate::products::dto::ProductView;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub success: bool,
    pub is_wishlisted: bool,
    pub wishlist: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub success: bool,
    pub wishlist: Vec<ProductView>,
}
