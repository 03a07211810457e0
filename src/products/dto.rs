use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::products::repo_types::{Category, Condition, ListingStatus, Product, ProductWithSeller};

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_verified: bool,
}

/// A listing as the API returns it, seller embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_free: bool,
    pub category: Category,
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub seller: SellerSummary,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl ProductView {
    /// Feed and admin shape. The seller email is only exposed on the
    /// detail page, where a buyer needs a way to reach out.
    pub fn from_row(row: ProductWithSeller, include_email: bool) -> Self {
        let ProductWithSeller {
            product,
            seller_name,
            seller_email,
            seller_is_verified,
        } = row;
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            is_free: product.is_free,
            category: product.category,
            condition: product.condition,
            location: product.location,
            images: product.images,
            status: product.status,
            seller: SellerSummary {
                id: product.seller_id,
                name: seller_name,
                email: include_email.then_some(seller_email),
                is_verified: seller_is_verified,
            },
            created_at: product.created_at,
        }
    }

    /// "My listings" rows come without a join; the seller is the caller.
    pub fn from_owned(product: Product, owner: &User) -> Self {
        Self {
            id: product.id,
            title: product.title,
            description: product.description,
            price: product.price,
            is_free: product.is_free,
            category: product.category,
            condition: product.condition,
            location: product.location,
            images: product.images,
            status: product.status,
            seller: SellerSummary {
                id: owner.id,
                name: owner.name.clone(),
                email: None,
                is_verified: owner.is_verified,
            },
            created_at: product.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
}

#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub success: bool,
    pub product: ProductView,
}

/// Write endpoints echo back a trimmed summary, not the full listing.
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: Uuid,
    pub title: String,
    pub images: Vec<String>,
}

impl ProductSummary {
    pub fn of(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            images: product.images.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MutationResponse {
    pub success: bool,
    pub message: &'static str,
    pub product: ProductSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_rounds_pages_up() {
        let meta = PaginationMeta::new(41, 1, 20);
        assert_eq!(meta.pages, 3);
        let exact = PaginationMeta::new(40, 2, 20);
        assert_eq!(exact.pages, 2);
        let empty = PaginationMeta::new(0, 1, 20);
        assert_eq!(empty.pages, 0);
    }

    #[test]
    fn seller_email_is_omitted_unless_present() {
        let without = SellerSummary {
            id: Uuid::new_v4(),
            name: "Ana".into(),
            email: None,
            is_verified: true,
        };
        let json = serde_json::to_value(&without).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["isVerified"], true);

        let with = SellerSummary {
            email: Some("ana@uni.edu".into()),
            ..without
        };
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["email"], "ana@uni.edu");
    }

    #[test]
    fn product_view_uses_camel_case() {
        let product = Product {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            title: "Desk lamp".into(),
            description: "Barely used".into(),
            price: 0.0,
            is_free: true,
            category: Category::Furniture,
            condition: Condition::Used,
            location: "North dorms".into(),
            images: vec!["https://img.local/a.jpg".into()],
            status: ListingStatus::Active,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        let row = ProductWithSeller {
            product,
            seller_name: "Ana".into(),
            seller_email: "ana@uni.edu".into(),
            seller_is_verified: true,
        };
        let json = serde_json::to_value(ProductView::from_row(row, false)).unwrap();
        assert_eq!(json["isFree"], true);
        assert_eq!(json["status"], "active");
        assert!(json["seller"].get("email").is_none());
        assert!(json["createdAt"].as_str().unwrap().starts_with("1970-01-01"));
    }
}
