use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Marketplace category, a closed set stored as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Category {
    Furniture,
    Electronics,
    #[serde(rename = "Books & Study Material")]
    #[sqlx(rename = "Books & Study Material")]
    BooksStudyMaterial,
    #[serde(rename = "Kitchen Items")]
    #[sqlx(rename = "Kitchen Items")]
    KitchenItems,
    #[serde(rename = "Hostel Essentials")]
    #[sqlx(rename = "Hostel Essentials")]
    HostelEssentials,
    #[serde(rename = "Free Items")]
    #[sqlx(rename = "Free Items")]
    FreeItems,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Furniture,
        Category::Electronics,
        Category::BooksStudyMaterial,
        Category::KitchenItems,
        Category::HostelEssentials,
        Category::FreeItems,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Furniture => "Furniture",
            Category::Electronics => "Electronics",
            Category::BooksStudyMaterial => "Books & Study Material",
            Category::KitchenItems => "Kitchen Items",
            Category::HostelEssentials => "Hostel Essentials",
            Category::FreeItems => "Free Items",
        }
    }

    pub fn parse(s: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Used,
}

impl Condition {
    pub const ALL: [Condition; 3] = [Condition::New, Condition::LikeNew, Condition::Used];

    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Used => "used",
        }
    }

    pub fn parse(s: &str) -> Option<Condition> {
        Condition::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Listing lifecycle. Lowercase spellings are canonical everywhere: the
/// database, the wire, and every count query use this one set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ListingStatus {
    Active,
    UnderReview,
    Removed,
    Sold,
}

/// Listing record in the database. Soft-deleted rows keep their data and
/// move to `removed`.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_free: bool,
    pub category: Category,
    pub condition: Condition,
    pub location: String,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Product {
    /// Active and sold listings are public; removed and under-review ones
    /// only show to the seller and admins.
    pub fn is_visible_to(&self, viewer: Option<&User>) -> bool {
        match self.status {
            ListingStatus::Active | ListingStatus::Sold => true,
            ListingStatus::Removed | ListingStatus::UnderReview => match viewer {
                Some(user) => user.id == self.seller_id || user.role.is_admin(),
                None => false,
            },
        }
    }
}

/// Listing joined with the seller columns the API embeds.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithSeller {
    #[sqlx(flatten)]
    pub product: Product,
    pub seller_name: String,
    pub seller_email: String,
    pub seller_is_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;

    fn viewer(id: Uuid, role: Role) -> User {
        User {
            id,
            name: "Viewer".into(),
            email: "viewer@artvip.ac.in".into(),
            password_hash: "unused".into(),
            role,
            is_verified: true,
            is_blocked: false,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    fn listing(status: ListingStatus, seller_id: Uuid) -> Product {
        Product {
            id: Uuid::new_v4(),
            seller_id,
            title: "Study desk".into(),
            description: "Solid wood desk, minor scratches".into(),
            price: 1500.0,
            is_free: false,
            category: Category::Furniture,
            condition: Condition::Used,
            location: "Block A".into(),
            images: vec!["https://cdn.example/desk.jpg".into()],
            status,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn category_spellings_match_serde() {
        for category in Category::ALL {
            let json = serde_json::to_value(category).unwrap();
            assert_eq!(json, category.as_str());
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("Vehicles"), None);
    }

    #[test]
    fn condition_spellings_match_serde() {
        for condition in Condition::ALL {
            let json = serde_json::to_value(condition).unwrap();
            assert_eq!(json, condition.as_str());
            assert_eq!(Condition::parse(condition.as_str()), Some(condition));
        }
        assert_eq!(Condition::parse("broken"), None);
        assert_eq!(Condition::parse("like new"), None, "only the hyphenated spelling counts");
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ListingStatus::UnderReview).unwrap(),
            "under_review"
        );
        assert_eq!(serde_json::to_value(ListingStatus::Active).unwrap(), "active");
    }

    #[test]
    fn active_and_sold_are_public() {
        let seller = Uuid::new_v4();
        assert!(listing(ListingStatus::Active, seller).is_visible_to(None));
        assert!(listing(ListingStatus::Sold, seller).is_visible_to(None));
    }

    #[test]
    fn removed_visible_only_to_owner_or_admin() {
        let seller_id = Uuid::new_v4();
        let removed = listing(ListingStatus::Removed, seller_id);

        assert!(!removed.is_visible_to(None));
        let stranger = viewer(Uuid::new_v4(), Role::User);
        assert!(!removed.is_visible_to(Some(&stranger)));
        let owner = viewer(seller_id, Role::User);
        assert!(removed.is_visible_to(Some(&owner)));
        let admin = viewer(Uuid::new_v4(), Role::Admin);
        assert!(removed.is_visible_to(Some(&admin)));
    }

    #[test]
    fn under_review_follows_removed_rules() {
        let seller_id = Uuid::new_v4();
        let pending = listing(ListingStatus::UnderReview, seller_id);
        assert!(!pending.is_visible_to(None));
        assert!(pending.is_visible_to(Some(&viewer(seller_id, Role::User))));
    }
}
