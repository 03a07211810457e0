use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// User row as the moderation screens see it. No hash, no wishlist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub is_blocked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AdminUserView {
    pub fn of(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            is_blocked: user.is_blocked,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub total_users: i64,
    pub blocked_users: i64,
    pub active_listings: i64,
    pub removed_listings: i64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: StatsCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_user_view_has_no_hash_field() {
        let view = AdminUserView {
            id: Uuid::new_v4(),
            name: "Priya".into(),
            email: "priya2022@vitstudent.ac.in".into(),
            role: Role::User,
            is_verified: true,
            is_blocked: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["isBlocked"], false);
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(StatsResponse {
            success: true,
            stats: StatsCounts {
                total_users: 10,
                blocked_users: 1,
                active_listings: 7,
                removed_listings: 2,
            },
        })
        .unwrap();
        assert_eq!(json["stats"]["totalUsers"], 10);
        assert_eq!(json["stats"]["removedListings"], 2);
    }
}
