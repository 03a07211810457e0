use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::ApiError;

/// What a protected operation demands of the caller beyond a valid session.
/// Checked against the freshly-loaded user row, never against token claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct Requirement {
    pub not_blocked: bool,
    pub verified: bool,
    pub admin: bool,
}

/// Creating or editing a listing.
pub const SELL: Requirement = Requirement {
    not_blocked: true,
    verified: true,
    admin: false,
};

/// Removing own listings, wishlist changes. Verification not required.
pub const PARTICIPATE: Requirement = Requirement {
    not_blocked: true,
    verified: false,
    admin: false,
};

/// Moderation surface.
pub const MODERATE: Requirement = Requirement {
    not_blocked: true,
    verified: false,
    admin: true,
};

pub fn authorize(user: &User, requirement: Requirement) -> Result<(), ApiError> {
    if requirement.not_blocked && user.is_blocked {
        return Err(ApiError::Blocked);
    }
    if requirement.verified && !user.is_verified {
        return Err(ApiError::Unverified);
    }
    if requirement.admin && !user.role.is_admin() {
        return Err(ApiError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

/// Listing management is restricted to the seller and admins.
pub fn authorize_owner_or_admin(user: &User, owner_id: Uuid) -> Result<(), ApiError> {
    if user.id == owner_id || user.role.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You do not have permission to modify this product".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::Role;
    use time::OffsetDateTime;

    fn user_with(role: Role, verified: bool, blocked: bool) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Sam".into(),
            email: "sam2023@vitstudent.ac.in".into(),
            password_hash: "unused".into(),
            role,
            is_verified: verified,
            is_blocked: blocked,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn blocked_beats_everything() {
        let user = user_with(Role::Admin, true, true);
        assert!(matches!(authorize(&user, SELL), Err(ApiError::Blocked)));
        assert!(matches!(
            authorize(&user, PARTICIPATE),
            Err(ApiError::Blocked)
        ));
        assert!(matches!(authorize(&user, MODERATE), Err(ApiError::Blocked)));
    }

    #[test]
    fn unverified_cannot_sell_but_can_participate() {
        let user = user_with(Role::User, false, false);
        assert!(matches!(authorize(&user, SELL), Err(ApiError::Unverified)));
        assert!(authorize(&user, PARTICIPATE).is_ok());
    }

    #[test]
    fn verified_user_can_sell() {
        let user = user_with(Role::User, true, false);
        assert!(authorize(&user, SELL).is_ok());
    }

    #[test]
    fn moderation_requires_admin_role() {
        let user = user_with(Role::User, true, false);
        assert!(matches!(
            authorize(&user, MODERATE),
            Err(ApiError::Forbidden(_))
        ));
        let admin = user_with(Role::Admin, true, false);
        assert!(authorize(&admin, MODERATE).is_ok());
    }

    #[test]
    fn owner_or_admin_matrix() {
        let owner = user_with(Role::User, true, false);
        let admin = user_with(Role::Admin, true, false);
        let stranger = user_with(Role::User, true, false);

        assert!(authorize_owner_or_admin(&owner, owner.id).is_ok());
        assert!(authorize_owner_or_admin(&admin, owner.id).is_ok());
        assert!(matches!(
            authorize_owner_or_admin(&stranger, owner.id),
            Err(ApiError::Forbidden(_))
        ));
    }
}
