use uuid::Uuid;

use crate::error::ApiError;
use crate::users::model::{Role, User};

/// Capability checks over {self, admin}. Handlers go through these instead
/// of comparing roles inline.
pub fn is_admin(actor: &User) -> bool {
    actor.role == Role::Admin
}

/// A user record may be read by its owner or by an admin.
pub fn can_view_user(actor: &User, target: Uuid) -> bool {
    is_admin(actor) || actor.id == target
}

/// A service may be modified by its owner or by an admin.
pub fn can_manage_service(actor: &User, owner: Uuid) -> bool {
    is_admin(actor) || actor.id == owner
}

pub fn ensure(allowed: bool) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden("Access denied".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn make_user(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: "user@example.com".into(),
            username: "user".into(),
            password_hash: "x".into(),
            role,
            email_verified: true,
            full_name: None,
            avatar_url: None,
            bio: None,
            quota_text_tokens: 0,
            quota_images: 0,
            quota_videos: 0,
            quota_audio_minutes: 0,
            settings: serde_json::json!({}),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
            last_login_at: None,
            deleted_at: None,
        }
    }

    #[test]
    fn admin_can_view_anyone() {
        let admin = make_user(Role::Admin);
        assert!(can_view_user(&admin, Uuid::new_v4()));
    }

    #[test]
    fn user_can_view_self_only() {
        let user = make_user(Role::User);
        assert!(can_view_user(&user, user.id));
        assert!(!can_view_user(&user, Uuid::new_v4()));
    }

    #[test]
    fn moderator_is_not_admin() {
        let moderator = make_user(Role::Moderator);
        assert!(!is_admin(&moderator));
        assert!(!can_view_user(&moderator, Uuid::new_v4()));
    }

    #[test]
    fn owner_or_admin_manages_service() {
        let owner = make_user(Role::User);
        let admin = make_user(Role::Admin);
        let other = make_user(Role::User);
        assert!(can_manage_service(&owner, owner.id));
        assert!(can_manage_service(&admin, owner.id));
        assert!(!can_manage_service(&other, owner.id));
    }

    #[test]
    fn ensure_maps_to_forbidden() {
        assert!(ensure(true).is_ok());
        let err = ensure(false).unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }
}
