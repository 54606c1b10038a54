//! Profile operations.

use sqlx::PgPool;
use waypost_authority::{Actor, Visibility, visibility};
use waypost_core::UserId;
use waypost_platform_access::User;

use crate::auth::db::{SessionRepository, UserRepository};
use crate::db::FriendshipRepository;
use crate::error::ApiError;

/// Fields a profile update may change. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct ProfilePatch {
    pub display_name: Option<Option<String>>,
    pub profile_visibility: Option<Visibility>,
}

/// Service for profile operations.
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repo(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Fetches a user's profile, enforcing its visibility.
    pub async fn get_profile(&self, actor: &Actor, user_id: UserId) -> Result<User, ApiError> {
        let user = self
            .repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::NotFound { resource: "user" })?;

        let friendship = FriendshipRepository::new(self.pool.clone())
            .find_between(actor.id, user_id)
            .await?;

        visibility::can_view_profile(
            actor,
            user_id,
            user.profile_visibility(),
            friendship.as_ref(),
        )?;

        Ok(user)
    }

    /// Applies a patch to the caller's own profile.
    pub async fn update_me(&self, user: &User, patch: ProfilePatch) -> Result<User, ApiError> {
        let mut user = user.clone();

        if let Some(display_name) = patch.display_name {
            user.set_display_name(display_name);
        }
        if let Some(vis) = patch.profile_visibility {
            user.set_profile_visibility(vis);
        }

        self.repo().update(&user).await?;
        Ok(user)
    }

    /// Soft-deactivates the caller's account and ends all their sessions.
    ///
    /// The row survives with `is_active` false; no data is deleted.
    pub async fn deactivate_me(&self, user: &User) -> Result<(), ApiError> {
        let mut user = user.clone();
        user.deactivate();
        self.repo().update(&user).await?;

        SessionRepository::new(self.pool.clone())
            .delete_all_for_user(user.id())
            .await?;

        tracing::info!(user_id = %user.id(), "account deactivated");
        Ok(())
    }
}
