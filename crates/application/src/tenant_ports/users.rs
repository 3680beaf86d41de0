use async_trait::async_trait;
use tenantdesk_core::{AppResult, UserId};
use tenantdesk_domain::{Permission, UserAccount};

/// Port for user accounts and their flattened role permissions.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Finds one user account.
    async fn find_user(&self, user_id: UserId) -> AppResult<Option<UserAccount>>;

    /// Lists the permissions granted through every role assigned to a user.
    ///
    /// Implementations skip stored values that do not decode into a known
    /// permission.
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>>;
}
