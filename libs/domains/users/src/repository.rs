use async_trait::async_trait;

use crate::context::OperationContext;
use crate::error::UserResult;
use crate::models::User;

/// Repository trait for User persistence
///
/// Every call is bounded by the given [`OperationContext`] and is a single
/// store round trip. Nothing is retried; callers inspect
/// [`crate::UserError::is_retryable`] and decide.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user and return the identifier the store assigned.
    ///
    /// Any `id` already set on `user` is ignored.
    async fn create(&self, ctx: &OperationContext, user: User) -> UserResult<String>;

    /// Get a user by external identifier
    async fn find_one(&self, ctx: &OperationContext, id: &str) -> UserResult<User>;

    /// All users in store order
    async fn find_all(&self, ctx: &OperationContext) -> UserResult<Vec<User>>;

    /// Set every present attribute of `user` on the user with `user.id`.
    ///
    /// Absent attributes are left as they are in the store.
    async fn update(&self, ctx: &OperationContext, user: User) -> UserResult<()>;

    /// Delete a user by external identifier
    async fn delete(&self, ctx: &OperationContext, id: &str) -> UserResult<()>;
}
