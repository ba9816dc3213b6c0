//! User Service - request-scoped orchestration over a UserRepository

use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::context::OperationContext;
use crate::error::UserResult;
use crate::models::User;
use crate::repository::UserRepository;

/// Deadline applied to each call when none is configured
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Gives every call its own [`OperationContext`] bounded by the configured
/// operation timeout.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    operation_timeout: Duration,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new UserService with the given repository
    pub fn new(repository: R) -> Self {
        Self::from_arc(Arc::new(repository))
    }

    /// Share an existing repository
    pub fn from_arc(repository: Arc<R>) -> Self {
        Self {
            repository,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    fn context(&self) -> OperationContext {
        OperationContext::with_timeout(self.operation_timeout)
    }

    #[instrument(skip(self, user))]
    pub async fn create_user(&self, user: User) -> UserResult<String> {
        self.repository.create(&self.context(), user).await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        self.repository.find_one(&self.context(), id).await
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all(&self.context()).await
    }

    /// Apply the present attributes of `user` to the user `id`.
    ///
    /// `id` always wins over any `id` carried in the body.
    #[instrument(skip(self, user))]
    pub async fn update_user(&self, id: &str, mut user: User) -> UserResult<()> {
        user.id = id.to_string();
        self.repository.update(&self.context(), user).await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        self.repository.delete(&self.context(), id).await
    }
}
