//! Users API routes
//!
//! This module wires up the users domain to HTTP routes.

use axum::Router;
use domain_users::{MongoUserRepository, UserService, handlers};

use crate::state::AppState;

/// Create users router
pub fn router(state: &AppState) -> Router {
    let users = &state.config.users;

    let repository = MongoUserRepository::with_collection(&state.db, &users.collection);
    let service = UserService::new(repository).with_operation_timeout(users.operation_timeout);

    handlers::router(service)
}
