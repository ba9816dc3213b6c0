//! Users Domain
//!
//! CRUD for users persisted as MongoDB documents.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Per-request deadline
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Id codec, document mapping, error taxonomy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │DocumentStore│  ← MongoDB collection or in-memory
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{MongoUserRepository, UserService, handlers};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ::mongodb::Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("app");
//!
//! let repository = MongoUserRepository::new(&db);
//! let service = UserService::new(repository);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod context;
mod document;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod object_id;
pub mod repository;
pub mod service;
pub mod store;

// Re-export commonly used types
pub use context::{Interrupted, OperationContext};
pub use error::{ErrorKind, Operation, UserError, UserResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryDocumentStore;
pub use models::{CreatedUser, User};
pub use mongodb::{DocumentUserRepository, InMemoryUserRepository, MongoUserRepository};
pub use object_id::InvalidIdentifier;
pub use repository::UserRepository;
pub use service::UserService;
pub use store::{DocumentStore, StoreError, UpdateOutcome};
