//! Persistence core for the Listkeeper todo-list application.
//!
//! Two interchangeable backends, SQLite and session-backed memory, implement
//! the owner-scoped `TodoStore` contract.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod store;

pub use auth::password::{hash_password, verify_password, PasswordHashError};
pub use config::{AppConfig, BackendKind, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::todo::{Todo, TodoId, TodoList, TodoListId};
pub use store::backend::{Backend, MemoryBackend};
pub use store::ids::{IdGenerator, SequentialIdGenerator};
pub use store::memory::{MemoryTodoStore, MemoryUserTable, SessionState};
pub use store::sqlite::{register_user, register_user_with_hash, SqliteTodoStore};
pub use store::{StoreError, StoreResult, TodoStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
