//! Todo store contract and its backends.
//!
//! # Responsibility
//! - Define the owner-scoped data-access contract (`TodoStore`).
//! - Provide relational (SQLite) and session-backed implementations.
//!
//! # Invariants
//! - Every store is bound to one owner at construction; no operation may
//!   observe or mutate another owner's data.
//! - Missing entities and duplicate titles are reported as `false`/`None`.
//!   Only storage faults become `Err`.

use crate::auth::password::PasswordHashError;
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod backend;
pub mod ids;
pub mod memory;
pub mod seed;
pub mod sort;
pub mod sqlite;

pub type StoreResult<T> = Result<T, StoreError>;

/// Fault raised by a store operation.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PasswordHashError> for StoreError {
    fn from(value: PasswordHashError) -> Self {
        Self::InvalidData(value.to_string())
    }
}

/// Owner-scoped todo persistence shared by every backend.
pub trait TodoStore {
    /// All of the owner's lists with todos attached: not-done lists first,
    /// then done lists, each group ordered case-insensitively by title.
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>>;
    /// Todos of `todo_list`: not-done first, then done, each group ordered
    /// case-insensitively by title.
    fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>>;
    fn load_todo_list(&self, todo_list_id: TodoListId) -> StoreResult<Option<TodoList>>;
    fn load_todo(&self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>>;
    /// Flips `done`; `false` when the list or todo does not exist.
    fn toggle_done_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId)
        -> StoreResult<bool>;
    /// Marks every todo done; `true` whenever the list exists.
    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> StoreResult<bool>;
    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> StoreResult<bool>;
    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool>;
    /// Removes the list together with all of its todos.
    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> StoreResult<bool>;
    /// `false` when the owner already has a list titled exactly `title`.
    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool>;
    /// `false` when the list is missing or another list already uses `title`.
    fn set_todo_list_title(&mut self, todo_list_id: TodoListId, title: &str)
        -> StoreResult<bool>;
    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool>;
    /// `true` iff `username` exists and `password` matches its stored hash.
    ///
    /// Unknown users and wrong passwords are indistinguishable.
    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool>;
}
