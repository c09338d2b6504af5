//! Todo list and todo records.
//!
//! # Responsibility
//! - Define the records returned by every `TodoStore` read.
//! - Provide completion helpers used by sorting and the web layer.
//!
//! # Invariants
//! - A list is done iff it has at least one todo and all todos are done.
//! - Empty lists are never done.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier for lists and todos.
pub type TodoListId = i64;
/// Store-assigned identifier for a todo inside its list.
pub type TodoId = i64;

/// Single actionable item inside a todo list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
}

impl Todo {
    /// Creates a not-done todo.
    pub fn new(id: TodoId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Titled, owner-scoped collection of todos.
///
/// `todos` keeps insertion order; sorted views come from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: TodoListId,
    pub title: String,
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: TodoListId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            todos: Vec::new(),
        }
    }

    /// Returns whether the list counts as completed.
    pub fn is_done(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(Todo::is_done)
    }

    /// Returns whether any todo still needs doing.
    pub fn has_undone_todos(&self) -> bool {
        self.todos.iter().any(|todo| !todo.done)
    }

    pub fn find_todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    pub fn find_todo_mut(&mut self, todo_id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}
