//! Session-backed todo store.
//!
//! # Responsibility
//! - Keep an owner's lists inside the caller-supplied session object.
//! - Seed that session from fixture data on first use.
//!
//! # Invariants
//! - Reads hand out clones; callers can never alias session internals.
//! - Writes mutate the session in place and report only success.
//! - Ids come from the injected `IdGenerator`, never from the session.
//!
//! Two requests mutating the same session concurrently are not serialized
//! here; the web layer is expected to hand a session to one request at a
//! time.

use crate::auth::password::{hash_password, verify_password};
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::store::ids::IdGenerator;
use crate::store::seed::seed_todo_lists;
use crate::store::sort::{sort_todo_lists, sort_todos};
use crate::store::{StoreResult, TodoStore};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-user session data owned by the web layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// `None` until a store seeds the session.
    pub todo_lists: Option<Vec<TodoList>>,
}

/// Credentials for session-backed deployments, keyed by username.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserTable {
    password_hashes: HashMap<String, String>,
}

impl MemoryUserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `password` and stores it for `username`.
    ///
    /// Returns `false` if the username is already taken.
    pub fn insert(&mut self, username: &str, password: &str) -> bool {
        self.insert_hash(username, hash_password(password))
    }

    /// Stores an already encoded hash for `username`.
    pub fn insert_hash(&mut self, username: &str, password_hash: String) -> bool {
        if self.password_hashes.contains_key(username) {
            return false;
        }
        self.password_hashes
            .insert(username.to_string(), password_hash);
        true
    }

    fn password_hash(&self, username: &str) -> Option<&str> {
        self.password_hashes.get(username).map(String::as_str)
    }
}

/// `TodoStore` over one session's lists.
pub struct MemoryTodoStore<'a> {
    todo_lists: &'a mut Vec<TodoList>,
    ids: &'a dyn IdGenerator,
    users: &'a MemoryUserTable,
}

impl<'a> MemoryTodoStore<'a> {
    /// Binds a store to `session`, seeding it when it holds no lists yet.
    pub fn new(
        session: &'a mut SessionState,
        ids: &'a dyn IdGenerator,
        users: &'a MemoryUserTable,
    ) -> Self {
        let todo_lists = session.todo_lists.get_or_insert_with(|| {
            debug!("event=session_seed module=store status=ok backend=memory");
            seed_todo_lists(ids)
        });
        Self {
            todo_lists,
            ids,
            users,
        }
    }

    fn find_todo_list(&self, todo_list_id: TodoListId) -> Option<&TodoList> {
        self.todo_lists
            .iter()
            .find(|todo_list| todo_list.id == todo_list_id)
    }

    fn find_todo_list_mut(&mut self, todo_list_id: TodoListId) -> Option<&mut TodoList> {
        self.todo_lists
            .iter_mut()
            .find(|todo_list| todo_list.id == todo_list_id)
    }

    fn find_todo_mut(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> Option<&mut Todo> {
        self.find_todo_list_mut(todo_list_id)?.find_todo_mut(todo_id)
    }

    fn title_taken(&self, title: &str, except: Option<TodoListId>) -> bool {
        self.todo_lists
            .iter()
            .any(|todo_list| todo_list.title == title && Some(todo_list.id) != except)
    }
}

impl TodoStore for MemoryTodoStore<'_> {
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        Ok(sort_todo_lists(self.todo_lists.clone()))
    }

    fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>> {
        Ok(sort_todos(todo_list.todos.clone()))
    }

    fn load_todo_list(&self, todo_list_id: TodoListId) -> StoreResult<Option<TodoList>> {
        Ok(self.find_todo_list(todo_list_id).cloned())
    }

    fn load_todo(&self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        Ok(self
            .find_todo_list(todo_list_id)
            .and_then(|todo_list| todo_list.find_todo(todo_id))
            .cloned())
    }

    fn toggle_done_todo(
        &mut self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> StoreResult<bool> {
        let Some(todo) = self.find_todo_mut(todo_list_id, todo_id) else {
            return Ok(false);
        };
        todo.done = !todo.done;
        Ok(true)
    }

    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> StoreResult<bool> {
        let Some(todo_list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        for todo in &mut todo_list.todos {
            todo.done = true;
        }
        Ok(true)
    }

    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> StoreResult<bool> {
        let id = self.ids.next_id();
        let Some(todo_list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        todo_list.todos.push(Todo::new(id, title));
        Ok(true)
    }

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let Some(todo_list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        let Some(index) = todo_list.todos.iter().position(|todo| todo.id == todo_id) else {
            return Ok(false);
        };
        todo_list.todos.remove(index);
        Ok(true)
    }

    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> StoreResult<bool> {
        let Some(index) = self
            .todo_lists
            .iter()
            .position(|todo_list| todo_list.id == todo_list_id)
        else {
            return Ok(false);
        };
        self.todo_lists.remove(index);
        Ok(true)
    }

    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        if self.title_taken(title, None) {
            info!("event=todolist_create module=store status=conflict backend=memory");
            return Ok(false);
        }
        self.todo_lists
            .push(TodoList::new(self.ids.next_id(), title));
        Ok(true)
    }

    fn set_todo_list_title(
        &mut self,
        todo_list_id: TodoListId,
        title: &str,
    ) -> StoreResult<bool> {
        if self.title_taken(title, Some(todo_list_id)) {
            info!("event=todolist_rename module=store status=conflict backend=memory");
            return Ok(false);
        }
        let Some(todo_list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        todo_list.title = title.to_string();
        Ok(true)
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        Ok(self.title_taken(title, None))
    }

    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        let Some(password_hash) = self.users.password_hash(username) else {
            return Ok(false);
        };
        Ok(verify_password(password, password_hash)?)
    }
}
