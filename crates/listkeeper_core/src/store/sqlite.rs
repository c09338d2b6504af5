//! SQLite-backed todo store.
//!
//! # Responsibility
//! - Translate every `TodoStore` operation into parameterized SQL.
//! - Own user registration and credential lookup on the `users` table.
//!
//! # Invariants
//! - Every statement filters on `username = <owner>`.
//! - List deletion relies on the `todos.todolist_id` cascade; todos are never
//!   deleted explicitly.
//! - Title ordering is applied by `store::sort` after loading; SQLite's
//!   `NOCASE` only folds ASCII.
//! - Duplicate titles are detected from SQLite's structured constraint code
//!   and reported as `false`; every other fault propagates.

use crate::auth::password::{hash_password, verify_password};
use crate::db::is_unique_violation;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::store::sort::{sort_todo_lists, sort_todos};
use crate::store::{StoreError, StoreResult, TodoStore};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const TODO_COLUMNS: &str = "id, todolist_id, title, done";

/// `TodoStore` over the `todolists`/`todos` tables for one owner.
pub struct SqliteTodoStore<'conn> {
    conn: &'conn Connection,
    username: String,
}

impl<'conn> SqliteTodoStore<'conn> {
    /// Binds a store to `conn` for the authenticated `username`.
    pub fn new(conn: &'conn Connection, username: impl Into<String>) -> Self {
        Self {
            conn,
            username: username.into(),
        }
    }

    fn todo_list_exists(&self, todo_list_id: TodoListId) -> StoreResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM todolists WHERE id = ?1 AND username = ?2
            );",
            params![todo_list_id, self.username],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Runs a title-writing statement, mapping `UNIQUE` rejections to `false`.
    fn write_title(
        &self,
        event: &str,
        sql: &str,
        values: impl rusqlite::Params,
    ) -> StoreResult<bool> {
        match self.conn.execute(sql, values) {
            Ok(changed) => Ok(changed > 0),
            Err(err) if is_unique_violation(&err) => {
                info!("event={event} module=store status=conflict backend=sqlite");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl TodoStore for SqliteTodoStore<'_> {
    fn sorted_todo_lists(&self) -> StoreResult<Vec<TodoList>> {
        let mut list_stmt = self.conn.prepare(
            "SELECT id, title FROM todolists
             WHERE username = ?1
             ORDER BY id ASC;",
        )?;
        let mut todo_lists = list_stmt
            .query_map([&self.username], |row| {
                Ok(TodoList::new(row.get("id")?, row.get::<_, String>("title")?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut todo_stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE username = ?1
             ORDER BY id ASC;"
        ))?;
        let mut rows = todo_stmt.query([&self.username])?;
        let mut todos_by_list: HashMap<TodoListId, Vec<Todo>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let todo_list_id: TodoListId = row.get("todolist_id")?;
            todos_by_list
                .entry(todo_list_id)
                .or_default()
                .push(parse_todo_row(row)?);
        }

        for todo_list in &mut todo_lists {
            todo_list.todos = todos_by_list.remove(&todo_list.id).unwrap_or_default();
        }

        Ok(sort_todo_lists(todo_lists))
    }

    fn sorted_todos(&self, todo_list: &TodoList) -> StoreResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE todolist_id = ?1 AND username = ?2
             ORDER BY done ASC, id ASC;"
        ))?;
        let mut rows = stmt.query(params![todo_list.id, self.username])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(sort_todos(todos))
    }

    fn load_todo_list(&self, todo_list_id: TodoListId) -> StoreResult<Option<TodoList>> {
        let todo_list = self
            .conn
            .query_row(
                "SELECT id, title FROM todolists WHERE id = ?1 AND username = ?2;",
                params![todo_list_id, self.username],
                |row| Ok(TodoList::new(row.get("id")?, row.get::<_, String>("title")?)),
            )
            .optional()?;
        let Some(mut todo_list) = todo_list else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE todolist_id = ?1 AND username = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![todo_list_id, self.username])?;
        while let Some(row) = rows.next()? {
            todo_list.todos.push(parse_todo_row(row)?);
        }

        Ok(Some(todo_list))
    }

    fn load_todo(&self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS} FROM todos
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;"
        ))?;
        let mut rows = stmt.query(params![todo_list_id, todo_id, self.username])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }

    fn toggle_done_todo(
        &mut self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET done = NOT done
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![todo_list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> StoreResult<bool> {
        if !self.todo_list_exists(todo_list_id)? {
            return Ok(false);
        }

        let changed = self.conn.execute(
            "UPDATE todos
             SET done = 1
             WHERE todolist_id = ?1 AND username = ?2 AND done = 0;",
            params![todo_list_id, self.username],
        )?;
        debug!("event=todos_complete_all module=store status=ok backend=sqlite changed={changed}");
        Ok(true)
    }

    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> StoreResult<bool> {
        // Selecting through todolists keeps foreign list ids at zero rows.
        let changed = self.conn.execute(
            "INSERT INTO todos (todolist_id, title, username)
             SELECT id, ?2, username FROM todolists
             WHERE id = ?1 AND username = ?3;",
            params![todo_list_id, title, self.username],
        )?;
        Ok(changed > 0)
    }

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todos WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![todo_list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todolists WHERE id = ?1 AND username = ?2;",
            params![todo_list_id, self.username],
        )?;
        debug!("event=todolist_delete module=store status=ok backend=sqlite changed={changed}");
        Ok(changed > 0)
    }

    fn create_todo_list(&mut self, title: &str) -> StoreResult<bool> {
        self.write_title(
            "todolist_create",
            "INSERT INTO todolists (title, username) VALUES (?1, ?2);",
            params![title, self.username],
        )
    }

    fn set_todo_list_title(
        &mut self,
        todo_list_id: TodoListId,
        title: &str,
    ) -> StoreResult<bool> {
        self.write_title(
            "todolist_rename",
            "UPDATE todolists SET title = ?1 WHERE id = ?2 AND username = ?3;",
            params![title, todo_list_id, self.username],
        )
    }

    fn exists_todo_list_title(&self, title: &str) -> StoreResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM todolists WHERE title = ?1 AND username = ?2
            );",
            params![title, self.username],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn authenticate(&self, username: &str, password: &str) -> StoreResult<bool> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT password FROM users WHERE username = ?1;",
                [username],
                |row| row.get(0),
            )
            .optional()?;
        let Some(password_hash) = stored else {
            info!("event=authenticate module=store status=rejected backend=sqlite");
            return Ok(false);
        };

        let verified = verify_password(password, &password_hash)?;
        if !verified {
            info!("event=authenticate module=store status=rejected backend=sqlite");
        }
        Ok(verified)
    }
}

/// Hashes `password` and inserts a `users` row.
///
/// Returns `false` if `username` is already registered.
pub fn register_user(conn: &Connection, username: &str, password: &str) -> StoreResult<bool> {
    register_user_with_hash(conn, username, &hash_password(password))
}

/// Inserts a `users` row with an already encoded password hash.
pub fn register_user_with_hash(
    conn: &Connection,
    username: &str,
    password_hash: &str,
) -> StoreResult<bool> {
    let changed = conn.execute(
        "INSERT INTO users (username, password) VALUES (?1, ?2)
         ON CONFLICT (username) DO NOTHING;",
        params![username, password_hash],
    )?;
    Ok(changed > 0)
}

fn parse_todo_row(row: &Row<'_>) -> StoreResult<Todo> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        done,
    })
}
