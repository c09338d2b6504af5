//! Startup-time backend selection.
//!
//! # Responsibility
//! - Build the configured backend once per process.
//! - Hand out per-request `TodoStore`s bound to one owner.
//!
//! # Invariants
//! - The backend kind never changes after `Backend::open`.
//! - Sqlite stores ignore the session; memory stores ignore the username,
//!   because a session already belongs to a single user.

use crate::config::{AppConfig, BackendKind};
use crate::db::{open_db, open_db_in_memory};
use crate::store::ids::{IdGenerator, SequentialIdGenerator};
use crate::store::memory::{MemoryTodoStore, MemoryUserTable, SessionState};
use crate::store::sqlite::{register_user, SqliteTodoStore};
use crate::store::{StoreResult, TodoStore};
use log::info;
use rusqlite::Connection;

/// Process-wide state for session-backed stores.
pub struct MemoryBackend {
    ids: Box<dyn IdGenerator>,
    users: MemoryUserTable,
}

impl MemoryBackend {
    pub fn new(ids: Box<dyn IdGenerator>) -> Self {
        Self {
            ids,
            users: MemoryUserTable::new(),
        }
    }

    pub fn users_mut(&mut self) -> &mut MemoryUserTable {
        &mut self.users
    }

    /// Binds a store to one session.
    pub fn store<'a>(&'a self, session: &'a mut SessionState) -> MemoryTodoStore<'a> {
        MemoryTodoStore::new(session, self.ids.as_ref(), &self.users)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Box::new(SequentialIdGenerator::new()))
    }
}

/// Storage backend chosen at startup.
pub enum Backend {
    Sqlite(Connection),
    Memory(MemoryBackend),
}

impl Backend {
    /// Opens the backend named by `config`.
    ///
    /// A sqlite backend without `db_path` uses a private in-memory database.
    pub fn open(config: &AppConfig) -> StoreResult<Self> {
        let backend = match config.backend {
            BackendKind::Sqlite => {
                let conn = match &config.db_path {
                    Some(path) => open_db(path)?,
                    None => open_db_in_memory()?,
                };
                Self::Sqlite(conn)
            }
            BackendKind::Memory => Self::Memory(MemoryBackend::default()),
        };
        info!(
            "event=backend_open module=store status=ok backend={}",
            backend.kind().as_str()
        );
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Sqlite(_) => BackendKind::Sqlite,
            Self::Memory(_) => BackendKind::Memory,
        }
    }

    /// Returns a store scoped to `username` for one request.
    pub fn store<'a>(
        &'a self,
        username: &str,
        session: &'a mut SessionState,
    ) -> Box<dyn TodoStore + 'a> {
        match self {
            Self::Sqlite(conn) => Box::new(SqliteTodoStore::new(conn, username)),
            Self::Memory(memory) => Box::new(memory.store(session)),
        }
    }

    /// Registers a user with the backend's credential storage.
    ///
    /// Returns `false` if the username is taken.
    pub fn register_user(&mut self, username: &str, password: &str) -> StoreResult<bool> {
        match self {
            Self::Sqlite(conn) => register_user(conn, username, password),
            Self::Memory(memory) => Ok(memory.users_mut().insert(username, password)),
        }
    }
}
