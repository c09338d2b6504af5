//! Todo-list domain model.
//!
//! # Responsibility
//! - Define the list/todo shapes shared by every storage backend.
//! - Own the derived "done" rules so backends cannot drift apart.
//!
//! # Invariants
//! - Ids are assigned by the store and never reused while the entity exists.
//! - A list belongs to exactly one owner; a todo belongs to exactly one list.

pub mod todo;
