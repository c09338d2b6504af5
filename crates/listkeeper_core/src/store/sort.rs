//! Partitioned ordering shared by both backends.
//!
//! Not-done entries come first, done entries second. Inside each group the
//! order is case-insensitive by title, then by id.

use crate::model::todo::{Todo, TodoList};
use std::cmp::Ordering;

/// Orders lists as `[not-done.., done..]`.
pub fn sort_todo_lists(mut todo_lists: Vec<TodoList>) -> Vec<TodoList> {
    todo_lists.sort_by(|left, right| {
        left.is_done()
            .cmp(&right.is_done())
            .then_with(|| compare_titles(&left.title, &right.title))
            .then_with(|| left.id.cmp(&right.id))
    });
    todo_lists
}

/// Orders todos as `[not-done.., done..]`.
pub fn sort_todos(mut todos: Vec<Todo>) -> Vec<Todo> {
    todos.sort_by(|left, right| {
        left.done
            .cmp(&right.done)
            .then_with(|| compare_titles(&left.title, &right.title))
            .then_with(|| left.id.cmp(&right.id))
    });
    todos
}

// Full Unicode lowercase folding, so `É` and `é` compare equal.
fn compare_titles(left: &str, right: &str) -> Ordering {
    left.chars()
        .flat_map(char::to_lowercase)
        .cmp(right.chars().flat_map(char::to_lowercase))
}
