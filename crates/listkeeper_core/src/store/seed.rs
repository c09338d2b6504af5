//! First-run fixture data for session-backed stores.

use crate::model::todo::{Todo, TodoList};
use crate::store::ids::IdGenerator;

const SEED_LISTS: &[(&str, &[(&str, bool)])] = &[
    (
        "Work Todos",
        &[
            ("Get coffee", true),
            ("Chat with co-workers", true),
            ("Duck out of meeting", false),
        ],
    ),
    (
        "Home Todos",
        &[
            ("Feed the cats", true),
            ("Go to bed", true),
            ("Buy milk", true),
            ("Study for Launch School", true),
        ],
    ),
    ("Additional Todos", &[]),
    ("social todos", &[("Go to Libby's birthday party", false)]),
];

/// Builds the default lists with fresh ids from `ids`.
pub fn seed_todo_lists(ids: &dyn IdGenerator) -> Vec<TodoList> {
    SEED_LISTS
        .iter()
        .map(|(title, todos)| {
            let mut todo_list = TodoList::new(ids.next_id(), *title);
            todo_list.todos = todos
                .iter()
                .map(|(todo_title, done)| {
                    let mut todo = Todo::new(ids.next_id(), *todo_title);
                    todo.done = *done;
                    todo
                })
                .collect();
            todo_list
        })
        .collect()
}
