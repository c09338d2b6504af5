use listkeeper_core::auth::password::hash_password_with_iterations;
use listkeeper_core::db::open_db_in_memory;
use listkeeper_core::{
    register_user_with_hash, MemoryTodoStore, MemoryUserTable, SequentialIdGenerator,
    SessionState, SqliteTodoStore, TodoList, TodoStore,
};
use rusqlite::Connection;

const OWNER: &str = "alice";
const PASSWORD: &str = "s3cret";

/// Runs `check` against a sqlite store and an empty memory store, both
/// owned by `alice` with password `s3cret`.
fn for_each_backend(check: impl Fn(&mut dyn TodoStore)) {
    let conn = sqlite_with_owner();
    let mut sqlite = SqliteTodoStore::new(&conn, OWNER);
    check(&mut sqlite);

    let ids = SequentialIdGenerator::new();
    let mut users = MemoryUserTable::new();
    users.insert_hash(OWNER, hash_password_with_iterations(PASSWORD, 8));
    let mut session = SessionState {
        todo_lists: Some(Vec::new()),
    };
    let mut memory = MemoryTodoStore::new(&mut session, &ids, &users);
    check(&mut memory);
}

fn sqlite_with_owner() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let hash = hash_password_with_iterations(PASSWORD, 8);
    assert!(register_user_with_hash(&conn, OWNER, &hash).unwrap());
    conn
}

fn list_id(store: &dyn TodoStore, title: &str) -> i64 {
    store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .unwrap_or_else(|| panic!("list {title} should exist"))
        .id
}

fn todo_id(store: &dyn TodoStore, list_id: i64, title: &str) -> i64 {
    store
        .load_todo_list(list_id)
        .unwrap()
        .unwrap()
        .todos
        .into_iter()
        .find(|todo| todo.title == title)
        .unwrap_or_else(|| panic!("todo {title} should exist"))
        .id
}

fn titles(lists: &[TodoList]) -> Vec<&str> {
    lists.iter().map(|list| list.title.as_str()).collect()
}

#[test]
fn groceries_scenario_behaves_identically() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Groceries").unwrap());
        let groceries = list_id(store, "Groceries");

        assert!(store.create_todo(groceries, "Milk").unwrap());
        let milk = todo_id(store, groceries, "Milk");

        assert!(store.toggle_done_todo(groceries, milk).unwrap());
        let list = store.load_todo_list(groceries).unwrap().unwrap();
        let sorted = store.sorted_todos(&list).unwrap();
        assert!(sorted.iter().all(|todo| todo.done));
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].title, "Milk");
        assert!(list.is_done());

        assert!(store.complete_all_todos(groceries).unwrap());
        assert!(store.load_todo(groceries, milk).unwrap().unwrap().done);

        assert!(store.delete_todo_list(groceries).unwrap());
        assert!(store.load_todo_list(groceries).unwrap().is_none());
        assert!(store.load_todo(groceries, milk).unwrap().is_none());
    });
}

#[test]
fn sorted_todo_lists_partitions_done_after_not_done() {
    for_each_backend(|store| {
        for title in ["beta", "Alpha", "delta", "Charlie"] {
            assert!(store.create_todo_list(title).unwrap());
        }
        let alpha = list_id(store, "Alpha");
        let delta = list_id(store, "delta");
        let charlie = list_id(store, "Charlie");

        assert!(store.create_todo(alpha, "one").unwrap());
        assert!(store.complete_all_todos(alpha).unwrap());
        assert!(store.create_todo(delta, "two").unwrap());
        assert!(store.complete_all_todos(delta).unwrap());
        assert!(store.create_todo(charlie, "three").unwrap());

        let sorted = store.sorted_todo_lists().unwrap();
        assert_eq!(titles(&sorted), vec!["beta", "Charlie", "Alpha", "delta"]);
        assert_eq!(sorted, store.sorted_todo_lists().unwrap());
        assert_eq!(sorted[1].todos.len(), 1);
        assert!(sorted[2].is_done());
    });
}

#[test]
fn sorted_todos_orders_by_done_then_title_ignoring_case() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Chores").unwrap());
        let chores = list_id(store, "Chores");
        for title in ["vacuum", "Dust", "bins", "Laundry"] {
            assert!(store.create_todo(chores, title).unwrap());
        }
        let bins = todo_id(store, chores, "bins");
        let vacuum = todo_id(store, chores, "vacuum");
        assert!(store.toggle_done_todo(chores, bins).unwrap());
        assert!(store.toggle_done_todo(chores, vacuum).unwrap());

        let list = store.load_todo_list(chores).unwrap().unwrap();
        let sorted: Vec<(String, bool)> = store
            .sorted_todos(&list)
            .unwrap()
            .into_iter()
            .map(|todo| (todo.title, todo.done))
            .collect();
        assert_eq!(
            sorted,
            vec![
                ("Dust".to_string(), false),
                ("Laundry".to_string(), false),
                ("bins".to_string(), true),
                ("vacuum".to_string(), true),
            ]
        );
    });
}

#[test]
fn accented_titles_sort_ignoring_case() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Éz").unwrap());
        assert!(store.create_todo_list("éa").unwrap());
        let sorted = store.sorted_todo_lists().unwrap();
        assert_eq!(titles(&sorted), vec!["éa", "Éz"]);

        let ez = list_id(store, "Éz");
        assert!(store.create_todo(ez, "Éz").unwrap());
        assert!(store.create_todo(ez, "éa").unwrap());
        let list = store.load_todo_list(ez).unwrap().unwrap();
        let todo_titles: Vec<String> = store
            .sorted_todos(&list)
            .unwrap()
            .into_iter()
            .map(|todo| todo.title)
            .collect();
        assert_eq!(todo_titles, vec!["éa", "Éz"]);
    });
}

#[test]
fn toggle_is_its_own_inverse() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Inbox").unwrap());
        let inbox = list_id(store, "Inbox");
        assert!(store.create_todo(inbox, "reply").unwrap());
        let reply = todo_id(store, inbox, "reply");

        let before = store.load_todo(inbox, reply).unwrap().unwrap();
        assert!(store.toggle_done_todo(inbox, reply).unwrap());
        assert!(store.toggle_done_todo(inbox, reply).unwrap());
        assert_eq!(store.load_todo(inbox, reply).unwrap().unwrap(), before);
    });
}

#[test]
fn missing_entities_report_false_or_none() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Real").unwrap());
        let real = list_id(store, "Real");
        let missing_list = real + 1000;

        assert!(store.load_todo_list(missing_list).unwrap().is_none());
        assert!(store.load_todo(real, 4242).unwrap().is_none());
        assert!(!store.toggle_done_todo(real, 4242).unwrap());
        assert!(!store.toggle_done_todo(missing_list, 1).unwrap());
        assert!(!store.complete_all_todos(missing_list).unwrap());
        assert!(!store.create_todo(missing_list, "lost").unwrap());
        assert!(!store.delete_todo(real, 4242).unwrap());
        assert!(!store.delete_todo_list(missing_list).unwrap());
        assert!(!store.set_todo_list_title(missing_list, "Renamed").unwrap());
        assert!(store.load_todo_list(real).unwrap().unwrap().todos.is_empty());
    });
}

#[test]
fn complete_all_succeeds_without_changes() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Empty").unwrap());
        let empty = list_id(store, "Empty");
        assert!(store.complete_all_todos(empty).unwrap());
        assert!(!store.load_todo_list(empty).unwrap().unwrap().is_done());
    });
}

#[test]
fn duplicate_list_title_is_rejected_without_changes() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Work").unwrap());
        assert!(!store.create_todo_list("Work").unwrap());
        assert_eq!(store.sorted_todo_lists().unwrap().len(), 1);

        assert!(store.exists_todo_list_title("Work").unwrap());
        assert!(!store.exists_todo_list_title("work").unwrap());
        assert!(store.create_todo_list("work").unwrap());
    });
}

#[test]
fn rename_updates_title_and_respects_uniqueness() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Draft").unwrap());
        assert!(store.create_todo_list("Final").unwrap());
        let draft = list_id(store, "Draft");

        assert!(!store.set_todo_list_title(draft, "Final").unwrap());
        assert!(store.set_todo_list_title(draft, "Draft").unwrap());
        assert!(store.set_todo_list_title(draft, "Published").unwrap());

        assert_eq!(
            store.load_todo_list(draft).unwrap().unwrap().title,
            "Published"
        );
        assert!(!store.exists_todo_list_title("Draft").unwrap());
    });
}

#[test]
fn delete_todo_removes_only_that_todo() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("Trip").unwrap());
        let trip = list_id(store, "Trip");
        assert!(store.create_todo(trip, "tickets").unwrap());
        assert!(store.create_todo(trip, "hotel").unwrap());
        let tickets = todo_id(store, trip, "tickets");

        assert!(store.delete_todo(trip, tickets).unwrap());
        assert!(!store.delete_todo(trip, tickets).unwrap());

        let remaining = store.load_todo_list(trip).unwrap().unwrap().todos;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].title, "hotel");
    });
}

#[test]
fn created_ids_are_distinct() {
    for_each_backend(|store| {
        assert!(store.create_todo_list("One").unwrap());
        assert!(store.create_todo_list("Two").unwrap());
        let one = list_id(store, "One");
        let two = list_id(store, "Two");
        assert_ne!(one, two);

        assert!(store.create_todo(one, "a").unwrap());
        assert!(store.create_todo(one, "a").unwrap());
        let todos = store.load_todo_list(one).unwrap().unwrap().todos;
        assert_eq!(todos.len(), 2);
        assert_ne!(todos[0].id, todos[1].id);
        assert!(todos.iter().all(|todo| !todo.done));
    });
}

#[test]
fn authenticate_hides_which_credential_failed() {
    for_each_backend(|store| {
        assert!(store.authenticate(OWNER, PASSWORD).unwrap());
        assert!(!store.authenticate(OWNER, "wrongpass").unwrap());
        assert!(!store.authenticate("ghost", "anything").unwrap());
    });
}
