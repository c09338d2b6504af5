//! CLI smoke entry point.
//!
//! # Responsibility
//! - Resolve configuration and open the configured backend.
//! - Print a deterministic summary for quick local sanity checks.

use listkeeper_core::{core_version, init_logging, AppConfig, Backend, SessionState, TodoStore};
use log::error;
use std::process::ExitCode;

const PROBE_USER: &str = "probe";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_exit module=cli status=error");
            eprintln!("listkeeper: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = AppConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let backend = Backend::open(&config).map_err(|err| err.to_string())?;
    let mut session = SessionState::default();
    let store = backend.store(PROBE_USER, &mut session);
    let todo_lists = store.sorted_todo_lists().map_err(|err| err.to_string())?;
    let done = todo_lists.iter().filter(|list| list.is_done()).count();

    println!("listkeeper_core version={}", core_version());
    println!(
        "backend={} todolists={} done={}",
        backend.kind().as_str(),
        todo_lists.len(),
        done
    );
    Ok(())
}
