//! Sequential demonstration of the task store.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the file-backed store.
//! - Walk through save, fetch, update, delete and delete-all in order,
//!   printing the collection after every step.

use log::error;
use serde_json::json;
use std::error::Error;
use std::process::ExitCode;
use taskstore_core::db::open_db;
use taskstore_core::{
    init_logging, SqliteTaskRepository, Task, TaskRepository, TaskService, TaskStoreConfig,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=demo_run module=cli status=error error={err}");
            eprintln!("taskstore demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = TaskStoreConfig::from_env()?;
    let log_dir = config.log_dir.to_string_lossy();
    init_logging(config.log_level, &log_dir)?;

    println!(
        "taskstore_core version={} db={}",
        taskstore_core::core_version(),
        config.db_path.display()
    );

    let conn = open_db(&config.db_path)?;
    let service = TaskService::new(SqliteTaskRepository::try_new(&conn)?);

    service.clear_tasks()?;
    print_step("cleared", &service)?;

    service.create_task(1234, "Core data", "first class with an embedded store")?;
    service.create_task(100, "Groceries", "milk, eggs")?;
    service.create_task(200, "Laundry", "whites only")?;
    print_step("saved", &service)?;

    service.update_task(1234, &Task::new(1234, "Core data", "second class: updates"))?;
    print_step("updated 1234", &service)?;

    service.delete_task(200)?;
    print_step("deleted 200", &service)?;

    if let Err(err) = service.delete_task(200) {
        println!("delete 200 again: {err}");
    }

    service.clear_tasks()?;
    print_step("deleted all", &service)?;

    Ok(())
}

fn print_step<R: TaskRepository>(
    label: &str,
    service: &TaskService<R>,
) -> Result<(), Box<dyn Error>> {
    let tasks = service.list_tasks()?;
    let snapshot = json!({ "step": label, "count": tasks.len(), "tasks": tasks });
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
