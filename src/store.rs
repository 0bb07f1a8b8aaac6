//! SQLite-backed task storage

use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::analysis::{analyze, Analysis};
use crate::error::{KarmaError, Result};
use crate::task::{NewTask, Task};

const SCHEMA_TASKS: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    task TEXT,
    time TEXT,
    date TEXT,
    repeat_daily INTEGER,
    status TEXT DEFAULT 'Pending'
)";
const INSERT_TASK: &str =
    "INSERT INTO tasks (task, time, date, repeat_daily) VALUES (?1, ?2, ?3, ?4)";
const SELECT_TASKS: &str = "SELECT id, task, time, date, repeat_daily, status FROM tasks";
const UPDATE_STATUS: &str = "UPDATE tasks SET status = ?1 WHERE id = ?2";

pub struct TaskStore {
    conn: Connection,
}

impl TaskStore {
    /// Open or create the task database at `path`.
    ///
    /// # Errors
    /// Returns an error if the parent directory or the database cannot be created
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened task database");
        Self::init(conn)
    }

    /// Create an in-memory database (for testing)
    ///
    /// # Errors
    /// Returns an error if the database cannot be created
    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(SCHEMA_TASKS, [])?;
        Ok(Self { conn })
    }

    /// Insert a task and return the stored row.
    ///
    /// Status is left to the column default.
    ///
    /// # Errors
    /// Returns an error if the insert fails
    pub fn add_task(&self, new_task: &NewTask) -> Result<Task> {
        self.conn.execute(
            INSERT_TASK,
            params![
                new_task.task(),
                new_task.time(),
                new_task.date(),
                new_task.repeat_daily()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, task = new_task.task(), "added task");

        self.get_task(id)?.ok_or(KarmaError::TaskNotFound(id))
    }

    /// # Errors
    /// Returns an error if the query fails
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_TASKS} ORDER BY id"))?;
        let rows = stmt.query_map([], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// # Errors
    /// Returns an error if the query fails
    pub fn get_task(&self, id: i64) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                &format!("{SELECT_TASKS} WHERE id = ?1"),
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    /// # Errors
    /// Returns an error if the query fails
    pub fn tasks_by_status(&self, status: &str) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_TASKS} WHERE status = ?1 ORDER BY id"))?;
        let rows = stmt.query_map(params![status], row_to_task)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// # Errors
    /// Returns `TaskNotFound` if no row has this id
    pub fn set_status(&self, id: i64, status: &str) -> Result<()> {
        let updated = self.conn.execute(UPDATE_STATUS, params![status, id])?;
        if updated == 0 {
            return Err(KarmaError::TaskNotFound(id));
        }
        info!(id, status, "updated task status");
        Ok(())
    }

    /// Read every task and summarize it.
    ///
    /// # Errors
    /// Returns an error if the tasks cannot be read
    pub fn analyze(&self) -> Result<Analysis> {
        Ok(analyze(&self.list_tasks()?))
    }
}

// Columns written by other tools may be NULL; read them as empty.
fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        task: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        time: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        date: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        repeat_daily: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
        status: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
    })
}
