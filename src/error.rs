use thiserror::Error;

pub type Result<T> = std::result::Result<T, KarmaError>;

#[derive(Error, Debug)]
pub enum KarmaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("task name cannot be empty")]
    EmptyTask,

    /// Time of day did not match `HH:MM`
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// Date did not match `YYYY-MM-DD`
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("task not found: {0}")]
    TaskNotFound(i64),
}
