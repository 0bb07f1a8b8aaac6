//! karma: a personal to-do list backed by SQLite, with a terminal UI.

pub mod analysis;
pub mod app;
pub mod config;
pub mod error;
pub mod store;
pub mod task;
pub mod ui;

pub use analysis::Analysis;
pub use config::Config;
pub use error::{KarmaError, Result};
pub use store::TaskStore;
pub use task::{NewTask, Task};
