use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KarmaError, Result};

pub const PENDING: &str = "Pending";
pub const COMPLETED: &str = "Completed";

pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: i64,
    pub task: String,
    pub time: String,
    pub date: String,
    pub repeat_daily: bool,
    pub status: String, // "Pending", "Completed"
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == PENDING
    }

    /// Status the task moves to when toggled from the task list.
    pub fn toggled_status(&self) -> &'static str {
        if self.is_pending() {
            COMPLETED
        } else {
            PENDING
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Task: {}, Time: {}, Date: {}, Repeat Daily: {}, Status: {}",
            self.task,
            self.time,
            self.date,
            if self.repeat_daily { "Yes" } else { "No" },
            self.status
        )
    }
}

/// A task as submitted by the user, before the store assigns it an id.
///
/// Only constructible through [`NewTask::new`], so anything reaching the
/// store has a non-blank name and well-formed time and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    task: String,
    time: String,
    date: String,
    repeat_daily: bool,
}

impl NewTask {
    /// Validate and normalize user input.
    ///
    /// # Errors
    /// Returns `EmptyTask`, `InvalidTime` or `InvalidDate` for malformed input
    pub fn new(task: &str, time: &str, date: &str, repeat_daily: bool) -> Result<Self> {
        let task = task.trim();
        if task.is_empty() {
            return Err(KarmaError::EmptyTask);
        }

        let time = time.trim();
        let parsed_time = NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| KarmaError::InvalidTime(time.to_string()))?;

        let date = date.trim();
        let parsed_date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| KarmaError::InvalidDate(date.to_string()))?;

        Ok(Self {
            task: task.to_string(),
            time: parsed_time.format(TIME_FORMAT).to_string(),
            date: parsed_date.format(DATE_FORMAT).to_string(),
            repeat_daily,
        })
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn repeat_daily(&self) -> bool {
        self.repeat_daily
    }
}
