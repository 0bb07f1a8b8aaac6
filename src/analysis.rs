//! Completion report over the stored tasks.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::task::Task;

/// Shown in place of a most common time when nothing is pending.
pub const NO_TIME: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Names of pending tasks, oldest first.
    pub incomplete_tasks: Vec<String>,
    /// Mode of `time` among pending tasks.
    pub most_common_time: Option<String>,
    pub status_counts: BTreeMap<String, usize>,
}

impl Analysis {
    pub fn most_common_time_label(&self) -> &str {
        self.most_common_time.as_deref().unwrap_or(NO_TIME)
    }

    pub fn incomplete_label(&self) -> String {
        if self.incomplete_tasks.is_empty() {
            "None".to_string()
        } else {
            self.incomplete_tasks.join(", ")
        }
    }

    pub fn status_counts_label(&self) -> String {
        let counts: Vec<String> = self
            .status_counts
            .iter()
            .map(|(status, count)| format!("'{status}': {count}"))
            .collect();
        format!("{{{}}}", counts.join(", "))
    }

    /// Report lines, one per line of the analysis screen.
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Most Incomplete Tasks: {}", self.incomplete_label()),
            format!("Most Problematic Time: {}", self.most_common_time_label()),
            format!("Status Counts: {}", self.status_counts_label()),
        ]
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis Report:")?;
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Summarize `tasks`, which are expected in id order.
pub fn analyze(tasks: &[Task]) -> Analysis {
    let mut status_counts = BTreeMap::new();
    for task in tasks {
        *status_counts.entry(task.status.clone()).or_insert(0) += 1;
    }

    let pending: Vec<&Task> = tasks.iter().filter(|t| t.is_pending()).collect();
    let incomplete_tasks = pending.iter().map(|t| t.task.clone()).collect();
    let most_common_time = mode(pending.iter().map(|t| t.time.as_str()));

    Analysis {
        incomplete_tasks,
        most_common_time,
        status_counts,
    }
}

// Ties go to the value seen first.
fn mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for value in order {
        let count = counts[value];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::TaskStore;
    use crate::task::{NewTask, COMPLETED, PENDING};

    fn task(id: i64, name: &str, time: &str, status: &str) -> Task {
        Task {
            id,
            task: name.to_string(),
            time: time.to_string(),
            date: "2024-05-01".to_string(),
            repeat_daily: false,
            status: status.to_string(),
        }
    }

    #[test]
    fn counts_statuses_and_finds_pending_time_mode() {
        let tasks = vec![
            task(1, "Run", "07:00", PENDING),
            task(2, "Read", "21:00", PENDING),
            task(3, "Cook", "19:00", COMPLETED),
            task(4, "Call mom", "21:00", PENDING),
            task(5, "Pay rent", "19:00", COMPLETED),
            task(6, "Stretch", "19:00", COMPLETED),
        ];

        let report = analyze(&tasks);

        assert_eq!(report.status_counts.get(PENDING), Some(&3));
        assert_eq!(report.status_counts.get(COMPLETED), Some(&3));
        assert_eq!(report.status_counts.len(), 2);
        assert_eq!(report.incomplete_tasks, vec!["Run", "Read", "Call mom"]);
        // 19:00 is the overall mode but only pending rows count.
        assert_eq!(report.most_common_time.as_deref(), Some("21:00"));
    }

    #[test]
    fn empty_input_reports_sentinel() {
        let report = analyze(&[]);
        assert!(report.incomplete_tasks.is_empty());
        assert!(report.status_counts.is_empty());
        assert_eq!(report.most_common_time, None);
        assert_eq!(report.most_common_time_label(), NO_TIME);
        assert_eq!(report.incomplete_label(), "None");
    }

    #[test]
    fn nothing_pending_reports_sentinel() {
        let report = analyze(&[task(1, "Done", "08:00", COMPLETED)]);
        assert!(report.incomplete_tasks.is_empty());
        assert_eq!(report.most_common_time_label(), NO_TIME);
        assert_eq!(report.status_counts.get(COMPLETED), Some(&1));
    }

    #[test]
    fn tied_times_resolve_to_first_seen() {
        let tasks = vec![
            task(1, "a", "10:00", PENDING),
            task(2, "b", "08:00", PENDING),
            task(3, "c", "08:00", PENDING),
            task(4, "d", "10:00", PENDING),
        ];
        assert_eq!(analyze(&tasks).most_common_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn unknown_statuses_are_counted_but_not_incomplete() {
        let tasks = vec![task(1, "a", "10:00", "Skipped"), task(2, "b", "11:00", PENDING)];
        let report = analyze(&tasks);
        assert_eq!(report.status_counts.get("Skipped"), Some(&1));
        assert_eq!(report.incomplete_tasks, vec!["b"]);
    }

    #[test]
    fn report_lines_render_labels() {
        let report = analyze(&[
            task(1, "Run", "07:00", PENDING),
            task(2, "Cook", "19:00", COMPLETED),
        ]);
        assert_eq!(
            report.lines(),
            [
                "Most Incomplete Tasks: Run".to_string(),
                "Most Problematic Time: 07:00".to_string(),
                "Status Counts: {'Completed': 1, 'Pending': 1}".to_string(),
            ]
        );
    }

    #[test]
    fn store_analysis_reads_all_rows() {
        let store = TaskStore::in_memory().unwrap();
        let empty = store.analyze().unwrap();
        assert!(empty.incomplete_tasks.is_empty());
        assert_eq!(empty.most_common_time_label(), NO_TIME);

        for (name, time) in [("Run", "07:00"), ("Swim", "07:00"), ("Nap", "14:00")] {
            store
                .add_task(&NewTask::new(name, time, "2024-05-01", true).unwrap())
                .unwrap();
        }
        let nap = store.tasks_by_status(PENDING).unwrap()[2].id;
        store.set_status(nap, COMPLETED).unwrap();

        let report = store.analyze().unwrap();
        assert_eq!(report.incomplete_tasks, vec!["Run", "Swim"]);
        assert_eq!(report.most_common_time.as_deref(), Some("07:00"));
        assert_eq!(report.status_counts.get(PENDING), Some(&2));
        assert_eq!(report.status_counts.get(COMPLETED), Some(&1));
    }
}
