//! Task list filtering.

use crate::models::{Priority, Task};
use serde::Serialize;

/// Completion status filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "pending" => Some(StatusFilter::Pending),
            "completed" | "done" => Some(StatusFilter::Completed),
            _ => None,
        }
    }

    fn matches(&self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !completed,
            StatusFilter::Completed => completed,
        }
    }
}

/// Conjunction of status, category, priority, and free-text predicates.
///
/// A `None` predicate matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub category: Option<i64>,
    pub priority: Option<Priority>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn category(mut self, category: Option<i64>) -> Self {
        self.category = category;
        self
    }

    pub fn priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    /// Blank search text is treated as no search.
    pub fn search(mut self, text: Option<&str>) -> Self {
        self.search = text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);
        self
    }

    /// True when no predicate narrows the list.
    pub fn is_empty(&self) -> bool {
        self.status == StatusFilter::All
            && self.category.is_none()
            && self.priority.is_none()
            && self.search.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task.completed)
            && self.category.is_none_or(|id| task.category_id == Some(id))
            && self.priority.is_none_or(|p| task.priority == p)
            && self.search.as_deref().is_none_or(|needle| {
                let needle = needle.to_lowercase();
                task.title.to_lowercase().contains(&needle)
                    || task
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
    }

    /// Matching tasks, in input order.
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: None,
            completed,
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            due_at: None,
            priority: Priority::Medium,
            owner_id: Some(5),
            category_id: None,
            category_name: None,
        }
    }

    fn ids(tasks: Vec<&Task>) -> Vec<i64> {
        tasks.into_iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_status_filter() {
        let tasks = vec![task(1, "Buy milk", false), task(2, "Pay rent", true)];

        let pending = TaskFilter::new().status(StatusFilter::Pending);
        assert_eq!(ids(pending.apply(&tasks)), vec![1]);

        let completed = TaskFilter::new().status(StatusFilter::Completed);
        assert_eq!(ids(completed.apply(&tasks)), vec![2]);

        assert_eq!(ids(TaskFilter::new().apply(&tasks)), vec![1, 2]);
        assert_eq!(StatusFilter::parse("Done"), Some(StatusFilter::Completed));
        assert_eq!(StatusFilter::parse("someday"), None);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let mut rent = task(2, "Pay rent", false);
        rent.description = Some("Transfer to LANDLORD".to_string());
        let tasks = vec![task(1, "Buy milk", false), rent];

        assert_eq!(ids(TaskFilter::new().search(Some("MILK")).apply(&tasks)), vec![1]);
        assert_eq!(ids(TaskFilter::new().search(Some("landlord")).apply(&tasks)), vec![2]);
        assert_eq!(ids(TaskFilter::new().search(Some("   ")).apply(&tasks)), vec![1, 2]);
    }

    #[test]
    fn test_predicates_combine() {
        let mut a = task(1, "Clean kitchen", false);
        a.category_id = Some(2);
        a.priority = Priority::High;
        let mut b = task(2, "Clean garage", false);
        b.category_id = Some(2);
        let mut c = task(3, "Clean desk", true);
        c.category_id = Some(3);
        c.priority = Priority::High;
        let tasks = vec![a, b, c];

        let filter = TaskFilter::new()
            .status(StatusFilter::Pending)
            .category(Some(2))
            .priority(Some(Priority::High))
            .search(Some("clean"));
        assert_eq!(ids(filter.apply(&tasks)), vec![1]);
        assert!(!filter.is_empty());

        assert_eq!(ids(TaskFilter::new().category(Some(3)).apply(&tasks)), vec![3]);
        assert!(TaskFilter::new().is_empty());
    }
}
