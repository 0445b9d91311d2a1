//! Dashboard statistics.

use crate::models::Task;
use chrono::{Days, NaiveDate};
use serde::Serialize;

/// Days ahead (inclusive) that count as "due soon".
pub const DUE_SOON_DAYS: u64 = 3;

/// Number of recent tasks shown.
pub const RECENT_TASKS: usize = 5;

/// Summary of one user's tasks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Pending tasks due between today and today + [`DUE_SOON_DAYS`]
    pub due_soon: usize,
    /// Rounded; 0 when there are no tasks
    pub completion_percent: u32,
    /// Newest first, at most [`RECENT_TASKS`]
    pub recent: Vec<Task>,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let horizon = today
            .checked_add_days(Days::new(DUE_SOON_DAYS))
            .unwrap_or(NaiveDate::MAX);
        let due_soon = tasks
            .iter()
            .filter(|t| !t.completed)
            .filter_map(|t| t.due_at)
            .filter(|due| (today..=horizon).contains(due))
            .count();

        let mut recent: Vec<Task> = tasks.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(RECENT_TASKS);

        Self {
            total,
            pending: total - completed,
            completed,
            due_soon,
            completion_percent: completion_percent(completed, total),
            recent,
        }
    }
}

fn completion_percent(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn task(id: i64, completed: bool, created_day: u32, due_day: Option<u32>) -> Task {
        Task {
            id,
            title: format!("Task {}", id),
            description: None,
            completed,
            created_at: date(created_day).and_hms_opt(12, 0, 0).unwrap(),
            due_at: due_day.map(date),
            priority: Priority::Medium,
            owner_id: Some(5),
            category_id: None,
            category_name: None,
        }
    }

    #[test]
    fn test_empty() {
        let stats = DashboardStats::compute(&[], date(10));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.completion_percent, 0);
        assert!(stats.recent.is_empty());
    }

    #[test]
    fn test_counts_and_percentage() {
        let tasks = vec![
            task(1, true, 1, None),
            task(2, false, 2, None),
            task(3, false, 3, None),
        ];
        let stats = DashboardStats::compute(&tasks, date(10));
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        // 33.3 rounds down
        assert_eq!(stats.completion_percent, 33);

        let tasks = vec![task(1, true, 1, None), task(2, true, 1, None), task(3, false, 1, None)];
        assert_eq!(DashboardStats::compute(&tasks, date(10)).completion_percent, 67);
    }

    #[test]
    fn test_due_soon_window_is_inclusive() {
        let tasks = vec![
            task(1, false, 1, Some(9)),  // overdue
            task(2, false, 1, Some(10)), // today
            task(3, false, 1, Some(13)), // today + 3
            task(4, false, 1, Some(14)), // too far
            task(5, true, 1, Some(11)),  // completed
            task(6, false, 1, None),
        ];
        assert_eq!(DashboardStats::compute(&tasks, date(10)).due_soon, 2);
    }

    #[test]
    fn test_recent_is_newest_first_and_capped() {
        let tasks: Vec<Task> = (1..=7).map(|i| task(i, false, i as u32, None)).collect();
        let stats = DashboardStats::compute(&tasks, date(10));
        let ids: Vec<i64> = stats.recent.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![7, 6, 5, 4, 3]);
    }
}
