//! Per-user dashboard.

use super::{Context, Output, json};
use crate::Result;
use crate::api::PageRequest;
use crate::models::{Identity, Task};
use crate::views::{CategoryIndex, DashboardStats};
use chrono::{Local, NaiveDate};
use serde::Serialize;

/// Page size used to pull every task for the statistics.
const FETCH_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub id: Option<i64>,
    pub name: String,
    pub color: String,
    pub tasks: usize,
}

#[derive(Debug, Serialize)]
pub struct DashboardResult {
    pub user: Identity,
    pub today: NaiveDate,
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub by_category: Vec<CategoryCount>,
}

impl Output for DashboardResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let s = &self.stats;
        let mut lines = vec![
            format!("Dashboard for {}", self.user.username),
            format!(
                "  Tasks: {} total, {} pending, {} completed ({}% done)",
                s.total, s.pending, s.completed, s.completion_percent
            ),
            format!("  Due within 3 days: {}", s.due_soon),
        ];
        if !self.by_category.is_empty() {
            lines.push("  By category:".to_string());
            for count in &self.by_category {
                lines.push(format!("    {} {}: {}", count.color, count.name, count.tasks));
            }
        }
        if !s.recent.is_empty() {
            lines.push("  Recent:".to_string());
            for task in &s.recent {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                lines.push(format!("    {} #{} {}", mark, task.id, task.title));
            }
        }
        lines.join("\n")
    }
}

/// Every task owned by `owner_id`, across all pages.
fn fetch_all_user_tasks(ctx: &Context, owner_id: i64) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    let mut page_index = 0;
    loop {
        let page = ctx
            .client()
            .list_user_tasks(owner_id, &PageRequest::new(page_index, FETCH_PAGE_SIZE))?;
        let done = page.is_last() || page.content.is_empty();
        tasks.extend(page.content);
        if done {
            break;
        }
        page_index += 1;
    }
    Ok(tasks)
}

fn count_by_category(tasks: &[Task], index: &CategoryIndex) -> Vec<CategoryCount> {
    let mut counts: Vec<CategoryCount> = Vec::new();
    for task in tasks {
        match counts.iter_mut().find(|c| c.id == task.category_id) {
            Some(count) => count.tasks += 1,
            None => counts.push(CategoryCount {
                id: task.category_id,
                name: index.name(task.category_id).to_string(),
                color: index.color(task.category_id).to_string(),
                tasks: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.tasks.cmp(&a.tasks).then(a.name.cmp(&b.name)));
    counts
}

pub fn dashboard(ctx: &Context) -> Result<DashboardResult> {
    dashboard_on(ctx, Local::now().date_naive())
}

/// Dashboard as of `today`.
pub fn dashboard_on(ctx: &Context, today: NaiveDate) -> Result<DashboardResult> {
    let user = ctx.gateway().require_identity()?;
    let tasks = fetch_all_user_tasks(ctx, user.id)?;
    // Category names are cosmetic; a failure here should not hide the numbers
    let index = match ctx.client().list_categories() {
        Ok(categories) => CategoryIndex::new(categories),
        Err(e) => {
            tracing::warn!(error = %e, "could not load categories");
            CategoryIndex::default()
        }
    };
    Ok(DashboardResult {
        stats: DashboardStats::compute(&tasks, today),
        by_category: count_by_category(&tasks, &index),
        today,
        user,
    })
}
