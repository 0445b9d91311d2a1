//! Task commands.

use super::{Context, Output, json};
use crate::api::{Page, PageRequest};
use crate::models::{CategoryRef, Priority, Task, TaskDraft};
use crate::views::forms::validate_title;
use crate::views::{DEFAULT_CATEGORY_NAME, DEFAULT_PAGE_WINDOW, TaskFilter, page_window};
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// Parse a `--priority` value.
pub fn parse_priority(s: &str) -> Result<Priority> {
    Priority::parse(s)
        .ok_or_else(|| Error::InvalidInput(format!("unknown priority '{}' (low, medium, high)", s)))
}

/// Parse a `--due` value in `YYYY-MM-DD` form.
pub fn parse_due(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("due date must be YYYY-MM-DD, got '{}'", s)))
}

fn category_label(task: &Task) -> &str {
    task.category_name.as_deref().unwrap_or(DEFAULT_CATEGORY_NAME)
}

fn status_mark(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

fn task_detail(task: &Task) -> String {
    let mut lines = vec![format!("{} #{} {}", status_mark(task), task.id, task.title)];
    if let Some(ref description) = task.description {
        lines.push(format!("  {}", description));
    }
    lines.push(format!("  Priority: {}", task.priority));
    lines.push(format!("  Category: {}", category_label(task)));
    if let Some(due) = task.due_at {
        lines.push(format!("  Due: {}", due));
    }
    lines.push(format!("  Created: {}", task.created_at.format("%Y-%m-%d %H:%M")));
    lines.join("\n")
}

/// Arguments for `task list`. `page` is 1-based.
#[derive(Debug, Clone)]
pub struct TaskListArgs {
    pub page: u32,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub filter: TaskFilter,
}

#[derive(Debug, Serialize)]
pub struct TaskListResult {
    pub tasks: Vec<Task>,
    /// 1-based
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    /// Tasks on this page before client-side filtering
    pub fetched: usize,
    #[serde(skip_serializing_if = "TaskFilter::is_empty")]
    pub filter: TaskFilter,
    /// 1-based page numbers to offer for navigation
    pub pages: Vec<u32>,
}

impl Output for TaskListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.tasks.is_empty() {
            return if self.fetched > 0 {
                format!("No tasks on page {} match the filter.", self.page)
            } else {
                "No tasks found.".to_string()
            };
        }
        let mut lines = Vec::new();
        for task in &self.tasks {
            let due = task
                .due_at
                .map(|d| format!(" due {}", d))
                .unwrap_or_default();
            lines.push(format!(
                "{} #{} {} ({}, {}){}",
                status_mark(task),
                task.id,
                task.title,
                task.priority,
                category_label(task),
                due
            ));
        }
        lines.push(String::new());
        let pages: Vec<String> = self
            .pages
            .iter()
            .map(|p| {
                if *p == self.page {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        lines.push(format!(
            "Page {} of {} ({} total)  {}",
            self.page,
            self.total_pages.max(1),
            self.total_elements,
            pages.join(" ")
        ));
        lines.join("\n")
    }
}

/// Fetch one page of the caller's tasks and filter it client-side.
pub fn task_list(ctx: &Context, args: &TaskListArgs) -> Result<TaskListResult> {
    ctx.gateway().require_identity()?;
    let page_index = args.page.max(1) - 1;
    let size = args.size.unwrap_or_else(|| ctx.config.page_size());
    let request = PageRequest::new(page_index, size).with_sort(args.sort.clone());
    let Page {
        content,
        total_elements,
        total_pages,
        number,
    } = ctx.client().list_tasks(&request)?;

    let fetched = content.len();
    let tasks: Vec<Task> = args.filter.apply(&content).into_iter().cloned().collect();
    Ok(TaskListResult {
        tasks,
        page: number + 1,
        total_pages,
        total_elements,
        fetched,
        filter: args.filter.clone(),
        pages: page_window(number, total_pages, DEFAULT_PAGE_WINDOW)
            .into_iter()
            .map(|p| p + 1)
            .collect(),
    })
}

/// A single task, with the action that produced it.
#[derive(Debug, Serialize)]
pub struct TaskResult {
    pub action: &'static str,
    pub task: Task,
}

impl Output for TaskResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let detail = task_detail(&self.task);
        match self.action {
            "show" => detail,
            action => format!("Task {}\n{}", action, detail),
        }
    }
}

pub fn task_show(ctx: &Context, id: i64) -> Result<TaskResult> {
    ctx.gateway().require_identity()?;
    let task = ctx.client().get_task(id)?;
    Ok(TaskResult {
        action: "show",
        task,
    })
}

/// Fields for `task create`.
#[derive(Debug, Clone, Default)]
pub struct TaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub category: Option<i64>,
}

pub fn task_create(ctx: &Context, input: &TaskInput) -> Result<TaskResult> {
    let identity = ctx.gateway().require_identity()?;
    let mut draft = TaskDraft::new(validate_title(&input.title)?);
    draft.description = input.description.clone().filter(|d| !d.trim().is_empty());
    if let Some(ref priority) = input.priority {
        draft.priority = parse_priority(priority)?;
    }
    if let Some(ref due) = input.due {
        draft.due_at = Some(parse_due(due)?);
    }
    draft.owner_id = Some(identity.id);
    draft.category = input.category.map(|id| CategoryRef { id });

    let task = ctx.client().create_task(&draft)?;
    tracing::info!(task_id = task.id, "task created");
    Ok(TaskResult {
        action: "created",
        task,
    })
}

/// Changes for `task update`. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// `"none"` clears the due date
    pub due: Option<String>,
    pub category: Option<i64>,
    pub no_category: bool,
}

impl TaskChanges {
    fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due.is_none()
            && self.category.is_none()
            && !self.no_category
    }

    fn apply(&self, draft: &mut TaskDraft) -> Result<()> {
        if let Some(ref title) = self.title {
            draft.title = validate_title(title)?;
        }
        if let Some(ref description) = self.description {
            draft.description = Some(description.clone()).filter(|d| !d.trim().is_empty());
        }
        if let Some(ref priority) = self.priority {
            draft.priority = parse_priority(priority)?;
        }
        if let Some(ref due) = self.due {
            draft.due_at = if due.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(parse_due(due)?)
            };
        }
        if self.no_category {
            draft.category = None;
        } else if let Some(id) = self.category {
            draft.category = Some(CategoryRef { id });
        }
        Ok(())
    }
}

/// Fetch the task, apply the changes, and write the whole task back.
pub fn task_update(ctx: &Context, id: i64, changes: &TaskChanges) -> Result<TaskResult> {
    ctx.gateway().require_identity()?;
    if changes.is_empty() {
        return Err(Error::InvalidInput("nothing to update".to_string()));
    }
    let current = ctx.client().get_task(id)?;
    let mut draft = TaskDraft::from(&current);
    changes.apply(&mut draft)?;
    let task = ctx.client().update_task(id, &draft)?;
    Ok(TaskResult {
        action: "updated",
        task,
    })
}

pub fn task_complete(ctx: &Context, id: i64) -> Result<TaskResult> {
    ctx.gateway().require_identity()?;
    let task = ctx.client().complete_task(id)?;
    Ok(TaskResult {
        action: "completed",
        task,
    })
}

/// Mark a task pending again.
pub fn task_reopen(ctx: &Context, id: i64) -> Result<TaskResult> {
    ctx.gateway().require_identity()?;
    let task = ctx.client().mark_pending(id)?;
    Ok(TaskResult {
        action: "reopened",
        task,
    })
}

#[derive(Debug, Serialize)]
pub struct TaskDeleted {
    pub id: i64,
    pub deleted: bool,
}

impl Output for TaskDeleted {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted task #{}", self.id)
    }
}

pub fn task_delete(ctx: &Context, id: i64) -> Result<TaskDeleted> {
    ctx.gateway().require_identity()?;
    ctx.client().delete_task(id)?;
    Ok(TaskDeleted { id, deleted: true })
}
