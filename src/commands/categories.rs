//! Category commands.

use super::{Context, Output, json};
use crate::models::{Category, CategoryDraft};
use crate::views::categories::{palette, resolve_color};
use crate::{Error, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct CategoryList {
    pub count: usize,
    pub categories: Vec<Category>,
}

impl Output for CategoryList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.categories.is_empty() {
            return "No categories found.".to_string();
        }
        let mut lines = vec![format!("{} categories:", self.count)];
        for category in &self.categories {
            let mut line = format!("  #{} {} {}", category.id, category.color, category.name);
            if let Some(ref description) = category.description {
                line.push_str(&format!(" - {}", description));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

impl From<Vec<Category>> for CategoryList {
    fn from(categories: Vec<Category>) -> Self {
        Self {
            count: categories.len(),
            categories,
        }
    }
}

pub fn category_list(ctx: &Context) -> Result<CategoryList> {
    Ok(ctx.client().list_categories()?.into())
}

pub fn category_search(ctx: &Context, name: &str) -> Result<CategoryList> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("search text is required".to_string()));
    }
    Ok(ctx.client().search_categories(name)?.into())
}

#[derive(Debug, Serialize)]
pub struct CategoryCreated {
    pub category: Category,
}

impl Output for CategoryCreated {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Created category #{} {} ({})",
            self.category.id, self.category.name, self.category.color
        )
    }
}

/// Create a category. `color` is a palette name or `#rrggbb`.
pub fn category_create(
    ctx: &Context,
    name: &str,
    color: &str,
    description: Option<String>,
) -> Result<CategoryCreated> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::InvalidInput("category name is required".to_string()));
    }
    let color = resolve_color(color).ok_or_else(|| {
        let names: Vec<&str> = palette().iter().map(|(name, _)| *name).collect();
        Error::InvalidInput(format!(
            "unknown color '{}' (use #rrggbb or one of: {})",
            color,
            names.join(", ")
        ))
    })?;
    let draft = CategoryDraft {
        name: name.to_string(),
        color,
        description: description.filter(|d| !d.trim().is_empty()),
    };
    let category = ctx.client().create_category(&draft)?;
    Ok(CategoryCreated { category })
}

#[derive(Debug, Serialize)]
pub struct CategoryDeleted {
    pub id: i64,
    pub deleted: bool,
}

impl Output for CategoryDeleted {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted category #{}", self.id)
    }
}

pub fn category_delete(ctx: &Context, id: i64) -> Result<CategoryDeleted> {
    ctx.client().delete_category(id)?;
    Ok(CategoryDeleted { id, deleted: true })
}
