//! Category lookup and colors.

use crate::models::Category;
use std::collections::HashMap;

/// Label for tasks without a known category.
pub const DEFAULT_CATEGORY_NAME: &str = "No category";

/// Color for tasks without a known category.
pub const DEFAULT_CATEGORY_COLOR: &str = "#95a5a6";

const PALETTE: [(&str, &str); 9] = [
    ("red", "#ff4444"),
    ("blue", "#4444ff"),
    ("green", "#44ff44"),
    ("yellow", "#ffff44"),
    ("orange", "#ff8844"),
    ("purple", "#8844ff"),
    ("pink", "#ff44ff"),
    ("cyan", "#44ffff"),
    ("gray", "#888888"),
];

/// Predefined category colors as `(name, hex)`.
pub fn palette() -> &'static [(&'static str, &'static str)] {
    &PALETTE
}

/// Resolve a color given as a palette name or a `#rrggbb` hex string.
pub fn resolve_color(input: &str) -> Option<String> {
    let input = input.trim();
    if let Some((_, hex)) = PALETTE
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(input))
    {
        return Some(hex.to_string());
    }
    let digits = input.strip_prefix('#')?;
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| input.to_lowercase())
}

/// Categories by id.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_id: HashMap<i64, Category>,
}

impl CategoryIndex {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            by_id: categories.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, id: i64) -> Option<&Category> {
        self.by_id.get(&id)
    }

    pub fn name(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.get(id))
            .map(|c| c.name.as_str())
            .unwrap_or(DEFAULT_CATEGORY_NAME)
    }

    pub fn color(&self, id: Option<i64>) -> &str {
        id.and_then(|id| self.get(id))
            .map(|c| c.color.as_str())
            .unwrap_or(DEFAULT_CATEGORY_COLOR)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
