use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Entity, Result};

/// Product category; categories may nest through `parentId`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn assign_id(&mut self, id: String) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

impl CreateCategoryRequest {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("El nombre de la categoría es obligatorio"));
        }
        Ok(())
    }
}

/// Partial update; `parentId: null` is not distinguishable from an absent
/// field, so detaching from a parent uses an empty string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub is_active: Option<bool>,
}

/// A category with its nested subcategories
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

/// Builds the forest of categories, roots and siblings in insertion order.
/// Categories whose parent is missing are treated as roots.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    fn children_of(parent: &str, categories: &[Category], depth: usize) -> Vec<CategoryNode> {
        if depth > categories.len() {
            return Vec::new();
        }
        categories
            .iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent))
            .map(|c| CategoryNode {
                category: c.clone(),
                children: children_of(&c.id, categories, depth + 1),
            })
            .collect()
    }

    categories
        .iter()
        .filter(|c| match &c.parent_id {
            None => true,
            Some(parent) => !categories.iter().any(|other| &other.id == parent),
        })
        .map(|c| CategoryNode {
            category: c.clone(),
            children: children_of(&c.id, categories, 1),
        })
        .collect()
}

/// Whether making `parent_id` the parent of `category_id` would close a loop
pub fn creates_cycle(categories: &[Category], category_id: &str, parent_id: &str) -> bool {
    let mut current = Some(parent_id.to_string());
    let mut steps = 0;

    while let Some(id) = current {
        if id == category_id {
            return true;
        }
        steps += 1;
        if steps > categories.len() {
            return true;
        }
        current = categories
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.parent_id.clone());
    }

    false
}
