use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Offset/limit request shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    DEFAULT_PAGE
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Builds a request from optional query values, falling back to defaults
    pub fn from_parts(page: Option<u32>, limit: Option<u32>) -> Result<Self> {
        let request = Self {
            page: page.unwrap_or(DEFAULT_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::validation("La página debe ser mayor o igual a 1"));
        }
        if self.limit < 1 || self.limit > MAX_LIMIT {
            return Err(AppError::validation(format!(
                "El límite debe estar entre 1 y {}",
                MAX_LIMIT
            )));
        }
        Ok(())
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize).saturating_mul(self.limit as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Applies the direction to an ascending comparison
    pub fn apply(&self, ordering: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// One page of a filtered collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

/// Slices an already filtered and sorted collection
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Paginated<T> {
    let total = items.len();
    let limit = request.limit.max(1);
    let total_pages = total.div_ceil(limit as usize) as u32;

    let data = items
        .into_iter()
        .skip(request.offset())
        .take(limit as usize)
        .collect();

    Paginated {
        data,
        total,
        page: request.page,
        limit,
        total_pages,
    }
}
