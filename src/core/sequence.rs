use std::sync::atomic::{AtomicU64, Ordering};

/// Per-collection id counter. Ids are sequential decimal strings.
#[derive(Debug)]
pub struct IdSequence {
    next: AtomicU64,
}

impl IdSequence {
    pub fn starting_at(next: u64) -> Self {
        Self {
            next: AtomicU64::new(next.max(1)),
        }
    }

    /// Continues after the highest numeric id already present
    pub fn after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let max = existing
            .into_iter()
            .filter_map(|id| id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self::starting_at(max + 1)
    }

    pub fn next_id(&self) -> String {
        self.next.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
