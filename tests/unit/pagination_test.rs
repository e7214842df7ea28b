/// Property-based tests for offset/limit pagination
///
/// data.len() == min(limit, max(0, total − (page − 1) × limit)) and
/// totalPages == ceil(total / limit)

use negocio::core::pagination::MAX_LIMIT;
use negocio::core::{paginate, PageRequest};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_page_length_property(
        total in 0usize..500usize,
        page in 1u32..60u32,
        limit in 1u32..=100u32,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let result = paginate(items, PageRequest::new(page, limit));

        let skipped = (page as usize - 1) * limit as usize;
        let expected = (limit as usize).min(total.saturating_sub(skipped));

        prop_assert_eq!(result.data.len(), expected);
        prop_assert_eq!(result.total, total);
        prop_assert_eq!(result.total_pages as usize, total.div_ceil(limit as usize));
    }

    /// Property: pages never overlap and together cover the collection
    #[test]
    fn test_pages_partition_collection(total in 0usize..300usize, limit in 1u32..=100u32) {
        let items: Vec<usize> = (0..total).collect();
        let pages = paginate(items.clone(), PageRequest::new(1, limit)).total_pages;

        let mut seen = Vec::new();
        for page in 1..=pages.max(1) {
            seen.extend(paginate(items.clone(), PageRequest::new(page, limit)).data);
        }

        prop_assert_eq!(seen, items);
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = PageRequest::from_parts(None, None).unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 10);
    }

    #[test]
    fn test_out_of_range_requests_rejected() {
        assert!(PageRequest::from_parts(Some(0), None).is_err());
        assert!(PageRequest::from_parts(None, Some(0)).is_err());
        assert!(PageRequest::from_parts(None, Some(MAX_LIMIT + 1)).is_err());
        assert!(PageRequest::from_parts(Some(3), Some(MAX_LIMIT)).is_ok());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let result = paginate(vec![1, 2, 3], PageRequest::new(5, 2));
        assert!(result.data.is_empty());
        assert_eq!(result.total_pages, 2);
    }

    #[test]
    fn test_empty_collection_has_zero_pages() {
        let result = paginate(Vec::<u8>::new(), PageRequest::default());
        assert_eq!(result.total_pages, 0);
    }
}
