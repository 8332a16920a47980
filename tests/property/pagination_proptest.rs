//! Pagination invariants

use proptest::prelude::*;

use campusconnect::shared::pagination::{PageQuery, PageRequest, Pagination, MAX_LIMIT};

proptest! {
    #[test]
    fn resolved_queries_are_always_in_range(page in ".{0,12}", limit in ".{0,12}") {
        let request = PageQuery {
            page: Some(page),
            limit: Some(limit),
        }
        .resolve();

        prop_assert!(request.page >= 1);
        prop_assert!((1..=MAX_LIMIT).contains(&request.limit));
    }

    #[test]
    fn numeric_queries_round_trip(page in 1u64..1_000, limit in 1u64..=MAX_LIMIT) {
        prop_assert_eq!(PageQuery::new(page, limit).resolve(), PageRequest::new(page, limit));
    }

    #[test]
    fn pages_partition_the_items(total in 0u64..5_000, limit in 1u64..=MAX_LIMIT) {
        let first = Pagination::compute(PageRequest::new(1, limit), total);
        let mut seen = 0u64;
        for page in 1..=first.total_pages {
            let request = PageRequest::new(page, limit);
            let on_page = total.saturating_sub(request.skip()).min(limit);
            prop_assert!(on_page > 0);
            seen += on_page;
        }
        prop_assert_eq!(seen, total);
    }

    #[test]
    fn has_prev_only_after_first_page(page in 1u64..50, total in 0u64..1_000) {
        let meta = Pagination::compute(PageRequest::new(page, 10), total);
        prop_assert_eq!(meta.has_prev, page > 1);
        prop_assert_eq!(meta.has_next, page < meta.total_pages);
    }
}
