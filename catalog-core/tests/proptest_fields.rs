//! Property-based tests for pagination windows and field validation

use catalog_core::pagination::{Paginated, Pagination, MAX_PER_PAGE};
use catalog_core::validation::{validate_name, validate_serial_number, MAX_NAME_LEN};
use catalog_core::Serial;
use proptest::prelude::*;

proptest! {
    /// Consecutive pages tile the id range: no overlap, no gap
    #[test]
    fn consecutive_pages_are_adjacent(page in 1u32..1_000, per_page in 0u32..500) {
        let current = Pagination::new(page, per_page);
        let next = Pagination::new(page + 1, per_page);

        prop_assert_eq!(current.offset() + u64::from(current.limit()), next.offset());
    }

    #[test]
    fn per_page_always_in_bounds(page in any::<u32>(), per_page in any::<u32>()) {
        let p = Pagination::new(page, per_page);
        prop_assert!(p.page >= 1);
        prop_assert!((1..=MAX_PER_PAGE).contains(&p.per_page));
    }

    /// Every item lands on exactly one page
    #[test]
    fn total_pages_covers_total(total in 0i64..100_000, per_page in 1u32..=MAX_PER_PAGE) {
        let paged: Paginated<()> = Paginated { items: vec![], total, page: 1, per_page };
        let pages = i64::from(paged.total_pages());

        prop_assert!(pages * i64::from(per_page) >= total);
        if total > 0 {
            prop_assert!((pages - 1) * i64::from(per_page) < total);
        }
    }

    /// Generated serial numbers always pass serial validation
    #[test]
    fn generated_serials_are_valid(product_id in 1i64..i64::MAX / 2, category_id in 1i64..i64::MAX / 2) {
        let number = Serial::number_for(product_id, category_id);
        prop_assert!(validate_serial_number(&number).is_ok());
        prop_assert!(number.starts_with(&product_id.to_string()));
        prop_assert!(number.ends_with(&category_id.to_string()));
    }

    /// Any non-blank name within the limit passes, whatever the script
    #[test]
    fn names_within_limit_pass(name in "[a-zA-Zà-ú0-9 ]{0,120}") {
        prop_assume!(!name.trim().is_empty());
        prop_assert!(validate_name("product name", &name).is_ok());
    }

    #[test]
    fn overlong_names_fail(extra in 1usize..50) {
        let name = "x".repeat(MAX_NAME_LEN + extra);
        prop_assert!(validate_name("product name", &name).is_err());
    }
}
