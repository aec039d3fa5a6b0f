//! Pagination over post lists

use serde::Serialize;

/// One page of a longer list
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// 1-based page number
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_more: bool,
}

/// Take page `page` (1-based, 0 treated as 1) of `items`.
///
/// The first page holds `first_page` items and later pages `per_page`
/// items, so an index can show a larger first batch and load the rest in
/// smaller steps.
pub fn paginate<T: Clone>(
    items: &[T],
    page: usize,
    first_page: usize,
    per_page: usize,
) -> Paginated<T> {
    let page = page.max(1);
    let first_page = first_page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();

    let (start, len) = if page == 1 {
        (0, first_page)
    } else {
        (first_page + (page - 2) * per_page, per_page)
    };
    let start = start.min(total);
    let end = start.saturating_add(len).min(total);

    let total_pages = if total <= first_page {
        1
    } else {
        1 + (total - first_page).div_ceil(per_page)
    };

    Paginated {
        items: items[start..end].to_vec(),
        page,
        per_page: len,
        total,
        total_pages,
        has_more: end < total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let items: Vec<u32> = (1..=20).collect();
        let page = paginate(&items, 1, 9, 6);
        assert_eq!(page.items, (1..=9).collect::<Vec<_>>());
        assert_eq!(page.total, 20);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_more);
    }

    #[test]
    fn test_later_pages() {
        let items: Vec<u32> = (1..=20).collect();
        assert_eq!(paginate(&items, 2, 9, 6).items, (10..=15).collect::<Vec<_>>());

        let last = paginate(&items, 3, 9, 6);
        assert_eq!(last.items, (16..=20).collect::<Vec<_>>());
        assert!(!last.has_more);

        assert!(paginate(&items, 7, 9, 6).items.is_empty());
    }

    #[test]
    fn test_small_lists() {
        let items = vec!["a", "b"];
        let page = paginate(&items, 0, 9, 6);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more);

        let empty: Vec<u8> = Vec::new();
        assert_eq!(paginate(&empty, 1, 9, 6).total_pages, 1);
    }
}
