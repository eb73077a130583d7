use serde::Serialize;

/// One page of a listing plus the numbers needed to draw page links
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaginationResult<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: usize,
    pub has_next: bool,
    pub has_previous: bool,
}

pub struct Paginator<'a, T> {
    item_list: &'a [T],
    page_size: u32,
    page_count: u32,
}

impl<'a, T> Paginator<'a, T> {
    /// A `page_size` of 0 is treated as 1
    pub fn from(item_list: &'a [T], page_size: u32) -> Self {
        let page_size = page_size.max(1);
        if item_list.is_empty() {
            return Paginator {
                item_list,
                page_size,
                page_count: 0,
            };
        }
        let item_count = item_list.len() as u32;
        let upper_bound = item_count - 1;
        let page_count = (upper_bound / page_size) + 1;

        Paginator {
            item_list,
            page_size,
            page_count,
        }
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn get_page(&self, page: u32) -> Result<&'a [T], String> {
        match page {
            0 => return Err("Page has to be greater than 0".to_string()),
            x if x > self.page_count => return Err(format!("Page has to be less than page_count ({})", self.page_count)),
            _ => {}
        };

        let index = ((page - 1) as usize) * (self.page_size as usize);
        let end = (index + self.page_size as usize).min(self.item_list.len());
        Ok(&self.item_list[index..end])
    }
}

impl<T: Clone> Paginator<'_, T> {
    /// Never fails: page 0 is read as page 1, pages past the end are empty.
    pub fn paginate(&self, page: u32) -> PaginationResult<T> {
        let current_page = page.max(1);
        let items = self.get_page(current_page)
            .map(|items| items.to_vec())
            .unwrap_or_default();

        PaginationResult {
            items,
            current_page,
            total_pages: self.page_count,
            total_items: self.item_list.len(),
            has_next: current_page < self.page_count,
            has_previous: current_page > 1,
        }
    }
}

pub fn paginate<T: Clone>(items: &[T], page: u32, page_size: u32) -> PaginationResult<T> {
    Paginator::from(items, page_size).paginate(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_case() {
        let items = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 5);
        assert_eq!(paginator.get_page(1), Ok([1, 2, 3].as_slice()));
        assert_eq!(paginator.get_page(2), Ok([4, 5, 6].as_slice()));
        assert_eq!(paginator.get_page(3), Ok([7, 8, 9].as_slice()));
        assert_eq!(paginator.get_page(4), Ok([10, 11, 12].as_slice()));
        assert_eq!(paginator.get_page(5), Ok([13].as_slice()));

        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(6), Err("Page has to be less than page_count (5)".to_string()));
    }

    #[test]
    fn test_empty() {
        let items: Vec<u32> = vec![];
        let paginator = Paginator::from(&items, 3);
        assert_eq!(paginator.page_count(), 0);
        assert_eq!(paginator.get_page(0), Err("Page has to be greater than 0".to_string()));
        assert_eq!(paginator.get_page(1), Err("Page has to be less than page_count (0)".to_string()));

        let result = paginator.paginate(1);
        assert_eq!(result, PaginationResult {
            items: vec![],
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            has_next: false,
            has_previous: false,
        });
    }

    #[test]
    fn test_paginate_flags() {
        let items: Vec<u32> = (1..=7).collect();

        let first = paginate(&items, 1, 3);
        assert_eq!(first.items, [1, 2, 3]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 7);
        assert!(first.has_next);
        assert!(!first.has_previous);

        let last = paginate(&items, 3, 3);
        assert_eq!(last.items, [7]);
        assert!(!last.has_next);
        assert!(last.has_previous);
    }

    #[test]
    fn test_page_past_the_end_is_empty() {
        let items: Vec<u32> = (1..=4).collect();
        let result = paginate(&items, 9, 2);
        assert!(result.items.is_empty());
        assert_eq!(result.current_page, 9);
        assert_eq!(result.total_pages, 2);
        assert!(!result.has_next);
        assert!(result.has_previous);
    }

    #[test]
    fn test_zero_page_and_size_are_coerced() {
        let items: Vec<u32> = (1..=3).collect();
        let result = paginate(&items, 0, 0);
        assert_eq!(result.current_page, 1);
        assert_eq!(result.items, [1]);
        assert_eq!(result.total_pages, 3);
    }

    #[test]
    fn test_pages_cover_every_item() {
        for total in 0..25usize {
            let items: Vec<usize> = (0..total).collect();
            for page_size in 1..8u32 {
                let first = paginate(&items, 1, page_size);
                let expected_pages = total.div_ceil(page_size as usize) as u32;
                assert_eq!(first.total_pages, expected_pages);

                let seen: Vec<usize> = (1..=first.total_pages)
                    .flat_map(|page| paginate(&items, page, page_size).items)
                    .collect();
                assert_eq!(seen, items);
            }
        }
    }
}
