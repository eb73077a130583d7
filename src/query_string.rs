use std::collections::HashMap;
use std::string::ToString;

use crate::list_view::{DateRange, PostFilter, SortOrder};

/// Typed view over a request query. No accessor fails: malformed values fall
/// back to "no constraint" or to a default.
#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    pub fn get_page(&self) -> u32 {
        let one = "1".to_string();
        let val = self.items.get("page").unwrap_or(&one);
        let val = val.trim().parse().unwrap_or(1);
        if val <= 0 { return 1; }
        val
    }

    pub fn get_page_size(&self, default_size: u32) -> u32 {
        match self.value("page_size").and_then(|v| v.parse::<u32>().ok()) {
            Some(0) | None => default_size.max(1),
            Some(size) => size,
        }
    }

    pub fn category(&self) -> Option<String> {
        self.value("category").map(|v| v.to_string())
    }

    /// Comma separated, any of them matches
    pub fn tags(&self) -> Vec<String> {
        let Some(tags) = self.value("tags") else {
            return vec![];
        };
        tags.split(',')
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(|tag| tag.to_string())
            .collect()
    }

    pub fn year(&self) -> Option<i32> {
        self.value("year").and_then(|v| v.parse().ok())
    }

    pub fn sort_order(&self, default_order: SortOrder) -> SortOrder {
        self.value("sort")
            .and_then(|v| v.parse().ok())
            .unwrap_or(default_order)
    }

    /// `None` means everything
    pub fn limit(&self) -> Option<usize> {
        self.value("limit").and_then(|v| v.parse().ok())
    }

    pub fn offset(&self) -> usize {
        self.value("offset")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    pub fn to_filter(&self) -> PostFilter {
        PostFilter {
            category: self.category(),
            tags: self.tags(),
            date_range: self.year().and_then(DateRange::year),
            exclude_slug: None,
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.items.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn test_get_page() {
        assert_eq!(QueryString::from("page=3").get_page(), 3);
        assert_eq!(QueryString::from("page=0").get_page(), 1);
        assert_eq!(QueryString::from("page=-2").get_page(), 1);
        assert_eq!(QueryString::from("page=abc").get_page(), 1);
        assert_eq!(QueryString::from("").get_page(), 1);
    }

    #[test]
    fn test_get_page_size() {
        assert_eq!(QueryString::from("page_size=5").get_page_size(10), 5);
        assert_eq!(QueryString::from("page_size=0").get_page_size(10), 10);
        assert_eq!(QueryString::from("page_size=many").get_page_size(10), 10);
        assert_eq!(QueryString::from("").get_page_size(0), 1);
    }

    #[test]
    fn test_limit_and_offset() {
        let qs = QueryString::from("limit=2&offset=1");
        assert_eq!(qs.limit(), Some(2));
        assert_eq!(qs.offset(), 1);

        let qs = QueryString::from("limit=0");
        assert_eq!(qs.limit(), Some(0));

        let qs = QueryString::from("limit=-1&offset=-5");
        assert_eq!(qs.limit(), None);
        assert_eq!(qs.offset(), 0);

        let qs = QueryString::from("limit=&offset=ten");
        assert_eq!(qs.limit(), None);
        assert_eq!(qs.offset(), 0);
    }

    #[test]
    fn test_tags() {
        assert_eq!(QueryString::from("tags=react,css").tags(), vec!["react", "css"]);
        assert_eq!(QueryString::from("tags=react%2C%20css").tags(), vec!["react", "css"]);
        assert_eq!(QueryString::from("tags=,react,,").tags(), vec!["react"]);
        assert!(QueryString::from("tags=").tags().is_empty());
        assert!(QueryString::from("").tags().is_empty());
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(QueryString::from("sort=title-asc").sort_order(SortOrder::DateDesc), SortOrder::TitleAsc);
        assert_eq!(QueryString::from("sort=random").sort_order(SortOrder::DateDesc), SortOrder::DateDesc);
        assert_eq!(QueryString::from("").sort_order(SortOrder::DateAsc), SortOrder::DateAsc);
    }

    #[test]
    fn test_to_filter() {
        let filter = QueryString::from("category=Design&tags=css&year=2023").to_filter();
        assert_eq!(filter.category, Some("Design".to_string()));
        assert_eq!(filter.tags, vec!["css".to_string()]);
        let range = filter.date_range.unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());

        let filter = QueryString::from("category=&year=last").to_filter();
        assert_eq!(filter, PostFilter::default());
    }

    #[test]
    fn test_parse_query_str() {
        let buf = "bread=baguette&cheese=comt%C3%A9&meat=ham&fat=butter";
        let meal = vec![
            ("bread".to_owned(), "baguette".to_owned()),
            ("cheese".to_owned(), "comté".to_owned()),
            ("meat".to_owned(), "ham".to_owned()),
            ("fat".to_owned(), "butter".to_owned()),
        ].into_iter().collect::<HashMap<_, _>>();

        let expected = QueryString {
            items: meal,
        };

        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_parse_invalid_query_str() {
        let buf = "";
        let expected = QueryString {
            items: Default::default(),
        };
        assert_eq!(QueryString::from(buf), expected);
    }

    #[test]
    fn test_parse_key_only_query_str() {
        let buf = "key-only";
        let expected: HashMap<String, String> = vec![("key-only", "")].iter().map(|(x, y)| (x.to_string(), y.to_string())).collect::<HashMap<_, _>>();
        assert_eq!(QueryString::from(buf), QueryString { items: expected });
    }
}
