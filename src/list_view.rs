use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::content::{Post, PostMetadata};
use crate::text_utils::format_long_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    fn compare(&self, a: &PostMetadata, b: &PostMetadata) -> Ordering {
        match self {
            SortOrder::DateDesc => b.date.cmp(&a.date),
            SortOrder::DateAsc => a.date.cmp(&b.date),
            SortOrder::TitleAsc => compare_titles(&a.title, &b.title),
            SortOrder::TitleDesc => compare_titles(&b.title, &a.title),
        }
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-desc" => Ok(SortOrder::DateDesc),
            "date-asc" => Ok(SortOrder::DateAsc),
            "title-asc" => Ok(SortOrder::TitleAsc),
            "title-desc" => Ok(SortOrder::TitleDesc),
            x => Err(format!("Unknown sort order {}", x)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortOrder::DateDesc => "date-desc",
            SortOrder::DateAsc => "date-asc",
            SortOrder::TitleAsc => "title-asc",
            SortOrder::TitleDesc => "title-desc",
        };
        f.write_str(name)
    }
}

/// Inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn year(year: i32) -> Option<DateRange> {
        Some(DateRange {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        *date >= self.start && *date <= self.end
    }
}

/// Every constraint that is set has to match. Within `tags`, one shared tag
/// is enough.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub date_range: Option<DateRange>,
    pub exclude_slug: Option<String>,
}

impl PostFilter {
    pub fn matches(&self, metadata: &PostMetadata) -> bool {
        if let Some(ref category) = self.category {
            if metadata.category.as_ref() != Some(category) {
                return false;
            }
        }

        if !self.tags.is_empty() && !self.tags.iter().any(|tag| metadata.has_tag(tag)) {
            return false;
        }

        if let Some(ref range) = self.date_range {
            if !range.contains(&metadata.date) {
                return false;
            }
        }

        if let Some(ref slug) = self.exclude_slug {
            if metadata.slug == *slug {
                return false;
            }
        }

        true
    }
}

/// Card shaped view of a post, what listings hand out
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListItem {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub display_date: String,
    pub description: String,
    pub thumbnail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub image_url: String,
}

impl From<&Post> for ListItem {
    fn from(post: &Post) -> Self {
        let metadata = &post.metadata;
        ListItem {
            slug: metadata.slug.clone(),
            title: metadata.title.clone(),
            date: metadata.date,
            display_date: format_long_date(&metadata.date),
            description: metadata.description.clone(),
            thumbnail: metadata.thumbnail.clone(),
            category: metadata.category.clone(),
            tags: metadata.tags.clone(),
            image_url: post.image_url.clone(),
        }
    }
}

/// Filters then sorts. Posts that compare equal keep the order they were
/// loaded in.
pub fn list(posts: &[Post], sort_order: SortOrder, filter: &PostFilter) -> Vec<ListItem> {
    let mut selected: Vec<&Post> = posts.iter()
        .filter(|post| filter.matches(&post.metadata))
        .collect();
    selected.sort_by(|a, b| sort_order.compare(&a.metadata, &b.metadata));
    selected.into_iter().map(ListItem::from).collect()
}

/// Skips `offset` items and keeps at most `limit` of the rest
pub fn apply_window<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    let rest = items.into_iter().skip(offset);
    match limit {
        Some(limit) => rest.take(limit).collect(),
        None => rest.collect(),
    }
}
