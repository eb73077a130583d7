//! Response bodies of the blog endpoints, built from already loaded posts so
//! they can be produced without a running server.

use std::io;

use serde::Serialize;

use crate::content::content_renderer::render;
use crate::content::Post;
use crate::list_view::{apply_window, list, ListItem, PostFilter, SortOrder};
use crate::paginator::{paginate, PaginationResult};
use crate::query_string::QueryString;
use crate::view::html_renderer::HtmlRenderer;

pub const POST_NOT_FOUND: &str = "Post not found";

#[derive(Serialize, Debug)]
pub struct ListResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: usize,
}

#[derive(Serialize, Debug)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn ok(data: T) -> Self {
        DataResponse {
            success: true,
            data,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}

/// A single post, rendered, with the rest of the blog listed under it
#[derive(Serialize, Debug)]
pub struct PostDetail {
    pub metadata: ListItem,
    pub html: String,
    pub related: Vec<ListItem>,
}

/// `category`, `tags`, `year`, `sort` then `offset` and `limit`.
/// `total` counts what is returned.
pub fn query_posts(posts: &[Post], qs: &QueryString, default_order: SortOrder) -> ListResponse<ListItem> {
    let items = list(posts, qs.sort_order(default_order), &qs.to_filter());
    let data = apply_window(items, qs.offset(), qs.limit());

    ListResponse {
        success: true,
        total: data.len(),
        data,
    }
}

pub fn page_posts(posts: &[Post], qs: &QueryString, default_order: SortOrder, default_page_size: u32) -> DataResponse<PaginationResult<ListItem>> {
    let items = list(posts, qs.sort_order(default_order), &qs.to_filter());
    DataResponse::ok(paginate(&items, qs.get_page(), qs.get_page_size(default_page_size)))
}

/// `Ok(None)` when there is no post with this slug
pub fn post_detail(posts: &[Post], slug: &str, default_order: SortOrder) -> io::Result<Option<PostDetail>> {
    let Some(post) = posts.iter().find(|post| post.slug() == slug) else {
        return Ok(None);
    };

    let content = render(&post.body, slug)?;
    let others = PostFilter {
        exclude_slug: Some(slug.to_string()),
        ..PostFilter::default()
    };

    Ok(Some(PostDetail {
        metadata: ListItem::from(post),
        html: HtmlRenderer::render(&content),
        related: list(posts, default_order, &others),
    }))
}
