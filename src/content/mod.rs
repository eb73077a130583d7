use chrono::NaiveDate;

pub mod content_renderer;
pub mod front_matter;
pub mod highlight;
pub mod post_loader;

/// Directory under which post images are published, one sub-directory per slug
pub const POST_IMAGE_PREFIX: &str = "/img/posts";

/// Validated header of a post. Built only by the post loader.
#[derive(Debug, Clone, PartialEq)]
pub struct PostMetadata {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub description: String,
    pub thumbnail: String,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostMetadata {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub metadata: PostMetadata,
    pub body: String,
    pub image_url: String,
}

impl Post {
    pub fn slug(&self) -> &str {
        self.metadata.slug.as_str()
    }
}
