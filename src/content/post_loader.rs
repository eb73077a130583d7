use std::collections::BTreeSet;
use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use spdlog::{debug, error, info};

use crate::content::front_matter::{parse, RawMetadata, TagList};
use crate::content::{Post, PostMetadata, POST_IMAGE_PREFIX};
use crate::post_list::{slug_from_path, PostList};
use crate::text_utils::parse_date;

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPost {
    pub slug: String,
    pub reason: String,
}

/// Outcome of one pass over the posts directory
#[derive(Debug, Default)]
pub struct LoadReport {
    pub posts: Vec<Post>,
    pub skipped: Vec<SkippedPost>,
}

pub struct PostLoader {
    content_dir: PathBuf,
}

impl PostLoader {
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        PostLoader {
            content_dir: content_dir.into(),
        }
    }

    pub fn content_dir(&self) -> &Path {
        self.content_dir.as_path()
    }

    /// Loads every post, keeping track of the documents that were rejected.
    /// A missing directory is an empty blog.
    pub fn load_report(&self) -> LoadReport {
        let post_list = PostList {
            root_dir: self.content_dir.clone(),
        };

        let files = match post_list.retrieve_files() {
            Ok(files) => files,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Posts directory {} does not exist, no posts loaded", self.content_dir.display());
                return LoadReport::default();
            }
            Err(e) => {
                error!("Error listing posts directory {}: {}", self.content_dir.display(), e);
                return LoadReport::default();
            }
        };

        let mut report = LoadReport::default();
        for file in files {
            let Some(slug) = slug_from_path(&file) else {
                continue;
            };

            match Self::load_file(&slug, &file) {
                Ok(post) => {
                    debug!("Loaded post {}", slug);
                    report.posts.push(post);
                }
                Err(e) => {
                    error!("Skipping post {}: {}", slug, e);
                    report.skipped.push(SkippedPost {
                        slug,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!("Loaded {} posts from {}, skipped {}",
            report.posts.len(), self.content_dir.display(), report.skipped.len());
        report
    }

    pub fn load_all(&self) -> Vec<Post> {
        self.load_report().posts
    }

    /// `None` when no valid post has this slug
    pub fn load_one(&self, slug: &str) -> Option<Post> {
        self.load_all().into_iter().find(|post| post.slug() == slug)
    }

    pub fn all_categories(&self) -> Vec<String> {
        categories_of(&self.load_all())
    }

    pub fn all_tags(&self) -> Vec<String> {
        tags_of(&self.load_all())
    }

    fn load_file(slug: &str, file: &Path) -> io::Result<Post> {
        let raw_text = fs::read_to_string(file)?;
        post_from_string(slug, &raw_text)
    }
}

/// Builds a post out of a raw document, rejecting it when a required field is
/// missing or the date can't be read.
pub fn post_from_string(slug: &str, raw_text: &str) -> io::Result<Post> {
    let front_matter = parse(raw_text);
    if let Some(reason) = front_matter.metadata_error {
        return Err(io::Error::new(ErrorKind::InvalidData, format!("Invalid front-matter: {}", reason)));
    }
    let metadata = validate(slug, front_matter.metadata)?;
    let image_url = resolve_image_path(&metadata.thumbnail, slug);

    Ok(Post {
        metadata,
        body: front_matter.body,
        image_url,
    })
}

fn required(value: Option<String>, key: &str) -> io::Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(io::Error::new(ErrorKind::InvalidData, format!("Missing required field `{}`", key))),
    }
}

fn validate(slug: &str, raw: RawMetadata) -> io::Result<PostMetadata> {
    let title = required(raw.title, "title")?;
    let date = required(raw.date, "date")?;
    let description = required(raw.description, "description")?;
    let thumbnail = required(raw.thumbnail, "thumbnail")?;

    let date = parse_date(&date).map_err(|e| io::Error::new(ErrorKind::InvalidData, e))?;

    Ok(PostMetadata {
        slug: slug.to_string(),
        title,
        date,
        description,
        thumbnail,
        category: raw.category.filter(|c| !c.trim().is_empty()),
        tags: raw.tags.map(TagList::into_vec),
    })
}

/// Where an image referenced by a post is published.
///
/// URLs (`http...`) and site rooted paths (`/...`) are kept, anything else
/// lives in the post's own image directory.
pub fn resolve_image_path(path: &str, slug: &str) -> String {
    if path.starts_with("http") || path.starts_with('/') {
        return path.to_string();
    }
    format!("{}/{}/{}", POST_IMAGE_PREFIX, slug, path)
}

pub fn categories_of(posts: &[Post]) -> Vec<String> {
    let categories: BTreeSet<&String> = posts.iter()
        .filter_map(|post| post.metadata.category.as_ref())
        .collect();
    categories.into_iter().cloned().collect()
}

pub fn tags_of(posts: &[Post]) -> Vec<String> {
    let tags: BTreeSet<&String> = posts.iter()
        .flat_map(|post| post.metadata.tags())
        .collect();
    tags.into_iter().cloned().collect()
}
