use std::{fs, io};
use std::path::{Path, PathBuf};

pub const POST_EXTENSION: &str = ".md";

/// Markdown files living directly in the posts directory
pub struct PostList {
    pub root_dir: PathBuf,
}

impl PostList {
    /// Files ending in `.md`, ordered by file name. Anything else is ignored.
    pub fn retrieve_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut posts = vec![];
        let entries = fs::read_dir(self.root_dir.as_path())?;
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if !file_type.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(file_name) = file_name.to_str() {
                if file_name.ends_with(POST_EXTENSION) && file_name.len() > POST_EXTENSION.len() {
                    posts.push(entry.path());
                }
            }
        }

        // read_dir order depends on the filesystem
        posts.sort();
        Ok(posts)
    }
}

/// `posts/hello-world.md` -> `hello-world`
pub fn slug_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    file_name.strip_suffix(POST_EXTENSION).map(|slug| slug.to_string())
}
