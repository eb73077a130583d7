use std::fmt;

use gray_matter::engine::{Engine, YAML};
use gray_matter::{Matter, Pod};
use serde::{Deserialize, Deserializer};

const DELIMITER: &str = "---";

/// Metadata block as authored. Nothing is validated here, the post loader
/// decides what is required.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct RawMetadata {
    #[serde(default, deserialize_with = "scalar_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub category: Option<String>,
    pub tags: Option<TagList>,
}

/// Any YAML scalar. `title: 1984` is as good a title as `title: "1984"`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Flag(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(text) => f.write_str(text),
            Scalar::Integer(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Flag(b) => write!(f, "{}", b),
        }
    }
}

fn scalar_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let scalar = Option::<Scalar>::deserialize(deserializer)?;
    Ok(scalar.map(|s| s.to_string()))
}

/// `tags: rust` and `tags: [rust, web]` are both accepted
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TagList {
    One(Scalar),
    Many(Vec<Scalar>),
}

impl TagList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            TagList::One(tag) => vec![tag.to_string()],
            TagList::Many(tags) => tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub metadata: RawMetadata,
    /// Why the metadata block could not be read. `metadata` is empty then.
    pub metadata_error: Option<String>,
    pub body: String,
}

impl FrontMatter {
    fn body_only(body: &str) -> Self {
        FrontMatter {
            metadata: RawMetadata::default(),
            metadata_error: None,
            body: body.trim().to_string(),
        }
    }
}

/// YAML engine that never fails. A block the YAML parser rejects is kept as
/// text, so the split between block and body still happens.
struct LenientYaml;

impl Engine for LenientYaml {
    fn parse(content: &str) -> gray_matter::Result<Pod> {
        Ok(YAML::parse(content).unwrap_or_else(|_| Pod::String(content.to_string())))
    }
}

/// A first line of `---` with no closing line
fn is_unclosed_block(raw_text: &str) -> bool {
    match raw_text.split_once('\n') {
        Some((first_line, rest)) => {
            first_line.trim_end() == DELIMITER && !rest.lines().any(|line| line.trim_end() == DELIMITER)
        }
        None => false,
    }
}

/// Splits a raw document into its metadata block and trimmed body. Never
/// fails and never drops the body.
///
/// A document without a leading `---` block is all body, and so is one whose
/// block is never closed (the opening rule is kept). A block that cannot be
/// read as [`RawMetadata`] leaves the metadata empty and sets
/// `metadata_error`.
pub fn parse(raw_text: &str) -> FrontMatter {
    if raw_text.len() <= DELIMITER.len() || is_unclosed_block(raw_text) {
        return FrontMatter::body_only(raw_text);
    }

    let parsed = match Matter::<LenientYaml>::new().parse::<Pod>(raw_text) {
        Ok(parsed) => parsed,
        Err(e) => {
            let mut front_matter = FrontMatter::body_only(raw_text);
            front_matter.metadata_error = Some(e.to_string());
            return front_matter;
        }
    };

    let (metadata, metadata_error) = match parsed.data {
        None => (RawMetadata::default(), None),
        Some(pod) => match pod.deserialize::<RawMetadata>() {
            Ok(metadata) => (metadata, None),
            Err(e) => {
                // Unreadable YAML was kept as text, report the parser's error
                let reason = match YAML::parse(&parsed.matter) {
                    Err(yaml_error) => yaml_error.to_string(),
                    Ok(_) => e.to_string(),
                };
                (RawMetadata::default(), Some(reason))
            }
        },
    };

    FrontMatter {
        metadata,
        metadata_error,
        body: parsed.content.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_DATA_MD;

    use super::*;

    #[test]
    fn test_parse_front_matter() {
        let parsed = parse(POST_DATA_MD);
        let metadata = parsed.metadata;
        assert_eq!(metadata.title.as_deref(), Some("What I learned as a product designer at Apple."));
        assert_eq!(metadata.date.as_deref(), Some("2022-12-30"));
        assert_eq!(metadata.description.as_deref(), Some("Notes from three years of shipping hardware and software."));
        assert_eq!(metadata.thumbnail.as_deref(), Some("thumbnail.jpg"));
        assert_eq!(metadata.category.as_deref(), Some("Technology"));
        assert_eq!(
            metadata.tags.map(TagList::into_vec),
            Some(vec!["design".to_string(), "apple".to_string(), "product".to_string()])
        );

        assert!(parsed.body.starts_with("How to be a great product designer?"));
        assert!(parsed.body.ends_with("weakest points."));
        assert!(!parsed.body.contains("thumbnail: thumbnail.jpg"));
        assert!(parsed.body.contains("## Non technical"));
    }

    #[test]
    fn test_parse_without_front_matter() {
        let raw = "\n\n# Just content\n\nA paragraph.\n\n";
        let parsed = parse(raw);
        assert_eq!(parsed.metadata, RawMetadata::default());
        assert_eq!(parsed.body, "# Just content\n\nA paragraph.");
    }

    #[test]
    fn test_parse_empty_document() {
        let parsed = parse("");
        assert_eq!(parsed.metadata, RawMetadata::default());
        assert_eq!(parsed.body, "");
    }

    #[test]
    fn test_single_tag_is_a_list() {
        let raw = "---\ntitle: One tag\ntags: rust\n---\nBody";
        let parsed = parse(raw);
        assert_eq!(parsed.metadata.tags.map(TagList::into_vec), Some(vec!["rust".to_string()]));
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_optional_fields_missing() {
        let raw = "---\ntitle: Only a title\n---\n\nBody text\n";
        let parsed = parse(raw);
        assert_eq!(parsed.metadata.title.as_deref(), Some("Only a title"));
        assert!(parsed.metadata.date.is_none());
        assert!(parsed.metadata.category.is_none());
        assert!(parsed.metadata.tags.is_none());
        assert_eq!(parsed.body, "Body text");
    }

    #[test]
    fn test_wrong_shape_keeps_body() {
        let raw = "---\ntitle:\n  - not\n  - a string\n---\nBody";
        let parsed = parse(raw);
        assert!(parsed.metadata_error.is_some());
        assert_eq!(parsed.metadata, RawMetadata::default());
        assert_eq!(parsed.body, "Body");
    }

    #[test]
    fn test_block_that_is_not_a_mapping_keeps_body() {
        let parsed = parse("---\njust a string\n---\nBody para");
        assert!(parsed.metadata_error.is_some());
        assert_eq!(parsed.body, "Body para");
    }

    #[test]
    fn test_malformed_yaml_keeps_body() {
        let parsed = parse("---\ntitle: [never closed\n---\n\nFirst para\n\nSecond para\n");
        assert!(parsed.metadata_error.is_some());
        assert_eq!(parsed.body, "First para\n\nSecond para");
    }

    #[test]
    fn test_unclosed_block_is_all_body() {
        let raw = "---\nIntro after a rule\n\nMore body\n";
        let parsed = parse(raw);
        assert_eq!(parsed.metadata, RawMetadata::default());
        assert!(parsed.metadata_error.is_none());
        assert_eq!(parsed.body, "---\nIntro after a rule\n\nMore body");
    }

    #[test]
    fn test_short_document_is_all_body() {
        assert_eq!(parse("Hi").body, "Hi");
        assert_eq!(parse("---").body, "---");
    }

    #[test]
    fn test_numeric_scalars_are_text() {
        let raw = "---\ntitle: 1984\ndate: 2024-01-01\ndescription: 3.5\nthumbnail: true\ntags: [2023, rust]\n---\nBody";
        let parsed = parse(raw);
        assert!(parsed.metadata_error.is_none());
        let metadata = parsed.metadata;
        assert_eq!(metadata.title.as_deref(), Some("1984"));
        assert_eq!(metadata.date.as_deref(), Some("2024-01-01"));
        assert_eq!(metadata.description.as_deref(), Some("3.5"));
        assert_eq!(metadata.thumbnail.as_deref(), Some("true"));
        assert_eq!(metadata.tags.map(TagList::into_vec), Some(vec!["2023".to_string(), "rust".to_string()]));

        let parsed = parse("---\ntags: 2024\n---\nBody");
        assert_eq!(parsed.metadata.tags.map(TagList::into_vec), Some(vec!["2024".to_string()]));
    }
}
