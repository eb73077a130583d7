use std::collections::HashMap;
use std::io;
use std::io::ErrorKind;

use lazy_static::lazy_static;
use markdown::mdast::{AlignKind, Node};
use markdown::ParseOptions;
use regex::Regex;
use spdlog::{debug, warn};

use crate::content::highlight::{highlight, is_known_language};
use crate::content::POST_IMAGE_PREFIX;
use crate::text_utils::anchor_id;

/// A rendered piece of a post, ready to be displayed
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayNode {
    Element(Element),
    Text(String),
    /// Code with no detected language, the class is kept as authored
    Code { class: Option<String>, code: String },
    /// Output of the syntax highlighter
    Highlighted { language: String, html: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
    pub children: Vec<DisplayNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Element {
            tag,
            attributes: vec![],
            children: vec![],
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn children(mut self, children: Vec<DisplayNode>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for DisplayNode {
    fn from(element: Element) -> Self {
        DisplayNode::Element(element)
    }
}

/// The post container. Each direct child is revealed on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedContent {
    pub slug: String,
    pub children: Vec<DisplayNode>,
}

struct Definition {
    url: String,
    title: Option<String>,
}

struct RenderContext<'a> {
    slug: &'a str,
    definitions: HashMap<String, Definition>,
}

/// Renders a markdown body into display nodes. Relative images are resolved
/// against `slug`.
pub fn render(markdown_body: &str, slug: &str) -> io::Result<RenderedContent> {
    let root = markdown::to_mdast(markdown_body, &ParseOptions::gfm())
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.reason))?;

    let mut definitions = HashMap::new();
    collect_definitions(&root, &mut definitions);
    let context = RenderContext { slug, definitions };

    let children = match root {
        Node::Root(root) => convert_all(&root.children, &context),
        other => convert(&other, &context).into_iter().collect(),
    };

    Ok(RenderedContent {
        slug: slug.to_string(),
        children,
    })
}

fn collect_definitions(node: &Node, definitions: &mut HashMap<String, Definition>) {
    if let Node::Definition(definition) = node {
        definitions.entry(definition.identifier.clone()).or_insert(Definition {
            url: definition.url.clone(),
            title: definition.title.clone(),
        });
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_definitions(child, definitions);
        }
    }
}

fn convert_all(nodes: &[Node], context: &RenderContext) -> Vec<DisplayNode> {
    nodes.iter().filter_map(|node| convert(node, context)).collect()
}

fn element(tag: &'static str, children: &[Node], context: &RenderContext) -> Option<DisplayNode> {
    Some(Element::new(tag).children(convert_all(children, context)).into())
}

fn convert(node: &Node, context: &RenderContext) -> Option<DisplayNode> {
    match node {
        Node::Root(root) => element("div", &root.children, context),
        Node::Paragraph(paragraph) => element("p", &paragraph.children, context),
        Node::Text(text) => Some(DisplayNode::Text(text.value.clone())),
        Node::Emphasis(emphasis) => element("em", &emphasis.children, context),
        Node::Strong(strong) => element("strong", &strong.children, context),
        Node::Delete(delete) => element("del", &delete.children, context),
        Node::Blockquote(quote) => element("blockquote", &quote.children, context),
        Node::Break(_) => Some(Element::new("br").into()),
        Node::ThematicBreak(_) => Some(Element::new("hr").into()),
        // HTML written in the markdown is not rendered
        Node::Html(_) => None,
        Node::InlineCode(code) => Some(DisplayNode::Code {
            class: None,
            code: code.value.clone(),
        }),
        Node::Code(code) => Some(code_block(&code.value, code.lang.as_deref())),
        Node::Heading(heading) => Some(heading_node(heading.depth, &heading.children, context)),
        Node::Image(image) => Some(image_node(&image.url, &image.alt, image.title.as_deref(), context)),
        Node::ImageReference(reference) => {
            match context.definitions.get(&reference.identifier) {
                Some(definition) => Some(image_node(&definition.url, &reference.alt, definition.title.as_deref(), context)),
                None => Some(DisplayNode::Text(reference.alt.clone())),
            }
        }
        Node::Link(link) => Some(link_node(&link.url, link.title.as_deref(), &link.children, context)),
        Node::LinkReference(reference) => {
            match context.definitions.get(&reference.identifier) {
                Some(definition) => Some(link_node(&definition.url, definition.title.as_deref(), &reference.children, context)),
                None => element("span", &reference.children, context),
            }
        }
        Node::Definition(_) => None,
        Node::List(list) => {
            let mut ol_ul = Element::new(if list.ordered { "ol" } else { "ul" });
            if let Some(start) = list.start {
                if list.ordered && start != 1 {
                    ol_ul = ol_ul.attr("start", start.to_string());
                }
            }
            Some(ol_ul.children(convert_all(&list.children, context)).into())
        }
        Node::ListItem(item) => {
            let mut children: Vec<DisplayNode> = vec![];
            if let Some(checked) = item.checked {
                let mut checkbox = Element::new("input").attr("type", "checkbox").attr("disabled", "");
                if checked {
                    checkbox = checkbox.attr("checked", "");
                }
                children.push(checkbox.into());
            }
            for child in item.children.iter() {
                match child {
                    // Tight lists don't wrap their items in paragraphs
                    Node::Paragraph(paragraph) if !item.spread => {
                        children.extend(convert_all(&paragraph.children, context));
                    }
                    other => children.extend(convert(other, context)),
                }
            }
            Some(Element::new("li").children(children).into())
        }
        Node::Table(table) => Some(table_node(&table.children, &table.align, context)),
        Node::TableRow(row) => element("tr", &row.children, context),
        Node::TableCell(cell) => element("td", &cell.children, context),
        Node::FootnoteReference(reference) => {
            let target = Element::new("a")
                .attr("href", format!("#fn-{}", reference.identifier))
                .children(vec![DisplayNode::Text(reference.identifier.clone())]);
            Some(Element::new("sup").children(vec![target.into()]).into())
        }
        Node::FootnoteDefinition(definition) => Some(
            Element::new("div")
                .attr("id", format!("fn-{}", definition.identifier))
                .attr("class", "footnote")
                .children(convert_all(&definition.children, context))
                .into(),
        ),
        Node::Math(math) => Some(
            Element::new("pre")
                .children(vec![DisplayNode::Code {
                    class: Some(MATH_CLASS.to_string()),
                    code: math.value.clone(),
                }])
                .into(),
        ),
        Node::InlineMath(math) => Some(DisplayNode::Code {
            class: Some(MATH_CLASS.to_string()),
            code: math.value.clone(),
        }),
        Node::MdxJsxFlowElement(jsx) => element("div", &jsx.children, context),
        Node::MdxJsxTextElement(jsx) => element("span", &jsx.children, context),
        // Metadata is split off before rendering and expressions are never evaluated
        Node::Yaml(_) | Node::Toml(_) | Node::MdxjsEsm(_) | Node::MdxFlowExpression(_) | Node::MdxTextExpression(_) => None,
    }
}

const MATH_CLASS: &str = "language-math";

/// Link protocols a reader can follow. Relative links have none.
const SAFE_PROTOCOLS: [&str; 3] = ["http", "https", "mailto"];

/// `None` when the link would run something, e.g. `javascript:`
fn safe_href(url: &str) -> Option<&str> {
    let end = url.find(|c| matches!(c, '?' | '#' | '/')).unwrap_or(url.len());
    let Some(colon) = url[..end].find(':') else {
        return Some(url);
    };

    let protocol: String = url[..colon].chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if SAFE_PROTOCOLS.contains(&protocol.as_str()) {
        Some(url)
    } else {
        None
    }
}

/// `language-rust` -> `rust`
fn detect_language(class: &str) -> Option<&str> {
    lazy_static! {
        static ref LANGUAGE_REGEX: Regex = Regex::new(r"language-(\w+)").unwrap();
    }
    LANGUAGE_REGEX.captures(class)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn code_block(code: &str, info: Option<&str>) -> DisplayNode {
    let class = info.map(|lang| format!("language-{}", lang));
    let code = code.strip_suffix('\n').unwrap_or(code);

    if let Some(language) = class.as_deref().and_then(detect_language) {
        if !is_known_language(language) {
            debug!("No syntax for {}, highlighting as plain text", language);
        }
        match highlight(code, language) {
            Ok(html) => {
                return DisplayNode::Highlighted {
                    language: language.to_string(),
                    html,
                };
            }
            Err(e) => warn!("Rendering {} code without highlighting: {}", language, e),
        }
    }

    Element::new("pre")
        .children(vec![DisplayNode::Code {
            class,
            code: code.to_string(),
        }])
        .into()
}

fn heading_node(depth: u8, children: &[Node], context: &RenderContext) -> DisplayNode {
    let tag = match depth {
        1 => "h1",
        2 => "h2",
        3 => "h3",
        4 => "h4",
        5 => "h5",
        _ => "h6",
    };

    let mut text = String::new();
    for child in children {
        collect_text(child, &mut text);
    }

    Element::new(tag)
        .attr("id", anchor_id(&text))
        .children(convert_all(children, context))
        .into()
}

fn collect_text(node: &Node, text: &mut String) {
    match node {
        Node::Text(t) => text.push_str(&t.value),
        Node::InlineCode(code) => text.push_str(&code.value),
        other => {
            if let Some(children) = other.children() {
                for child in children {
                    collect_text(child, text);
                }
            }
        }
    }
}

/// Images in a post body live next to the post unless they are site rooted
pub fn resolve_body_image(src: &str, slug: &str) -> String {
    if src.starts_with('/') {
        return src.to_string();
    }
    format!("{}/{}/{}", POST_IMAGE_PREFIX, slug, src)
}

fn image_node(url: &str, alt: &str, title: Option<&str>, context: &RenderContext) -> DisplayNode {
    let mut img = Element::new("img")
        .attr("src", resolve_body_image(url, context.slug))
        .attr("alt", alt);
    if let Some(title) = title {
        img = img.attr("title", title);
    }
    img.into()
}

fn link_node(url: &str, title: Option<&str>, children: &[Node], context: &RenderContext) -> DisplayNode {
    let mut a = Element::new("a");
    match safe_href(url) {
        Some(href) => a = a.attr("href", href),
        None => warn!("Dropping link to {} in {}", url, context.slug),
    }
    if let Some(title) = title {
        a = a.attr("title", title);
    }
    a.attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
        .children(convert_all(children, context))
        .into()
}

fn table_node(rows: &[Node], align: &[AlignKind], context: &RenderContext) -> DisplayNode {
    let mut head = vec![];
    let mut body = vec![];

    for (index, row) in rows.iter().enumerate() {
        let Node::TableRow(row) = row else {
            continue;
        };
        let cell_tag = if index == 0 { "th" } else { "td" };
        let cells: Vec<DisplayNode> = row.children.iter().enumerate().map(|(column, cell)| {
            let children = cell.children().map(|c| convert_all(c, context)).unwrap_or_default();
            let mut cell = Element::new(cell_tag);
            match align.get(column) {
                Some(AlignKind::Left) => cell = cell.attr("align", "left"),
                Some(AlignKind::Right) => cell = cell.attr("align", "right"),
                Some(AlignKind::Center) => cell = cell.attr("align", "center"),
                Some(AlignKind::None) | None => {}
            }
            DisplayNode::from(cell.children(children))
        }).collect();

        let tr: DisplayNode = Element::new("tr").children(cells).into();
        if index == 0 {
            head.push(tr);
        } else {
            body.push(tr);
        }
    }

    let mut table: Vec<DisplayNode> = vec![Element::new("thead").children(head).into()];
    if !body.is_empty() {
        table.push(Element::new("tbody").children(body).into());
    }
    Element::new("table").children(table).into()
}
