use crate::content::content_renderer::{DisplayNode, Element, RenderedContent};

/// Attribute a host script looks for to fade children in and out
pub const REVEAL_ATTRIBUTE: &str = "data-reveal";

const VOID_TAGS: [&str; 4] = ["br", "hr", "img", "input"];

pub struct HtmlRenderer {}

impl HtmlRenderer {
    /// Serialises a post container. Every direct child carries the reveal
    /// attribute, children that are not elements get a `div` around them.
    pub fn render(content: &RenderedContent) -> String {
        let mut html = String::new();
        html.push_str("<article class=\"contents\">");
        for child in content.children.iter() {
            match child {
                DisplayNode::Element(element) => {
                    Self::push_element(&mut html, element, Some(REVEAL_ATTRIBUTE));
                }
                other => {
                    html.push_str("<div ");
                    html.push_str(REVEAL_ATTRIBUTE);
                    html.push('>');
                    Self::push_node(&mut html, other);
                    html.push_str("</div>");
                }
            }
        }
        html.push_str("</article>");
        html
    }

    pub fn render_nodes(nodes: &[DisplayNode]) -> String {
        let mut html = String::new();
        for node in nodes {
            Self::push_node(&mut html, node);
        }
        html
    }

    fn push_node(html: &mut String, node: &DisplayNode) {
        match node {
            DisplayNode::Element(element) => Self::push_element(html, element, None),
            DisplayNode::Text(text) => html.push_str(&escape_html(text)),
            DisplayNode::Code { class, code } => {
                match class {
                    Some(class) => {
                        html.push_str("<code class=\"");
                        html.push_str(&escape_html(class));
                        html.push_str("\">");
                    }
                    None => html.push_str("<code>"),
                }
                html.push_str(&escape_html(code));
                html.push_str("</code>");
            }
            DisplayNode::Highlighted { language, html: highlighted } => {
                html.push_str("<div class=\"code-block\" data-language=\"");
                html.push_str(&escape_html(language));
                html.push_str("\">");
                html.push_str(highlighted);
                html.push_str("</div>");
            }
        }
    }

    fn push_element(html: &mut String, element: &Element, flag: Option<&str>) {
        html.push('<');
        html.push_str(element.tag);
        for (name, value) in element.attributes.iter() {
            html.push(' ');
            html.push_str(name);
            if !value.is_empty() {
                html.push_str("=\"");
                html.push_str(&escape_html(value));
                html.push('"');
            }
        }
        if let Some(flag) = flag {
            html.push(' ');
            html.push_str(flag);
        }

        if VOID_TAGS.contains(&element.tag) {
            html.push_str(" />");
            return;
        }

        html.push('>');
        for child in element.children.iter() {
            Self::push_node(html, child);
        }
        html.push_str("</");
        html.push_str(element.tag);
        html.push('>');
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use crate::content::content_renderer::render;

    use super::*;

    #[test]
    fn test_render_container() {
        let content = render("# Hello   World\n\nSee [docs](https://example.com).", "post").unwrap();
        let html = HtmlRenderer::render(&content);
        assert_eq!(html, concat!(
            "<article class=\"contents\">",
            "<h1 id=\"hello-world\" data-reveal>Hello   World</h1>",
            "<p data-reveal>See <a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">docs</a>.</p>",
            "</article>"
        ));
    }

    #[test]
    fn test_non_elements_are_wrapped() {
        let content = RenderedContent {
            slug: "post".to_string(),
            children: vec![DisplayNode::Text("loose <text>".to_string())],
        };
        let html = HtmlRenderer::render(&content);
        assert_eq!(html, "<article class=\"contents\"><div data-reveal>loose &lt;text&gt;</div></article>");
    }

    #[test]
    fn test_no_script_reaches_the_page() {
        let content = render("[click](javascript:alert(1))\n\n<script>alert(2)</script>\n\nHi <img src=x onerror=alert(3)>", "post").unwrap();
        let html = HtmlRenderer::render(&content);
        assert!(!html.contains("javascript"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("onerror"));
        assert!(html.contains("<p data-reveal><a target=\"_blank\" rel=\"noopener noreferrer\">click</a></p>"));
    }

    #[test]
    fn test_escaping() {
        let content = render("a < b & \"c\"\n\n`<T>`", "post").unwrap();
        let html = HtmlRenderer::render_nodes(&content.children);
        assert_eq!(html, "<p>a &lt; b &amp; &quot;c&quot;</p><p><code>&lt;T&gt;</code></p>");
    }

    #[test]
    fn test_void_elements() {
        let content = render("![pic](pic.png)\n\n---", "shots").unwrap();
        let html = HtmlRenderer::render_nodes(&content.children);
        assert_eq!(html, "<p><img src=\"/img/posts/shots/pic.png\" alt=\"pic\" /></p><hr />");
    }

    #[test]
    fn test_highlighted_code() {
        let content = render("```rust\nlet x = 1;\n```", "post").unwrap();
        let html = HtmlRenderer::render(&content);
        assert!(html.starts_with("<article class=\"contents\"><div data-reveal><div class=\"code-block\" data-language=\"rust\"><pre"));
        assert!(html.ends_with("</div></div></article>"));
    }
}
