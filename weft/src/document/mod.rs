//! Abstract view of the declarative source tree.
//!
//! The pipeline never touches a concrete host document. It walks a
//! `SourceTree` through a visitor, and any backend that can present its
//! markup as `FragmentNode` values participates. The in-memory tree below
//! is the reference backend and the one the tests use.

use std::collections::HashMap;

use url::Url;

/// One node of the declarative source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<FragmentNode>,
    pub text: Option<String>,
}

impl FragmentNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: FragmentNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    fn attribute_eq_ignore_case(&self, name: &str, expected: &str) -> bool {
        self.attribute(name)
            .map(|v| v.eq_ignore_ascii_case(expected))
            .unwrap_or(false)
    }

    /// Depth-first traversal of this node and everything beneath it.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a FragmentNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// An import fragment: `link` with `rel=import`, `type=text/html` and `href`.
pub fn is_html_import(node: &FragmentNode) -> bool {
    node.tag.eq_ignore_ascii_case("link")
        && node.attribute_eq_ignore_case("rel", "import")
        && node.attribute_eq_ignore_case("type", "text/html")
        && node.attribute("href").is_some()
}

/// A template fragment: the inert container holding component sources.
pub fn is_template(node: &FragmentNode) -> bool {
    node.tag.eq_ignore_ascii_case("template")
}

/// Script references beneath `node`, in document order.
pub fn script_references(node: &FragmentNode) -> Vec<&FragmentNode> {
    let mut scripts = Vec::new();
    node.walk(&mut |n| {
        if n.tag.eq_ignore_ascii_case("script") && n.attribute("src").is_some() {
            scripts.push(n);
        }
    });
    scripts
}

/// Which treatment a style source needs before injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Css,
    /// Preprocessed style; the body passes through the compiler capability.
    Scss,
}

/// One style source of a component, as discovered in its template content.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleSource {
    /// Inline style block; injected directly, no cache interaction.
    Inline(String),
    /// External stylesheet reference, resolved through the path strategy
    /// and the fetch cache.
    External { href: String, kind: StyleKind },
}

/// Style sources beneath `node`, in document order: stylesheet links and
/// inline style blocks.
pub fn style_sources(node: &FragmentNode) -> Vec<StyleSource> {
    let mut sources = Vec::new();
    node.walk(&mut |n| {
        if n.tag.eq_ignore_ascii_case("link") && n.attribute_eq_ignore_case("rel", "stylesheet") {
            if let Some(href) = n.attribute("href") {
                let kind = if n.attribute_eq_ignore_case("type", "text/scss") {
                    StyleKind::Scss
                } else {
                    StyleKind::Css
                };
                sources.push(StyleSource::External {
                    href: href.to_string(),
                    kind,
                });
            }
        } else if n.tag.eq_ignore_ascii_case("style") {
            sources.push(StyleSource::Inline(n.text.clone().unwrap_or_default()));
        }
    });
    sources
}

/// Visitor over a source tree's nodes.
pub trait FragmentVisitor {
    fn visit_node(&mut self, node: &FragmentNode);
}

/// Pluggable backend presenting declarative markup to the pipeline.
pub trait SourceTree: Send + Sync {
    fn visit(&self, visitor: &mut dyn FragmentVisitor);
}

/// Reference backend holding the tree in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryTree {
    roots: Vec<FragmentNode>,
}

impl InMemoryTree {
    pub fn new(roots: Vec<FragmentNode>) -> Self {
        Self { roots }
    }

    pub fn push(&mut self, node: FragmentNode) {
        self.roots.push(node);
    }
}

impl SourceTree for InMemoryTree {
    fn visit(&self, visitor: &mut dyn FragmentVisitor) {
        for root in &self.roots {
            root.walk(&mut |node| visitor.visit_node(node));
        }
    }
}

/// A structural change observed in the source tree.
#[derive(Debug, Clone)]
pub enum TreeMutation {
    Inserted(FragmentNode),
}

/// The loaded content of an import fragment.
#[derive(Debug, Clone)]
pub struct ImportedDocument {
    /// Base URL the import's own references resolve against.
    pub base_url: Url,
    pub root: FragmentNode,
}
