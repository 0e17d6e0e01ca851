//! Text-span tree: the rich-text body of a form.
//!
//! LIFT text is not plain text — a form body may contain inline `span`
//! markup nested to arbitrary depth, each span carrying its own language,
//! hyperlink, or style class. The tree models this without conflating
//! "is a leaf" and "has children": a node holds *either* literal text
//! *or* an ordered list of child spans, enforced at construction.
//!
//! ```text
//! Bonjour <span lang="en">Hello <span class="em">world</span></span> !
//!
//! root
//! ├── "Bonjour "
//! ├── span lang=en
//! │   ├── "Hello "
//! │   └── span class=em
//! │       └── "world"
//! └── " !"
//! ```

use smol_str::SmolStr;

use crate::error::LiftError;

/// The payload of a span node: literal text or ordered child spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanContent {
    /// A terminal text leaf.
    Text(String),
    /// An interior node with ordered children.
    Children(Vec<Span>),
}

/// One node of a form's rich-text tree.
///
/// Attributes are legal on any node; content is constrained to exactly one
/// of the two [`SpanContent`] shapes. Attaching a child to a leaf, or text
/// to an interior node, fails with [`LiftError::Span`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    lang: Option<SmolStr>,
    href: Option<String>,
    class: Option<SmolStr>,
    content: SpanContent,
}

impl Span {
    /// Create a leaf node holding literal text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            lang: None,
            href: None,
            class: None,
            content: SpanContent::Text(text.into()),
        }
    }

    /// Create an empty interior node.
    pub fn node() -> Self {
        Self {
            lang: None,
            href: None,
            class: None,
            content: SpanContent::Children(Vec::new()),
        }
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn set_lang(&mut self, lang: impl Into<SmolStr>) {
        self.lang = Some(lang.into());
    }

    pub fn set_href(&mut self, href: impl Into<String>) {
        self.href = Some(href.into());
    }

    pub fn set_class(&mut self, class: impl Into<SmolStr>) {
        self.class = Some(class.into());
    }

    pub fn content(&self) -> &SpanContent {
        &self.content
    }

    /// True if this node is a terminal text leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self.content, SpanContent::Text(_))
    }

    /// True if any of lang/href/class is set.
    pub fn has_attributes(&self) -> bool {
        self.lang.is_some() || self.href.is_some() || self.class.is_some()
    }

    /// The literal text of a leaf, or `None` for interior nodes.
    pub fn leaf_text(&self) -> Option<&str> {
        match &self.content {
            SpanContent::Text(t) => Some(t),
            SpanContent::Children(_) => None,
        }
    }

    /// The children of an interior node; empty slice for leaves.
    pub fn children(&self) -> &[Span] {
        match &self.content {
            SpanContent::Children(c) => c,
            SpanContent::Text(_) => &[],
        }
    }

    /// Append literal text to a leaf node.
    pub fn append_text(&mut self, text: &str) -> Result<(), LiftError> {
        match &mut self.content {
            SpanContent::Text(t) => {
                t.push_str(text);
                Ok(())
            }
            SpanContent::Children(_) => Err(LiftError::span(
                "cannot attach text to a span that has child spans",
            )),
        }
    }

    /// Append a child to an interior node.
    pub fn push_child(&mut self, child: Span) -> Result<(), LiftError> {
        match &mut self.content {
            SpanContent::Children(c) => {
                c.push(child);
                Ok(())
            }
            SpanContent::Text(_) => Err(LiftError::span(
                "cannot attach child spans to a text leaf",
            )),
        }
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(Span::node_count).sum::<usize>()
    }

    /// Depth-first (pre-order) traversal of this subtree, this node first.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { stack: vec![self] }
    }

    /// Reconstruct the wire markup of this node, wrapper included.
    ///
    /// Interior nodes and attributed leaves render as a `span` element;
    /// a bare leaf renders as escaped text. The root node of a form is
    /// rendered through [`Span::inner_markup`] instead, so it never gets
    /// a wrapper of its own.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.render_markup(&mut out);
        out
    }

    /// Markup of the content only, without this node's own wrapper.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        match &self.content {
            SpanContent::Text(t) => out.push_str(&escape_text(t)),
            SpanContent::Children(c) => {
                for child in c {
                    child.render_markup(&mut out);
                }
            }
        }
        out
    }

    /// All markup stripped: the concatenated text of every leaf in order.
    pub fn to_plain(&self) -> String {
        let mut out = String::new();
        self.render_plain(&mut out);
        out
    }

    fn render_markup(&self, out: &mut String) {
        let wrapped = self.has_attributes() || !self.is_leaf();
        if wrapped {
            out.push_str("<span");
            if let Some(lang) = &self.lang {
                out.push_str(" lang=\"");
                out.push_str(&escape_attr(lang));
                out.push('"');
            }
            if let Some(href) = &self.href {
                out.push_str(" href=\"");
                out.push_str(&escape_attr(href));
                out.push('"');
            }
            if let Some(class) = &self.class {
                out.push_str(" class=\"");
                out.push_str(&escape_attr(class));
                out.push('"');
            }
            out.push('>');
        }
        match &self.content {
            SpanContent::Text(t) => out.push_str(&escape_text(t)),
            SpanContent::Children(c) => {
                for child in c {
                    child.render_markup(out);
                }
            }
        }
        if wrapped {
            out.push_str("</span>");
        }
    }

    fn render_plain(&self, out: &mut String) {
        match &self.content {
            SpanContent::Text(t) => out.push_str(t),
            SpanContent::Children(c) => {
                for child in c {
                    child.render_plain(out);
                }
            }
        }
    }

    pub(crate) fn collect_languages(&self, out: &mut indexmap::IndexSet<SmolStr>) {
        if let Some(lang) = &self.lang {
            out.insert(lang.clone());
        }
        for child in self.children() {
            child.collect_languages(out);
        }
    }
}

/// Pre-order iterator over a span subtree.
pub struct DepthFirst<'a> {
    stack: Vec<&'a Span>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a Span;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for child in node.children().iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Escape text content for inclusion in an XML text body.
pub(crate) fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape an attribute value for inclusion in double quotes.
pub(crate) fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
