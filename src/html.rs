//! Defines the page-description tree ([`Node`], [`Element`]), the trusted
//! [`Markup`] fragment type, and the serializer that turns trees into HTML.
//!
//! Text and attribute values are always escaped. The only way to put
//! unescaped HTML into a page is a [`Node::Raw`] holding a [`Markup`], which
//! marks content the site owner wrote (rendered markdown, provider fragments,
//! previously serialized trees).

use quick_xml::escape::escape;
use std::fmt;

/// Elements which never have children or closing tags.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Elements which flow with surrounding text. A block element whose children
/// are all inline is printed on one line.
const INLINE_ELEMENTS: &[&str] = &[
    "a", "abbr", "b", "br", "code", "em", "i", "img", "input", "small", "span", "strong",
    "sub", "sup",
];

/// A fragment of HTML trusted to be emitted verbatim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wraps HTML the caller vouches for. Never pass text that originates
    /// outside the site's own sources.
    pub fn trusted<S: Into<String>>(html: S) -> Markup {
        Markup(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in a page-description tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Raw(Markup),
    Fragment(Vec<Node>),
}

/// An HTML element with ordered attributes and children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: &'static str,
    pub attrs: Vec<(&'static str, Option<String>)>,
    pub children: Vec<Node>,
}

/// Starts building an element.
pub fn el(name: &'static str) -> Element {
    Element {
        name,
        attrs: Vec::new(),
        children: Vec::new(),
    }
}

/// A text node. Escaped on output.
pub fn text<S: Into<String>>(s: S) -> Node {
    Node::Text(s.into())
}

impl Element {
    pub fn attr<S: Into<String>>(mut self, name: &'static str, value: S) -> Self {
        self.attrs.push((name, Some(value.into())));
        self
    }

    /// Adds a boolean attribute, rendered as a bare name.
    pub fn flag(mut self, name: &'static str) -> Self {
        self.attrs.push((name, None));
        self
    }

    pub fn class<S: Into<String>>(self, value: S) -> Self {
        self.attr("class", value)
    }

    pub fn child<N: Into<Node>>(mut self, node: N) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(nodes.into_iter().map(Into::into));
        self
    }

    pub fn text<S: Into<String>>(self, s: S) -> Self {
        self.child(text(s))
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name)
    }

    fn is_inline(&self) -> bool {
        INLINE_ELEMENTS.contains(&self.name)
    }

    fn write_open(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.name);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                out.push_str("=\"");
                out.push_str(&escape(value.as_str()));
                out.push('"');
            }
        }
        out.push('>');
    }

    fn write_close(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(self.name);
        out.push('>');
    }
}

impl From<Element> for Node {
    fn from(e: Element) -> Node {
        Node::Element(e)
    }
}

impl From<Markup> for Node {
    fn from(m: Markup) -> Node {
        Node::Raw(m)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Node {
        text(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Node {
        Node::Text(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(nodes: Vec<Node>) -> Node {
        Node::Fragment(nodes)
    }
}

impl Node {
    /// Serializes the tree compactly, with no whitespace added.
    pub fn render(&self) -> Markup {
        let mut out = String::new();
        self.write_compact(&mut out);
        Markup(out)
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            Node::Element(e) => {
                e.write_open(out);
                if !e.is_void() {
                    for child in &e.children {
                        child.write_compact(out);
                    }
                    e.write_close(out);
                }
            }
            Node::Text(s) => out.push_str(&escape(s.as_str())),
            Node::Raw(m) => out.push_str(m.as_str()),
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_compact(out);
                }
            }
        }
    }

    /// Whether this node can share a line with its siblings.
    fn is_inline(&self) -> bool {
        match self {
            Node::Element(e) => e.is_inline() && e.children.iter().all(Node::is_inline),
            Node::Text(_) => true,
            Node::Raw(m) => !m.as_str().contains('\n'),
            Node::Fragment(nodes) => nodes.iter().all(Node::is_inline),
        }
    }

    fn write_pretty(&self, out: &mut String, depth: usize) {
        match self {
            Node::Element(e) if e.is_void() || e.children.iter().all(Node::is_inline) => {
                indent(out, depth);
                self.write_compact(out);
                out.push('\n');
            }
            Node::Element(e) => {
                indent(out, depth);
                e.write_open(out);
                out.push('\n');
                for child in &e.children {
                    child.write_pretty(out, depth + 1);
                }
                indent(out, depth);
                e.write_close(out);
                out.push('\n');
            }
            Node::Text(s) if s.trim().is_empty() => {}
            Node::Text(_) => {
                indent(out, depth);
                self.write_compact(out);
                out.push('\n');
            }
            // Raw markup may contain whitespace-sensitive content like
            // `<pre>`, so it is never re-indented.
            Node::Raw(m) => {
                out.push_str(m.as_str());
                if !m.as_str().ends_with('\n') {
                    out.push('\n');
                }
            }
            Node::Fragment(nodes) => {
                for node in nodes {
                    node.write_pretty(out, depth);
                }
            }
        }
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// A complete HTML page.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Document {
        Document { root }
    }

    /// Serializes the page with a doctype and canonical indentation.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!doctype html>\n");
        Node::Element(self.root.clone()).write_pretty(&mut out, 0);
        out
    }
}
