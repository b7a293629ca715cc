//! Generic XML elements and the indenting writer used for draw.io files.
//!
//! Anything the document model does not interpret is kept as an
//! [`XmlElement`] and written back unchanged.

use roxmltree::Node;

/// An attribute as written in the file, in source order.
pub(crate) type Attribute = (String, String);

/// An uninterpreted element subtree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct XmlElement {
    name: String,
    attrs: Vec<Attribute>,
    children: Vec<XmlNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Copies a parsed element with its attributes, child elements and
    /// non-blank text. Comments and processing instructions are dropped.
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let children = node
            .children()
            .filter_map(|child| {
                if child.is_element() {
                    Some(XmlNode::Element(Self::from_node(child)))
                } else if child.is_text() {
                    child
                        .text()
                        .filter(|text| !text.trim().is_empty())
                        .map(|text| XmlNode::Text(text.to_string()))
                } else {
                    None
                }
            })
            .collect();

        Self {
            name: node.tag_name().name().to_string(),
            attrs: attributes(node),
            children,
        }
    }

    pub fn write(&self, writer: &mut XmlWriter) {
        let attrs = self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        match self.children.as_slice() {
            [] => writer.empty(&self.name, attrs),
            [XmlNode::Text(text)] => writer.text_element(&self.name, attrs, text),
            children => {
                writer.open(&self.name, attrs);
                for child in children {
                    match child {
                        XmlNode::Element(element) => element.write(writer),
                        XmlNode::Text(text) => writer.text(text.trim()),
                    }
                }
                writer.close(&self.name);
            }
        }
    }
}

/// Collects the attributes of `node` in source order.
///
/// Namespaced attributes keep their prefix-free local name.
pub(crate) fn attributes(node: Node<'_, '_>) -> Vec<Attribute> {
    node.attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect()
}

/// Returns `true` if `node` has non-blank text content of its own.
pub(crate) fn has_text(node: Node<'_, '_>) -> bool {
    node.children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .any(|text| !text.trim().is_empty())
}

/// Escapes a value for use inside a double-quoted attribute.
pub(crate) fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes character data.
pub(crate) fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Writes elements one per line with two-space indentation.
#[derive(Debug, Default)]
pub(crate) struct XmlWriter {
    out: String,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declaration(&mut self) {
        self.out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }

    /// Writes `<name attrs />`.
    pub fn empty<'a>(&mut self, name: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.start_tag(name, attrs);
        self.out.push_str(" />\n");
    }

    /// Writes `<name attrs>` and indents what follows.
    pub fn open<'a>(&mut self, name: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.start_tag(name, attrs);
        self.out.push_str(">\n");
        self.depth += 1;
    }

    pub fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    /// Writes `<name attrs>text</name>` on one line.
    pub fn text_element<'a>(
        &mut self,
        name: &str,
        attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
        text: &str,
    ) {
        self.start_tag(name, attrs);
        self.out.push('>');
        self.out.push_str(&escape_text(text));
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push_str(">\n");
    }

    pub fn text(&mut self, text: &str) {
        self.indent();
        self.out.push_str(&escape_text(text));
        self.out.push('\n');
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn start_tag<'a>(&mut self, name: &str, attrs: impl IntoIterator<Item = (&'a str, &'a str)>) {
        self.indent();
        self.out.push('<');
        self.out.push_str(name);
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attr(value));
            self.out.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
    }
}
