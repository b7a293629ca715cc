//! Cells of a draw.io graph model.

use std::fmt;

use roxmltree::Node;

use super::{
    geometry::CellGeometry,
    style::{self, StyleTokens},
    xml::{Attribute, XmlElement, XmlWriter, attributes},
};

pub(crate) const CELL_TAG: &str = "mxCell";
pub(crate) const USER_OBJECT_TAG: &str = "UserObject";

/// Identifier of a cell, unique within a document.
///
/// Loaded ids are kept as written; ids assigned by [`Document`](super::Document)
/// are decimal numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the numeric value of an id made only of ASCII digits.
    pub(crate) fn numeric(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CellId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Visual kind of a relation edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// One-way association, arrow at the target.
    Association,
    /// Association in both directions, arrows at both ends.
    Bidirectional,
    /// Inheritance from the source (child) to the target (base).
    Extends,
}

impl EdgeKind {
    pub fn style(self) -> &'static str {
        match self {
            EdgeKind::Association => style::ASSOCIATION_STYLE,
            EdgeKind::Bidirectional => style::BIDIRECTIONAL_STYLE,
            EdgeKind::Extends => style::EXTENDS_STYLE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EdgeKind::Extends => "Extends",
            EdgeKind::Association | EdgeKind::Bidirectional => "",
        }
    }

    /// Returns `true` for both association variants.
    pub fn is_association(self) -> bool {
        matches!(self, EdgeKind::Association | EdgeKind::Bidirectional)
    }

    /// Derives the kind from the arrow tokens of an edge style.
    fn from_style(tokens: &StyleTokens<'_>) -> Option<Self> {
        let start = tokens.value("startArrow").filter(|arrow| *arrow != "none");
        match (start, tokens.value("endArrow")) {
            (Some("classic"), Some("classic")) => Some(EdgeKind::Bidirectional),
            (None, Some("classic")) => Some(EdgeKind::Association),
            (None, Some("block")) => Some(EdgeKind::Extends),
            _ => None,
        }
    }
}

/// Role of a cell in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// The parentless sentinel at the top of the tree.
    Root,
    /// A layer directly below the root; top-level content is parented here.
    Layer,
    /// A class box.
    Container,
    /// A fields or methods text block inside a container.
    Item,
    /// The rule between the two blocks of a container.
    Separator,
    Edge(EdgeKind),
    /// Anything else, such as manual notes and shapes. Never modified.
    Other,
}

impl CellKind {
    pub fn edge_kind(self) -> Option<EdgeKind> {
        match self {
            CellKind::Edge(kind) => Some(kind),
            _ => None,
        }
    }
}

/// Attributes of the `UserObject` wrapping a cell, besides id, label and tooltip.
#[derive(Debug, Clone, Default, PartialEq)]
struct Wrapper {
    tag: String,
    attrs: Vec<Attribute>,
}

/// One cell of the graph model.
///
/// A cell is either a plain `mxCell`, whose label is its `value`, or an
/// `mxCell` wrapped in a `UserObject` carrying the label and a tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: CellId,
    kind: CellKind,
    wrapper: Option<Wrapper>,
    label: Option<String>,
    tooltip: Option<String>,
    style: Option<String>,
    parent: Option<CellId>,
    source: Option<CellId>,
    target: Option<CellId>,
    vertex: bool,
    edge: bool,
    geometry: Option<CellGeometry>,
    attrs: Vec<Attribute>,
    children: Vec<XmlElement>,
}

impl Cell {
    pub(crate) fn new(id: CellId, kind: CellKind, parent: Option<CellId>) -> Self {
        Self {
            id,
            kind,
            wrapper: None,
            label: None,
            tooltip: None,
            style: None,
            parent,
            source: None,
            target: None,
            vertex: false,
            edge: false,
            geometry: None,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A vertex wrapped in a `UserObject`, as used for containers and items.
    pub(crate) fn user_object(
        id: CellId,
        kind: CellKind,
        parent: CellId,
        label: &str,
        tooltip: &str,
        style: &str,
        geometry: CellGeometry,
    ) -> Self {
        Self {
            wrapper: Some(Wrapper {
                tag: USER_OBJECT_TAG.to_string(),
                attrs: Vec::new(),
            }),
            label: Some(label.to_string()),
            tooltip: Some(tooltip.to_string()),
            style: Some(style.to_string()),
            vertex: true,
            geometry: Some(geometry),
            ..Self::new(id, kind, Some(parent))
        }
    }

    pub(crate) fn edge(
        id: CellId,
        kind: EdgeKind,
        layer: CellId,
        source: CellId,
        target: CellId,
    ) -> Self {
        let geometry = match kind {
            EdgeKind::Extends => CellGeometry::edge(160.0, None),
            EdgeKind::Association | EdgeKind::Bidirectional => {
                CellGeometry::edge(50.0, Some(50.0))
            }
        };
        Self {
            label: Some(kind.label().to_string()),
            style: Some(kind.style().to_string()),
            source: Some(source),
            target: Some(target),
            edge: true,
            geometry: Some(geometry),
            ..Self::new(id, CellKind::Edge(kind), Some(layer))
        }
    }

    pub fn id(&self) -> &CellId {
        &self.id
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    /// Returns the label, from the `UserObject` or the `value` attribute.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn parent(&self) -> Option<&CellId> {
        self.parent.as_ref()
    }

    pub fn source(&self) -> Option<&CellId> {
        self.source.as_ref()
    }

    pub fn target(&self) -> Option<&CellId> {
        self.target.as_ref()
    }

    pub fn geometry(&self) -> Option<&CellGeometry> {
        self.geometry.as_ref()
    }

    pub fn is_user_object(&self) -> bool {
        self.wrapper.is_some()
    }

    /// Returns `true` if the cell is parented to `id`.
    pub fn is_child_of(&self, id: &CellId) -> bool {
        self.parent.as_ref() == Some(id)
    }

    pub(crate) fn set_kind(&mut self, kind: CellKind) {
        self.kind = kind;
    }

    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
    }

    /// Sets the tooltip, wrapping a plain cell in a `UserObject` to hold it.
    pub(crate) fn set_tooltip(&mut self, tooltip: &str) {
        self.wrap();
        self.tooltip = Some(tooltip.to_string());
    }

    pub(crate) fn set_vertex(&mut self) {
        self.vertex = true;
    }

    pub(crate) fn set_style(&mut self, style: &str) {
        self.style = Some(style.to_string());
    }

    pub(crate) fn set_endpoints(&mut self, source: CellId, target: CellId) {
        self.source = Some(source);
        self.target = Some(target);
    }

    pub(crate) fn geometry_mut(&mut self) -> &mut CellGeometry {
        self.geometry.get_or_insert_with(CellGeometry::default)
    }

    /// Moves the label of a plain cell onto a new `UserObject` wrapper.
    ///
    /// Returns `false` if the cell is already wrapped.
    pub(crate) fn wrap(&mut self) -> bool {
        if self.wrapper.is_some() {
            return false;
        }
        self.wrapper = Some(Wrapper {
            tag: USER_OBJECT_TAG.to_string(),
            attrs: Vec::new(),
        });
        if self.label.is_none() {
            self.label = Some(String::new());
        }
        true
    }

    /// Reads an `mxCell`, optionally wrapped in a `UserObject` (or `object`) element.
    ///
    /// The kind is left as [`CellKind::Other`]; it depends on the parent and
    /// is assigned once every cell is loaded.
    pub(crate) fn from_node(cell: Node<'_, '_>, wrapper: Option<Node<'_, '_>>) -> Self {
        let mut this = Self::new(CellId::new(""), CellKind::Other, None);

        if let Some(wrapper) = wrapper {
            let mut extra = Vec::new();
            for (key, value) in attributes(wrapper) {
                match key.as_str() {
                    "id" => this.id = CellId::new(value),
                    "label" => this.label = Some(value),
                    "tooltip" => this.tooltip = Some(value),
                    _ => extra.push((key, value)),
                }
            }
            this.wrapper = Some(Wrapper {
                tag: wrapper.tag_name().name().to_string(),
                attrs: extra,
            });
        }

        for (key, value) in attributes(cell) {
            match key.as_str() {
                "id" if this.wrapper.is_none() => this.id = CellId::new(value),
                "value" if this.wrapper.is_none() => this.label = Some(value),
                "style" => this.style = Some(value),
                "parent" => this.parent = Some(CellId::new(value)),
                "source" => this.source = Some(CellId::new(value)),
                "target" => this.target = Some(CellId::new(value)),
                "vertex" if value == "1" => this.vertex = true,
                "edge" if value == "1" => this.edge = true,
                _ => this.attrs.push((key, value)),
            }
        }

        for child in cell.children().filter(|child| child.is_element()) {
            if this.geometry.is_none()
                && child.has_tag_name("mxGeometry")
                && child.attribute("as") == Some("geometry")
            {
                this.geometry = Some(CellGeometry::from_node(child));
            } else {
                this.children.push(XmlElement::from_node(child));
            }
        }

        this
    }

    /// Kind implied by the cell itself, before parents are known.
    ///
    /// Items and separators are only recognised inside a container, and
    /// layers only below the root; see [`Cell::refine_kind`].
    pub(crate) fn intrinsic_kind(&self) -> CellKind {
        if self.parent.is_none() {
            return CellKind::Root;
        }
        let tokens = StyleTokens::parse(self.style.as_deref().unwrap_or_default());
        if self.edge {
            return EdgeKind::from_style(&tokens).map_or(CellKind::Other, CellKind::Edge);
        }
        if self.vertex
            && tokens.has_flag("swimlane")
            && tokens.value("childLayout") == Some("stackLayout")
        {
            return CellKind::Container;
        }
        CellKind::Other
    }

    /// Kind of the cell given the intrinsic kind of its parent.
    pub(crate) fn refine_kind(&self, parent_kind: Option<CellKind>) -> CellKind {
        match (self.kind, parent_kind) {
            (CellKind::Other, Some(CellKind::Root)) if !self.vertex && !self.edge => {
                CellKind::Layer
            }
            (CellKind::Other, Some(CellKind::Container)) if self.vertex => {
                let tokens = StyleTokens::parse(self.style.as_deref().unwrap_or_default());
                if tokens.has_flag("text") {
                    CellKind::Item
                } else if tokens.has_flag("line") {
                    CellKind::Separator
                } else {
                    CellKind::Other
                }
            }
            (kind, _) => kind,
        }
    }

    pub(crate) fn write(&self, writer: &mut XmlWriter) {
        match &self.wrapper {
            Some(wrapper) => {
                let label = self.label.as_deref().unwrap_or_default();
                let attrs = [("label", label)]
                    .into_iter()
                    .chain(self.tooltip.as_deref().map(|tooltip| ("tooltip", tooltip)))
                    .chain(wrapper.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                    .chain([("id", self.id.as_str())]);
                writer.open(&wrapper.tag, attrs);
                self.write_cell(writer);
                writer.close(&wrapper.tag);
            }
            None => self.write_cell(writer),
        }
    }

    fn write_cell(&self, writer: &mut XmlWriter) {
        let plain = self.wrapper.is_none();
        let mut attrs: Vec<(&str, &str)> = Vec::new();
        if plain {
            attrs.push(("id", self.id.as_str()));
            if let Some(label) = &self.label {
                attrs.push(("value", label.as_str()));
            }
        }
        if let Some(style) = &self.style {
            attrs.push(("style", style.as_str()));
        }
        if self.vertex {
            attrs.push(("vertex", "1"));
        }
        if self.edge {
            attrs.push(("edge", "1"));
        }
        for (key, id) in [
            ("parent", &self.parent),
            ("source", &self.source),
            ("target", &self.target),
        ] {
            if let Some(id) = id {
                attrs.push((key, id.as_str()));
            }
        }
        attrs.extend(self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        if self.geometry.is_none() && self.children.is_empty() {
            writer.empty(CELL_TAG, attrs);
            return;
        }
        writer.open(CELL_TAG, attrs);
        if let Some(geometry) = &self.geometry {
            geometry.write(writer);
        }
        for child in &self.children {
            child.write(writer);
        }
        writer.close(CELL_TAG);
    }
}
