//! In-memory model of a draw.io class diagram.
//!
//! A [`Document`] holds the cells of the first page of a `.drawio` file as a
//! flat list; the tree is expressed through parent ids. Every cell is given a
//! [`CellKind`] when it is loaded or created, and the reconciliation engine
//! only ever touches cells by kind. Cells of kind [`CellKind::Other`], unknown
//! attributes, unknown child elements, further pages and anything else the
//! model does not interpret are written back unchanged.
//!
//! All lookups are linear scans in document order.

mod cell;
mod geometry;
mod load;
mod style;
mod write;
mod xml;

use std::{
    collections::HashSet,
    fs,
    io::{self, Write},
    path::Path,
};

use log::{debug, info, trace};
use tempfile::NamedTempFile;
use thiserror::Error;

use umlsync_core::{
    descriptor::ClassDescriptor,
    geometry::{Point, Size},
};

pub use cell::{Cell, CellId, CellKind, EdgeKind};
pub use geometry::{CellGeometry, GeometryUpdate};
pub use style::{
    ASSOCIATION_STYLE, BIDIRECTIONAL_STYLE, CONTAINER_STYLE, EXTENDS_STYLE, ITEM_STYLE,
    SEPARATOR_STYLE, StyleTokens,
};

use xml::{Attribute, XmlElement};

/// Height of the rule between the fields and methods blocks.
pub const SEPARATOR_HEIGHT: f32 = 2.0;

/// Structural problems of an existing diagram file.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("expected an <mxfile> root element, found <{0}>")]
    UnexpectedRoot(String),

    #[error("missing <{0}> element")]
    MissingElement(&'static str),

    #[error("the diagram page is compressed; disable compression in draw.io and save again")]
    CompressedPage,

    #[error("found a cell without an id")]
    MissingCellId,
}

/// Errors raised while opening or saving a [`Document`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("failed to replace diagram file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Everything around the cells: the file, page and graph model elements.
#[derive(Debug, Clone)]
struct Envelope {
    file_attrs: Vec<Attribute>,
    diagram_attrs: Vec<Attribute>,
    diagram_extras: Vec<XmlElement>,
    model_attrs: Vec<Attribute>,
    model_extras: Vec<XmlElement>,
    other_pages: Vec<XmlElement>,
}

impl Envelope {
    fn new() -> Self {
        let pairs = |pairs: &[(&str, &str)]| -> Vec<Attribute> {
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect()
        };

        let agent = format!("umlsync {}", env!("CARGO_PKG_VERSION"));
        let diagram_id = format!("{:020}", rand::random::<u64>());

        Self {
            file_attrs: pairs(&[
                ("host", "umlsync"),
                ("agent", agent.as_str()),
                ("version", "21.6.5"),
                ("type", "device"),
            ]),
            diagram_attrs: pairs(&[("name", "Page-1"), ("id", diagram_id.as_str())]),
            diagram_extras: Vec::new(),
            model_attrs: pairs(&[
                ("dx", "2037"),
                ("dy", "830"),
                ("grid", "1"),
                ("gridSize", "10"),
                ("guides", "1"),
                ("toolTips", "1"),
                ("connect", "1"),
                ("arrows", "1"),
                ("fold", "1"),
                ("page", "1"),
                ("pageScale", "1"),
                ("pageWidth", "850"),
                ("pageHeight", "1100"),
                ("math", "0"),
                ("shadow", "0"),
            ]),
            model_extras: Vec::new(),
            other_pages: Vec::new(),
        }
    }
}

/// The first page of a draw.io file.
///
/// # Examples
///
/// ```
/// # use umlsync::document::{CellKind, Document};
/// let document = Document::new();
/// let kinds: Vec<_> = document.cells().iter().map(|cell| cell.kind()).collect();
///
/// assert_eq!(kinds, [CellKind::Root, CellKind::Layer]);
/// assert_eq!(document.layer().as_str(), "1");
/// ```
#[derive(Debug, Clone)]
pub struct Document {
    envelope: Envelope,
    cells: Vec<Cell>,
    foreign: Vec<XmlElement>,
    layer: CellId,
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty diagram with the root cell `0` and the layer `1`.
    pub fn new() -> Self {
        let root = CellId::new("0");
        let layer = CellId::new("1");
        Self {
            envelope: Envelope::new(),
            cells: vec![
                Cell::new(root.clone(), CellKind::Root, None),
                Cell::new(layer.clone(), CellKind::Layer, Some(root)),
            ],
            foreign: Vec::new(),
            layer,
            next_id: 2,
        }
    }

    /// Parses the content of a draw.io file.
    ///
    /// # Errors
    ///
    /// Returns a [`FormatError`] if the XML is malformed, the root element is
    /// not `mxfile`, the `diagram`, `mxGraphModel` or `root` element is
    /// missing, or the page is stored compressed.
    pub fn parse(xml: &str) -> Result<Self, FormatError> {
        load::parse(xml)
    }

    /// Loads the diagram at `path`, or creates an empty one if there is no file.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Io`] if the file exists but cannot be read,
    /// and [`DocumentError::Format`] if it is not a usable draw.io file.
    pub fn open_or_initialize(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path:? = path; "Creating new diagram");
            return Ok(Self::new());
        }

        info!(path:? = path; "Opening existing diagram");
        let xml = fs::read_to_string(path)?;
        Ok(Self::parse(&xml)?)
    }

    /// Serializes the document with two-space indentation.
    ///
    /// The output only depends on the document content.
    pub fn to_xml_string(&self) -> String {
        write::to_xml_string(self)
    }

    /// Writes the document to `path`.
    ///
    /// The content goes to a temporary file in the same directory which then
    /// replaces `path`, so a failed save leaves any previous file intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(self.to_xml_string().as_bytes())?;
        file.flush()?;
        file.persist(path)?;

        info!(path:? = path, cells = self.cells.len(); "Diagram saved");
        Ok(())
    }

    /// Id of the layer holding containers and edges.
    pub fn layer(&self) -> &CellId {
        &self.layer
    }

    /// All cells in document order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, id: &CellId) -> Option<&Cell> {
        self.cells.iter().find(|cell| cell.id() == id)
    }

    /// Returns the first cell matching `predicate`.
    pub fn find_cell(&self, predicate: impl Fn(&Cell) -> bool) -> Option<&Cell> {
        self.cells.iter().find(|cell| predicate(cell))
    }

    /// Iterates over every cell matching `predicate`.
    pub fn cells_matching<'a>(
        &'a self,
        predicate: impl Fn(&Cell) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter().filter(move |cell| predicate(cell))
    }

    /// Iterates over the direct children of `id`.
    pub fn children_of<'a>(&'a self, id: &'a CellId) -> impl Iterator<Item = &'a Cell> + 'a {
        self.cells.iter().filter(move |cell| cell.is_child_of(id))
    }

    /// Finds the first edge going from `source` to `target` whose kind passes `filter`.
    ///
    /// Direction matters: an edge `target -> source` is not returned.
    pub fn find_edge(
        &self,
        source: &CellId,
        target: &CellId,
        filter: impl Fn(EdgeKind) -> bool,
    ) -> Option<&Cell> {
        self.cells.iter().find(|cell| {
            cell.kind().edge_kind().is_some_and(&filter)
                && cell.source() == Some(source)
                && cell.target() == Some(target)
        })
    }

    /// Adds a class container on the layer.
    ///
    /// Its label is the descriptor's full name, the identity used to find the
    /// container again in later runs.
    pub fn create_container(
        &mut self,
        descriptor: &ClassDescriptor,
        size: Size,
        position: Point,
    ) -> CellId {
        let id = self.allocate_id();
        let geometry = CellGeometry::new(position.x(), position.y(), size.width(), size.height());
        let cell = Cell::user_object(
            id.clone(),
            CellKind::Container,
            self.layer.clone(),
            &descriptor.full_name(),
            descriptor.class_tooltip(),
            CONTAINER_STYLE,
            geometry,
        );
        self.insert(cell);
        id
    }

    /// Adds a text block to a container, at `x = 0` and the given offset.
    pub fn create_item(
        &mut self,
        text: &str,
        tooltip: &str,
        parent: &CellId,
        y: f32,
        width: f32,
        height: f32,
    ) -> CellId {
        let id = self.allocate_id();
        let cell = Cell::user_object(
            id.clone(),
            CellKind::Item,
            parent.clone(),
            text,
            tooltip,
            ITEM_STYLE,
            CellGeometry::new(0.0, y, width, height),
        );
        self.insert(cell);
        id
    }

    /// Adds a separator line to a container, at `x = 0` and the given offset.
    pub fn create_separator(&mut self, parent: &CellId, y: f32, width: f32) -> CellId {
        let id = self.allocate_id();
        let mut cell = Cell::new(id.clone(), CellKind::Separator, Some(parent.clone()));
        cell.set_label("");
        cell.set_style(SEPARATOR_STYLE);
        cell.set_vertex();
        cell.geometry_mut().apply(
            GeometryUpdate::new()
                .with_x(0.0)
                .with_y(y)
                .with_width(width)
                .with_height(SEPARATOR_HEIGHT),
        );
        self.insert(cell);
        id
    }

    /// Adds an edge of `kind` from `source` to `target` on the layer.
    pub fn create_edge(&mut self, kind: EdgeKind, source: &CellId, target: &CellId) -> CellId {
        let id = self.allocate_id();
        let cell = Cell::edge(
            id.clone(),
            kind,
            self.layer.clone(),
            source.clone(),
            target.clone(),
        );
        self.insert(cell);
        id
    }

    /// Sets the label of a cell. Returns `true` if it changed.
    pub fn set_label(&mut self, id: &CellId, label: &str) -> bool {
        match self.cell_mut(id) {
            Some(cell) if cell.label() != Some(label) => {
                cell.set_label(label);
                true
            }
            _ => false,
        }
    }

    /// Sets the tooltip of a cell. Returns `true` if it changed.
    ///
    /// A plain cell is wrapped in a `UserObject` first.
    pub fn set_tooltip(&mut self, id: &CellId, tooltip: &str) -> bool {
        match self.cell_mut(id) {
            Some(cell) if cell.tooltip() != Some(tooltip) => {
                cell.set_tooltip(tooltip);
                true
            }
            _ => false,
        }
    }

    /// Applies a partial geometry change. Returns `true` if anything changed.
    pub fn set_geometry(&mut self, id: &CellId, update: GeometryUpdate) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };
        let before = cell.geometry().cloned();
        cell.geometry_mut().apply(update);
        cell.geometry() != before.as_ref()
    }

    /// Changes the kind of an edge, restyling it. Returns `true` if it changed.
    pub fn set_edge_kind(&mut self, id: &CellId, kind: EdgeKind) -> bool {
        match self.cell_mut(id) {
            Some(cell) if cell.kind().edge_kind().is_some_and(|current| current != kind) => {
                cell.set_kind(CellKind::Edge(kind));
                cell.set_style(kind.style());
                true
            }
            _ => false,
        }
    }

    /// Swaps the source and target of an edge. Returns `false` if `id` is not an edge.
    pub fn reverse_edge(&mut self, id: &CellId) -> bool {
        let Some(cell) = self.cell_mut(id) else {
            return false;
        };
        match (cell.source().cloned(), cell.target().cloned()) {
            (Some(source), Some(target)) => {
                cell.set_endpoints(target, source);
                true
            }
            _ => false,
        }
    }

    /// Removes a single cell. Removing an absent id is a no-op.
    pub fn remove_cell(&mut self, id: &CellId) -> Option<Cell> {
        let idx = self.cells.iter().position(|cell| cell.id() == id)?;
        let cell = self.cells.remove(idx);
        trace!(id:% = id, kind:? = cell.kind(); "Cell removed");
        Some(cell)
    }

    /// Removes a cell with all its descendants and every edge attached to
    /// any removed cell. Returns the removed cells in document order.
    pub fn remove_subtree(&mut self, id: &CellId) -> Vec<Cell> {
        if self.cell(id).is_none() {
            return Vec::new();
        }

        let mut doomed: HashSet<CellId> = HashSet::from([id.clone()]);
        loop {
            let before = doomed.len();
            for cell in &self.cells {
                let attached = cell.parent().is_some_and(|parent| doomed.contains(parent))
                    || cell.source().is_some_and(|source| doomed.contains(source))
                    || cell.target().is_some_and(|target| doomed.contains(target));
                if attached {
                    doomed.insert(cell.id().clone());
                }
            }
            if doomed.len() == before {
                break;
            }
        }

        let (removed, kept): (Vec<Cell>, Vec<Cell>) = std::mem::take(&mut self.cells)
            .into_iter()
            .partition(|cell| doomed.contains(cell.id()));
        self.cells = kept;
        debug!(id:% = id, removed = removed.len(); "Subtree removed");
        removed
    }

    /// Wraps labelled plain containers and items in `UserObject`s so that they
    /// can carry tooltips. Returns the number of migrated cells.
    pub fn migrate_to_user_objects(&mut self) -> usize {
        let mut migrated = 0;
        for cell in &mut self.cells {
            let owned = matches!(cell.kind(), CellKind::Container | CellKind::Item);
            let labelled = cell.label().is_some_and(|label| !label.is_empty());
            if owned && labelled && cell.wrap() {
                migrated += 1;
            }
        }
        if migrated > 0 {
            info!(cells = migrated; "Migrated legacy cells to user objects");
        }
        migrated
    }

    fn from_parts(envelope: Envelope, cells: Vec<Cell>, foreign: Vec<XmlElement>) -> Self {
        let next_id = cells
            .iter()
            .filter_map(|cell| cell.id().numeric())
            .max()
            .map_or(2, |max| max.saturating_add(1).max(2));

        let mut document = Self {
            envelope,
            cells,
            foreign,
            layer: CellId::new(""),
            next_id,
        };
        document.layer = document.ensure_layer();
        document
    }

    /// Returns the first layer, adding a root and a layer cell if missing.
    fn ensure_layer(&mut self) -> CellId {
        if let Some(layer) = self.find_cell(|cell| cell.kind() == CellKind::Layer) {
            return layer.id().clone();
        }

        let root = match self.find_cell(|cell| cell.kind() == CellKind::Root) {
            Some(root) => root.id().clone(),
            None => {
                let id = self.allocate_id();
                self.cells.insert(0, Cell::new(id.clone(), CellKind::Root, None));
                id
            }
        };
        let layer = self.allocate_id();
        let position = self
            .cells
            .iter()
            .position(|cell| cell.id() == &root)
            .map_or(0, |idx| idx + 1);
        self.cells.insert(
            position,
            Cell::new(layer.clone(), CellKind::Layer, Some(root)),
        );
        debug!(layer:% = layer; "Added missing layer");
        layer
    }

    fn allocate_id(&mut self) -> CellId {
        let id = CellId::new(self.next_id.to_string());
        self.next_id += 1;
        id
    }

    fn insert(&mut self, cell: Cell) {
        trace!(id:% = cell.id(), kind:? = cell.kind(); "Cell created");
        self.cells.push(cell);
    }

    fn cell_mut(&mut self, id: &CellId) -> Option<&mut Cell> {
        self.cells.iter_mut().find(|cell| cell.id() == id)
    }

    fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    fn foreign(&self) -> &[XmlElement] {
        &self.foreign
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    const SAVED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mxfile host="umlsync" agent="test" version="21.6.5" type="device">
  <diagram name="Page-1" id="abc">
    <mxGraphModel dx="2037" dy="830" grid="1">
      <root>
        <mxCell id="0" />
        <mxCell id="1" parent="0" />
        <UserObject label="Player" tooltip="Hero" id="2">
          <mxCell style="swimlane;childLayout=stackLayout;" vertex="1" parent="1">
            <mxGeometry x="50" y="50" width="118" height="74" as="geometry" />
          </mxCell>
        </UserObject>
        <UserObject label="- hp: int" tooltip="" id="3">
          <mxCell style="text;" vertex="1" parent="2">
            <mxGeometry y="40" width="118" height="34" as="geometry" />
          </mxCell>
        </UserObject>
        <mxCell id="note-1" value="Remember &amp;lt;this&amp;gt;" style="shape=note;" vertex="1" parent="1">
          <mxGeometry x="400" y="20" width="120" height="60" as="geometry" />
        </mxCell>
        <mxCell id="9" style="curved=1;endArrow=classic;html=1;rounded=0;" edge="1" parent="1" source="2" target="note-1">
          <mxGeometry width="50" height="50" relative="1" as="geometry">
            <mxPoint as="sourcePoint" />
            <mxPoint as="targetPoint" />
            <Array as="points">
              <mxPoint x="10" y="20" />
            </Array>
          </mxGeometry>
        </mxCell>
        <placeholder kind="x" />
      </root>
    </mxGraphModel>
  </diagram>
  <diagram name="Page-2" id="def">
    <mxGraphModel>
      <root>
        <mxCell id="0" />
      </root>
    </mxGraphModel>
  </diagram>
</mxfile>
"#;

    fn saved() -> Document {
        Document::parse(SAVED).expect("valid document")
    }

    fn id(value: &str) -> CellId {
        CellId::new(value)
    }

    #[test]
    fn test_parse_and_write_is_lossless() {
        assert_eq!(saved().to_xml_string(), SAVED);
    }

    #[test]
    fn test_parse_assigns_kinds() {
        let document = saved();
        let kinds: Vec<_> = document.cells().iter().map(Cell::kind).collect();

        assert_eq!(
            kinds,
            [
                CellKind::Root,
                CellKind::Layer,
                CellKind::Container,
                CellKind::Item,
                CellKind::Other,
                CellKind::Edge(EdgeKind::Association),
            ]
        );
        assert_eq!(document.layer(), &id("1"));
    }

    #[test]
    fn test_new_document_envelope() {
        let xml = Document::new().to_xml_string();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<mxfile host=\"umlsync\""));
        assert!(xml.contains("<diagram name=\"Page-1\" id=\""));
        assert!(xml.contains("pageWidth=\"850\" pageHeight=\"1100\" math=\"0\" shadow=\"0\""));
        assert!(xml.contains("<mxCell id=\"0\" />\n        <mxCell id=\"1\" parent=\"0\" />"));
    }

    #[test]
    fn test_new_ids_start_above_loaded_ids() {
        let mut document = saved();
        let container = document.find_cell(|cell| cell.kind() == CellKind::Container).unwrap().id().clone();

        let separator = document.create_separator(&container, 74.0, 118.0);
        let edge = document.create_edge(EdgeKind::Extends, &container, &id("note-1"));

        assert_eq!(separator, id("10"));
        assert_eq!(edge, id("11"));
    }

    #[test]
    fn test_format_errors() {
        let cases = [
            ("<mxfile", "malformed"),
            ("<svg/>", "root"),
            ("<mxfile/>", "diagram"),
            ("<mxfile><diagram/></mxfile>", "mxGraphModel"),
            ("<mxfile><diagram><mxGraphModel/></diagram></mxfile>", "root"),
            ("<mxfile><diagram>7VhNb9sgGP41Pm4yYCfNcU22dYdKk3roeqQxsdEwWBgnzn79cAHHX6kStdWqaZcI3o8HeJ/nBZEALYvmuyRVeScyyiMYZ02AVhGEMJ0j8+UshwAFaEk00PKn/i0saH0zqQtx4oyXyHo7Fq5F0pY0b17PZLhGdsa4uzyFDJbd3QsJiWDIHnEhzuBHMGTvbBaPC/+WrKVp/CFrefkP5ByIWQlZIULRoWt2tzmU8p/4hMBoq3L+pVIi8w8krtTiq+0eVpRGmXf6uzMWAgGNMJrtqvzmuQpd4H31EmhVKpdDLzCmC9j/dlZUWi/FDd3gmNAE6qY0jvf0LSq6HiQu50Wk7v+2Eln2hP/1w6yHmeq2CrShLdrXeYJMmClOM1E6O30XnCWkobK9pTQKaUlKvNuqzcS39D3nVNlYGvdV1e3KNhzIkqq+IuGGmsLIJpx3tSdXAw4Re2pZBaeUYIRvtiPdsD4lhb3hgsZOazbOWhbyNj2IBGsBZ55Sv3FWG5jPW5wr2ymBfoN8b8VjCm/Va63IXk3urrVM3vYhAcVkP8jbXf36/PLn/frtOcOcpmMwlQ+lBRuIBf6Fh6w5FnpxgIN+3b4T/zCW8J2PkCMA0jhtAJ6PLUCMgFCuB7RkdGtnY6Q54QNtsB7k6fwrGHkD4NcvBQVO/mVBuF8yVmfmAHzSUhkpF/LqqXk2h5WhnXPwYXf0zUH0w8Xa3WcG9+Oh3fXl6D8Kz6OFhA7l6w2RqI7zRxY/rdgWeNsa6Hg13R7GpHUDxDVqR1bFwczAODu0R8D4cH7KOoaqG+IDSs1B8uDzk6fQlUtEa1xGHbKGBTe6Lt5NuIGRnwP7KR0XxFkSC1PjoYbj7NIbG8CYr6ebb4hk3w5Z2Zte8FZ94E/tzRcQ72r8LKWenY9bkdtrB6ASi7ZOz1E2OvQ+Pl6/Aw==</diagram></mxfile>", "compressed"),
        ];

        for (xml, expected) in cases {
            let err = Document::parse(xml).unwrap_err();
            let matched = match expected {
                "malformed" => matches!(err, FormatError::Xml(_)),
                "root" if xml.starts_with("<svg") => matches!(err, FormatError::UnexpectedRoot(ref name) if name == "svg"),
                "compressed" => matches!(err, FormatError::CompressedPage),
                element => matches!(err, FormatError::MissingElement(name) if name == element),
            };
            assert!(matched, "unexpected error {err:?} for {xml}");
        }
    }

    #[test]
    fn test_cell_without_id_is_rejected() {
        let xml = "<mxfile><diagram><mxGraphModel><root><mxCell parent=\"0\"/></root></mxGraphModel></diagram></mxfile>";

        assert!(matches!(Document::parse(xml), Err(FormatError::MissingCellId)));
    }

    #[test]
    fn test_missing_layer_is_added() {
        let xml = "<mxfile><diagram><mxGraphModel><root><mxCell id=\"0\"/></root></mxGraphModel></diagram></mxfile>";
        let document = Document::parse(xml).unwrap();

        assert_eq!(document.layer(), &id("2"));
        assert_eq!(document.cell(&id("2")).unwrap().parent(), Some(&id("0")));
    }

    #[test]
    fn test_find_edge_is_directional() {
        let document = saved();

        assert!(document.find_edge(&id("2"), &id("note-1"), |_| true).is_some());
        assert!(document.find_edge(&id("note-1"), &id("2"), |_| true).is_none());
        assert!(document.find_edge(&id("2"), &id("note-1"), |kind| kind == EdgeKind::Extends).is_none());
    }

    #[test]
    fn test_setters_report_changes() {
        let mut document = saved();
        let item = id("3");

        assert!(!document.set_label(&item, "- hp: int"));
        assert!(document.set_label(&item, "- hp: long"));
        assert!(document.set_tooltip(&item, "Health"));
        assert!(!document.set_geometry(&item, GeometryUpdate::new().with_y(40.0)));
        assert!(document.set_geometry(&item, GeometryUpdate::new().with_width(200.0)));
        assert!(!document.set_label(&id("missing"), "x"));

        let geometry = document.cell(&item).unwrap().geometry().unwrap();
        assert_approx_eq!(f32, geometry.width().unwrap(), 200.0);
        assert_eq!(geometry.x(), None);
    }

    #[test]
    fn test_edge_kind_and_direction_changes() {
        let mut document = saved();
        let edge = id("9");

        assert!(document.set_edge_kind(&edge, EdgeKind::Bidirectional));
        assert!(!document.set_edge_kind(&edge, EdgeKind::Bidirectional));
        assert!(!document.set_edge_kind(&id("3"), EdgeKind::Association));
        assert!(document.reverse_edge(&edge));

        let cell = document.cell(&edge).unwrap();
        assert_eq!(cell.style(), Some(BIDIRECTIONAL_STYLE));
        assert_eq!(cell.source(), Some(&id("note-1")));
        assert_eq!(cell.target(), Some(&id("2")));
    }

    #[test]
    fn test_remove_cell_is_idempotent() {
        let mut document = saved();

        assert!(document.remove_cell(&id("note-1")).is_some());
        assert!(document.remove_cell(&id("note-1")).is_none());
    }

    #[test]
    fn test_remove_subtree_takes_children_and_edges() {
        let mut document = saved();

        let removed: Vec<_> = document
            .remove_subtree(&id("2"))
            .iter()
            .map(|cell| cell.id().to_string())
            .collect();

        assert_eq!(removed, ["2", "3", "9"]);
        assert!(document.cell(&id("note-1")).is_some());
        assert!(document.remove_subtree(&id("2")).is_empty());
    }

    #[test]
    fn test_migrate_wraps_legacy_cells() {
        let xml = format!(
            concat!(
                "<mxfile><diagram><mxGraphModel><root>",
                "<mxCell id=\"0\"/><mxCell id=\"1\" parent=\"0\"/>",
                "<mxCell id=\"2\" value=\"Foo\" style=\"{}\" vertex=\"1\" parent=\"1\"/>",
                "<mxCell id=\"3\" value=\"- a: int\" style=\"{}\" vertex=\"1\" parent=\"2\"/>",
                "<mxCell id=\"4\" value=\"\" style=\"{}\" vertex=\"1\" parent=\"2\"/>",
                "<mxCell id=\"5\" value=\"note\" style=\"text;\" vertex=\"1\" parent=\"1\"/>",
                "</root></mxGraphModel></diagram></mxfile>"
            ),
            CONTAINER_STYLE, ITEM_STYLE, SEPARATOR_STYLE
        );
        let mut document = Document::parse(&xml).unwrap();

        assert_eq!(document.migrate_to_user_objects(), 2);
        assert_eq!(document.migrate_to_user_objects(), 0);

        let wrapped: Vec<_> = document
            .cells_matching(Cell::is_user_object)
            .map(|cell| cell.id().as_str())
            .collect();
        assert_eq!(wrapped, ["2", "3"]);
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diagram.drawio");

        let fresh = Document::open_or_initialize(&path).unwrap();
        assert_eq!(fresh.cells().len(), 2);

        let document = saved();
        document.save(&path).unwrap();
        document.save(&path).unwrap();

        let reopened = Document::open_or_initialize(&path).unwrap();
        assert_eq!(reopened.to_xml_string(), SAVED);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_open_reports_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.drawio");
        std::fs::write(&path, "<html/>").unwrap();

        let err = Document::open_or_initialize(&path).unwrap_err();

        assert!(matches!(err, DocumentError::Format(FormatError::UnexpectedRoot(_))));
    }
}
