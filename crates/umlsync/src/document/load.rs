//! Reading a draw.io file into a [`Document`].

use log::{debug, warn};
use roxmltree::Node;

use super::{
    Document, Envelope, FormatError,
    cell::{CELL_TAG, Cell, CellKind},
    xml::{XmlElement, attributes, has_text},
};

const FILE_TAG: &str = "mxfile";
const DIAGRAM_TAG: &str = "diagram";
const MODEL_TAG: &str = "mxGraphModel";
const ROOT_TAG: &str = "root";

/// Parses the first page of a draw.io file.
pub(super) fn parse(xml: &str) -> Result<Document, FormatError> {
    let parsed = roxmltree::Document::parse(xml)?;
    let file = parsed.root_element();
    if !file.has_tag_name(FILE_TAG) {
        return Err(FormatError::UnexpectedRoot(
            file.tag_name().name().to_string(),
        ));
    }

    let diagram = child(file, DIAGRAM_TAG).ok_or(FormatError::MissingElement(DIAGRAM_TAG))?;
    let model = match child(diagram, MODEL_TAG) {
        Some(model) => model,
        None if has_text(diagram) => return Err(FormatError::CompressedPage),
        None => return Err(FormatError::MissingElement(MODEL_TAG)),
    };
    let root = child(model, ROOT_TAG).ok_or(FormatError::MissingElement(ROOT_TAG))?;

    let envelope = Envelope {
        file_attrs: attributes(file),
        diagram_attrs: attributes(diagram),
        diagram_extras: others(diagram, model),
        model_attrs: attributes(model),
        model_extras: others(model, root),
        other_pages: others(file, diagram),
    };
    if !envelope.other_pages.is_empty() {
        warn!(pages = envelope.other_pages.len(); "Only the first page is synchronized");
    }

    let mut cells = Vec::new();
    let mut foreign = Vec::new();
    for node in root.children().filter(|node| node.is_element()) {
        match read_cell(node) {
            Some(cell) if cell.id().as_str().is_empty() => return Err(FormatError::MissingCellId),
            Some(cell) => cells.push(cell),
            None => foreign.push(XmlElement::from_node(node)),
        }
    }

    classify(&mut cells);
    debug!(cells = cells.len(), foreign = foreign.len(); "Document parsed");

    Ok(Document::from_parts(envelope, cells, foreign))
}

/// Reads a root child as a cell, either a bare `mxCell` or one wrapped in
/// a `UserObject`/`object`.
fn read_cell(node: Node<'_, '_>) -> Option<Cell> {
    if node.has_tag_name(CELL_TAG) {
        return Some(Cell::from_node(node, None));
    }
    let name = node.tag_name().name();
    if name != "UserObject" && name != "object" {
        return None;
    }
    child(node, CELL_TAG).map(|cell| Cell::from_node(cell, Some(node)))
}

/// Assigns every cell its kind, which depends on the kind of its parent.
fn classify(cells: &mut [Cell]) {
    let intrinsic: Vec<CellKind> = cells.iter().map(Cell::intrinsic_kind).collect();
    for (cell, kind) in cells.iter_mut().zip(&intrinsic) {
        cell.set_kind(*kind);
    }

    let parent_kinds: Vec<Option<CellKind>> = cells
        .iter()
        .map(|cell| {
            let parent = cell.parent()?;
            cells
                .iter()
                .position(|candidate| candidate.id() == parent)
                .map(|idx| intrinsic[idx])
        })
        .collect();
    for (cell, parent_kind) in cells.iter_mut().zip(parent_kinds) {
        let kind = cell.refine_kind(parent_kind);
        cell.set_kind(kind);
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| child.has_tag_name(name))
}

/// Copies the element children of `node` other than `keep`.
fn others(node: Node<'_, '_>, keep: Node<'_, '_>) -> Vec<XmlElement> {
    node.children()
        .filter(|child| child.is_element() && *child != keep)
        .map(XmlElement::from_node)
        .collect()
}
