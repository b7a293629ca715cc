//! Reads class description XML into descriptors.

use std::collections::HashMap;

use log::{debug, trace};
use roxmltree::{Document, Node};

use umlsync_core::{
    descriptor::ClassDescriptor,
    model::{ClassModel, ModelError},
};

use crate::{
    error::{Diagnostic, ErrorCode, ParseError},
    span::Span,
};

const CLASS_TAG: &str = "Class";
const FIELDS_TAG: &str = "Fields";
const FIELD_TAG: &str = "Field";
const METHODS_TAG: &str = "Methods";
const METHOD_TAG: &str = "Method";

const NAME_ATTR: &str = "n";
const BASE_ATTR: &str = "b";
const TOOLTIP_ATTR: &str = "t";
const VALUE_ATTR: &str = "v";

/// Builds a model from every `Class` element of `source`, at any depth.
///
/// Problems with individual classes are collected so that all of them are
/// reported together.
pub(crate) fn read_model(source: &str) -> Result<ClassModel, ParseError> {
    let document = Document::parse(source).map_err(|err| malformed(source, &err))?;

    let mut model = ClassModel::new();
    let mut first_seen: HashMap<String, Span> = HashMap::new();
    let mut diagnostics = Vec::new();

    for class in document
        .descendants()
        .filter(|node| node.has_tag_name(CLASS_TAG))
    {
        let span = Span::new(class.range());
        let name = match class.attribute(NAME_ATTR).map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => {
                diagnostics.push(
                    Diagnostic::error("class element has no name")
                        .with_code(ErrorCode::E101)
                        .with_label(span, "missing `n` attribute")
                        .with_help("add the class name, e.g. <Class n=\"Player\">"),
                );
                continue;
            }
        };

        let descriptor = read_class(class, name);
        match model.push(descriptor) {
            Ok(id) => {
                trace!(class = name, id:% = id; "Class read");
                first_seen.insert(name.to_string(), span);
            }
            Err(ModelError::DuplicateClass(name)) => {
                let mut diagnostic =
                    Diagnostic::error(format!("class `{name}` is defined multiple times"))
                        .with_code(ErrorCode::E200)
                        .with_label(span, "duplicate definition");
                if let Some(first) = first_seen.get(&name) {
                    diagnostic = diagnostic.with_secondary_label(*first, "first defined here");
                }
                diagnostics.push(
                    diagnostic.with_help("class names identify diagram elements and must be unique"),
                );
            }
            Err(ModelError::LabelClash { name, existing }) => {
                let mut diagnostic = Diagnostic::error(format!(
                    "class `{name}` has the same diagram label as `{existing}`"
                ))
                .with_code(ErrorCode::E200)
                .with_label(span, "clashing definition");
                if let Some(first) = first_seen.get(&existing) {
                    diagnostic = diagnostic.with_secondary_label(*first, "label first used here");
                }
                diagnostics.push(diagnostic.with_help(
                    "`<` and `>` are written as `&lt;` and `&gt;` in labels; rename one of the classes",
                ));
            }
        }
    }

    if !diagnostics.is_empty() {
        return Err(ParseError::new(diagnostics));
    }

    debug!(classes = model.len(); "Class descriptions read");
    Ok(model)
}

fn read_class(class: Node<'_, '_>, name: &str) -> ClassDescriptor {
    let base = class
        .attribute(BASE_ATTR)
        .map(str::trim)
        .filter(|base| !base.is_empty());
    let tooltip = class.attribute(TOOLTIP_ATTR).unwrap_or_default();

    let mut descriptor = ClassDescriptor::new(name, base, tooltip);
    for (line, tooltip) in entries(class, FIELDS_TAG, FIELD_TAG) {
        descriptor.append_field(line, tooltip);
    }
    for (line, tooltip) in entries(class, METHODS_TAG, METHOD_TAG) {
        descriptor.append_method(line, tooltip);
    }
    descriptor
}

/// Yields `(v, t)` of every `<group><entry v t/></group>` child of `class`.
///
/// Entries without a value are skipped, empty tooltips count as absent.
fn entries<'a>(
    class: Node<'a, '_>,
    group: &'static str,
    entry: &'static str,
) -> impl Iterator<Item = (&'a str, Option<&'a str>)> {
    class
        .children()
        .filter(move |node| node.has_tag_name(group))
        .flat_map(move |group| {
            group
                .children()
                .filter(move |node| node.has_tag_name(entry))
        })
        .filter_map(|node| {
            let value = node.attribute(VALUE_ATTR).filter(|value| !value.is_empty())?;
            let tooltip = node.attribute(TOOLTIP_ATTR).filter(|tip| !tip.is_empty());
            Some((value, tooltip))
        })
}

fn malformed(source: &str, err: &roxmltree::Error) -> ParseError {
    let pos = err.pos();
    let offset = byte_offset(source, pos.row as usize, pos.col as usize);
    let end = source[offset..]
        .chars()
        .next()
        .map_or(offset, |ch| offset + ch.len_utf8());

    Diagnostic::error(format!("malformed class description: {err}"))
        .with_code(ErrorCode::E100)
        .with_label(Span::new(offset..end), "invalid XML here")
        .into()
}

/// Converts a 1-based row and column (in characters) into a byte offset.
fn byte_offset(source: &str, row: usize, col: usize) -> usize {
    let mut line_start = 0;
    for (idx, line) in source.split_inclusive('\n').enumerate() {
        if idx + 1 == row {
            return line
                .char_indices()
                .nth(col.saturating_sub(1))
                .map_or(line_start + line.len(), |(offset, _)| line_start + offset);
        }
        line_start += line.len();
    }
    source.len()
}
