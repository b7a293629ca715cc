//! Serializing a [`Document`] back to draw.io XML.

use super::{
    Document,
    xml::{Attribute, XmlWriter},
};

pub(super) fn to_xml_string(document: &Document) -> String {
    let envelope = document.envelope();
    let mut writer = XmlWriter::new();
    writer.declaration();
    writer.open("mxfile", attrs(&envelope.file_attrs));
    writer.open("diagram", attrs(&envelope.diagram_attrs));
    writer.open("mxGraphModel", attrs(&envelope.model_attrs));
    writer.open("root", []);
    for cell in document.cells() {
        cell.write(&mut writer);
    }
    for element in document.foreign() {
        element.write(&mut writer);
    }
    writer.close("root");
    for element in &envelope.model_extras {
        element.write(&mut writer);
    }
    writer.close("mxGraphModel");
    for element in &envelope.diagram_extras {
        element.write(&mut writer);
    }
    writer.close("diagram");
    for page in &envelope.other_pages {
        page.write(&mut writer);
    }
    writer.close("mxfile");
    writer.finish()
}

fn attrs(attrs: &[Attribute]) -> impl Iterator<Item = (&str, &str)> {
    attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}
