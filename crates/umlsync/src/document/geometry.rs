//! The `mxGeometry` of a cell.

use roxmltree::Node;

use super::xml::{Attribute, XmlElement, XmlWriter, attributes};

const GEOMETRY_TAG: &str = "mxGeometry";

/// Position and size of a cell, relative to its parent.
///
/// Every numeric attribute is optional, as draw.io omits zero values.
/// Attributes that are not understood, or fail to parse as numbers, are kept
/// verbatim along with any child elements such as edge waypoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellGeometry {
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    relative: bool,
    attrs: Vec<Attribute>,
    children: Vec<XmlElement>,
}

impl CellGeometry {
    /// Creates an absolute geometry with all four values set.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Creates the relative geometry of an edge with its two endpoint markers.
    pub(crate) fn edge(width: f32, height: Option<f32>) -> Self {
        Self {
            width: Some(width),
            height,
            relative: true,
            children: vec![
                XmlElement::new("mxPoint").with_attr("as", "sourcePoint"),
                XmlElement::new("mxPoint").with_attr("as", "targetPoint"),
            ],
            ..Self::default()
        }
    }

    pub fn x(&self) -> Option<f32> {
        self.x
    }

    pub fn y(&self) -> Option<f32> {
        self.y
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    pub fn height(&self) -> Option<f32> {
        self.height
    }

    /// Returns `true` for edge geometry expressed relative to its terminals.
    pub fn is_relative(&self) -> bool {
        self.relative
    }

    /// Overwrites the values present in `update`.
    pub fn apply(&mut self, update: GeometryUpdate) {
        if let Some(x) = update.x {
            self.x = Some(x);
        }
        if let Some(y) = update.y {
            self.y = Some(y);
        }
        if let Some(width) = update.width {
            self.width = Some(width);
        }
        if let Some(height) = update.height {
            self.height = Some(height);
        }
        // A numeric value now owns these attributes.
        self.attrs.retain(|(key, _)| !update.touches(key));
    }

    pub(crate) fn from_node(node: Node<'_, '_>) -> Self {
        let mut geometry = Self::default();
        for (key, value) in attributes(node) {
            let slot = match key.as_str() {
                "x" => &mut geometry.x,
                "y" => &mut geometry.y,
                "width" => &mut geometry.width,
                "height" => &mut geometry.height,
                "relative" if value == "1" => {
                    geometry.relative = true;
                    continue;
                }
                "as" => continue,
                _ => {
                    geometry.attrs.push((key, value));
                    continue;
                }
            };
            match value.parse::<f32>() {
                Ok(number) if number.is_finite() => *slot = Some(number),
                _ => geometry.attrs.push((key, value)),
            }
        }
        geometry.children = node
            .children()
            .filter(|child| child.is_element())
            .map(XmlElement::from_node)
            .collect();
        geometry
    }

    pub(crate) fn write(&self, writer: &mut XmlWriter) {
        let numbers = [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key, value.to_string())))
        .collect::<Vec<_>>();

        let attrs = numbers
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .chain(self.relative.then_some(("relative", "1")))
            .chain(self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .chain([("as", "geometry")]);

        if self.children.is_empty() {
            writer.empty(GEOMETRY_TAG, attrs);
        } else {
            writer.open(GEOMETRY_TAG, attrs);
            for child in &self.children {
                child.write(writer);
            }
            writer.close(GEOMETRY_TAG);
        }
    }
}

/// A partial geometry change; unset values are left untouched.
///
/// # Examples
///
/// ```
/// # use umlsync::document::{CellGeometry, GeometryUpdate};
/// let mut geometry = CellGeometry::new(50.0, 50.0, 100.0, 80.0);
/// geometry.apply(GeometryUpdate::new().with_width(160.0).with_height(96.0));
///
/// assert_eq!(geometry.x(), Some(50.0));
/// assert_eq!(geometry.width(), Some(160.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GeometryUpdate {
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
}

impl GeometryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_x(mut self, x: f32) -> Self {
        self.x = Some(x);
        self
    }

    pub fn with_y(mut self, y: f32) -> Self {
        self.y = Some(y);
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    fn touches(&self, key: &str) -> bool {
        match key {
            "x" => self.x.is_some(),
            "y" => self.y.is_some(),
            "width" => self.width.is_some(),
            "height" => self.height.is_some(),
            _ => false,
        }
    }
}
