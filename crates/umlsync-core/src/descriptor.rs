//! Class descriptors: the structural model of one class.
//!
//! A [`ClassDescriptor`] holds everything the diagram shows for a class: its
//! name, optional base class, the pre-formatted field and method lines, the
//! tooltips attached to each block, and its outgoing associations.
//!
//! Descriptors are rebuilt from the source of truth on every run. The only
//! thing that ties a descriptor to a diagram element across runs is its
//! [full name](ClassDescriptor::full_name): renaming a class, or changing its
//! base class, therefore produces a new container in the diagram.

use crate::{
    geometry::Size,
    markup::{self, LINE_BREAK},
    metrics,
    model::DescriptorId,
};

/// The model of one class in the diagram.
///
/// # Examples
///
/// ```
/// # use umlsync_core::descriptor::ClassDescriptor;
/// let mut player = ClassDescriptor::new("Player", Some("Entity"), "Main character");
/// player.append_field("- damage: float", Some("Base damage per hit"));
/// player.append_method("+ Attack(): void", None);
///
/// assert_eq!(player.full_name(), "Player<br/>&lt;&lt;Entity&gt;&gt;");
/// assert_eq!(player.fields_tooltip(), "damage: Base damage per hit");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDescriptor {
    name: String,
    base_class: Option<String>,
    class_tooltip: String,
    fields: Option<String>,
    fields_tooltip: String,
    methods: Option<String>,
    methods_tooltip: String,
    associations: Vec<DescriptorId>,
}

impl ClassDescriptor {
    /// Creates a descriptor without fields, methods or associations.
    ///
    /// # Arguments
    ///
    /// * `name` - Class name, unique within a [`ClassModel`](crate::model::ClassModel).
    /// * `base_class` - Name of the single parent class, if any.
    /// * `class_tooltip` - Tooltip shown on the class container.
    pub fn new(name: impl Into<String>, base_class: Option<&str>, class_tooltip: &str) -> Self {
        Self {
            name: name.into(),
            base_class: base_class.map(str::to_string),
            class_tooltip: markup::escape_angle_brackets(class_tooltip),
            fields: None,
            fields_tooltip: String::new(),
            methods: None,
            methods_tooltip: String::new(),
            associations: Vec::new(),
        }
    }

    /// Returns the class name as given by the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the name of the base class, if any.
    pub fn base_class(&self) -> Option<&str> {
        self.base_class.as_deref()
    }

    pub fn class_tooltip(&self) -> &str {
        &self.class_tooltip
    }

    /// Returns the escaped field lines joined with [`LINE_BREAK`].
    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    pub fn fields_tooltip(&self) -> &str {
        &self.fields_tooltip
    }

    /// Returns the escaped method lines joined with [`LINE_BREAK`].
    pub fn methods(&self) -> Option<&str> {
        self.methods.as_deref()
    }

    pub fn methods_tooltip(&self) -> &str {
        &self.methods_tooltip
    }

    /// Returns the outgoing associations in discovery order.
    pub fn associations(&self) -> &[DescriptorId] {
        &self.associations
    }

    /// Returns `true` if this class has an association to `target`.
    pub fn is_associated_with(&self, target: DescriptorId) -> bool {
        self.associations.contains(&target)
    }

    /// Appends a field line such as `- damage: float`.
    ///
    /// When a tooltip is given, an entry `damage: <tooltip>` is added to the
    /// fields tooltip. The short name is the last word before the first `:`.
    pub fn append_field(&mut self, line: &str, tooltip: Option<&str>) {
        let line = markup::escape_angle_brackets(line);
        if let Some(tooltip) = tooltip {
            let tooltip = markup::escape_angle_brackets(tooltip);
            let short = short_name(&line, ':');
            markup::append_entry(&mut self.fields_tooltip, &format!("{short}: {tooltip}"));
        }
        markup::append_line(&mut self.fields, &line);
    }

    /// Appends a method line such as `+ Attack(target: Enemy): void`.
    ///
    /// When a tooltip is given, an entry `Attack(...): <tooltip>` is added to
    /// the methods tooltip. The short name is the last word before the first `(`.
    pub fn append_method(&mut self, line: &str, tooltip: Option<&str>) {
        let line = markup::escape_angle_brackets(line);
        if let Some(tooltip) = tooltip {
            let tooltip = markup::escape_angle_brackets(tooltip);
            let short = short_name(&line, '(');
            markup::append_entry(
                &mut self.methods_tooltip,
                &format!("{short}(...): {tooltip}"),
            );
        }
        markup::append_line(&mut self.methods, &line);
    }

    /// Returns the canonical label of the class container.
    ///
    /// This string is the identity of the class in a saved diagram. With a
    /// base class it spans two lines, the second being `<<Base>>`.
    pub fn full_name(&self) -> String {
        let name = markup::escape_angle_brackets(&self.name);
        match &self.base_class {
            Some(base) => format!(
                "{name}{LINE_BREAK}&lt;&lt;{}&gt;&gt;",
                markup::escape_angle_brackets(base)
            ),
            None => name,
        }
    }

    /// Estimated size of the class header label.
    pub fn header_size(&self) -> Size {
        metrics::estimate(Some(&self.full_name()))
    }

    /// Estimated size of the fields block, zero if there are no fields.
    pub fn size_of_fields(&self) -> Size {
        metrics::estimate(self.fields())
    }

    /// Estimated size of the methods block, zero if there are no methods.
    pub fn size_of_methods(&self) -> Size {
        metrics::estimate(self.methods())
    }

    pub(crate) fn push_association(&mut self, target: DescriptorId) -> bool {
        if self.associations.contains(&target) {
            return false;
        }
        self.associations.push(target);
        true
    }
}

/// Extracts the member name from a formatted line.
///
/// `- damage: float` with `:` gives `damage`; `+ Enter(): void` with `(` gives
/// `Enter`. Falls back to the trimmed prefix when it has no words.
fn short_name(line: &str, separator: char) -> &str {
    let prefix = line.split(separator).next().unwrap_or(line).trim();
    prefix.split_whitespace().last().unwrap_or(prefix)
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_full_name_without_base() {
        let descriptor = ClassDescriptor::new("Foo", None, "");
        assert_eq!(descriptor.full_name(), "Foo");
    }

    #[test]
    fn test_full_name_escapes_generics() {
        let descriptor = ClassDescriptor::new("Pool<T>", Some("Base<T>"), "");
        assert_eq!(
            descriptor.full_name(),
            "Pool&lt;T&gt;<br/>&lt;&lt;Base&lt;T&gt;&gt;&gt;"
        );
    }

    #[test]
    fn test_append_field_builds_text_and_tooltip() {
        let mut descriptor = ClassDescriptor::new("Enemy", None, "");
        descriptor.append_field("- hp: int", Some("Health points"));
        descriptor.append_field("- loot: List<Item>", None);
        descriptor.append_field("+ speed: float", Some("Units per <b>second</b>"));

        assert_eq!(
            descriptor.fields(),
            Some("- hp: int<br/>- loot: List&lt;Item&gt;<br/>+ speed: float")
        );
        assert_eq!(
            descriptor.fields_tooltip(),
            "hp: Health points<br/>speed: Units per &lt;b&gt;second&lt;/b&gt;"
        );
        assert_eq!(descriptor.methods(), None);
    }

    #[test]
    fn test_append_method_tooltip_uses_call_marker() {
        let mut descriptor = ClassDescriptor::new("Enemy", None, "");
        descriptor.append_method("+ Enter(): void", Some("Called on spawn"));
        descriptor.append_method("- Think(dt: float): void", Some("AI tick"));

        assert_eq!(
            descriptor.methods_tooltip(),
            "Enter(...): Called on spawn<br/>Think(...): AI tick"
        );
    }

    #[test]
    fn test_short_name_without_visibility_marker() {
        assert_eq!(short_name("damage: float", ':'), "damage");
        assert_eq!(short_name("+ static Count: int", ':'), "Count");
        assert_eq!(short_name("Update", '('), "Update");
    }

    #[test]
    fn test_sizes_delegate_to_estimator() {
        let mut descriptor = ClassDescriptor::new("Weapon", None, "");
        descriptor.append_field("damage: float", None);

        assert_approx_eq!(f32, descriptor.size_of_fields().width(), 118.0);
        assert_approx_eq!(f32, descriptor.size_of_fields().height(), 34.0);
        assert!(descriptor.size_of_methods().is_zero());
    }

    #[test]
    fn test_size_counts_decoded_brackets() {
        let mut descriptor = ClassDescriptor::new("Bag", None, "");
        descriptor.append_field("a: List<T>", None);

        // "a: List<T>" has 10 characters, not the 16 of its escaped form.
        assert_approx_eq!(f32, descriptor.size_of_fields().width(), 103.0);
    }
}
