//! The class model consumed by the reconciliation engine.
//!
//! A [`ClassModel`] is an ordered collection of [`ClassDescriptor`]s. Iteration
//! order is significant: new containers are laid out in this order, and
//! relations are reconciled in this order.
//!
//! Associations reference other descriptors of the same model through
//! [`DescriptorId`], a typed index that is only meaningful for the model that
//! produced it.

use std::fmt;

use log::trace;
use thiserror::Error;

use crate::descriptor::ClassDescriptor;

/// Index of a descriptor inside its [`ClassModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(usize);

impl DescriptorId {
    /// Returns the position of the descriptor in the model.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for DescriptorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while building a [`ClassModel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("class `{0}` is defined more than once")]
    DuplicateClass(String),

    /// Two different names render to the same diagram label, such as
    /// `Pool<T>` and `Pool&lt;T&gt;`.
    #[error("class `{name}` has the same diagram label as `{existing}`")]
    LabelClash { name: String, existing: String },
}

/// Ordered set of class descriptors with resolved associations.
///
/// # Examples
///
/// ```
/// # use umlsync_core::{descriptor::ClassDescriptor, model::ClassModel};
/// let mut model = ClassModel::new();
/// let player = model.push(ClassDescriptor::new("Player", None, "")).unwrap();
/// let weapon = model.push(ClassDescriptor::new("Weapon", None, "")).unwrap();
/// model.add_association(player, weapon);
///
/// assert!(model.get(player).is_associated_with(weapon));
/// assert!(!model.get(weapon).is_associated_with(player));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassModel {
    descriptors: Vec<ClassDescriptor>,
}

impl ClassModel {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateClass`] if a descriptor with the same
    /// name already exists, and [`ModelError::LabelClash`] if another name
    /// has the same full name. The full name is the identity of a class in
    /// the diagram.
    pub fn push(&mut self, descriptor: ClassDescriptor) -> Result<DescriptorId, ModelError> {
        if self.find_by_name(descriptor.name()).is_some() {
            return Err(ModelError::DuplicateClass(descriptor.name().to_string()));
        }
        if let Some(existing) = self.find_by_full_name(&descriptor.full_name()) {
            return Err(ModelError::LabelClash {
                name: descriptor.name().to_string(),
                existing: self.get(existing).name().to_string(),
            });
        }
        let id = DescriptorId(self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(id)
    }

    /// Records a directed association `from -> to`.
    ///
    /// Self associations and duplicates are ignored. Returns `true` if the
    /// association was added.
    ///
    /// # Panics
    ///
    /// Panics if either id does not belong to this model.
    pub fn add_association(&mut self, from: DescriptorId, to: DescriptorId) -> bool {
        assert!(to.0 < self.descriptors.len(), "unknown descriptor {to}");
        if from == to {
            return false;
        }
        let added = self.descriptors[from.0].push_association(to);
        if added {
            trace!(
                source = self.descriptors[from.0].name(),
                target = self.descriptors[to.0].name();
                "Association recorded"
            );
        }
        added
    }

    /// Returns the descriptor for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this model.
    pub fn get(&self, id: DescriptorId) -> &ClassDescriptor {
        &self.descriptors[id.0]
    }

    /// Looks up a descriptor by class name.
    pub fn find_by_name(&self, name: &str) -> Option<DescriptorId> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.name() == name)
            .map(DescriptorId)
    }

    /// Looks up a descriptor by its canonical full name.
    pub fn find_by_full_name(&self, full_name: &str) -> Option<DescriptorId> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.full_name() == full_name)
            .map(DescriptorId)
    }

    /// Returns the id of the base class descriptor of `id`, if it is part of the model.
    pub fn parent_of(&self, id: DescriptorId) -> Option<DescriptorId> {
        let base = self.get(id).base_class()?;
        self.find_by_name(base)
    }

    /// Iterates over descriptors with their ids, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DescriptorId, &ClassDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| (DescriptorId(idx), descriptor))
    }

    /// Returns all descriptors as a slice.
    pub fn descriptors(&self) -> &[ClassDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with(names: &[&str]) -> ClassModel {
        let mut model = ClassModel::new();
        for name in names {
            model
                .push(ClassDescriptor::new(*name, None, ""))
                .expect("unique names");
        }
        model
    }

    #[test]
    fn test_push_rejects_duplicate_names() {
        let mut model = model_with(&["Player"]);
        let result = model.push(ClassDescriptor::new("Player", Some("Entity"), ""));

        assert_eq!(result, Err(ModelError::DuplicateClass("Player".to_string())));
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_push_rejects_names_with_the_same_label() {
        let mut model = model_with(&["Pool<T>"]);
        let result = model.push(ClassDescriptor::new("Pool&lt;T&gt;", None, ""));

        assert_eq!(
            result,
            Err(ModelError::LabelClash {
                name: "Pool&lt;T&gt;".to_string(),
                existing: "Pool<T>".to_string(),
            })
        );
        assert_eq!(model.len(), 1);
    }

    #[test]
    fn test_add_association_ignores_self_and_duplicates() {
        let mut model = model_with(&["A", "B"]);
        let a = model.find_by_name("A").unwrap();
        let b = model.find_by_name("B").unwrap();

        assert!(model.add_association(a, b));
        assert!(!model.add_association(a, b));
        assert!(!model.add_association(a, a));

        assert_eq!(model.get(a).associations(), &[b]);
        assert!(model.get(b).associations().is_empty());
    }

    #[test]
    fn test_find_by_full_name() {
        let mut model = ClassModel::new();
        let player = model
            .push(ClassDescriptor::new("Player", Some("Entity"), ""))
            .unwrap();

        assert_eq!(
            model.find_by_full_name("Player<br/>&lt;&lt;Entity&gt;&gt;"),
            Some(player)
        );
        assert_eq!(model.find_by_full_name("Player"), None);
    }

    #[test]
    fn test_parent_of() {
        let mut model = ClassModel::new();
        let entity = model.push(ClassDescriptor::new("Entity", None, "")).unwrap();
        let player = model
            .push(ClassDescriptor::new("Player", Some("Entity"), ""))
            .unwrap();
        let ghost = model
            .push(ClassDescriptor::new("Ghost", Some("Missing"), ""))
            .unwrap();

        assert_eq!(model.parent_of(player), Some(entity));
        assert_eq!(model.parent_of(ghost), None);
        assert_eq!(model.parent_of(entity), None);
    }

    #[test]
    fn test_iter_preserves_order() {
        let model = model_with(&["C", "A", "B"]);
        let names: Vec<_> = model.iter().map(|(_, d)| d.name()).collect();

        assert_eq!(names, ["C", "A", "B"]);
    }
}
