//! The reconciliation engine.
//!
//! A [`Reconciler`] applies a [`ClassModel`] to a [`Document`] in place:
//!
//! 1. **Bind** - Match every descriptor to the first container labelled
//!    with its full name, and collect the blocks of that container
//! 2. **Classes** - Create missing containers, update existing ones
//! 3. **Inheritance** - Draw a `child -> base` edge per base class
//! 4. **Associations** - Draw one edge per related pair, bidirectional when
//!    both classes reference each other
//! 5. **Cleanup** - Optionally remove classes and edges that are no longer
//!    part of the model
//!
//! Matching is done by label only; nothing is persisted besides the diagram.
//! Positions of existing containers are never changed, so manual layout
//! survives any number of runs. Running twice over the same model leaves the
//! document unchanged the second time.

mod classes;
mod cleanup;
mod relations;
mod report;

pub use report::{Severity, SyncIssue, SyncReport};

use log::{debug, info};

use umlsync_core::model::{ClassModel, DescriptorId};

use crate::{
    config::CleanupConfig,
    document::{CellId, CellKind, Document},
    layout::LayoutPlanner,
};

/// Options of a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    cleanup: CleanupConfig,
}

impl SyncOptions {
    pub fn new(cleanup: CleanupConfig) -> Self {
        Self { cleanup }
    }

    pub fn cleanup(&self) -> CleanupConfig {
        self.cleanup
    }
}

impl From<CleanupConfig> for SyncOptions {
    fn from(cleanup: CleanupConfig) -> Self {
        Self::new(cleanup)
    }
}

/// Cells of the document currently standing for one descriptor.
#[derive(Debug, Clone, Default)]
struct Binding {
    container: Option<CellId>,
    items: Vec<CellId>,
    separators: Vec<CellId>,
}

/// One reconciliation run over a document.
///
/// # Examples
///
/// ```
/// # use umlsync::{document::{CellKind, Document}, layout::LayoutPlanner};
/// # use umlsync::reconcile::{Reconciler, SyncOptions};
/// # use umlsync_core::{descriptor::ClassDescriptor, model::ClassModel};
/// let mut model = ClassModel::new();
/// let mut player = ClassDescriptor::new("Player", None, "");
/// player.append_field("- hp: int", None);
/// model.push(player).unwrap();
///
/// let mut document = Document::new();
/// let options = SyncOptions::default();
/// let report = Reconciler::new(&mut document, &model, options, LayoutPlanner::default()).run();
///
/// assert_eq!(report.created(), 2);
/// assert_eq!(
///     document.cells_matching(|cell| cell.kind() == CellKind::Container).count(),
///     1
/// );
/// ```
pub struct Reconciler<'a> {
    document: &'a mut Document,
    model: &'a ClassModel,
    options: SyncOptions,
    planner: LayoutPlanner,
    bindings: Vec<Binding>,
    report: SyncReport,
}

impl<'a> Reconciler<'a> {
    /// Creates a run and binds every descriptor to its existing container.
    pub fn new(
        document: &'a mut Document,
        model: &'a ClassModel,
        options: SyncOptions,
        planner: LayoutPlanner,
    ) -> Self {
        let bindings = model
            .iter()
            .map(|(_, descriptor)| bind(document, &descriptor.full_name()))
            .collect::<Vec<_>>();
        debug!(
            classes = model.len(),
            bound = bindings.iter().filter(|binding| binding.container.is_some()).count();
            "Descriptors bound"
        );

        Self {
            document,
            model,
            options,
            planner,
            bindings,
            report: SyncReport::default(),
        }
    }

    /// Runs every step and returns what was changed.
    pub fn run(mut self) -> SyncReport {
        let model = self.model;
        let ids: Vec<DescriptorId> = model.iter().map(|(id, _)| id).collect();

        for &id in &ids {
            self.reconcile_class(id);
        }
        for &id in &ids {
            self.reconcile_base_of(id);
        }
        for &source in &ids {
            for &target in model.get(source).associations() {
                self.reconcile_association(source, target);
            }
        }

        let cleanup = self.options.cleanup();
        if cleanup.classes() {
            self.cleanup_classes();
        }
        if cleanup.associations() {
            self.cleanup_associations();
        }
        if cleanup.extends() {
            self.cleanup_extends();
        }

        info!(report:% = self.report; "Reconciliation finished");
        self.report
    }

    /// Returns the report collected so far.
    pub fn report(&self) -> &SyncReport {
        &self.report
    }

    /// Returns the container bound to `id`, if any.
    pub fn container_of(&self, id: DescriptorId) -> Option<&CellId> {
        self.binding(id).container.as_ref()
    }

    /// Returns the descriptor bound to the container `cell`.
    fn descriptor_of(&self, cell: &CellId) -> Option<DescriptorId> {
        self.model
            .iter()
            .map(|(id, _)| id)
            .find(|id| self.binding(*id).container.as_ref() == Some(cell))
    }

    fn reconcile_base_of(&mut self, child: DescriptorId) {
        let model = self.model;
        let descriptor = model.get(child);
        let Some(base_name) = descriptor.base_class() else {
            return;
        };
        match model.parent_of(child) {
            Some(base) if base != child => self.reconcile_extends(child, base),
            Some(_) => debug!(class = descriptor.name(); "Class extends itself, skipped"),
            None => {
                debug!(class = descriptor.name(), base = base_name; "Base class not in model");
                self.report.push_issue(SyncIssue::UnknownBase {
                    class: descriptor.name().to_string(),
                    base: base_name.to_string(),
                });
            }
        }
    }

    fn binding(&self, id: DescriptorId) -> &Binding {
        &self.bindings[id.index()]
    }

    fn binding_mut(&mut self, id: DescriptorId) -> &mut Binding {
        &mut self.bindings[id.index()]
    }
}

/// Finds the container labelled `full_name` and its blocks, in document order.
fn bind(document: &Document, full_name: &str) -> Binding {
    let Some(container) = document
        .find_cell(|cell| cell.kind() == CellKind::Container && cell.label() == Some(full_name))
    else {
        return Binding::default();
    };
    let id = container.id();

    let of_kind = |kind: CellKind| {
        document
            .children_of(id)
            .filter(|cell| cell.kind() == kind)
            .map(|cell| cell.id().clone())
            .collect::<Vec<_>>()
    };

    Binding {
        container: Some(id.clone()),
        items: of_kind(CellKind::Item),
        separators: of_kind(CellKind::Separator),
    }
}
