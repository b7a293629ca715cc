//! Removal of diagram elements that are no longer part of the model.
//!
//! Each pass only looks at cells of its own kind. Manual shapes, notes and
//! free-standing edges are never touched.

use std::collections::HashSet;

use log::{debug, info};

use umlsync_core::model::DescriptorId;

use super::Reconciler;
use crate::document::{CellId, CellKind, EdgeKind};

/// What to do with an association edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Normalize {
    Keep(EdgeKind),
    Reverse,
    Remove,
}

impl Reconciler<'_> {
    /// Removes containers whose label matches no class, with their blocks and
    /// every edge attached to them.
    pub fn cleanup_classes(&mut self) {
        let names: HashSet<String> = self
            .model
            .iter()
            .map(|(_, descriptor)| descriptor.full_name())
            .collect();

        let orphans: Vec<(CellId, String)> = self
            .document
            .cells_matching(|cell| {
                cell.kind() == CellKind::Container
                    && !cell.label().is_some_and(|label| names.contains(label))
            })
            .map(|cell| (cell.id().clone(), cell.label().unwrap_or_default().to_string()))
            .collect();

        for (container, label) in orphans {
            let removed = self.document.remove_subtree(&container);
            if !removed.is_empty() {
                info!(
                    label = label.as_str(),
                    cells = removed.len();
                    "Removed class no longer in the model"
                );
                self.report.record_removed(removed.len());
            }
        }
    }

    /// Brings association edges in line with the model.
    ///
    /// An edge between two known classes is restyled bidirectional, one-way,
    /// or turned around to match the associations between them, and removed
    /// if there are none. Edges whose endpoints are not known classes are
    /// removed, as is any second edge for the same pair of classes.
    pub fn cleanup_associations(&mut self) {
        let edges = self.edges(EdgeKind::is_association);
        let mut seen: HashSet<(DescriptorId, DescriptorId)> = HashSet::new();

        for (edge, source, target) in edges {
            let Some((source, target)) = self.resolve(source, target) else {
                debug!(edge:% = edge; "Association between unknown classes removed");
                self.remove(&edge);
                continue;
            };

            let action = self.normalize(source, target);
            let pair = (source.min(target), source.max(target));
            if action == Normalize::Remove || !seen.insert(pair) {
                debug!(
                    source = self.model.get(source).name(),
                    target = self.model.get(target).name();
                    "Association removed"
                );
                self.remove(&edge);
                continue;
            }

            let changed = match action {
                Normalize::Keep(kind) => self.document.set_edge_kind(&edge, kind),
                Normalize::Reverse => {
                    self.document.reverse_edge(&edge);
                    self.document.set_edge_kind(&edge, EdgeKind::Association);
                    true
                }
                Normalize::Remove => false,
            };
            if changed {
                debug!(
                    source = self.model.get(source).name(),
                    target = self.model.get(target).name(),
                    action:? = action;
                    "Association normalized"
                );
                self.report.record_updated();
            }
        }
    }

    /// Removes inheritance edges that do not go from a class to its current base.
    pub fn cleanup_extends(&mut self) {
        let edges = self.edges(|kind| kind == EdgeKind::Extends);

        for (edge, source, target) in edges {
            let current = self.resolve(source, target).filter(|(child, base)| {
                self.model.get(*child).base_class() == Some(self.model.get(*base).name())
            });
            if current.is_none() {
                debug!(edge:% = edge; "Stale inheritance removed");
                self.remove(&edge);
            }
        }
    }

    /// Snapshot of the edges passing `filter` as `(edge, source, target)`.
    fn edges(
        &self,
        filter: impl Fn(EdgeKind) -> bool,
    ) -> Vec<(CellId, Option<CellId>, Option<CellId>)> {
        self.document
            .cells_matching(|cell| cell.kind().edge_kind().is_some_and(&filter))
            .map(|cell| {
                (
                    cell.id().clone(),
                    cell.source().cloned(),
                    cell.target().cloned(),
                )
            })
            .collect()
    }

    /// Maps both edge endpoints to the classes bound to them.
    fn resolve(
        &self,
        source: Option<CellId>,
        target: Option<CellId>,
    ) -> Option<(DescriptorId, DescriptorId)> {
        let source = self.descriptor_of(&source?)?;
        let target = self.descriptor_of(&target?)?;
        Some((source, target))
    }

    /// Decides the form of an edge drawn `source -> target`.
    fn normalize(&self, source: DescriptorId, target: DescriptorId) -> Normalize {
        let forward = self.model.get(source).is_associated_with(target);
        let backward = self.model.get(target).is_associated_with(source);
        match (forward, backward) {
            (true, true) => Normalize::Keep(EdgeKind::Bidirectional),
            (true, false) => Normalize::Keep(EdgeKind::Association),
            (false, true) => Normalize::Reverse,
            (false, false) => Normalize::Remove,
        }
    }
}
