//! Association and inheritance edges.

use log::{debug, trace, warn};

use umlsync_core::model::DescriptorId;

use super::{Reconciler, SyncIssue};
use crate::document::{CellId, EdgeKind};

impl Reconciler<'_> {
    /// Draws the association `source -> target`.
    ///
    /// - If the edge exists, nothing changes.
    /// - If only `target -> source` exists, that edge becomes bidirectional;
    ///   one pair of classes never has two association edges.
    /// - Otherwise a new one-way edge is created.
    ///
    /// A class without a container makes the association unresolved; it is
    /// reported and skipped.
    pub fn reconcile_association(&mut self, source: DescriptorId, target: DescriptorId) {
        let Some((from, to)) = self.endpoints(EdgeKind::Association, source, target) else {
            return;
        };

        if self
            .document
            .find_edge(&from, &to, EdgeKind::is_association)
            .is_some()
        {
            trace!(source:% = from, target:% = to; "Association already drawn");
            return;
        }

        let reverse = self
            .document
            .find_edge(&to, &from, EdgeKind::is_association)
            .map(|edge| edge.id().clone());
        match reverse {
            Some(edge) => {
                if self.document.set_edge_kind(&edge, EdgeKind::Bidirectional) {
                    self.report.record_updated();
                    debug!(
                        source = self.model.get(source).name(),
                        target = self.model.get(target).name();
                        "Association promoted to bidirectional"
                    );
                }
            }
            None => {
                self.document.create_edge(EdgeKind::Association, &from, &to);
                self.report.record_created();
                debug!(
                    source = self.model.get(source).name(),
                    target = self.model.get(target).name();
                    "Association created"
                );
            }
        }
    }

    /// Draws the inheritance edge `child -> base`.
    ///
    /// Existing edges are kept as they are; there is no bidirectional form.
    pub fn reconcile_extends(&mut self, child: DescriptorId, base: DescriptorId) {
        let Some((from, to)) = self.endpoints(EdgeKind::Extends, child, base) else {
            return;
        };

        if self
            .document
            .find_edge(&from, &to, |kind| kind == EdgeKind::Extends)
            .is_some()
        {
            trace!(child:% = from, base:% = to; "Inheritance already drawn");
            return;
        }

        self.document.create_edge(EdgeKind::Extends, &from, &to);
        self.report.record_created();
        debug!(
            child = self.model.get(child).name(),
            base = self.model.get(base).name();
            "Inheritance created"
        );
    }

    /// Returns the containers of both classes, reporting the relation if either is missing.
    fn endpoints(
        &mut self,
        kind: EdgeKind,
        source: DescriptorId,
        target: DescriptorId,
    ) -> Option<(CellId, CellId)> {
        match (self.container_of(source), self.container_of(target)) {
            (Some(from), Some(to)) => Some((from.clone(), to.clone())),
            _ => {
                let source = self.model.get(source).name().to_string();
                let target = self.model.get(target).name().to_string();
                warn!(source = source.as_str(), target = target.as_str(); "Relation endpoint has no container");
                self.report.push_issue(SyncIssue::UnresolvedEndpoint {
                    kind,
                    source,
                    target,
                });
                None
            }
        }
    }
}
