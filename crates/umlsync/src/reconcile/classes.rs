//! Class containers and their fields and methods blocks.
//!
//! A container holds up to two text blocks stacked below its header: fields
//! first, then methods, with a separator between them when both exist. A
//! class with only methods shows them in the first block.

use log::{debug, trace, warn};

use umlsync_core::{descriptor::ClassDescriptor, geometry::Size, model::DescriptorId};

use super::{Binding, Reconciler, SyncIssue};
use crate::document::{CellId, GeometryUpdate, SEPARATOR_HEIGHT};

/// Height of the container header holding the class name.
const HEADER_HEIGHT: f32 = 40.0;

/// One text block to show.
struct Block<'m> {
    text: &'m str,
    tooltip: &'m str,
    height: f32,
}

/// Size of a container and the offsets of its children.
struct ClassShape<'m> {
    width: f32,
    height: f32,
    blocks: Vec<Block<'m>>,
    block_offsets: Vec<f32>,
    separator_offset: Option<f32>,
}

impl<'m> ClassShape<'m> {
    fn of(descriptor: &'m ClassDescriptor) -> Self {
        let fields = descriptor.size_of_fields();
        let methods = descriptor.size_of_methods();
        let width = fields.max(methods).max(descriptor.header_size()).width();

        let blocks: Vec<Block<'m>> = [
            (descriptor.fields(), descriptor.fields_tooltip(), fields),
            (descriptor.methods(), descriptor.methods_tooltip(), methods),
        ]
        .into_iter()
        .filter_map(|(text, tooltip, size)| {
            text.map(|text| Block {
                text,
                tooltip,
                height: size.height(),
            })
        })
        .collect();

        let mut y = HEADER_HEIGHT;
        let mut block_offsets = Vec::with_capacity(blocks.len());
        let mut separator_offset = None;
        for (idx, block) in blocks.iter().enumerate() {
            if idx == 1 {
                separator_offset = Some(y);
                y += SEPARATOR_HEIGHT;
            }
            block_offsets.push(y);
            y += block.height;
        }

        Self {
            width,
            height: y,
            blocks,
            block_offsets,
            separator_offset,
        }
    }

    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl Reconciler<'_> {
    /// Creates or updates the container of one class.
    ///
    /// A new container is placed by the layout planner. An existing container
    /// keeps its position; its blocks are added, removed and relabelled to
    /// match the descriptor, then it is resized and its children restacked.
    pub fn reconcile_class(&mut self, id: DescriptorId) {
        let model = self.model;
        let descriptor = model.get(id);
        let shape = ClassShape::of(descriptor);

        match self.binding(id).container.clone() {
            None => self.create_class(id, descriptor, &shape),
            Some(container) => self.update_class(id, descriptor, container, &shape),
        }
    }

    fn create_class(&mut self, id: DescriptorId, descriptor: &ClassDescriptor, shape: &ClassShape<'_>) {
        let position = self.planner.place(shape.size());
        let container = self
            .document
            .create_container(descriptor, shape.size(), position);
        self.report.record_created();

        let mut items = Vec::with_capacity(shape.blocks.len());
        let mut separator = None;
        for idx in 0..shape.blocks.len() {
            if idx == 1 {
                self.ensure_separator(&container, &mut separator, shape);
            }
            items.push(self.create_block(&container, shape, idx));
        }

        debug!(
            class = descriptor.name(),
            x = position.x(),
            y = position.y(),
            blocks = items.len();
            "Class created"
        );
        *self.binding_mut(id) = Binding {
            container: Some(container),
            items,
            separators: separator.into_iter().collect(),
        };
    }

    fn update_class(
        &mut self,
        id: DescriptorId,
        descriptor: &ClassDescriptor,
        container: CellId,
        shape: &ClassShape<'_>,
    ) {
        let binding = self.binding(id).clone();
        if binding.items.len() > 2 || binding.separators.len() > 1 {
            warn!(
                class = descriptor.name(),
                items = binding.items.len(),
                separators = binding.separators.len();
                "Unexpected container structure, class left untouched"
            );
            self.report.push_issue(SyncIssue::InconsistentLayout {
                class: descriptor.name().to_string(),
                items: binding.items.len(),
                separators: binding.separators.len(),
            });
            return;
        }

        let mut items = binding.items;
        let mut separator = binding.separators.into_iter().next();
        let previous = items.len();

        match (previous, shape.blocks.len()) {
            // Same number of blocks: only labels and geometry change.
            (0, 0) | (1, 1) | (2, 2) => {}
            // Blocks appeared: create them, separator first for a second block.
            (0, wanted) => {
                for idx in 0..wanted {
                    if idx == 1 {
                        self.ensure_separator(&container, &mut separator, shape);
                    }
                    items.push(self.create_block(&container, shape, idx));
                }
            }
            (1, 2) => {
                self.ensure_separator(&container, &mut separator, shape);
                items.push(self.create_block(&container, shape, 1));
            }
            // Blocks disappeared: the first block takes the remaining text.
            (_, wanted) => {
                for item in items.split_off(wanted) {
                    self.remove(&item);
                }
            }
        }
        if shape.blocks.len() == 2 {
            self.ensure_separator(&container, &mut separator, shape);
        } else if let Some(separator) = separator.take() {
            self.remove(&separator);
        }

        for (idx, item) in items.iter().enumerate() {
            let block = &shape.blocks[idx];
            let changed = self.document.set_label(item, block.text)
                | self.document.set_tooltip(item, block.tooltip)
                | self.document.set_geometry(
                    item,
                    GeometryUpdate::new()
                        .with_y(shape.block_offsets[idx])
                        .with_width(shape.width)
                        .with_height(block.height),
                );
            self.record_update(changed);
        }
        if let (Some(separator), Some(y)) = (&separator, shape.separator_offset) {
            let changed = self.document.set_geometry(
                separator,
                GeometryUpdate::new()
                    .with_y(y)
                    .with_width(shape.width)
                    .with_height(SEPARATOR_HEIGHT),
            );
            self.record_update(changed);
        }

        let changed = self
            .document
            .set_tooltip(&container, descriptor.class_tooltip())
            | self.document.set_geometry(
                &container,
                GeometryUpdate::new()
                    .with_width(shape.width)
                    .with_height(shape.height),
            );
        self.record_update(changed);

        trace!(
            class = descriptor.name(),
            previous_blocks = previous,
            blocks = items.len();
            "Class updated"
        );
        *self.binding_mut(id) = Binding {
            container: Some(container),
            items,
            separators: separator.into_iter().collect(),
        };
    }

    fn create_block(&mut self, container: &CellId, shape: &ClassShape<'_>, idx: usize) -> CellId {
        let block = &shape.blocks[idx];
        let item = self.document.create_item(
            block.text,
            block.tooltip,
            container,
            shape.block_offsets[idx],
            shape.width,
            block.height,
        );
        self.report.record_created();
        item
    }

    fn ensure_separator(
        &mut self,
        container: &CellId,
        separator: &mut Option<CellId>,
        shape: &ClassShape<'_>,
    ) {
        if separator.is_some() {
            return;
        }
        let y = shape.separator_offset.unwrap_or(HEADER_HEIGHT);
        *separator = Some(self.document.create_separator(container, y, shape.width));
        self.report.record_created();
    }

    pub(super) fn remove(&mut self, id: &CellId) {
        if self.document.remove_cell(id).is_some() {
            self.report.record_removed(1);
        }
    }

    fn record_update(&mut self, changed: bool) {
        if changed {
            self.report.record_updated();
        }
    }
}
