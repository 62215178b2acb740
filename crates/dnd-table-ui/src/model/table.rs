//! Table-wide drag state.
//!
//! A table is one top-level surface plus one nested surface per row that
//! has an inner group. Each surface has its own controller; this model
//! routes pointer events to whichever surface owns the current drag and
//! keeps the records in sync with emitted moves.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use dnd_table_core::{ContainerGeometry, ExpandedRows, MoveResult, RowKey, TableData, TableRow};
use dnd_table_engine::{
    DragSurface, DragSurfaceController, HighlightState, MoveEvents, PointerTarget, Subscription,
};

use super::surface::{SurfaceLayout, SurfaceModel};

/// Which surface of the table an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SurfaceId {
    Outer,
    /// The inner group of the top-level row with this key.
    Inner(RowKey),
}

/// A completed reorder, with the records as they are afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderUpdate {
    pub surface: SurfaceId,
    pub moved: MoveResult,
    pub data: TableData,
}

struct Surface {
    controller: DragSurfaceController,
    model: SurfaceModel,
    _subscription: Subscription,
}

impl Surface {
    /// A surface whose moves are applied to `data` by `apply`.
    fn new(
        model: SurfaceModel,
        data: &Arc<RwLock<TableData>>,
        apply: impl Fn(&mut TableData, &MoveResult) + Send + Sync + 'static,
    ) -> Self {
        let controller = DragSurfaceController::new();
        let owner = Arc::clone(data);
        let subscription = controller
            .events()
            .add_listener(move |moved| apply(&mut owner.write(), moved));

        Self {
            controller,
            model,
            _subscription: subscription,
        }
    }
}

pub struct TableModel {
    data: Arc<RwLock<TableData>>,
    expanded: ExpandedRows,
    row_height: f32,
    header_height: f32,
    container: ContainerGeometry,
    outer: Surface,
    inner: HashMap<RowKey, Surface>,
    active: Option<SurfaceId>,
}

impl TableModel {
    pub fn new(data: TableData, row_height: f32, header_height: f32) -> Self {
        let data = Arc::new(RwLock::new(data));
        let outer = Surface::new(SurfaceModel::top_level(), &data, |rows, moved| {
            rows.reorder(moved.from_index, moved.to_index);
        });

        let mut model = Self {
            data,
            expanded: ExpandedRows::new(),
            row_height,
            header_height,
            container: ContainerGeometry::new(0.0, 0.0, 0.0),
            outer,
            inner: HashMap::new(),
            active: None,
        };
        model.rebuild_inner();
        model.relayout();
        model.refresh_stripes();
        model
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Snapshot of the current records.
    pub fn data(&self) -> TableData {
        self.data.read().clone()
    }

    pub fn rows(&self) -> Vec<TableRow> {
        self.data.read().rows().to_vec()
    }

    /// Replace every record. Any drag in progress is abandoned.
    pub fn set_data(&mut self, data: TableData) {
        self.cancel();
        *self.data.write() = data;
        self.rebuild_inner();
        self.relayout();
        self.refresh_stripes();
    }

    /// Moves emitted by a surface, for owners that track order themselves.
    pub fn events(&self, surface: &SurfaceId) -> Option<&MoveEvents> {
        self.surface(surface).map(|s| s.controller.events())
    }

    fn rebuild_inner(&mut self) {
        let keys: Vec<RowKey> = self
            .data
            .read()
            .rows()
            .iter()
            .filter(|row| row.inner.is_some())
            .map(|row| row.key.clone())
            .collect();

        self.inner.clear();
        for key in keys {
            let base_key = key.clone();
            let surface = Surface::new(SurfaceModel::nested(), &self.data, move |rows, moved| {
                rows.reorder_inner(&base_key, moved.from_index, moved.to_index);
            });
            self.inner.insert(key, surface);
        }
        tracing::debug!("Built {} inner surfaces", self.inner.len());
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Record where the scroll container sits in the window.
    pub fn set_container(&mut self, container: ContainerGeometry) {
        if self.container != container {
            self.container = container;
            self.relayout();
        }
    }

    pub fn container(&self) -> ContainerGeometry {
        self.container
    }

    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    pub fn scroll_offset(&self) -> f32 {
        self.outer.model.scroll_offset()
    }

    /// Adopt a scroll position the user produced.
    pub fn sync_scroll(&mut self, offset: f32) {
        if self.outer.model.scroll_offset() != offset {
            self.outer.model.set_scroll_offset(offset);
            self.relayout();
        }
    }

    pub fn header_height(&self) -> f32 {
        self.header_height
    }

    /// Height of the header, every top-level row, and expanded groups.
    pub fn content_height(&self) -> f32 {
        self.outer.model.geometry().content_height()
    }

    /// Recompute every surface's row positions.
    fn relayout(&mut self) {
        let data = Arc::clone(&self.data);
        let data = data.read();
        let row_height = self.row_height;

        let heights: Vec<f32> = data
            .rows()
            .iter()
            .map(|row| {
                if self.expanded.is_expanded(&row.key) {
                    row_height * (1 + row.inner_len()) as f32
                } else {
                    row_height
                }
            })
            .collect();
        let content = self.header_height + heights.iter().sum::<f32>();

        self.outer.model.set_layout(SurfaceLayout {
            origin: self.container.top,
            header_height: self.header_height,
            row_heights: heights,
            inner_counts: data.inner_counts(),
            container: self.container,
            max_scroll: (content - self.container.height).max(0.0),
        });

        let outer_rows = self.outer.model.row_bounds();
        for (index, row) in data.rows().iter().enumerate() {
            let Some(surface) = self.inner.get_mut(&row.key) else {
                continue;
            };

            let base_top = outer_rows.get(index).map_or(0.0, |b| b.top);
            let inner_height = if self.expanded.is_expanded(&row.key) {
                row_height
            } else {
                0.0
            };

            // An inner group is its own container, bounded by its rows
            let group_top = base_top + row_height;
            let group = ContainerGeometry::new(
                group_top,
                inner_height * row.inner_len() as f32,
                self.container.viewport_height,
            );

            surface.model.set_layout(SurfaceLayout {
                origin: group_top,
                header_height: 0.0,
                row_heights: vec![inner_height; row.inner_len()],
                inner_counts: vec![0; row.inner_len()],
                container: group,
                max_scroll: 0.0,
            });
        }
    }

    /// Recompute zebra stripes after the rows changed.
    fn refresh_stripes(&mut self) {
        self.outer.controller.on_children_update(&mut self.outer.model);
        for surface in self.inner.values_mut() {
            surface.controller.on_children_update(&mut surface.model);
        }
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    pub fn outer(&self) -> &SurfaceModel {
        &self.outer.model
    }

    pub fn inner(&self, key: &RowKey) -> Option<&SurfaceModel> {
        self.inner.get(key).map(|s| &s.model)
    }

    fn surface(&self, id: &SurfaceId) -> Option<&Surface> {
        match id {
            SurfaceId::Outer => Some(&self.outer),
            SurfaceId::Inner(key) => self.inner.get(key),
        }
    }

    fn surface_mut(&mut self, id: &SurfaceId) -> Option<&mut Surface> {
        match id {
            SurfaceId::Outer => Some(&mut self.outer),
            SurfaceId::Inner(key) => self.inner.get_mut(key),
        }
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    pub fn is_expanded(&self, key: &RowKey) -> bool {
        self.expanded.is_expanded(key)
    }

    /// Flip one row's inner group. Returns whether it is now expanded.
    pub fn toggle_expanded(&mut self, key: &RowKey) -> bool {
        let expanded = self.expanded.toggle(key);
        self.relayout();
        expanded
    }

    pub fn expand_all(&mut self) {
        let data = self.data.read().clone();
        self.expanded.expand_all(&data);
        self.relayout();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.collapse_all();
        self.relayout();
    }

    // =========================================================================
    // Pointer Routing
    // =========================================================================

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The surface that owns the current drag.
    pub fn active(&self) -> Option<&SurfaceId> {
        self.active.as_ref()
    }

    /// Whether the dragging surface wants move and release events.
    pub fn pointer_attached(&self) -> bool {
        self.active
            .as_ref()
            .and_then(|id| self.surface(id))
            .is_some_and(|s| s.model.pointer_attached())
    }

    /// What a pointer-down on the handle of `row` in `surface` lands on.
    pub fn handle_target(&self, surface: &SurfaceId, row: usize) -> PointerTarget {
        let data = self.data.read();
        match record(&data, surface, row) {
            Some(record) => PointerTarget::Handle {
                row,
                disabled: record.disabled,
            },
            None => PointerTarget::Outside,
        }
    }

    /// The record the shadow is drawn from, with its surface and row.
    pub fn dragged_record(&self) -> Option<(SurfaceId, usize, TableRow)> {
        let id = self.active.clone()?;
        let row = self.surface(&id)?.model.shadow()?.row;
        let record = record(&self.data.read(), &id, row)?.clone();
        Some((id, row, record))
    }

    /// Route a pointer-down. Only one drag may run across the whole table.
    pub fn pointer_down(&mut self, id: SurfaceId, target: PointerTarget, pointer_y: f32) -> bool {
        if let Some(active) = &self.active {
            tracing::debug!("Ignoring pointer-down on {:?}, {:?} is dragging", id, active);
            return false;
        }

        let Some(surface) = self.surface_mut(&id) else {
            tracing::warn!("Pointer-down on unknown surface {:?}", id);
            return false;
        };

        let started = surface
            .controller
            .on_pointer_down(target, pointer_y, &mut surface.model);
        if started {
            tracing::debug!("Drag started on {:?}", id);
            self.active = Some(id);
        }
        started
    }

    pub fn pointer_move(&mut self, pointer_y: f32) -> HighlightState {
        let Some(id) = self.active.clone() else {
            return HighlightState::default();
        };
        let Some(surface) = self.surface_mut(&id) else {
            return HighlightState::default();
        };

        let state = surface
            .controller
            .on_pointer_move(pointer_y, &mut surface.model);
        if state.scroll.delta() != 0.0 {
            self.relayout();
        }
        state
    }

    /// Finish the drag. Returns the update when the order changed.
    pub fn pointer_up(&mut self, pointer_y: f32) -> Option<OrderUpdate> {
        let id = self.active.take()?;
        let surface = self.surface_mut(&id)?;

        let moved = surface
            .controller
            .on_pointer_up(pointer_y, &mut surface.model)?;

        self.relayout();
        self.refresh_stripes();

        let data = self.data();
        tracing::info!(
            "Row moved on {:?}: {} -> {}",
            id,
            moved.from_index,
            moved.to_index
        );
        Some(OrderUpdate {
            surface: id,
            moved,
            data,
        })
    }

    /// Abandon the current drag, if any.
    pub fn cancel(&mut self) -> bool {
        let Some(id) = self.active.take() else {
            return false;
        };

        match self.surface_mut(&id) {
            Some(surface) => surface.controller.cancel(&mut surface.model),
            None => false,
        }
    }
}

fn record<'a>(data: &'a TableData, surface: &SurfaceId, row: usize) -> Option<&'a TableRow> {
    match surface {
        SurfaceId::Outer => data.rows().get(row),
        SurfaceId::Inner(key) => data
            .get(key)
            .and_then(|base| base.inner.as_ref())
            .and_then(|inner| inner.get(row)),
    }
}

// =============================================================================
// Tests
// =============================================================================
