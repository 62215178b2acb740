//! Drag surface controller.
//!
//! Bridges pointer events from a hosting surface to the [`ReorderEngine`] and
//! drives the surface's drag visuals: the shadow row, the hidden original,
//! edge highlights, auto-scroll, and zebra striping.
//!
//! ## Listener Lifecycle
//!
//! Pointer-move and pointer-up handlers are attached only while a drag is in
//! progress. The controller calls `subscribe_pointer` when the engine enters
//! `Dragging` and `unsubscribe_pointer` when it leaves, exactly once each.

use dnd_table_core::{
    zebra_stripes, ContainerGeometry, Edge, MoveResult, RowBounds, RowStripes, SHADOW_OFFSET,
};

use crate::bounds::RowBoundsProvider;
use crate::engine::{HighlightState, ReorderEngine};
use crate::events::MoveEvents;

// =============================================================================
// Surface Capability
// =============================================================================

/// What a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The drag handle of the row at `row`.
    Handle { row: usize, disabled: bool },
    /// Anywhere else on a row.
    Cell,
    /// Not on a row.
    Outside,
}

/// A rendered list of rows that can show drag feedback.
///
/// Implemented by the UI layer. Row indices are positions among the
/// surface's own rows.
#[cfg_attr(test, mockall::automock)]
pub trait DragSurface {
    /// Current row geometry, top to bottom.
    fn row_bounds(&self) -> Vec<RowBounds>;

    /// Visible extent of the scrolling container.
    fn container(&self) -> ContainerGeometry;

    /// Whether this surface is an inner group nested in another surface.
    fn is_inner(&self) -> bool;

    /// Inner row count per row, for striping.
    fn inner_counts(&self) -> Vec<usize>;

    /// Float a copy of `row` with its top edge at `top`.
    fn show_shadow(&mut self, row: usize, top: f32);

    fn move_shadow(&mut self, top: f32);

    fn remove_shadow(&mut self);

    /// Hide a row in place. It keeps its layout slot.
    fn set_row_hidden(&mut self, row: usize, hidden: bool);

    fn set_highlight(&mut self, row: usize, edge: Edge);

    fn clear_highlights(&mut self);

    /// Scroll the container. Positive moves further down the list.
    fn scroll_by(&mut self, delta: f32);

    fn set_stripes(&mut self, stripes: Vec<RowStripes>);

    /// Start delivering pointer-move and pointer-up events.
    fn subscribe_pointer(&mut self);

    /// Stop delivering pointer-move and pointer-up events.
    fn unsubscribe_pointer(&mut self);
}

/// Reads row geometry from a surface.
struct SurfaceRows<'a, S: ?Sized>(&'a S);

impl<S: DragSurface + ?Sized> RowBoundsProvider for SurfaceRows<'_, S> {
    fn list_rows(&self) -> Vec<RowBounds> {
        self.0.row_bounds()
    }
}

// =============================================================================
// Controller
// =============================================================================

/// One controller per drag surface. Nested groups get their own.
#[derive(Default)]
pub struct DragSurfaceController {
    engine: ReorderEngine,
    events: MoveEvents,
}

impl DragSurfaceController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves emitted by this surface.
    pub fn events(&self) -> &MoveEvents {
        &self.events
    }

    pub fn engine(&self) -> &ReorderEngine {
        &self.engine
    }

    pub fn is_dragging(&self) -> bool {
        self.engine.is_dragging()
    }

    /// Start a drag if the pointer went down on an enabled handle.
    ///
    /// Returns whether a drag started.
    pub fn on_pointer_down<S>(
        &mut self,
        target: PointerTarget,
        pointer_y: f32,
        surface: &mut S,
    ) -> bool
    where
        S: DragSurface + ?Sized,
    {
        let row = match target {
            PointerTarget::Handle {
                disabled: false,
                row,
            } => row,
            PointerTarget::Handle { disabled: true, row } => {
                tracing::debug!("Handle of row {} is disabled", row);
                return false;
            }
            PointerTarget::Cell | PointerTarget::Outside => return false,
        };

        if !self.engine.begin_session(row, pointer_y) {
            return false;
        }

        surface.show_shadow(row, pointer_y - SHADOW_OFFSET);
        surface.set_row_hidden(row, true);
        surface.subscribe_pointer();
        true
    }

    /// Track the pointer: move the shadow, auto-scroll, and highlight edges.
    pub fn on_pointer_move<S>(&mut self, pointer_y: f32, surface: &mut S) -> HighlightState
    where
        S: DragSurface + ?Sized,
    {
        if !self.engine.is_dragging() {
            return HighlightState::default();
        }

        let container = surface.container();
        let state = self
            .engine
            .update_pointer(pointer_y, &SurfaceRows(&*surface), &container);

        if let Some(top) = state.shadow_top {
            surface.move_shadow(top);
        }

        let delta = state.scroll.delta();
        if delta != 0.0 {
            surface.scroll_by(delta);
        }

        surface.clear_highlights();
        for highlight in &state.highlights {
            surface.set_highlight(highlight.index, highlight.edge);
        }

        state
    }

    /// Finish the drag, restore visuals, and emit the move if there is one.
    pub fn on_pointer_up<S>(&mut self, pointer_y: f32, surface: &mut S) -> Option<MoveResult>
    where
        S: DragSurface + ?Sized,
    {
        let original = self.engine.session().map(|s| s.original_index)?;

        let result = self
            .engine
            .end_session(pointer_y, &SurfaceRows(&*surface));

        self.restore(original, surface);

        if let Some(result) = result {
            self.events.emit(&result);
        }
        result
    }

    /// Abandon the drag. The row snaps back and nothing is emitted.
    ///
    /// Returns whether a drag was in progress.
    pub fn cancel<S>(&mut self, surface: &mut S) -> bool
    where
        S: DragSurface + ?Sized,
    {
        let Some(original) = self.engine.session().map(|s| s.original_index) else {
            return false;
        };

        self.engine.cancel_session();
        self.restore(original, surface);
        true
    }

    /// Recompute zebra striping after the rows were re-rendered.
    ///
    /// Inner surfaces are striped by their parent.
    pub fn on_children_update<S>(&self, surface: &mut S)
    where
        S: DragSurface + ?Sized,
    {
        if surface.is_inner() {
            return;
        }

        let stripes = zebra_stripes(&surface.inner_counts());
        surface.set_stripes(stripes);
    }

    fn restore<S>(&self, original: usize, surface: &mut S)
    where
        S: DragSurface + ?Sized,
    {
        surface.set_row_hidden(original, false);
        surface.remove_shadow();
        surface.clear_highlights();
        surface.unsubscribe_pointer();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::stacked;
    use dnd_table_core::{ScrollDirection, Stripe};
    use mockall::predicate::eq;
    use parking_lot::Mutex;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    const ROW: f32 = 40.0;

    /// In-memory surface with fixed 40px rows.
    #[derive(Default)]
    struct FakeSurface {
        rows: usize,
        inner: Vec<usize>,
        nested: bool,
        container: Option<ContainerGeometry>,
        shadow: Option<(usize, f32)>,
        hidden: Option<usize>,
        highlights: BTreeMap<usize, Edge>,
        scroll: f32,
        stripes: Vec<RowStripes>,
        subscribed: bool,
        subscribe_calls: usize,
    }

    impl FakeSurface {
        fn with_rows(rows: usize) -> Self {
            Self {
                rows,
                ..Default::default()
            }
        }
    }

    impl DragSurface for FakeSurface {
        fn row_bounds(&self) -> Vec<RowBounds> {
            let mut rows = stacked(-self.scroll, &vec![ROW; self.rows]);
            if let Some(hidden) = self.hidden {
                rows[hidden].is_dragged_original = true;
            }
            if let Some((_, top)) = self.shadow {
                let mut shadow = RowBounds::new(self.rows, top, top + ROW);
                shadow.is_dragged_shadow = true;
                rows.push(shadow);
            }
            rows
        }

        fn container(&self) -> ContainerGeometry {
            self.container
                .unwrap_or_else(|| ContainerGeometry::new(0.0, 1000.0, 2000.0))
        }

        fn is_inner(&self) -> bool {
            self.nested
        }

        fn inner_counts(&self) -> Vec<usize> {
            self.inner.clone()
        }

        fn show_shadow(&mut self, row: usize, top: f32) {
            self.shadow = Some((row, top));
        }

        fn move_shadow(&mut self, top: f32) {
            if let Some(shadow) = self.shadow.as_mut() {
                shadow.1 = top;
            }
        }

        fn remove_shadow(&mut self) {
            self.shadow = None;
        }

        fn set_row_hidden(&mut self, row: usize, hidden: bool) {
            self.hidden = hidden.then_some(row);
        }

        fn set_highlight(&mut self, row: usize, edge: Edge) {
            self.highlights.insert(row, edge);
        }

        fn clear_highlights(&mut self) {
            self.highlights.clear();
        }

        fn scroll_by(&mut self, delta: f32) {
            self.scroll = (self.scroll + delta).max(0.0);
        }

        fn set_stripes(&mut self, stripes: Vec<RowStripes>) {
            self.stripes = stripes;
        }

        fn subscribe_pointer(&mut self) {
            self.subscribed = true;
            self.subscribe_calls += 1;
        }

        fn unsubscribe_pointer(&mut self) {
            self.subscribed = false;
        }
    }

    fn handle(row: usize) -> PointerTarget {
        PointerTarget::Handle {
            row,
            disabled: false,
        }
    }

    #[test]
    fn test_pointer_down_on_handle_starts_drag() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);

        assert!(controller.on_pointer_down(handle(2), 100.0, &mut surface));
        assert!(controller.is_dragging());
        assert_eq!(surface.hidden, Some(2));
        assert_eq!(surface.shadow, Some((2, 100.0 - SHADOW_OFFSET)));
        assert!(surface.subscribed);
    }

    #[test]
    fn test_pointer_down_on_disabled_handle_is_ignored() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);

        let target = PointerTarget::Handle {
            row: 1,
            disabled: true,
        };
        assert!(!controller.on_pointer_down(target, 50.0, &mut surface));
        assert!(!controller.on_pointer_down(PointerTarget::Cell, 50.0, &mut surface));
        assert!(!controller.is_dragging());
        assert!(surface.shadow.is_none());
        assert!(!surface.subscribed);
    }

    #[test]
    fn test_second_pointer_down_does_not_restart() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);

        controller.on_pointer_down(handle(1), 50.0, &mut surface);
        assert!(!controller.on_pointer_down(handle(3), 130.0, &mut surface));
        assert_eq!(controller.engine().session().unwrap().original_index, 1);
        assert_eq!(surface.subscribe_calls, 1);
    }

    #[test]
    fn test_full_drag_emits_move() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = controller
            .events()
            .add_listener(move |m: &MoveResult| sink.lock().push(*m));

        controller.on_pointer_down(handle(3), 125.0, &mut surface);
        controller.on_pointer_move(90.0, &mut surface);
        controller.on_pointer_move(42.0, &mut surface);
        assert_eq!(surface.highlights.get(&0), Some(&Edge::Bottom));

        let result = controller.on_pointer_up(42.0, &mut surface);
        let expected = MoveResult {
            from_index: 3,
            to_index: 1,
        };
        assert_eq!(result, Some(expected));
        assert_eq!(*seen.lock(), vec![expected]);
    }

    #[test]
    fn test_pointer_up_restores_visuals() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);

        controller.on_pointer_down(handle(0), 10.0, &mut surface);
        controller.on_pointer_move(82.0, &mut surface);
        assert!(!surface.highlights.is_empty());

        controller.on_pointer_up(82.0, &mut surface);
        assert_eq!(surface.hidden, None);
        assert!(surface.shadow.is_none());
        assert!(surface.highlights.is_empty());
        assert!(!surface.subscribed);
        assert!(!controller.is_dragging());
    }

    #[test]
    fn test_snap_back_emits_nothing() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        let _sub = controller
            .events()
            .add_listener(move |_: &MoveResult| *sink.lock() += 1);

        controller.on_pointer_down(handle(1), 50.0, &mut surface);
        assert_eq!(controller.on_pointer_up(100.0, &mut surface), None);
        assert_eq!(*seen.lock(), 0);
        assert!(!surface.subscribed);
    }

    #[test]
    fn test_pointer_move_auto_scrolls() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface {
            container: Some(ContainerGeometry::new(0.0, 100.0, 2000.0)),
            ..FakeSurface::with_rows(10)
        };

        controller.on_pointer_down(handle(0), 10.0, &mut surface);
        let state = controller.on_pointer_move(150.0, &mut surface);
        assert_eq!(state.scroll, ScrollDirection::Down);
        assert_eq!(surface.scroll, 10.0);
        // Shadow stays where it was while outside the container
        assert_eq!(surface.shadow, Some((0, 10.0 - SHADOW_OFFSET)));

        controller.on_pointer_move(150.0, &mut surface);
        assert_eq!(surface.scroll, 20.0);
    }

    #[test]
    fn test_pointer_events_while_idle_are_ignored() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(3);

        assert_eq!(
            controller.on_pointer_move(40.0, &mut surface),
            HighlightState::default()
        );
        assert_eq!(controller.on_pointer_up(40.0, &mut surface), None);
        assert!(!surface.subscribed);
    }

    #[test]
    fn test_cancel_snaps_back() {
        let mut controller = DragSurfaceController::new();
        let mut surface = FakeSurface::with_rows(4);

        assert!(!controller.cancel(&mut surface));

        controller.on_pointer_down(handle(2), 90.0, &mut surface);
        controller.on_pointer_move(42.0, &mut surface);
        assert!(controller.cancel(&mut surface));

        assert!(!controller.is_dragging());
        assert_eq!(surface.hidden, None);
        assert!(surface.shadow.is_none());
        assert!(surface.highlights.is_empty());
        assert!(!surface.subscribed);
    }

    #[test]
    fn test_children_update_stripes_top_level_surface() {
        let controller = DragSurfaceController::new();
        let mut surface = FakeSurface {
            inner: vec![0, 2, 0],
            ..FakeSurface::with_rows(3)
        };

        controller.on_children_update(&mut surface);
        assert_eq!(surface.stripes.len(), 3);
        assert_eq!(surface.stripes[1].row, Stripe::Even);
        assert_eq!(surface.stripes[2].row, Stripe::Odd);
    }

    #[test]
    fn test_children_update_skips_inner_surface() {
        let controller = DragSurfaceController::new();
        let mut surface = FakeSurface {
            nested: true,
            ..FakeSurface::with_rows(2)
        };

        controller.on_children_update(&mut surface);
        assert!(surface.stripes.is_empty());
    }

    #[test]
    fn test_listeners_attached_exactly_while_dragging() {
        let mut surface = MockDragSurface::new();
        surface
            .expect_row_bounds()
            .returning(|| stacked(0.0, &[ROW; 3]));
        surface
            .expect_container()
            .returning(|| ContainerGeometry::new(0.0, 500.0, 1000.0));
        surface
            .expect_show_shadow()
            .with(eq(1usize), eq(50.0 - SHADOW_OFFSET))
            .times(1)
            .return_const(());
        surface.expect_set_row_hidden().times(2).return_const(());
        surface.expect_subscribe_pointer().times(1).return_const(());
        surface.expect_unsubscribe_pointer().times(1).return_const(());
        surface.expect_move_shadow().return_const(());
        surface.expect_set_highlight().return_const(());
        surface.expect_clear_highlights().return_const(());
        surface.expect_remove_shadow().times(1).return_const(());
        surface.expect_scroll_by().never();

        let mut controller = DragSurfaceController::new();
        controller.on_pointer_down(handle(1), 50.0, &mut surface);
        controller.on_pointer_move(60.0, &mut surface);
        controller.on_pointer_move(70.0, &mut surface);
        controller.on_pointer_up(70.0, &mut surface);

        // Late events after the session closed touch nothing
        controller.on_pointer_move(80.0, &mut surface);
        controller.on_pointer_up(80.0, &mut surface);
    }

    #[test]
    fn test_disabled_handle_never_subscribes() {
        let mut surface = MockDragSurface::new();
        surface.expect_subscribe_pointer().never();
        surface.expect_show_shadow().never();

        let mut controller = DragSurfaceController::new();
        let target = PointerTarget::Handle {
            row: 0,
            disabled: true,
        };
        assert!(!controller.on_pointer_down(target, 10.0, &mut surface));
    }
}
