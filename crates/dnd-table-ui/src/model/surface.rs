//! Visual state of one drag surface.
//!
//! `SurfaceModel` is the GPUI-independent half of a rendered row list. It
//! knows where its rows sit, and records the drag feedback the controller
//! asks for. The view reads it back when rendering.

use std::collections::BTreeMap;

use dnd_table_core::{ContainerGeometry, Edge, RowBounds, RowStripes};
use dnd_table_engine::{DragSurface, RowBoundsProvider};

use super::layout::{ShadowRow, TableLayout};

// =============================================================================
// Layout Input
// =============================================================================

/// Where a surface's rows are, before scrolling.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayout {
    /// Window y where the surface's content starts at zero scroll.
    pub origin: f32,
    /// Header height above the first row. Zero for inner groups.
    pub header_height: f32,
    /// Height of each row. A collapsed row has height zero.
    pub row_heights: Vec<f32>,
    /// Inner row count per row.
    pub inner_counts: Vec<usize>,
    /// The scrolling container the surface lives in.
    pub container: ContainerGeometry,
    /// Largest allowed scroll offset. Zero for surfaces that do not scroll.
    pub max_scroll: f32,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            origin: 0.0,
            header_height: 0.0,
            row_heights: Vec::new(),
            inner_counts: Vec::new(),
            container: ContainerGeometry::new(0.0, 0.0, 0.0),
            max_scroll: 0.0,
        }
    }
}

/// Everything drag-related a render needs, in one value.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceVisuals {
    pub shadow: Option<ShadowRow>,
    pub hidden_row: Option<usize>,
    pub highlights: Vec<(usize, Edge)>,
    pub scroll_offset: f32,
    pub pointer_attached: bool,
}

// =============================================================================
// Surface Model
// =============================================================================

#[derive(Debug)]
pub struct SurfaceModel {
    nested: bool,
    geometry: TableLayout,
    container: ContainerGeometry,
    inner_counts: Vec<usize>,
    max_scroll: f32,
    highlights: BTreeMap<usize, Edge>,
    stripes: Vec<RowStripes>,
    pointer_attached: bool,
}

impl Default for SurfaceModel {
    fn default() -> Self {
        Self {
            nested: false,
            geometry: TableLayout::default(),
            container: ContainerGeometry::new(0.0, 0.0, 0.0),
            inner_counts: Vec::new(),
            max_scroll: 0.0,
            highlights: BTreeMap::new(),
            stripes: Vec::new(),
            pointer_attached: false,
        }
    }
}

impl SurfaceModel {
    /// The top-level surface of a table.
    pub fn top_level() -> Self {
        Self::default()
    }

    /// An inner group nested inside a top-level row.
    pub fn nested() -> Self {
        Self {
            nested: true,
            ..Self::default()
        }
    }

    /// Replace the layout, keeping drag state and clamping the scroll offset.
    pub fn set_layout(&mut self, layout: SurfaceLayout) {
        self.geometry.origin = layout.origin;
        self.geometry.header_height = layout.header_height;
        self.geometry.row_heights = layout.row_heights;
        self.inner_counts = layout.inner_counts;
        self.container = layout.container;
        self.max_scroll = layout.max_scroll.max(0.0);
        self.set_scroll_offset(self.geometry.scroll_offset);
    }

    pub fn geometry(&self) -> &TableLayout {
        &self.geometry
    }

    pub fn row_count(&self) -> usize {
        self.geometry.row_heights.len()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.geometry.scroll_offset
    }

    pub fn max_scroll(&self) -> f32 {
        self.max_scroll
    }

    /// Adopt a scroll position the user produced, e.g. with the wheel.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.geometry.scroll_offset = offset.clamp(0.0, self.max_scroll);
    }

    pub fn shadow(&self) -> Option<ShadowRow> {
        self.geometry.shadow
    }

    pub fn is_hidden(&self, row: usize) -> bool {
        self.geometry.hidden_row == Some(row)
    }

    pub fn highlight(&self, row: usize) -> Option<Edge> {
        self.highlights.get(&row).copied()
    }

    pub fn stripes(&self) -> &[RowStripes] {
        &self.stripes
    }

    pub fn stripe(&self, row: usize) -> Option<&RowStripes> {
        self.stripes.get(row)
    }

    /// Whether move and release events should reach this surface.
    pub fn pointer_attached(&self) -> bool {
        self.pointer_attached
    }

    pub fn visuals(&self) -> SurfaceVisuals {
        SurfaceVisuals {
            shadow: self.geometry.shadow,
            hidden_row: self.geometry.hidden_row,
            highlights: self.highlights.iter().map(|(row, edge)| (*row, *edge)).collect(),
            scroll_offset: self.geometry.scroll_offset,
            pointer_attached: self.pointer_attached,
        }
    }
}

impl DragSurface for SurfaceModel {
    fn row_bounds(&self) -> Vec<RowBounds> {
        self.geometry.list_rows()
    }

    fn container(&self) -> ContainerGeometry {
        self.container
    }

    fn is_inner(&self) -> bool {
        self.nested
    }

    fn inner_counts(&self) -> Vec<usize> {
        self.inner_counts.clone()
    }

    fn show_shadow(&mut self, row: usize, top: f32) {
        self.geometry.shadow = Some(ShadowRow { row, top });
    }

    fn move_shadow(&mut self, top: f32) {
        if let Some(shadow) = &mut self.geometry.shadow {
            shadow.top = top;
        }
    }

    fn remove_shadow(&mut self) {
        self.geometry.shadow = None;
    }

    fn set_row_hidden(&mut self, row: usize, hidden: bool) {
        if hidden {
            self.geometry.hidden_row = Some(row);
        } else if self.geometry.hidden_row == Some(row) {
            self.geometry.hidden_row = None;
        }
    }

    fn set_highlight(&mut self, row: usize, edge: Edge) {
        self.highlights.insert(row, edge);
    }

    fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.geometry.scroll_offset + delta);
    }

    fn set_stripes(&mut self, stripes: Vec<RowStripes>) {
        self.stripes = stripes;
    }

    fn subscribe_pointer(&mut self) {
        self.pointer_attached = true;
    }

    fn unsubscribe_pointer(&mut self) {
        self.pointer_attached = false;
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use dnd_table_core::MoveResult;
    use dnd_table_engine::{DragSurfaceController, PointerTarget};

    const ROW: f32 = 36.0;

    fn surface(rows: usize, max_scroll: f32) -> SurfaceModel {
        let mut surface = SurfaceModel::top_level();
        surface.set_layout(SurfaceLayout {
            origin: 100.0,
            header_height: 0.0,
            row_heights: vec![ROW; rows],
            inner_counts: vec![0; rows],
            container: ContainerGeometry::new(100.0, 200.0, 800.0),
            max_scroll,
        });
        surface
    }

    #[test]
    fn test_rows_follow_scroll() {
        let mut surface = surface(4, 50.0);
        assert_eq!(surface.row_bounds()[1].top, 136.0);

        surface.scroll_by(10.0);
        assert_eq!(surface.row_bounds()[1].top, 126.0);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut surface = surface(4, 15.0);
        surface.scroll_by(-10.0);
        assert_eq!(surface.scroll_offset(), 0.0);

        surface.scroll_by(10.0);
        surface.scroll_by(10.0);
        assert_eq!(surface.scroll_offset(), 15.0);

        // Shrinking content pulls the offset back in
        surface.set_layout(SurfaceLayout {
            origin: 100.0,
            row_heights: vec![ROW; 4],
            max_scroll: 5.0,
            ..SurfaceLayout::default()
        });
        assert_eq!(surface.scroll_offset(), 5.0);
    }

    #[test]
    fn test_shadow_is_reported_last() {
        let mut surface = surface(3, 0.0);
        surface.show_shadow(1, 170.0);
        surface.set_row_hidden(1, true);

        let rows = surface.row_bounds();
        assert_eq!(rows.len(), 4);
        assert!(rows[1].is_dragged_original);
        assert!(rows[3].is_dragged_shadow);
        assert_eq!(rows[3].index, 3);
        assert_eq!(rows[3].top, 170.0);
        assert_eq!(rows[3].height(), ROW);
    }

    #[test]
    fn test_unhide_other_row_keeps_hidden() {
        let mut surface = surface(3, 0.0);
        surface.set_row_hidden(2, true);
        surface.set_row_hidden(0, false);
        assert!(surface.is_hidden(2));
    }

    #[test]
    fn test_collapsed_rows_have_no_height() {
        let mut surface = SurfaceModel::nested();
        surface.set_layout(SurfaceLayout {
            origin: 50.0,
            row_heights: vec![0.0, 0.0],
            inner_counts: vec![0, 0],
            ..SurfaceLayout::default()
        });

        let rows = surface.row_bounds();
        assert!(rows.iter().all(|r| r.top == 50.0 && r.bottom == 50.0));
        assert!(surface.is_inner());
    }

    #[test]
    fn test_drag_visuals_mid_drag() {
        let mut surface = surface(4, 100.0);
        let mut controller = DragSurfaceController::new();

        // Grab row 2 (top 172) by its handle
        assert!(controller.on_pointer_down(
            PointerTarget::Handle {
                row: 2,
                disabled: false
            },
            190.0,
            &mut surface,
        ));
        // Near the bottom edge of row 0 (bottom 136)
        controller.on_pointer_move(140.0, &mut surface);

        insta::assert_debug_snapshot!(surface.visuals(), @r###"
        SurfaceVisuals {
            shadow: Some(
                ShadowRow {
                    row: 2,
                    top: 110.0,
                },
            ),
            hidden_row: Some(
                2,
            ),
            highlights: [
                (
                    0,
                    Bottom,
                ),
            ],
            scroll_offset: 0.0,
            pointer_attached: true,
        }
        "###);
    }

    #[test]
    fn test_drop_clears_visuals() {
        let mut surface = surface(4, 100.0);
        let mut controller = DragSurfaceController::new();
        controller.on_pointer_down(
            PointerTarget::Handle {
                row: 2,
                disabled: false,
            },
            190.0,
            &mut surface,
        );
        controller.on_pointer_move(140.0, &mut surface);

        let moved = controller.on_pointer_up(140.0, &mut surface);
        assert_eq!(
            moved,
            Some(MoveResult {
                from_index: 2,
                to_index: 1
            })
        );
        assert_eq!(
            surface.visuals(),
            SurfaceVisuals {
                shadow: None,
                hidden_row: None,
                highlights: Vec::new(),
                scroll_offset: 0.0,
                pointer_attached: false,
            }
        );
    }

    #[test]
    fn test_auto_scroll_below_container() {
        let mut surface = surface(10, 160.0);
        let mut controller = DragSurfaceController::new();
        controller.on_pointer_down(
            PointerTarget::Handle {
                row: 0,
                disabled: false,
            },
            110.0,
            &mut surface,
        );

        // Container spans 100..300
        controller.on_pointer_move(320.0, &mut surface);
        controller.on_pointer_move(320.0, &mut surface);
        assert_eq!(surface.scroll_offset(), 20.0);

        controller.on_pointer_move(50.0, &mut surface);
        assert_eq!(surface.scroll_offset(), 10.0);
    }
}
