//! Row geometry and move results.
//!
//! All coordinates are vertical positions in window space, in pixels.

use serde::{Deserialize, Serialize};

/// Maximum distance between the pointer and a row edge for the edge to match.
pub const PROXIMITY_THRESHOLD: f32 = 15.0;

/// Scroll distance applied per pointer-move while auto-scrolling.
pub const SCROLL_STEP: f32 = 10.0;

/// Distance from the pointer to the top of the floating shadow row.
pub const SHADOW_OFFSET: f32 = 30.0;

// =============================================================================
// RowBounds
// =============================================================================

/// Snapshot of one row's vertical extent and drag role.
///
/// Recomputed from the live layout on every lookup; never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    /// Position of the row among all rows of its surface.
    pub index: usize,
    /// Top edge.
    pub top: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// The row that is being dragged (hidden in place).
    pub is_dragged_original: bool,
    /// The floating clone that follows the pointer.
    pub is_dragged_shadow: bool,
}

impl RowBounds {
    /// Create bounds for a plain row.
    pub fn new(index: usize, top: f32, bottom: f32) -> Self {
        Self {
            index,
            top,
            bottom,
            is_dragged_original: false,
            is_dragged_shadow: false,
        }
    }

    /// Row height.
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    /// Whether this row may be matched as a drop target.
    pub fn is_candidate(&self) -> bool {
        !self.is_dragged_original && !self.is_dragged_shadow
    }

    /// Pointer is within the proximity threshold of the bottom edge.
    pub fn near_bottom(&self, pointer_y: f32) -> bool {
        (self.bottom - pointer_y).abs() < PROXIMITY_THRESHOLD
    }

    /// Pointer is within the proximity threshold of the top edge.
    pub fn near_top(&self, pointer_y: f32) -> bool {
        (self.top - pointer_y).abs() < PROXIMITY_THRESHOLD
    }
}

// =============================================================================
// Placement
// =============================================================================

/// Side of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Top,
    Bottom,
}

/// A matched drop candidate and the edge the pointer is near.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Index of the candidate row among all rows.
    pub index: usize,
    /// `Bottom` inserts after the candidate, `Top` inserts before it.
    pub edge: Edge,
}

impl Placement {
    pub fn insert_after(&self) -> bool {
        self.edge == Edge::Bottom
    }
}

// =============================================================================
// MoveResult
// =============================================================================

/// A single reorder produced by a completed drag.
///
/// Apply as one remove at `from_index` followed by one insert at `to_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveResult {
    pub from_index: usize,
    pub to_index: usize,
}

impl MoveResult {
    /// Turn a matched placement into move indices.
    ///
    /// An insert-after match on a row above the dragged row shifts the target
    /// down by one, since the dragged row is removed before it is inserted.
    pub fn resolve(from_index: usize, placement: Placement) -> Self {
        let to_index = if placement.insert_after() && from_index > placement.index {
            placement.index + 1
        } else {
            placement.index
        };

        Self {
            from_index,
            to_index,
        }
    }

    /// Moving a row onto its own position.
    pub fn is_noop(&self) -> bool {
        self.from_index == self.to_index
    }
}

// =============================================================================
// Container / Auto-scroll
// =============================================================================

/// Auto-scroll decision for one pointer-move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    None,
    Up,
    Down,
}

impl ScrollDirection {
    /// Signed scroll distance. Positive scrolls content down the list.
    pub fn delta(self) -> f32 {
        match self {
            ScrollDirection::None => 0.0,
            ScrollDirection::Up => -SCROLL_STEP,
            ScrollDirection::Down => SCROLL_STEP,
        }
    }
}

/// Visible extent of a scrolling container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerGeometry {
    /// Top edge of the container.
    pub top: f32,
    /// Visible height of the container.
    pub height: f32,
    /// Height of the whole window.
    pub viewport_height: f32,
}

impl ContainerGeometry {
    pub fn new(top: f32, height: f32, viewport_height: f32) -> Self {
        Self {
            top,
            height,
            viewport_height,
        }
    }

    /// Pointer is above the container or touching the window's top edge.
    pub fn is_above(&self, pointer_y: f32) -> bool {
        pointer_y < self.top || pointer_y < PROXIMITY_THRESHOLD
    }

    /// Pointer is below the container or touching the window's bottom edge.
    pub fn is_below(&self, pointer_y: f32) -> bool {
        pointer_y > self.top + self.height
            || (pointer_y - self.viewport_height).abs() < PROXIMITY_THRESHOLD
    }

    /// Fixed-step scroll decision. Both edges at once cancel out.
    pub fn scroll_direction(&self, pointer_y: f32) -> ScrollDirection {
        match (self.is_above(pointer_y), self.is_below(pointer_y)) {
            (true, false) => ScrollDirection::Up,
            (false, true) => ScrollDirection::Down,
            _ => ScrollDirection::None,
        }
    }

    /// Pointer is inside the container away from both edges.
    pub fn tracks(&self, pointer_y: f32) -> bool {
        !self.is_above(pointer_y) && !self.is_below(pointer_y)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_proximity_is_strict() {
        let row = RowBounds::new(0, 100.0, 140.0);
        assert!(row.near_bottom(126.0));
        assert!(row.near_bottom(154.9));
        assert!(!row.near_bottom(155.0));
        assert!(!row.near_bottom(125.0));
        assert!(row.near_top(100.0));
        assert!(!row.near_top(115.0));
    }

    #[test]
    fn test_resolve_moves_up_shifts_target() {
        let placement = Placement {
            index: 0,
            edge: Edge::Bottom,
        };
        assert_eq!(
            MoveResult::resolve(3, placement),
            MoveResult {
                from_index: 3,
                to_index: 1
            }
        );
    }

    #[test]
    fn test_resolve_moves_down_keeps_target() {
        let placement = Placement {
            index: 2,
            edge: Edge::Bottom,
        };
        assert_eq!(MoveResult::resolve(0, placement).to_index, 2);
    }

    #[test]
    fn test_resolve_insert_before_keeps_target() {
        let placement = Placement {
            index: 0,
            edge: Edge::Top,
        };
        assert_eq!(MoveResult::resolve(1, placement).to_index, 0);
    }

    #[test]
    fn test_resolve_directly_below_previous_row_is_noop() {
        let placement = Placement {
            index: 1,
            edge: Edge::Bottom,
        };
        assert!(MoveResult::resolve(2, placement).is_noop());
    }

    #[test]
    fn test_scroll_direction() {
        let container = ContainerGeometry::new(100.0, 300.0, 800.0);
        assert_eq!(container.scroll_direction(50.0), ScrollDirection::Up);
        assert_eq!(container.scroll_direction(450.0), ScrollDirection::Down);
        assert_eq!(container.scroll_direction(250.0), ScrollDirection::None);
        assert!(container.tracks(250.0));
        assert!(!container.tracks(99.0));
    }

    #[test]
    fn test_window_edges_scroll_even_inside_container() {
        // Container taller than the window
        let container = ContainerGeometry::new(0.0, 2000.0, 600.0);
        assert_eq!(container.scroll_direction(10.0), ScrollDirection::Up);
        assert_eq!(container.scroll_direction(590.0), ScrollDirection::Down);
    }

    #[test]
    fn test_scroll_delta_is_fixed() {
        assert_eq!(ScrollDirection::Down.delta(), SCROLL_STEP);
        assert_eq!(ScrollDirection::Up.delta(), -SCROLL_STEP);
        assert_eq!(ScrollDirection::None.delta(), 0.0);
    }
}
