//! Reorder engine: drag session state and positional hit-testing.
//!
//! ## State Machine
//!
//! ```text
//! Idle --begin_session--> Dragging --end_session/cancel_session--> Idle
//! ```
//!
//! ## Hit-testing
//!
//! A candidate row is any row other than the dragged original and its shadow.
//! For each candidate, in order:
//!
//! 1. Pointer within the threshold of its bottom edge: insert after it.
//! 2. Otherwise, pointer within the threshold of its top edge and the row is
//!    at index 0: insert before it.
//!
//! No other row can be an insert-before target. When several rows match, the
//! last one wins.

use dnd_table_core::{
    ContainerGeometry, Edge, MoveResult, Placement, RowBounds, ScrollDirection, SHADOW_OFFSET,
};

use crate::bounds::RowBoundsProvider;

// =============================================================================
// Session State
// =============================================================================

/// State of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Index of the dragged row when the drag started.
    pub original_index: usize,
    /// Top edge of the shadow row.
    pub shadow_top: f32,
}

/// Engine phase. A session exists only while dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

// =============================================================================
// Highlight State
// =============================================================================

/// A row edge to draw as a drop indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowHighlight {
    pub index: usize,
    pub edge: Edge,
}

/// Visual feedback for one pointer position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightState {
    /// Rows whose edge is within the threshold of the pointer.
    pub highlights: Vec<RowHighlight>,
    /// Auto-scroll decision for this event.
    pub scroll: ScrollDirection,
    /// New shadow position, or `None` if the shadow should stay put.
    pub shadow_top: Option<f32>,
}

// =============================================================================
// ReorderEngine
// =============================================================================

/// Tracks one drag at a time and resolves it into a move.
///
/// Owns no row data. Row geometry comes from a [`RowBoundsProvider`] on
/// each call.
#[derive(Debug, Default)]
pub struct ReorderEngine {
    phase: DragPhase,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.phase {
            DragPhase::Dragging(session) => Some(session),
            DragPhase::Idle => None,
        }
    }

    /// Start dragging the row at `original_index`.
    ///
    /// Returns `false` and leaves the current session alone if one is
    /// already active.
    pub fn begin_session(&mut self, original_index: usize, pointer_y: f32) -> bool {
        if let DragPhase::Dragging(active) = &self.phase {
            tracing::warn!(
                "Ignoring drag of row {} while row {} is being dragged",
                original_index,
                active.original_index
            );
            return false;
        }

        self.phase = DragPhase::Dragging(DragSession {
            original_index,
            shadow_top: pointer_y - SHADOW_OFFSET,
        });
        tracing::debug!("Drag started on row {}", original_index);
        true
    }

    /// Compute drop indicators and auto-scroll for the current pointer.
    ///
    /// Only the first candidate row may show a top-edge indicator. Does
    /// nothing while idle.
    pub fn update_pointer<P>(
        &mut self,
        pointer_y: f32,
        rows: &P,
        container: &ContainerGeometry,
    ) -> HighlightState
    where
        P: RowBoundsProvider + ?Sized,
    {
        let DragPhase::Dragging(session) = &mut self.phase else {
            return HighlightState::default();
        };
        let original_index = session.original_index;

        let shadow_top = if container.tracks(pointer_y) {
            session.shadow_top = pointer_y - SHADOW_OFFSET;
            Some(session.shadow_top)
        } else {
            None
        };

        let highlights = rows
            .list_rows()
            .iter()
            .filter(|row| is_candidate(row, original_index))
            .enumerate()
            .filter_map(|(position, row)| {
                if row.near_bottom(pointer_y) {
                    Some(RowHighlight {
                        index: row.index,
                        edge: Edge::Bottom,
                    })
                } else if row.near_top(pointer_y) && position == 0 {
                    Some(RowHighlight {
                        index: row.index,
                        edge: Edge::Top,
                    })
                } else {
                    None
                }
            })
            .collect();

        HighlightState {
            highlights,
            scroll: container.scroll_direction(pointer_y),
            shadow_top,
        }
    }

    /// Finish the drag and resolve the move, if any.
    ///
    /// Returns `None` when no candidate edge is in range or the move would
    /// leave the row where it is. The session is cleared either way.
    pub fn end_session<P>(&mut self, pointer_y: f32, rows: &P) -> Option<MoveResult>
    where
        P: RowBoundsProvider + ?Sized,
    {
        let DragPhase::Dragging(session) = std::mem::take(&mut self.phase) else {
            tracing::warn!("Pointer released with no active drag");
            return None;
        };

        let rows = rows.list_rows();
        let from_index = rows
            .iter()
            .find(|row| row.is_dragged_original)
            .map_or(session.original_index, |row| row.index);

        let Some(placement) = nearest_placement(pointer_y, &rows, from_index) else {
            tracing::debug!("No drop target near {}, row {} snaps back", pointer_y, from_index);
            return None;
        };

        let result = MoveResult::resolve(from_index, placement);
        if result.is_noop() {
            tracing::debug!("Row {} dropped onto its own slot", from_index);
            return None;
        }

        tracing::debug!(
            "Drag resolved: {} -> {} ({:?} of row {})",
            result.from_index,
            result.to_index,
            placement.edge,
            placement.index
        );
        Some(result)
    }

    /// Abandon the drag without moving anything.
    ///
    /// Returns whether a session was active.
    pub fn cancel_session(&mut self) -> bool {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(session) => {
                tracing::debug!("Drag of row {} cancelled", session.original_index);
                true
            }
            DragPhase::Idle => false,
        }
    }
}

fn is_candidate(row: &RowBounds, original_index: usize) -> bool {
    row.is_candidate() && row.index != original_index
}

/// Find the drop target for `pointer_y`, skipping the dragged row.
pub fn nearest_placement(
    pointer_y: f32,
    rows: &[RowBounds],
    original_index: usize,
) -> Option<Placement> {
    let mut placement = None;

    for row in rows.iter().filter(|row| is_candidate(row, original_index)) {
        if row.near_bottom(pointer_y) {
            placement = Some(Placement {
                index: row.index,
                edge: Edge::Bottom,
            });
        } else if row.near_top(pointer_y) && row.index == 0 {
            placement = Some(Placement {
                index: row.index,
                edge: Edge::Top,
            });
        }
    }

    placement
}

// =============================================================================
// Tests
// =============================================================================
