//! Row geometry of a rendered surface.

use dnd_table_core::RowBounds;
use dnd_table_engine::RowBoundsProvider;

/// The floating copy of the dragged row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowRow {
    pub row: usize,
    /// Window y of the shadow's top edge.
    pub top: f32,
}

/// Rows stacked below a header inside a scrolling container.
///
/// Positions are window coordinates. A row of height zero is collapsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableLayout {
    /// Window y of the container's content edge.
    pub origin: f32,
    /// Height of the header row above the first data row.
    pub header_height: f32,
    pub scroll_offset: f32,
    pub row_heights: Vec<f32>,
    /// Row hidden in place while it is dragged.
    pub hidden_row: Option<usize>,
    pub shadow: Option<ShadowRow>,
}

impl TableLayout {
    pub fn new(origin: f32, header_height: f32, row_heights: Vec<f32>) -> Self {
        Self {
            origin,
            header_height,
            row_heights,
            ..Self::default()
        }
    }

    /// Window y of the first data row after scrolling.
    pub fn first_row_top(&self) -> f32 {
        self.origin + self.header_height - self.scroll_offset
    }

    /// Height of the header plus every row.
    pub fn content_height(&self) -> f32 {
        self.header_height + self.row_heights.iter().sum::<f32>()
    }

    pub fn row_height(&self, row: usize) -> f32 {
        self.row_heights.get(row).copied().unwrap_or_default()
    }
}

impl RowBoundsProvider for TableLayout {
    fn list_rows(&self) -> Vec<RowBounds> {
        let mut top = self.first_row_top();
        let mut rows: Vec<RowBounds> = self
            .row_heights
            .iter()
            .enumerate()
            .map(|(index, height)| {
                let mut bounds = RowBounds::new(index, top, top + height);
                bounds.is_dragged_original = self.hidden_row == Some(index);
                top += height;
                bounds
            })
            .collect();

        // Rendered after the rows, so it comes last
        if let Some(shadow) = self.shadow {
            let height = self.row_height(shadow.row);
            let mut bounds = RowBounds::new(rows.len(), shadow.top, shadow.top + height);
            bounds.is_dragged_shadow = true;
            rows.push(bounds);
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_start_below_header() {
        let layout = TableLayout::new(80.0, 20.0, vec![36.0, 36.0]);
        let rows = layout.list_rows();
        assert_eq!(rows[0].top, 100.0);
        assert_eq!(rows[1].bottom, 172.0);
        assert_eq!(layout.content_height(), 92.0);
    }

    #[test]
    fn test_scroll_moves_rows_up() {
        let mut layout = TableLayout::new(80.0, 20.0, vec![36.0, 36.0]);
        layout.scroll_offset = 30.0;
        assert_eq!(layout.list_rows()[0].top, 70.0);
    }

    #[test]
    fn test_mixed_heights() {
        let layout = TableLayout::new(0.0, 0.0, vec![36.0, 108.0, 0.0, 36.0]);
        let rows = layout.list_rows();
        assert_eq!(rows[2].top, 144.0);
        assert_eq!(rows[2].height(), 0.0);
        assert_eq!(rows[3].top, 144.0);
    }

    #[test]
    fn test_shadow_reported_last() {
        let mut layout = TableLayout::new(0.0, 0.0, vec![36.0, 72.0, 36.0]);
        layout.hidden_row = Some(1);
        layout.shadow = Some(ShadowRow { row: 1, top: 5.0 });

        let rows = layout.list_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows[1].is_dragged_original);
        assert!(!rows[1].is_dragged_shadow);

        let shadow = rows[3];
        assert!(shadow.is_dragged_shadow);
        assert_eq!(shadow.index, 3);
        assert_eq!((shadow.top, shadow.bottom), (5.0, 77.0));
    }
}
