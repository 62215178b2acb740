//! Row geometry source for hit-testing.

use dnd_table_core::RowBounds;

/// Anything that can report the current row layout, top to bottom.
///
/// A live surface re-measures on every call. Tests hand in plain vectors.
pub trait RowBoundsProvider {
    fn list_rows(&self) -> Vec<RowBounds>;
}

impl RowBoundsProvider for [RowBounds] {
    fn list_rows(&self) -> Vec<RowBounds> {
        self.to_vec()
    }
}

impl RowBoundsProvider for Vec<RowBounds> {
    fn list_rows(&self) -> Vec<RowBounds> {
        self.clone()
    }
}

/// Stack rows of the given heights downward from `top`.
#[cfg(test)]
pub(crate) fn stacked(top: f32, heights: &[f32]) -> Vec<RowBounds> {
    let mut y = top;
    heights
        .iter()
        .enumerate()
        .map(|(index, height)| {
            let row = RowBounds::new(index, y, y + height);
            y += height;
            row
        })
        .collect()
}
