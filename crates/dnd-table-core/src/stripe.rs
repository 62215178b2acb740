//! Zebra striping for top-level and inner rows.

use serde::{Deserialize, Serialize};

/// Background band of a row, named by 1-based row parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stripe {
    Odd,
    Even,
}

impl Stripe {
    /// Stripe for a 0-based running position.
    pub fn at(position: usize) -> Self {
        if position % 2 == 0 {
            Stripe::Odd
        } else {
            Stripe::Even
        }
    }
}

/// Stripes for one top-level row and its inner group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStripes {
    pub row: Stripe,
    pub inner: Vec<Stripe>,
}

/// Assign stripes from each top-level row's inner row count.
///
/// Inner rows continue the running sequence right after their parent,
/// whether or not the group is currently expanded.
pub fn zebra_stripes(inner_counts: &[usize]) -> Vec<RowStripes> {
    let mut position = 0;

    inner_counts
        .iter()
        .map(|&count| {
            let row = Stripe::at(position);
            let inner = (1..=count).map(|i| Stripe::at(position + i)).collect();
            position += count + 1;
            RowStripes { row, inner }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_rows_alternate() {
        let stripes = zebra_stripes(&[0, 0, 0]);
        let rows: Vec<_> = stripes.iter().map(|s| s.row).collect();
        assert_eq!(rows, [Stripe::Odd, Stripe::Even, Stripe::Odd]);
    }

    #[test]
    fn test_inner_rows_continue_parent_sequence() {
        let stripes = zebra_stripes(&[0, 2, 0]);

        assert_eq!(stripes[0].row, Stripe::Odd);
        assert_eq!(stripes[1].row, Stripe::Even);
        assert_eq!(stripes[1].inner, [Stripe::Odd, Stripe::Even]);
        // Fifth row overall
        assert_eq!(stripes[2].row, Stripe::Odd);
    }

    #[test]
    fn test_empty_table() {
        assert!(zebra_stripes(&[]).is_empty());
    }
}
