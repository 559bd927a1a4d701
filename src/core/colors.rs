// colors.rs - Haplotype family coloring for single-locus EHH plots

use std::collections::HashMap;

use crate::core::tracker::Grouping;

/// Color of a haplotype that shares its extended identifier with nobody
pub const UNIQUE_COLOR: i32 = -1;

/// Rectangular haplotype-by-offset grid of family colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    n_rows: usize,
    n_cols: usize,
    cells: Vec<i32>,
}

impl ColorGrid {
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            cells: vec![UNIQUE_COLOR; n_rows * n_cols],
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row < self.n_rows && col < self.n_cols {
            Some(self.cells[row * self.n_cols + col])
        } else {
            None
        }
    }

    /// Panics on out-of-range coordinates
    pub fn color(&self, row: usize, col: usize) -> i32 {
        assert!(row < self.n_rows && col < self.n_cols, "cell ({}, {}) outside grid", row, col);
        self.cells[row * self.n_cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, color: i32) {
        assert!(row < self.n_rows && col < self.n_cols, "cell ({}, {}) outside grid", row, col);
        self.cells[row * self.n_cols + col] = color;
    }

    pub fn row(&self, row: usize) -> &[i32] {
        &self.cells[row * self.n_cols..(row + 1) * self.n_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i32]> + '_ {
        (0..self.n_rows).map(move |r| self.row(r))
    }
}

/// Assigns stable family ids to haplotype groups as a scan extends
///
/// Rows are the members of one subset. The core column is color 0 for every
/// row. The counter is not reset between the left and right scans, so a
/// color id other than 0 and `UNIQUE_COLOR` names one family on one side of
/// the core only, and right-hand ids start after the last left-hand id.
///
/// Within a family that splits, the largest non-singleton sub-group keeps the
/// parent color whatever its share of the family; equal sizes go to the
/// sub-group seen first in row order.
#[derive(Debug, Clone)]
pub struct LineageColorer {
    grid: ColorGrid,
    next_color: i32,
}

impl LineageColorer {
    pub fn new(n_members: usize, n_cols: usize, core_col: usize) -> Self {
        let mut grid = ColorGrid::new(n_members, n_cols);
        for row in 0..n_members {
            grid.set(row, core_col, 0);
        }
        Self {
            grid,
            next_color: 1,
        }
    }

    fn fresh_color(&mut self) -> i32 {
        let color = self.next_color;
        self.next_color += 1;
        color
    }

    /// Color column `col` from the grouping there, given the column one step
    /// closer to the core
    pub fn color_step(&mut self, grouping: &Grouping, col: usize, previous_col: usize) {
        let n_rows = self.grid.n_rows();
        debug_assert_eq!(grouping.total(), n_rows);

        // family sizes at the previous column
        let mut family_size: HashMap<i32, usize> = HashMap::new();
        for row in 0..n_rows {
            let color = self.grid.color(row, previous_col);
            if color != UNIQUE_COLOR {
                *family_size.entry(color).or_insert(0) += 1;
            }
        }

        // parent color of each group, taken from its first member
        let mut parent: Vec<Option<i32>> = vec![None; grouping.n_groups()];
        for row in 0..n_rows {
            let group = grouping.group_of(row);
            if parent[group].is_none() {
                parent[group] = Some(self.grid.color(row, previous_col));
            }
        }

        // largest non-singleton sub-group of each family keeps the family color
        let mut retainer: HashMap<i32, usize> = HashMap::new();
        for (group, &size) in grouping.sizes().iter().enumerate() {
            let Some(color) = parent[group] else { continue };
            if size < 2 || color == UNIQUE_COLOR {
                continue;
            }
            match retainer.get(&color) {
                Some(&best) if grouping.sizes()[best] >= size => {}
                _ => {
                    retainer.insert(color, group);
                }
            }
        }

        let mut assigned: Vec<Option<i32>> = vec![None; grouping.n_groups()];
        for row in 0..n_rows {
            let group = grouping.group_of(row);
            let color = match assigned[group] {
                Some(color) => color,
                None => {
                    let size = grouping.sizes()[group];
                    let parent_color = parent[group].unwrap_or(UNIQUE_COLOR);
                    let color = if size < 2 {
                        UNIQUE_COLOR
                    } else if parent_color == UNIQUE_COLOR {
                        self.fresh_color()
                    } else if family_size.get(&parent_color) == Some(&size)
                        || retainer.get(&parent_color) == Some(&group)
                    {
                        parent_color
                    } else {
                        self.fresh_color()
                    };
                    assigned[group] = Some(color);
                    color
                }
            };
            self.grid.set(row, col, color);
        }
    }

    pub fn into_grid(self) -> ColorGrid {
        self.grid
    }
}
