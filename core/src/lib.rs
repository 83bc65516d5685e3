use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::ops::Index;

pub use board::*;
pub use cell::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use session::*;

mod board;
mod cell;
mod error;
mod generator;
mod grid;
mod session;

/// Board dimensions and mine total for one game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub rows: Coord,
    pub cols: Coord,
    pub mines: CellCount,
}

impl BoardConfig {
    pub fn new(rows: Coord, cols: Coord, mines: CellCount) -> Result<Self> {
        let config = Self { rows, cols, mines };
        config.validate()?;
        Ok(config)
    }

    /// Rejects empty boards and mine totals outside `1..=rows*cols - 1`.
    pub fn validate(&self) -> Result<()> {
        let total = self.total_cells();
        if self.rows == 0 || self.cols == 0 || self.mines == 0 || self.mines >= total {
            return Err(GameError::InvalidConfig {
                rows: self.rows,
                cols: self.cols,
                mines: self.mines,
            });
        }
        Ok(())
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_total(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for BoardConfig {
    /// The classic 9x9 board with 10 mines.
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            mines: 10,
        }
    }
}

/// Immutable mine placement for one game: the mine mask plus the adjacency
/// counts derived from it once at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines
            .iter()
            .filter(|&&has_mine| has_mine)
            .count()
            .try_into()
            .unwrap();
        let counts = adjacency_counts(&mines);
        Self {
            mines,
            counts,
            mine_count,
        }
    }

    pub fn from_mine_coords((rows, cols): Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default([usize::from(rows), usize::from(cols)]);

        for &coords in mine_coords {
            if coords.0 >= rows || coords.1 >= cols {
                return Err(GameError::InvalidConfig {
                    rows,
                    cols,
                    mines: mine_coords.len().try_into().unwrap_or(CellCount::MAX),
                });
            }
            mines[coords.grid_index()] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    pub fn config(&self) -> BoardConfig {
        let (rows, cols) = self.size();
        BoardConfig {
            rows,
            cols,
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn in_bounds(&self, coords: Coord2) -> bool {
        let (rows, cols) = self.size();
        coords.0 < rows && coords.1 < cols
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Number of mined cells in the 8-neighborhood. Zero for mined cells.
    pub fn nearby_mine_count(&self, coords: Coord2) -> u8 {
        self.counts[coords.grid_index()]
    }

    pub(crate) fn neighbors(&self, coords: Coord2) -> Neighbors {
        self.mines.neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[coords.grid_index()]
    }
}

fn adjacency_counts(mines: &Array2<bool>) -> Array2<u8> {
    let mut counts: Array2<u8> = Array2::default(mines.raw_dim());
    for ((row, col), &has_mine) in mines.indexed_iter() {
        if has_mine {
            continue;
        }
        let coords = (
            Coord::try_from(row).unwrap(),
            Coord::try_from(col).unwrap(),
        );
        counts[[row, col]] = mines
            .neighbors(coords)
            .filter(|&pos| mines[pos.grid_index()])
            .count()
            .try_into()
            .unwrap();
    }
    counts
}

/// Outcome of a reveal command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    /// Out of bounds, already revealed, flagged, or the game is over.
    Unchanged,
    /// Safe cell opened; `count` is the number of cells newly revealed,
    /// including any cascade.
    Revealed { count: CellCount },
    /// A mined cell was opened at `at`; the game is lost.
    Exploded { at: Coord2 },
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            Unchanged => false,
            Revealed { .. } => true,
            Exploded { .. } => true,
        }
    }
}

/// Outcome of a flag-toggle command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FlagOutcome {
    /// Out of bounds, already revealed, or the game is over.
    Unchanged,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        use FlagOutcome::*;
        match self {
            Unchanged => false,
            Flagged => true,
            Unflagged => true,
        }
    }
}
