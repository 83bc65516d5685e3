use ndarray::Array2;

/// Single grid axis, used for row/column indices and board dimensions.
pub type Coord = u8;

/// Area-scale count, used for mine totals and cell totals.
pub type CellCount = u16;

/// `(row, col)` position on the board.
pub type Coord2 = (Coord, Coord);

pub(crate) trait GridIndex {
    type Output;
    fn grid_index(self) -> Self::Output;
}

impl GridIndex for Coord2 {
    type Output = [usize; 2];

    fn grid_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub(crate) const fn cell_total(rows: Coord, cols: Coord) -> CellCount {
    let rows = rows as CellCount;
    let cols = cols as CellCount;
    rows.saturating_mul(cols)
}

pub(crate) trait NeighborsExt {
    fn neighbors(&self, center: Coord2) -> Neighbors;
}

impl<T> NeighborsExt for Array2<T> {
    fn neighbors(&self, center: Coord2) -> Neighbors {
        let dim = self.dim();
        let bounds = (dim.0.try_into().unwrap(), dim.1.try_into().unwrap());
        Neighbors::of(center, bounds)
    }
}

// Row-major over the 3x3 block minus the center. The order is part of the
// deterministic traversal contract, so keep it fixed.
const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `center`, returning a value only when it stays in bounds.
fn offset_within(center: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let row = center.0.checked_add_signed(delta.0)?;
    if row >= bounds.0 {
        return None;
    }

    let col = center.1.checked_add_signed(delta.1)?;
    if col >= bounds.1 {
        return None;
    }

    Some((row, col))
}

/// Iterator over the in-bounds 8-neighborhood of a cell, in row-major order.
#[derive(Debug)]
pub struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl Neighbors {
    pub(crate) fn of(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = NEIGHBOR_OFFSETS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(coords) = offset_within(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}
