use serde::{Deserialize, Serialize};

/// Mutable player-facing state of one cell. Mine membership and adjacency
/// counts are fixed at generation and live in [`MineLayout`](crate::MineLayout).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellState {
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Whether the player can still act on this cell.
    pub const fn is_hidden(self) -> bool {
        !self.revealed
    }
}

/// Read-only snapshot of one cell for the render collaborator.
///
/// `nearby_mine_count` is only meaningful when `has_mine` is false.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub revealed: bool,
    pub flagged: bool,
    pub has_mine: bool,
    pub nearby_mine_count: u8,
}
