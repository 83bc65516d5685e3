use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use crate::*;

/// Overall game status.
///
/// Valid transitions:
/// - Setup -> Playing on generation
/// - Playing -> Lost when a mined cell is revealed
/// - Playing -> Won when every safe cell is revealed
///
/// Won and Lost are terminal until an explicit new game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Setup,
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game of mine detection: the mine layout, per-cell player state, and
/// the reveal/flag/win-loss transition logic.
///
/// A board is created whole and replaced whole; nothing mutates across games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    layout: MineLayout,
    cells: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    phase: GamePhase,
    exploded_at: Option<Coord2>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
}

impl Board {
    /// Validates `config`, draws a fresh layout from `generator`, and starts
    /// the game. On `InvalidConfig` nothing is generated.
    pub fn new(config: BoardConfig, generator: &mut dyn MineGenerator) -> Result<Board> {
        config.validate()?;
        let layout = generator.generate(config);
        if layout.mine_count() != config.mines {
            log::warn!(
                "generator placed {} mines, requested {}",
                layout.mine_count(),
                config.mines
            );
        }
        Self::with_layout(layout)
    }

    /// Starts a game over a fixed layout; used by replay tooling and tests.
    pub fn with_layout(layout: MineLayout) -> Result<Board> {
        layout.config().validate()?;
        let size = layout.size();
        log::debug!(
            "new game: {}x{} with {} mines",
            size.0,
            size.1,
            layout.mine_count()
        );
        Ok(Self {
            cells: Array2::default([usize::from(size.0), usize::from(size.1)]),
            layout,
            revealed_count: 0,
            flagged_count: 0,
            phase: GamePhase::Playing,
            exploded_at: None,
            started_at: Utc::now(),
            ended_at: None,
        })
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> BoardConfig {
        self.layout.config()
    }

    /// `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        self.layout.size()
    }

    pub fn mine_count(&self) -> CellCount {
        self.layout.mine_count()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.layout.safe_cell_count()
    }

    /// Number of safe cells revealed so far.
    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Mines not yet flagged; negative when over-flagged.
    pub fn mines_left(&self) -> isize {
        (self.layout.mine_count() as isize) - (self.flagged_count as isize)
    }

    /// The mined cell that ended the game, if it ended in a loss.
    pub fn exploded_at(&self) -> Option<Coord2> {
        self.exploded_at
    }

    /// Seconds since generation, frozen at the terminal transition.
    pub fn elapsed_secs(&self) -> u32 {
        (self.ended_at.unwrap_or_else(Utc::now) - self.started_at)
            .num_seconds()
            .max(0) as u32
    }

    pub fn cell_state(&self, coords: Coord2) -> Option<CellState> {
        self.layout
            .in_bounds(coords)
            .then(|| self.cells[coords.grid_index()])
    }

    /// Render view of one cell; `None` when out of bounds.
    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        self.layout.in_bounds(coords).then(|| self.view(coords))
    }

    /// Row-major render view of the whole grid, for pull-based drawing.
    pub fn iter_views(&self) -> impl Iterator<Item = (Coord2, CellView)> + '_ {
        let (rows, cols) = self.size();
        (0..rows).flat_map(move |row| {
            (0..cols).map(move |col| ((row, col), self.view((row, col))))
        })
    }

    fn view(&self, coords: Coord2) -> CellView {
        let cell = self.cells[coords.grid_index()];
        CellView {
            revealed: cell.revealed,
            flagged: cell.flagged,
            has_mine: self.layout.contains_mine(coords),
            nearby_mine_count: self.layout.nearby_mine_count(coords),
        }
    }

    /// Opens a cell. No-op while the game is not in progress, for
    /// out-of-bounds coordinates, and for revealed or flagged cells.
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        if !self.phase.is_playing() || !self.layout.in_bounds(coords) {
            return RevealOutcome::Unchanged;
        }

        let cell = self.cells[coords.grid_index()];
        if cell.revealed || cell.flagged {
            return RevealOutcome::Unchanged;
        }

        if self.layout.contains_mine(coords) {
            self.exploded_at = Some(coords);
            self.reveal_all_mines();
            self.end_game(GamePhase::Lost);
            return RevealOutcome::Exploded { at: coords };
        }

        let count = self.reveal_safe_area(coords);
        if self.check_win_condition() {
            self.end_game(GamePhase::Won);
        }
        RevealOutcome::Revealed { count }
    }

    /// Opens `start` and, when its count is zero, flood-fills the connected
    /// zero region plus its non-zero border. Returns the number of cells
    /// newly revealed.
    fn reveal_safe_area(&mut self, start: Coord2) -> CellCount {
        self.cells[start.grid_index()].revealed = true;
        self.revealed_count += 1;
        let mut count: CellCount = 1;

        if self.layout.nearby_mine_count(start) != 0 {
            return count;
        }

        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<Coord2> = self.layout.neighbors(start).collect();

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            let cell = self.cells[coords.grid_index()];
            if cell.revealed || cell.flagged || self.layout.contains_mine(coords) {
                continue;
            }

            self.cells[coords.grid_index()].revealed = true;
            self.revealed_count += 1;
            count += 1;
            log::trace!("cascade revealed ({}, {})", coords.0, coords.1);

            if self.layout.nearby_mine_count(coords) == 0 {
                to_visit.extend(
                    self.layout
                        .neighbors(coords)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }

        count
    }

    /// Flips the flag on a hidden cell. No-op while the game is not in
    /// progress, for out-of-bounds coordinates, and for revealed cells.
    pub fn toggle_flag(&mut self, coords: Coord2) -> FlagOutcome {
        if !self.phase.is_playing() || !self.layout.in_bounds(coords) {
            return FlagOutcome::Unchanged;
        }

        let cell = &mut self.cells[coords.grid_index()];
        if cell.revealed {
            return FlagOutcome::Unchanged;
        }

        cell.flagged = !cell.flagged;
        if cell.flagged {
            self.flagged_count += 1;
            FlagOutcome::Flagged
        } else {
            self.flagged_count -= 1;
            FlagOutcome::Unflagged
        }
    }

    /// True iff every safe cell is revealed. Pure; also applied internally
    /// after every reveal.
    pub fn check_win_condition(&self) -> bool {
        self.revealed_count == self.layout.safe_cell_count()
    }

    /// Reveals every mined cell, leaving flags and safe cells untouched.
    /// Idempotent; applied on loss so the caller can render the layout.
    pub fn reveal_all_mines(&mut self) {
        let (rows, cols) = self.size();
        for row in 0..rows {
            for col in 0..cols {
                if self.layout.contains_mine((row, col)) {
                    self.cells[(row, col).grid_index()].revealed = true;
                }
            }
        }
    }

    fn end_game(&mut self, phase: GamePhase) {
        if self.phase.is_terminal() {
            return;
        }
        self.phase = phase;
        self.ended_at = Some(Utc::now());
        log::debug!("game over: {:?} after {}s", phase, self.elapsed_secs());
    }
}
