use smallvec::SmallVec;

use crate::*;

/// Discrete cue for the presentation collaborator. Each variant fires at
/// most once per transition: `MineExploded`, `GameLost`, and `GameWon` at
/// most once per game, `FlagToggled` once per successful toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Safe cells transitioned from hidden to revealed. Batched: one event
    /// per command, carrying the number of cells that command opened.
    CellRevealed { count: CellCount },
    MineExploded { at: Coord2 },
    FlagToggled { at: Coord2, flagged: bool },
    GameLost,
    GameWon,
}

/// Cues produced by one command, in transition order.
pub type Events = SmallVec<[GameEvent; 2]>;

/// Mediates discrete input commands over the current [`Board`] and turns
/// outcomes into the cue events the presentation layer consumes. Owns the
/// board exclusively; replaced wholesale on every new game.
pub struct GameSession {
    config: BoardConfig,
    generator: Box<dyn MineGenerator>,
    board: Option<Board>,
}

impl GameSession {
    /// Validates `config` up front so later generations cannot fail.
    /// The session stays in `Setup` until the first [`new_game`](Self::new_game).
    pub fn new(config: BoardConfig, generator: Box<dyn MineGenerator>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            generator,
            board: None,
        })
    }

    /// Session over the seeded random generator.
    pub fn seeded(config: BoardConfig, seed: u64) -> Result<Self> {
        Self::new(config, Box::new(RandomMineGenerator::from_seed(seed)))
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// `Setup` while no board exists, otherwise the board's phase.
    pub fn phase(&self) -> GamePhase {
        self.board
            .as_ref()
            .map_or(GamePhase::Setup, |board| board.phase())
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    /// Render view of one cell; `None` before the first game or out of bounds.
    pub fn cell_view(&self, coords: Coord2) -> Option<CellView> {
        self.board.as_ref().and_then(|board| board.cell_view(coords))
    }

    /// Discards the current board and starts a fresh game.
    pub fn new_game(&mut self) -> Result<()> {
        self.board = Some(Board::new(self.config, self.generator.as_mut())?);
        Ok(())
    }

    pub fn reveal(&mut self, coords: Coord2) -> Events {
        let mut events = Events::new();
        let Some(board) = self.board.as_mut() else {
            return events;
        };

        match board.reveal(coords) {
            RevealOutcome::Unchanged => {}
            RevealOutcome::Revealed { count } => {
                events.push(GameEvent::CellRevealed { count });
                if board.phase() == GamePhase::Won {
                    events.push(GameEvent::GameWon);
                }
            }
            RevealOutcome::Exploded { at } => {
                events.push(GameEvent::MineExploded { at });
                events.push(GameEvent::GameLost);
            }
        }
        events
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Events {
        let mut events = Events::new();
        let Some(board) = self.board.as_mut() else {
            return events;
        };

        match board.toggle_flag(coords) {
            FlagOutcome::Unchanged => {}
            FlagOutcome::Flagged => events.push(GameEvent::FlagToggled {
                at: coords,
                flagged: true,
            }),
            FlagOutcome::Unflagged => events.push(GameEvent::FlagToggled {
                at: coords,
                flagged: false,
            }),
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMineGenerator(Vec<Coord2>);

    impl MineGenerator for FixedMineGenerator {
        fn generate(&mut self, config: BoardConfig) -> MineLayout {
            MineLayout::from_mine_coords(config.size(), &self.0).unwrap()
        }
    }

    fn session(size: Coord2, mines: &[Coord2]) -> GameSession {
        let config = BoardConfig::new(size.0, size.1, mines.len() as CellCount).unwrap();
        GameSession::new(config, Box::new(FixedMineGenerator(mines.to_vec()))).unwrap()
    }

    #[test]
    fn session_rejects_invalid_config() {
        assert!(GameSession::seeded(BoardConfig { rows: 2, cols: 2, mines: 4 }, 1).is_err());
    }

    #[test]
    fn commands_before_the_first_game_are_ignored() {
        let mut session = session((3, 3), &[(0, 0)]);

        assert_eq!(session.phase(), GamePhase::Setup);
        assert!(session.reveal((1, 1)).is_empty());
        assert!(session.toggle_flag((1, 1)).is_empty());
        assert!(session.cell_view((1, 1)).is_none());
    }

    #[test]
    fn new_game_starts_playing_with_a_fresh_board() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.new_game().unwrap();

        assert_eq!(session.phase(), GamePhase::Playing);
        let board = session.board().unwrap();
        assert_eq!(board.mine_count(), 1);
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn flag_toggles_emit_one_cue_each() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.new_game().unwrap();

        let events = session.toggle_flag((2, 2));
        assert_eq!(
            events.as_slice(),
            [GameEvent::FlagToggled {
                at: (2, 2),
                flagged: true,
            }]
        );

        let events = session.toggle_flag((2, 2));
        assert_eq!(
            events.as_slice(),
            [GameEvent::FlagToggled {
                at: (2, 2),
                flagged: false,
            }]
        );
    }

    #[test]
    fn revealing_a_flagged_cell_emits_nothing() {
        let mut session = session((3, 3), &[(0, 0)]);
        session.new_game().unwrap();

        session.toggle_flag((1, 1));
        assert!(session.reveal((1, 1)).is_empty());
    }

    #[test]
    fn explosion_and_loss_fire_exactly_once() {
        let mut session = session((3, 3), &[(0, 0), (2, 2)]);
        session.new_game().unwrap();

        let events = session.reveal((0, 0));
        assert_eq!(
            events.as_slice(),
            [
                GameEvent::MineExploded { at: (0, 0) },
                GameEvent::GameLost,
            ]
        );

        // the lost board swallows everything, including the other mine
        assert!(session.reveal((2, 2)).is_empty());
        assert!(session.reveal((1, 1)).is_empty());
        assert!(session.toggle_flag((1, 1)).is_empty());
        assert_eq!(session.phase(), GamePhase::Lost);
    }

    #[test]
    fn winning_on_the_last_safe_cell_fires_game_won_once() {
        let mut session = session((2, 2), &[(0, 0)]);
        session.new_game().unwrap();

        assert_eq!(
            session.reveal((0, 1)).as_slice(),
            [GameEvent::CellRevealed { count: 1 }]
        );
        assert_eq!(
            session.reveal((1, 0)).as_slice(),
            [GameEvent::CellRevealed { count: 1 }]
        );
        assert_eq!(
            session.reveal((1, 1)).as_slice(),
            [
                GameEvent::CellRevealed { count: 1 },
                GameEvent::GameWon,
            ]
        );

        assert_eq!(session.phase(), GamePhase::Won);
        assert!(session.reveal((1, 1)).is_empty());
    }

    #[test]
    fn cascade_emits_one_batched_reveal_cue() {
        let mut session = session((3, 4), &[(1, 3)]);
        session.new_game().unwrap();

        let events = session.reveal((0, 0));
        assert_eq!(
            events.as_slice(),
            [GameEvent::CellRevealed { count: 9 }]
        );
    }

    #[test]
    fn reveal_cue_counts_add_up_to_all_safe_cells_on_a_won_game() {
        let mut session = session((3, 3), &[(1, 1)]);
        session.new_game().unwrap();

        let mut total: CellCount = 0;
        let mut wins = 0;
        for row in 0..3 {
            for col in 0..3 {
                if (row, col) == (1, 1) {
                    continue;
                }
                for event in session.reveal((row, col)) {
                    match event {
                        GameEvent::CellRevealed { count } => total += count,
                        GameEvent::GameWon => wins += 1,
                        other => panic!("unexpected event {other:?}"),
                    }
                }
            }
        }

        assert_eq!(total, session.board().unwrap().safe_cell_count());
        assert_eq!(wins, 1);
    }

    #[test]
    fn new_game_resets_a_finished_session() {
        let mut session = session((2, 2), &[(1, 1)]);
        session.new_game().unwrap();
        session.reveal((1, 1));
        assert_eq!(session.phase(), GamePhase::Lost);

        session.new_game().unwrap();
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.board().unwrap().revealed_count(), 0);
        assert!(!session.cell_view((1, 1)).unwrap().revealed);
    }

    #[test]
    fn seeded_sessions_deal_real_boards() {
        let mut session = GameSession::seeded(BoardConfig::default(), 42).unwrap();
        session.new_game().unwrap();

        let board = session.board().unwrap();
        assert_eq!(board.mine_count(), 10);
        assert_eq!(board.phase(), GamePhase::Playing);

        let mined = board
            .iter_views()
            .filter(|(_, view)| view.has_mine)
            .count();
        assert_eq!(mined, 10);
    }
}
