use crate::*;
pub use random::*;

mod random;

/// Source of mine placements. Implementations draw one layout per call;
/// `Board::new` validates the config before asking for one.
pub trait MineGenerator {
    fn generate(&mut self, config: BoardConfig) -> MineLayout;
}
