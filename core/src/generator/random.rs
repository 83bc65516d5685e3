use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use super::*;

/// Uniform mine placement without replacement, driven by an injected seed so
/// callers (and tests) control the layout instead of wall-clock reseeding.
#[derive(Clone, Debug)]
pub struct RandomMineGenerator {
    rng: SmallRng,
}

impl RandomMineGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&mut self, config: BoardConfig) -> MineLayout {
        let total = usize::from(config.total_cells());
        let mut mines = usize::from(config.mines);
        if mines > total {
            log::warn!(
                "requested {} mines but the board only fits {}, clamping",
                mines,
                total
            );
            mines = total;
        }

        // Partial Fisher-Yates over a flat index array: uniform without
        // replacement, always terminates.
        let mut indices: Vec<usize> = (0..total).collect();
        let (chosen, _) = indices.partial_shuffle(&mut self.rng, mines);

        let cols = usize::from(config.cols);
        let mut mask: Array2<bool> = Array2::default([usize::from(config.rows), cols]);
        for &index in chosen.iter() {
            mask[[index / cols, index % cols]] = true;
        }

        MineLayout::from_mine_mask(mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exactly_the_requested_mine_count() {
        for seed in 0..32 {
            let config = BoardConfig::new(9, 9, 10).unwrap();
            let layout = RandomMineGenerator::from_seed(seed).generate(config);
            assert_eq!(layout.mine_count(), 10);
            assert_eq!(layout.size(), (9, 9));
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let config = BoardConfig::new(16, 16, 40).unwrap();
        let first = RandomMineGenerator::from_seed(7).generate(config);
        let second = RandomMineGenerator::from_seed(7).generate(config);
        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_draws_from_one_generator_differ() {
        let config = BoardConfig::new(16, 16, 40).unwrap();
        let mut generator = RandomMineGenerator::from_seed(7);
        let first = generator.generate(config);
        let second = generator.generate(config);
        assert_ne!(first, second);
    }

    #[test]
    fn near_full_board_still_terminates() {
        let config = BoardConfig::new(4, 4, 15).unwrap();
        let layout = RandomMineGenerator::from_seed(3).generate(config);
        assert_eq!(layout.mine_count(), 15);
        assert_eq!(layout.safe_cell_count(), 1);
    }
}
