use rand::seq::IteratorRandom;
use rand::Rng;

use crate::config::FoodPlacement;
use crate::grid::{Cell, Grid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FoodSpawner {
    placement: FoodPlacement,
}

impl FoodSpawner {
    pub fn new(placement: FoodPlacement) -> Self {
        FoodSpawner { placement }
    }

    /// Picks the next food cell. `None` means every cell is covered by the
    /// snake (only possible with `AvoidSnake`).
    pub fn spawn<'a, R, I>(&self, grid: Grid, snake: I, rng: &mut R) -> Option<Cell>
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Cell>,
        I::IntoIter: Clone,
    {
        match self.placement {
            FoodPlacement::Uniform => Some(Cell::new(
                rng.gen_range(0..grid.tile_count),
                rng.gen_range(0..grid.tile_count),
            )),
            FoodPlacement::AvoidSnake => {
                let snake = snake.into_iter();
                // Rejection sampling is quick on a sparse board; fall back to
                // enumerating free cells once the snake covers most of it.
                for _ in 0..32 {
                    let pos = Cell::new(
                        rng.gen_range(0..grid.tile_count),
                        rng.gen_range(0..grid.tile_count),
                    );
                    if !snake.clone().any(|c| *c == pos) {
                        return Some(pos);
                    }
                }
                grid.cells()
                    .filter(|pos| !snake.clone().any(|c| c == pos))
                    .choose(rng)
            }
        }
    }
}
