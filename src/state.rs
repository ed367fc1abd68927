use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::config::GameConfig;
use crate::food::FoodSpawner;
use crate::grid::{Cell, Direction, Grid};

/// Tick interval with its ramp parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Speed {
    interval: Duration,
    step: Duration,
    floor: Duration,
    every: u32,
}

impl Speed {
    pub fn new(initial: Duration, step: Duration, floor: Duration, every: u32) -> Self {
        Speed {
            interval: initial.max(floor),
            step,
            floor,
            every: every.max(1),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Speed::new(
            config.initial_interval(),
            config.speed_step(),
            config.min_interval(),
            config.speed_up_every,
        )
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Shortens the interval when `score` lands on a threshold. Returns the
    /// new interval only if it changed.
    pub fn on_score(&mut self, score: u32) -> Option<Duration> {
        if score == 0 || score % self.every != 0 {
            return None;
        }
        let next = self.interval.saturating_sub(self.step).max(self.floor);
        if next == self.interval {
            return None;
        }
        self.interval = next;
        Some(next)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub snake: VecDeque<Cell>,
    pub direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub speed: Speed,
}

impl GameState {
    /// Fresh game: one segment in the center, not moving, food placed.
    pub fn new<R: Rng + ?Sized>(
        grid: Grid,
        speed: Speed,
        spawner: &FoodSpawner,
        rng: &mut R,
    ) -> Self {
        let mut snake = VecDeque::new();
        snake.push_back(grid.center());

        let food = match spawner.spawn(grid, &snake, rng) {
            Some(food) => food,
            None => {
                // Only a 1x1 board gets here; the first move ends the game.
                debug!(tile_count = grid.tile_count, "no free cell for food");
                grid.center()
            }
        };

        GameState {
            snake,
            direction: Direction::Neutral,
            food,
            score: 0,
            speed,
        }
    }

    pub fn head(&self) -> Cell {
        // Length is never below one.
        self.snake[0]
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.snake.contains(&cell)
    }
}
