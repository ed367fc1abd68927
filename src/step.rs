use std::time::Duration;

use rand::Rng;

use crate::food::FoodSpawner;
use crate::grid::{Cell, Grid};
use crate::state::GameState;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Collision {
    Wall,
    SelfHit,
    /// The snake covers every cell, so no food can be placed.
    BoardFilled,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum StepOutcome {
    /// Direction is still neutral; nothing moved.
    Idle,
    Moved {
        head: Cell,
    },
    Ate {
        head: Cell,
        score: u32,
        /// Set when this point crossed a speed threshold.
        new_interval: Option<Duration>,
    },
    Terminal(Collision),
}

impl StepOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepOutcome::Terminal(_))
    }
}

/// Advances `state` by one tick. A wall or self collision leaves the state as
/// it was before the tick; `BoardFilled` keeps the final growth.
pub fn step<R: Rng + ?Sized>(
    state: &mut GameState,
    grid: Grid,
    spawner: &FoodSpawner,
    rng: &mut R,
) -> StepOutcome {
    if state.direction.is_neutral() {
        return StepOutcome::Idle;
    }

    let head = state.head().offset(state.direction);

    if !grid.contains(head) {
        return StepOutcome::Terminal(Collision::Wall);
    }

    let eats = head == state.food;
    // The tail moves out of the way this tick unless the snake grows.
    let checked = if eats {
        state.snake.len()
    } else {
        state.snake.len() - 1
    };
    if state.snake.iter().take(checked).any(|cell| *cell == head) {
        return StepOutcome::Terminal(Collision::SelfHit);
    }

    state.snake.push_front(head);

    if !eats {
        state.snake.pop_back();
        return StepOutcome::Moved { head };
    }

    state.score += 1;
    let new_interval = state.speed.on_score(state.score);

    match spawner.spawn(grid, &state.snake, rng) {
        Some(food) => state.food = food,
        None => return StepOutcome::Terminal(Collision::BoardFilled),
    }

    StepOutcome::Ate {
        head,
        score: state.score,
        new_interval,
    }
}
