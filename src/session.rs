use std::time::Duration;

use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::food::FoodSpawner;
use crate::grid::{Direction, Grid};
use crate::highscore::HighScoreBook;
use crate::input::{Command, DirectionInput};
use crate::scheduler::Scheduler;
use crate::state::{GameState, Speed};
use crate::step::{self, Collision, StepOutcome};

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Phase {
    Idle,
    Running,
    Terminal,
}

/// What the game-over notification shows.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSummary {
    pub score: u32,
    pub new_high_score: bool,
    pub collision: Collision,
    pub ended_at: DateTime<Local>,
}

pub struct Session {
    phase: Phase,
    state: GameState,
    grid: Grid,
    scheduler: Scheduler,
    input: DirectionInput,
    spawner: FoodSpawner,
    high_scores: HighScoreBook,
    config: GameConfig,
    rng: StdRng,
    summary: Option<GameSummary>,
}

impl Session {
    pub fn new(config: GameConfig, tile_count: i16, high_scores: HighScoreBook) -> Self {
        Self::with_rng(config, tile_count, high_scores, StdRng::from_entropy())
    }

    pub fn with_seed(
        config: GameConfig,
        tile_count: i16,
        high_scores: HighScoreBook,
        seed: u64,
    ) -> Self {
        Self::with_rng(config, tile_count, high_scores, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        config: GameConfig,
        tile_count: i16,
        high_scores: HighScoreBook,
        mut rng: StdRng,
    ) -> Self {
        let grid = Grid::new(tile_count);
        let spawner = FoodSpawner::new(config.food_placement);
        let state = GameState::new(grid, Speed::from_config(&config), &spawner, &mut rng);
        Session {
            phase: Phase::Idle,
            state,
            grid,
            scheduler: Scheduler::new(config.max_catch_up_ticks),
            input: DirectionInput::new(),
            spawner,
            high_scores,
            config,
            rng,
            summary: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn high_score(&self) -> u32 {
        self.high_scores.best()
    }

    pub fn summary(&self) -> Option<&GameSummary> {
        self.summary.as_ref()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Begins a new game from any phase.
    pub fn restart(&mut self) {
        self.scheduler.cancel();
        self.state = GameState::new(
            self.grid,
            Speed::from_config(&self.config),
            &self.spawner,
            &mut self.rng,
        );
        self.input.clear();
        self.summary = None;
        self.phase = Phase::Running;
        self.scheduler.start(self.state.speed.interval());
        info!(tile_count = self.grid.tile_count, "game started");
    }

    /// Acknowledges the game-over notification.
    pub fn dismiss(&mut self) {
        if self.phase == Phase::Terminal {
            self.phase = Phase::Idle;
        }
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Turn(direction) => self.request_direction(direction),
            Command::Restart => self.restart(),
            Command::Dismiss => self.dismiss(),
        }
    }

    pub fn request_direction(&mut self, direction: Direction) {
        if self.phase != Phase::Running {
            return;
        }
        if !self.input.request(direction, self.state.direction) {
            debug!(?direction, current = ?self.state.direction, "turn rejected");
        }
    }

    /// Feeds elapsed frame time and runs every tick that came due.
    pub fn advance(&mut self, dt: Duration) -> Vec<StepOutcome> {
        let mut outcomes = Vec::new();
        if self.phase != Phase::Running {
            return outcomes;
        }
        self.scheduler.advance(dt);
        while self.phase == Phase::Running && self.scheduler.take_tick() {
            outcomes.push(self.tick());
        }
        outcomes
    }

    /// Runs one tick now, regardless of the timer.
    pub fn tick(&mut self) -> StepOutcome {
        if self.phase != Phase::Running {
            return StepOutcome::Idle;
        }
        if let Some(direction) = self.input.take() {
            self.state.direction = direction;
        }

        let outcome = step::step(&mut self.state, self.grid, &self.spawner, &mut self.rng);
        match outcome {
            StepOutcome::Ate {
                score,
                new_interval: Some(interval),
                ..
            } => {
                debug!(score, interval_ms = interval.as_millis() as u64, "speeding up");
                self.scheduler.reschedule(interval);
            }
            StepOutcome::Terminal(collision) => self.finish(collision),
            _ => {}
        }
        outcome
    }

    /// Applies a new grid size. A running timer restarts at the current
    /// speed; food that fell off the board is placed again.
    pub fn resize(&mut self, tile_count: i16) {
        let grid = Grid::new(tile_count);
        if grid == self.grid {
            return;
        }
        self.grid = grid;
        if !grid.contains(self.state.food) {
            if let Some(food) = self.spawner.spawn(grid, &self.state.snake, &mut self.rng) {
                self.state.food = food;
            }
        }
        if self.scheduler.is_armed() {
            self.scheduler.reschedule(self.state.speed.interval());
        }
        debug!(tile_count, "board resized");
    }

    fn finish(&mut self, collision: Collision) {
        self.scheduler.cancel();
        self.input.clear();
        let score = self.state.score;
        let new_high_score = self.high_scores.record(score);
        info!(score, ?collision, new_high_score, "game over");
        self.summary = Some(GameSummary {
            score,
            new_high_score,
            collision,
            ended_at: Local::now(),
        });
        self.phase = Phase::Terminal;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use crate::highscore::{JsonFileStore, KeyValueStore, MemoryStore, HIGH_SCORE_KEY};

    fn session() -> Session {
        Session::with_seed(GameConfig::default(), 20, HighScoreBook::in_memory(), 17)
    }

    #[test]
    fn starts_idle_then_runs() {
        let mut session = session();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.advance(Duration::from_secs(1)).is_empty());

        session.restart();
        assert_eq!(session.phase(), Phase::Running);
        assert!(session.scheduler().is_armed());
        assert_eq!(session.scheduler().interval(), Duration::from_millis(150));
    }

    #[test]
    fn neutral_ticks_do_not_move() {
        let mut session = session();
        session.restart();
        let outcomes = session.advance(Duration::from_millis(300));
        assert_eq!(outcomes, vec![StepOutcome::Idle, StepOutcome::Idle]);
        assert_eq!(session.state().head(), Cell::new(10, 10));
    }

    #[test]
    fn turn_applies_on_next_tick() {
        let mut session = session();
        session.restart();
        session.request_direction(Direction::Up);
        assert_eq!(session.state().direction, Direction::Neutral);
        session.tick();
        assert_eq!(session.state().direction, Direction::Up);
        assert_eq!(session.state().head(), Cell::new(10, 9));

        session.request_direction(Direction::Down);
        session.tick();
        assert_eq!(session.state().direction, Direction::Up);
    }

    #[test]
    fn wall_hit_ends_game_once() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "3").unwrap();
        let mut session = Session::with_seed(
            GameConfig::default(),
            20,
            HighScoreBook::open(Box::new(store)),
            17,
        );
        session.restart();
        session.request_direction(Direction::Left);

        let mut terminal = 0;
        for _ in 0..30 {
            if session.tick().is_terminal() {
                terminal += 1;
            }
        }
        assert_eq!(terminal, 1);
        assert_eq!(session.phase(), Phase::Terminal);
        assert!(!session.scheduler().is_armed());
        let summary = session.summary().unwrap();
        assert_eq!(summary.collision, Collision::Wall);
        assert!(!summary.new_high_score);
        assert_eq!(session.high_score(), 3);
    }

    #[test]
    fn fifth_point_speeds_up_and_beats_high_score() {
        let path = std::env::temp_dir().join(format!(
            "neon_snake_session_best_{}.json",
            std::process::id()
        ));
        let mut store = JsonFileStore::new(&path);
        store.set(HIGH_SCORE_KEY, "2").unwrap();

        let mut session = Session::with_seed(
            GameConfig::default(),
            20,
            HighScoreBook::open(Box::new(store)),
            17,
        );
        session.restart();
        session.request_direction(Direction::Right);
        let generation = session.scheduler().generation();

        for point in 1..=5 {
            session.state.food = session.state.head().offset(Direction::Right);
            match session.tick() {
                StepOutcome::Ate { score, .. } => assert_eq!(score, point),
                other => panic!("expected to eat, got {other:?}"),
            }
            if point < 5 {
                assert_eq!(session.scheduler().generation(), generation);
            }
        }
        assert_eq!(session.scheduler().generation(), generation + 1);
        assert_eq!(session.scheduler().interval(), Duration::from_millis(140));
        assert_eq!(session.state().speed.interval(), Duration::from_millis(140));
        assert_eq!(session.state().head(), Cell::new(15, 10));

        // Keep the rest of the row clear and run into the right wall.
        session.state.food = Cell::new(0, 0);
        while session.phase() == Phase::Running {
            session.tick();
        }
        let summary = session.summary().unwrap();
        assert_eq!(summary.collision, Collision::Wall);
        assert_eq!(summary.score, 5);
        assert!(summary.new_high_score);
        assert_eq!(session.high_score(), 5);

        let reopened = HighScoreBook::open(Box::new(JsonFileStore::new(&path)));
        assert_eq!(reopened.best(), 5);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn dismiss_then_restart() {
        let mut session = session();
        session.restart();
        session.request_direction(Direction::Right);
        while session.phase() == Phase::Running {
            session.tick();
        }
        session.handle(Command::Dismiss);
        assert_eq!(session.phase(), Phase::Idle);
        session.request_direction(Direction::Up);
        assert_eq!(session.state().direction, Direction::Right);

        session.handle(Command::Restart);
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.state().len(), 1);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().direction, Direction::Neutral);
        assert!(session.summary().is_none());
    }

    #[test]
    fn resize_rearms_timer_and_moves_stray_food() {
        let mut session = session();
        session.restart();
        let generation = session.scheduler().generation();
        session.resize(8);
        assert_eq!(session.grid(), Grid::new(8));
        assert_eq!(session.scheduler().generation(), generation + 1);
        assert!(session.grid().contains(session.state().food));

        // The centered head of the old 20x20 board is now off the board.
        session.request_direction(Direction::Up);
        assert_eq!(session.tick(), StepOutcome::Terminal(Collision::Wall));
    }
}
