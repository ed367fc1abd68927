pub mod app;
pub mod config;
pub mod food;
pub mod grid;
pub mod highscore;
pub mod input;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod step;

pub use config::GameConfig;
pub use grid::{Cell, Direction, Grid};
pub use session::{Phase, Session};
pub use state::GameState;
pub use step::{step, Collision, StepOutcome};
