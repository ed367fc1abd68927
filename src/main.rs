use ggez::event;
use ggez::GameResult;
use tracing_subscriber::EnvFilter;

use neon_snake::app::{self, SnakeApp};
use neon_snake::highscore::{HighScoreBook, JsonFileStore};
use neon_snake::render::BoardLayout;
use neon_snake::{GameConfig, Session};

fn main() -> GameResult {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = GameConfig::load();
    let high_scores = HighScoreBook::open(Box::new(JsonFileStore::new(&config.store_path)));

    let (width, height) = app::window_size(&config);
    let window_setup = ggez::conf::WindowSetup::default()
        .title("Neon Snake")
        .vsync(true);
    let window_mode = ggez::conf::WindowMode::default()
        .dimensions(width, height)
        .min_dimensions(200.0, 240.0)
        .resizable(true);

    let (ctx, event_loop) = ggez::ContextBuilder::new("neon_snake", "neon_snake")
        .window_setup(window_setup)
        .window_mode(window_mode)
        .build()?;

    let tiles = BoardLayout::fit(width, height, &config).tile_count;
    let session = Session::new(config, tiles, high_scores);
    let game = SnakeApp::new(&ctx, session);
    event::run(ctx, event_loop, game)
}
