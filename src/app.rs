use ggez::event::EventHandler;
use ggez::graphics::Canvas;
use ggez::input::keyboard::KeyInput;
use ggez::{Context, GameResult};
use tracing::debug;

use crate::config::GameConfig;
use crate::input;
use crate::render::{self, BoardLayout, NEON};
use crate::session::Session;

pub struct SnakeApp {
    session: Session,
    layout: BoardLayout,
}

impl SnakeApp {
    pub fn new(ctx: &Context, mut session: Session) -> Self {
        let (width, height) = ctx.gfx.drawable_size();
        let layout = BoardLayout::fit(width, height, session.config());
        session.resize(layout.tile_count);
        session.restart();
        SnakeApp { session, layout }
    }

    fn relayout(&mut self, width: f32, height: f32) {
        let layout = BoardLayout::fit(width, height, self.session.config());
        if layout != self.layout {
            debug!(width, height, tile_count = layout.tile_count, "relayout");
            self.layout = layout;
            self.session.resize(layout.tile_count);
        }
    }
}

impl EventHandler for SnakeApp {
    fn update(&mut self, ctx: &mut Context) -> GameResult {
        self.session.advance(ctx.time.delta());
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let frame = render::frame(self.session.state(), &self.layout, &NEON);
        let mut canvas = Canvas::from_frame(ctx, frame.background);

        render::paint(ctx, &mut canvas, &frame)?;
        render::paint_hud(&mut canvas, &self.session, &self.layout);
        render::paint_overlay(ctx, &mut canvas, &self.session, &self.layout)?;

        canvas.finish(ctx)?;
        Ok(())
    }

    fn key_down_event(&mut self, _ctx: &mut Context, key: KeyInput, repeat: bool) -> GameResult {
        if repeat {
            return Ok(());
        }
        if let Some(command) = key.keycode.and_then(input::command_for_key) {
            self.session.handle(command);
        }
        Ok(())
    }

    fn resize_event(&mut self, _ctx: &mut Context, width: f32, height: f32) -> GameResult {
        self.relayout(width, height);
        Ok(())
    }
}

/// Initial window size for a full-size board.
pub fn window_size(config: &GameConfig) -> (f32, f32) {
    let board = f32::from(config.max_board_px);
    let margin = f32::from(config.board_margin_px);
    (board + margin, board + margin + f32::from(config.hud_px))
}
