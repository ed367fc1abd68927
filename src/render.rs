use ggez::graphics::{Canvas, Color, DrawMode, DrawParam, Mesh, Rect, Text};
use ggez::mint::Point2;
use ggez::{Context, GameResult};

use crate::config::{GameConfig, MAX_TILES};
use crate::grid::Cell;
use crate::session::{Phase, Session};
use crate::state::GameState;
use crate::step::Collision;

const GLOW_PX: f32 = 3.0;
const HUD_TEXT_SCALE: f32 = 20.0;
const OVERLAY_TEXT_SCALE: f32 = 24.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub window: Color,
    pub board: Color,
    pub snake_head: Color,
    pub snake_body: Color,
    pub snake_glow: Color,
    pub food: Color,
    pub food_glow: Color,
    pub overlay: Color,
}

pub const NEON: Palette = Palette {
    window: Color::new(0.07, 0.07, 0.08, 1.0),
    board: Color::new(0.118, 0.118, 0.118, 1.0),
    snake_head: Color::new(0.0, 1.0, 0.0, 1.0),
    snake_body: Color::new(0.0, 0.8, 0.0, 1.0),
    snake_glow: Color::new(0.0, 1.0, 0.0, 0.25),
    food: Color::new(1.0, 0.0, 0.0, 1.0),
    food_glow: Color::new(1.0, 0.0, 0.0, 0.25),
    overlay: Color::new(0.0, 0.0, 0.0, 0.7),
};

/// Where the board sits in the window and how big a tile is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    pub origin: Point2<f32>,
    pub tile_px: f32,
    pub tile_count: i16,
}

impl BoardLayout {
    /// Largest board that fits the window, always a whole number of cells.
    pub fn fit(width: f32, height: f32, config: &GameConfig) -> Self {
        let cell = f32::from(config.cell_px);
        let margin = f32::from(config.board_margin_px);
        let hud = f32::from(config.hud_px);

        let side = (width - margin)
            .min(height - hud - margin)
            .min(f32::from(config.max_board_px));
        let tiles = ((side / cell).floor() as i16).max(config.min_tiles.min(MAX_TILES) as i16);
        let board_px = f32::from(tiles) * cell;

        BoardLayout {
            origin: Point2 {
                x: ((width - board_px) / 2.0).floor().max(0.0),
                y: (hud + (height - hud - board_px) / 2.0).floor().max(hud),
            },
            tile_px: cell,
            tile_count: tiles,
        }
    }

    pub fn side_px(&self) -> f32 {
        f32::from(self.tile_count) * self.tile_px
    }

    pub fn board_rect(&self) -> Rect {
        Rect::new(self.origin.x, self.origin.y, self.side_px(), self.side_px())
    }

    pub fn cell_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            self.origin.x + f32::from(cell.x) * self.tile_px,
            self.origin.y + f32::from(cell.y) * self.tile_px,
            self.tile_px,
            self.tile_px,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tile {
    pub rect: Rect,
    pub color: Color,
    pub glow: Color,
}

/// Everything one board draw needs, in paint order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub background: Color,
    pub board: Rect,
    pub board_color: Color,
    pub tiles: Vec<Tile>,
}

pub fn frame(state: &GameState, layout: &BoardLayout, palette: &Palette) -> Frame {
    let mut tiles = Vec::with_capacity(state.len() + 1);

    for (i, segment) in state.snake.iter().enumerate() {
        tiles.push(Tile {
            rect: layout.cell_rect(*segment),
            color: if i == 0 {
                palette.snake_head
            } else {
                palette.snake_body
            },
            glow: palette.snake_glow,
        });
    }

    tiles.push(Tile {
        rect: layout.cell_rect(state.food),
        color: palette.food,
        glow: palette.food_glow,
    });

    Frame {
        background: palette.window,
        board: layout.board_rect(),
        board_color: palette.board,
        tiles,
    }
}

fn fill(ctx: &mut Context, canvas: &mut Canvas, rect: Rect, color: Color) -> GameResult {
    let mesh = Mesh::new_rectangle(ctx, DrawMode::fill(), rect, color)?;
    canvas.draw(&mesh, DrawParam::default());
    Ok(())
}

pub fn paint(ctx: &mut Context, canvas: &mut Canvas, frame: &Frame) -> GameResult {
    fill(ctx, canvas, frame.board, frame.board_color)?;

    for tile in &frame.tiles {
        let halo = Rect::new(
            tile.rect.x - GLOW_PX,
            tile.rect.y - GLOW_PX,
            tile.rect.w + 2.0 * GLOW_PX,
            tile.rect.h + 2.0 * GLOW_PX,
        );
        fill(ctx, canvas, halo, tile.glow)?;
    }
    for tile in &frame.tiles {
        fill(ctx, canvas, tile.rect, tile.color)?;
    }

    Ok(())
}

fn draw_text(canvas: &mut Canvas, text: String, scale: f32, x: f32, y: f32, color: Color) {
    let mut text = Text::new(text);
    text.set_scale(scale);
    canvas.draw(&text, DrawParam::default().dest(Point2 { x, y }).color(color));
}

pub fn paint_hud(canvas: &mut Canvas, session: &Session, layout: &BoardLayout) {
    let state = session.state();
    draw_text(
        canvas,
        format!(
            "Score: {}   High Score: {}   Speed: {} ms",
            state.score,
            session.high_score(),
            state.speed.interval().as_millis()
        ),
        HUD_TEXT_SCALE,
        layout.origin.x,
        10.0,
        Color::WHITE,
    );
}

pub fn paint_overlay(
    ctx: &mut Context,
    canvas: &mut Canvas,
    session: &Session,
    layout: &BoardLayout,
) -> GameResult {
    let lines = match session.phase() {
        Phase::Running if session.state().direction.is_neutral() => {
            vec!["Arrow keys or WASD to move".to_string()]
        }
        Phase::Running => return Ok(()),
        Phase::Idle => vec!["Press R to start".to_string()],
        Phase::Terminal => match session.summary() {
            Some(summary) => {
                let mut lines = vec![
                    "Game Over!".to_string(),
                    format!("Your score: {}", summary.score),
                ];
                if summary.new_high_score {
                    lines.push("New high score!".to_string());
                }
                lines.push(format!(
                    "{} at {}",
                    match summary.collision {
                        Collision::Wall => "Hit the wall",
                        Collision::SelfHit => "Bit yourself",
                        Collision::BoardFilled => "Board filled",
                    },
                    summary.ended_at.format("%H:%M:%S")
                ));
                lines.push("Enter: OK   R: restart".to_string());
                lines
            }
            None => vec!["Game Over!".to_string()],
        },
    };

    fill(ctx, canvas, layout.board_rect(), NEON.overlay)?;
    let line_height = OVERLAY_TEXT_SCALE * 1.4;
    let top = layout.origin.y + (layout.side_px() - line_height * lines.len() as f32) / 2.0;
    for (i, line) in lines.into_iter().enumerate() {
        draw_text(
            canvas,
            line,
            OVERLAY_TEXT_SCALE,
            layout.origin.x + 16.0,
            top + i as f32 * line_height,
            Color::WHITE,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use crate::state::Speed;
    use std::collections::VecDeque;
    use std::time::Duration;

    fn layout() -> BoardLayout {
        BoardLayout {
            origin: Point2 { x: 20.0, y: 40.0 },
            tile_px: 20.0,
            tile_count: 20,
        }
    }

    fn state() -> GameState {
        GameState {
            snake: [Cell::new(3, 2), Cell::new(2, 2), Cell::new(1, 2)]
                .into_iter()
                .collect::<VecDeque<_>>(),
            direction: Direction::Right,
            food: Cell::new(7, 9),
            score: 2,
            speed: Speed::new(
                Duration::from_millis(150),
                Duration::from_millis(10),
                Duration::from_millis(50),
                5,
            ),
        }
    }

    #[test]
    fn frame_draws_snake_then_food() {
        let frame = frame(&state(), &layout(), &NEON);
        assert_eq!(frame.tiles.len(), 4);
        assert_eq!(frame.tiles[0].color, NEON.snake_head);
        assert!(frame.tiles[1..3].iter().all(|t| t.color == NEON.snake_body));
        assert_eq!(frame.tiles[3].color, NEON.food);
        assert_eq!(frame.tiles[0].rect, Rect::new(80.0, 80.0, 20.0, 20.0));
        assert_eq!(frame.tiles[3].rect, Rect::new(160.0, 220.0, 20.0, 20.0));
        assert_eq!(frame.board, Rect::new(20.0, 40.0, 400.0, 400.0));
    }

    #[test]
    fn frame_follows_current_layout() {
        let state = state();
        let small = BoardLayout {
            tile_px: 10.0,
            ..layout()
        };
        let frame = frame(&state, &small, &NEON);
        assert_eq!(frame.tiles[0].rect, Rect::new(50.0, 60.0, 10.0, 10.0));
    }

    #[test]
    fn fit_keeps_board_a_multiple_of_cell() {
        let config = GameConfig::default();
        for (w, h) in [(440.0, 480.0), (1920.0, 1080.0), (333.0, 517.0), (250.0, 900.0)] {
            let layout = BoardLayout::fit(w, h, &config);
            let side = layout.side_px();
            assert_eq!(side % f32::from(config.cell_px), 0.0);
            assert!(side <= f32::from(config.max_board_px));
        }
        assert_eq!(BoardLayout::fit(440.0, 480.0, &config).tile_count, 20);
        assert_eq!(BoardLayout::fit(333.0, 517.0, &config).tile_count, 14);
    }

    #[test]
    fn fit_never_goes_below_min_tiles() {
        let config = GameConfig::default();
        let layout = BoardLayout::fit(10.0, 10.0, &config);
        assert_eq!(layout.tile_count, config.min_tiles as i16);
    }
}
