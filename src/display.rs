/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// state into terminal commands.  The sim runs in pixel space; everything
/// here projects pixels onto terminal cells at a fixed cells-per-tile scale.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};
use road_hopper::entities::{Enemy, GameMode, GameState, GridConfig, Player, SpriteId, PLAYER_ROSTER};

// ── Projection scale ──────────────────────────────────────────────────────────

/// Terminal cells drawn per 101×83 px tile.
const TILE_COLS: u16 = 10;
const TILE_ROWS: u16 = 3;

/// Playfield top-left corner in terminal coordinates.  Row 0 is the HUD,
/// row 1 the top border.
const ORIGIN_X: u16 = 2;
const ORIGIN_Y: u16 = 2;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_WATER: Color = Color::Blue;
const C_STONE: Color = Color::DarkGrey;
const C_GRASS: Color = Color::DarkGreen;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_TIME: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Cyan;
const C_BEST: Color = Color::Yellow;

// ── Asset lookup ──────────────────────────────────────────────────────────────

/// Resolve a sprite key to its glyph and colour.  This match is the entire
/// asset pipeline — synchronous and total.
fn sprite_glyph(sprite: SpriteId) -> (char, Color) {
    match sprite {
        SpriteId::Bug => ('Ж', Color::Red),
        SpriteId::Boy => ('♙', Color::White),
        SpriteId::CatGirl => ('♘', Color::Yellow),
        SpriteId::HornGirl => ('♞', Color::Magenta),
        SpriteId::PinkGirl => ('♗', Color::Red),
        SpriteId::Princess => ('♛', Color::Cyan),
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame for the active mode.
pub fn render<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &state.grid)?;

    match state.mode {
        GameMode::Select => draw_select(out, state)?,
        GameMode::Playing | GameMode::Over => {
            draw_map(out, &state.grid)?;
            for enemy in &state.enemies {
                draw_enemy(out, &state.grid, enemy)?;
            }
            if let Some(player) = &state.player {
                draw_player(out, &state.grid, player)?;
                draw_hud(out, state, player)?;
            }
            draw_controls_hint(out, &state.grid)?;
            if state.mode == GameMode::Over {
                draw_game_over(out, state)?;
            }
        }
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, ORIGIN_Y + field_rows(&state.grid) + 2))?;
    out.flush()?;
    Ok(())
}

// ── Cell arithmetic ───────────────────────────────────────────────────────────

fn field_cols(grid: &GridConfig) -> u16 {
    grid.cols as u16 * TILE_COLS
}

fn field_rows(grid: &GridConfig) -> u16 {
    grid.rows as u16 * TILE_ROWS
}

/// Project a pixel-space point onto cells relative to the playfield origin.
/// The result may land outside the field; callers clip via `put_char`.
fn project(grid: &GridConfig, x: f32, y: f32) -> (i32, i32) {
    (
        (x / grid.tile.x * TILE_COLS as f32).round() as i32,
        (y / grid.tile.y * TILE_ROWS as f32).round() as i32,
    )
}

/// Place one glyph at field-relative coordinates, dropping anything outside
/// the playfield (e.g. an enemy still parked off-screen left).
fn put_char<W: Write>(
    out: &mut W,
    grid: &GridConfig,
    col: i32,
    row: i32,
    ch: char,
) -> std::io::Result<()> {
    if col < 0 || row < 0 || col >= field_cols(grid) as i32 || row >= field_rows(grid) as i32 {
        return Ok(());
    }
    out.queue(cursor::MoveTo(ORIGIN_X + col as u16, ORIGIN_Y + row as u16))?;
    out.queue(Print(ch))?;
    Ok(())
}

fn print_centered<W: Write>(
    out: &mut W,
    cx: u16,
    row: u16,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(
        cx.saturating_sub(text.chars().count() as u16 / 2),
        row,
    ))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, grid: &GridConfig) -> std::io::Result<()> {
    let w = field_cols(grid) as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(ORIGIN_X - 1, ORIGIN_Y - 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(ORIGIN_X - 1, ORIGIN_Y + field_rows(grid)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in 0..field_rows(grid) {
        out.queue(cursor::MoveTo(ORIGIN_X - 1, ORIGIN_Y + row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(ORIGIN_X + field_cols(grid), ORIGIN_Y + row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── Map ───────────────────────────────────────────────────────────────────────

/// Static tile background: one water row, three stone road rows, two grass
/// rows — drawn top to bottom.
fn draw_map<W: Write>(out: &mut W, grid: &GridConfig) -> std::io::Result<()> {
    for row in 0..grid.rows {
        let (ch, color) = match row {
            0 => ('≈', C_WATER),
            1..=3 => ('░', C_STONE),
            _ => ('▒', C_GRASS),
        };
        out.queue(style::SetForegroundColor(color))?;
        let line: String = ch.to_string().repeat(field_cols(grid) as usize);
        for sub in 0..TILE_ROWS {
            out.queue(cursor::MoveTo(
                ORIGIN_X,
                ORIGIN_Y + row as u16 * TILE_ROWS + sub,
            ))?;
            out.queue(Print(&line))?;
        }
    }
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_enemy<W: Write>(out: &mut W, grid: &GridConfig, enemy: &Enemy) -> std::io::Result<()> {
    let (cx, cy) = project(
        grid,
        enemy.loc.x + enemy.dim.x / 2.0,
        enemy.loc.y + enemy.dim.y / 2.0,
    );
    let (glyph, color) = sprite_glyph(enemy.sprite);
    let body = ['«', glyph, '»'];

    out.queue(style::SetForegroundColor(color))?;
    for (i, ch) in body.iter().enumerate() {
        put_char(out, grid, cx - 1 + i as i32, cy, *ch)?;
    }
    Ok(())
}

fn draw_player<W: Write>(out: &mut W, grid: &GridConfig, player: &Player) -> std::io::Result<()> {
    let (cx, cy) = project(
        grid,
        player.loc.x + player.dim.x / 2.0,
        player.loc.y + player.dim.y / 2.0,
    );
    let (glyph, color) = sprite_glyph(player.sprite);
    out.queue(style::SetForegroundColor(color))?;
    put_char(out, grid, cx, cy, glyph)
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, state: &GameState, player: &Player) -> std::io::Result<()> {
    // Score — left
    out.queue(cursor::MoveTo(ORIGIN_X, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score: {}", player.score)))?;

    // Remaining time — right, floored at zero for display
    let time_str = format!("Time: {:>7.3}", state.time_left.max(0.0));
    let tx = (ORIGIN_X + field_cols(&state.grid)).saturating_sub(time_str.chars().count() as u16);
    out.queue(cursor::MoveTo(tx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_TIME))?;
    out.queue(Print(&time_str))?;

    Ok(())
}

// ── Controls hint ─────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, grid: &GridConfig) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(ORIGIN_X, ORIGIN_Y + field_rows(grid) + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ → ↓ : Hop   Q : Quit"))?;
    Ok(())
}

// ── Select screen ─────────────────────────────────────────────────────────────

fn draw_select<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let grid = &state.grid;
    let cx = ORIGIN_X + field_cols(grid) / 2;

    print_centered(out, cx, ORIGIN_Y + 2, C_TITLE, "★  ROAD  HOPPER  ★")?;

    if state.best_score > 0 {
        let best = format!("Best Score: {}", state.best_score);
        print_centered(out, cx, ORIGIN_Y + 3, C_BEST, &best)?;
    }

    print_centered(out, cx, ORIGIN_Y + 5, Color::White, "Pick your crosser:")?;

    // The roster in a row, one per fifth of the field, highlight boxed
    let row = ORIGIN_Y + 8;
    let step = field_cols(grid) / PLAYER_ROSTER.len() as u16;
    for (i, sprite) in PLAYER_ROSTER.iter().enumerate() {
        let x = ORIGIN_X + step * i as u16 + step / 2;
        let (glyph, color) = sprite_glyph(*sprite);
        if i == state.selected {
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(cursor::MoveTo(x - 2, row))?;
            out.queue(Print("["))?;
            out.queue(cursor::MoveTo(x + 2, row))?;
            out.queue(Print("]"))?;
        }
        out.queue(style::SetForegroundColor(color))?;
        out.queue(cursor::MoveTo(x, row))?;
        out.queue(Print(glyph))?;
    }

    print_centered(
        out,
        cx,
        ORIGIN_Y + field_rows(grid) - 2,
        C_HINT,
        "← → : Choose   ENTER : Start   Q : Quit",
    )?;

    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let score = state.player.as_ref().map(|p| p.score).unwrap_or(0);
    let cx = ORIGIN_X + field_cols(&state.grid) / 2;
    let start_row = ORIGIN_Y + field_rows(&state.grid) / 2 - 3;

    let box_lines = [
        "╔════════════════════╗",
        "║     GAME  OVER     ║",
        "╚════════════════════╝",
    ];
    for (i, line) in box_lines.iter().enumerate() {
        print_centered(out, cx, start_row + i as u16, Color::Red, line)?;
    }

    let score_line = format!("Final Score: {:>4}", score);
    print_centered(out, cx, start_row + 3, Color::Yellow, &score_line)?;

    let new_best = score > 0 && score >= state.best_score;
    let best_line = if new_best {
        format!("★ NEW BEST: {:>4} ★", state.best_score)
    } else {
        format!("Best Score:  {:>4}", state.best_score)
    };
    let best_color = if new_best { Color::Yellow } else { Color::DarkGrey };
    print_centered(out, cx, start_row + 4, best_color, &best_line)?;

    print_centered(
        out,
        cx,
        start_row + 5,
        Color::White,
        "R - Restart   Q - Quit",
    )?;

    Ok(())
}
