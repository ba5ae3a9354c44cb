mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use rand::thread_rng;

use road_hopper::compute::{handle_input, init_state, tick};
use road_hopper::entities::{Direction, GameMode, GridConfig, Input};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Key table ─────────────────────────────────────────────────────────────────

/// Fixed keycode table.  Anything not listed is ignored.
fn map_key(code: KeyCode) -> Option<Input> {
    match code {
        KeyCode::Left => Some(Input::Move(Direction::Left)),
        KeyCode::Up => Some(Input::Move(Direction::Up)),
        KeyCode::Right => Some(Input::Move(Direction::Right)),
        KeyCode::Down => Some(Input::Move(Direction::Down)),
        KeyCode::Enter => Some(Input::Confirm),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Input::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Input::Quit),
        _ => None,
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Drive the state machine until the user leaves the program.  Inputs are
/// discrete — one signal per key press — and the sim only ticks while a run
/// is active; the select and game-over screens are frozen frames.
fn game_loop<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut state = init_state(GridConfig::default());
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last_frame).as_secs_f32();
        last_frame = frame_start;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            if kind != KeyEventKind::Press {
                continue;
            }
            if code == KeyCode::Esc
                || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
            {
                return Ok(());
            }
            if let Some(input) = map_key(code) {
                // Q on the roster screen leaves the program; everywhere else
                // the state machine decides what the key means.
                if state.mode == GameMode::Select && input == Input::Quit {
                    return Ok(());
                }
                state = handle_input(&state, input, &mut rng);
            }
        }

        if state.mode == GameMode::Playing {
            state = tick(&state, dt, &mut rng);
        }

        display::render(out, &state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut out, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
