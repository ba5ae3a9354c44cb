/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::entities::{
    Direction, Edge, Enemy, GameMode, GameState, GridConfig, Input, Player, SpriteId, Vec2,
    PLAYER_ROSTER,
};

// ── Fixed rules ──────────────────────────────────────────────────────────────

/// Round length in seconds.
pub const GAME_TIME: f32 = 90.0;

/// Enemies generated at game start.
pub const ENEMY_COUNT: usize = 3;

/// The discrete speed table enemies draw from, in px/s.
pub const ENEMY_SPEEDS: [f32; 3] = [100.0, 250.0, 500.0];

const ENEMY_DIM: Vec2 = Vec2 { x: 98.0, y: 77.0 };
const PLAYER_DIM: Vec2 = Vec2 { x: 66.0, y: 77.0 };

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial state: roster screen, nothing spawned yet.
pub fn init_state(grid: GridConfig) -> GameState {
    GameState {
        mode: GameMode::Select,
        grid,
        selected: 0,
        player: None,
        enemies: Vec::new(),
        time_left: GAME_TIME,
        best_score: 0,
    }
}

/// The fixed location the player starts from and resets to.
pub fn player_start(grid: &GridConfig) -> Vec2 {
    Vec2 {
        x: grid.cols as f32 * (grid.tile.x - 20.0) / 2.0,
        y: (grid.rows - 1) as f32 * grid.tile.y,
    }
}

fn new_player(grid: &GridConfig, sprite: SpriteId) -> Player {
    Player {
        loc: player_start(grid),
        dim: PLAYER_DIM,
        sprite,
        potential_move: Vec2 { x: 0.0, y: 0.0 },
        is_hit: false,
        score: 0,
    }
}

/// Park an enemy off-screen left on a random road row with a random speed.
/// Used both for the initial batch and to relocate one that has left the
/// right boundary — enemies are never destroyed.
pub fn spawn_enemy(grid: &GridConfig, rng: &mut impl Rng) -> Enemy {
    Enemy {
        loc: Vec2 {
            x: -grid.tile.x,
            y: grid.tile.y * rng.gen_range(1..=3) as f32,
        },
        dim: ENEMY_DIM,
        sprite: SpriteId::Bug,
        speed: ENEMY_SPEEDS[rng.gen_range(0..ENEMY_SPEEDS.len())],
    }
}

// ── Input-driven state transitions (pure) ────────────────────────────────────

/// Route one input signal according to the active mode.  Keys that mean
/// nothing in the current mode are silently ignored.
pub fn handle_input(state: &GameState, input: Input, rng: &mut impl Rng) -> GameState {
    match state.mode {
        GameMode::Select => match input {
            Input::Confirm => load_game(state, rng),
            Input::Move(Direction::Left) => shift_selection(state, -1),
            Input::Move(Direction::Right) => shift_selection(state, 1),
            _ => state.clone(),
        },
        GameMode::Playing => match input {
            Input::Quit => quit_to_select(state),
            Input::Move(dir) => steer_player(state, dir),
            _ => state.clone(),
        },
        GameMode::Over => match input {
            Input::Restart => load_game(state, rng),
            Input::Quit => quit_to_select(state),
            _ => state.clone(),
        },
    }
}

/// Enter Playing mode: fresh timer, a fresh enemy batch, and a fresh player
/// wearing the highlighted roster sprite.
pub fn load_game(state: &GameState, rng: &mut impl Rng) -> GameState {
    let enemies = (0..ENEMY_COUNT)
        .map(|_| spawn_enemy(&state.grid, rng))
        .collect();
    GameState {
        mode: GameMode::Playing,
        time_left: GAME_TIME,
        enemies,
        player: Some(new_player(&state.grid, PLAYER_ROSTER[state.selected])),
        ..state.clone()
    }
}

/// Abandon the run: clear all game entities and return to the roster with
/// the highlight back on the first character.
pub fn quit_to_select(state: &GameState) -> GameState {
    GameState {
        mode: GameMode::Select,
        enemies: Vec::new(),
        player: None,
        selected: 0,
        ..state.clone()
    }
}

/// Move the roster highlight, wrapping at both ends.
fn shift_selection(state: &GameState, delta: isize) -> GameState {
    let len = PLAYER_ROSTER.len() as isize;
    let selected = (state.selected as isize + delta).rem_euclid(len) as usize;
    GameState {
        selected,
        ..state.clone()
    }
}

/// Turn a directional key into a tile-quantized pending displacement.  The
/// move is rejected outright if it would land outside the playfield.
fn steer_player(state: &GameState, dir: Direction) -> GameState {
    let Some(player) = &state.player else {
        return state.clone();
    };
    let (dx, dy) = match dir {
        Direction::Left => (-1.0, 0.0),
        Direction::Up => (0.0, -1.0),
        Direction::Right => (1.0, 0.0),
        Direction::Down => (0.0, 1.0),
    };
    let mut next = Vec2 {
        x: dx * state.grid.tile.x,
        y: dy * state.grid.tile.y,
    };
    if !is_in_boundary(
        &state.grid,
        player.loc.x + next.x,
        player.loc.y + next.y,
        None,
    ) {
        next = Vec2 { x: 0.0, y: 0.0 };
    }
    GameState {
        player: Some(Player {
            potential_move: next,
            ..player.clone()
        }),
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ───────────────────────────

/// Advance the simulation by `dt` seconds.  Only Playing mode ticks; the
/// other modes are frozen.  All randomness (enemy respawns) comes through
/// `rng` so callers control determinism.
pub fn tick(state: &GameState, dt: f32, rng: &mut impl Rng) -> GameState {
    if state.mode != GameMode::Playing {
        return state.clone();
    }
    let Some(player) = &state.player else {
        return state.clone();
    };

    let time_left = state.time_left - dt;

    // ── 1. Advance enemies ──────────────────────────────────────────────────
    // Each enemy tests its moved box against where the player will be once
    // the pending displacement lands, so a hop into a bug registers this
    // frame rather than next.
    let next_player_loc = Vec2 {
        x: player.loc.x + player.potential_move.x,
        y: player.loc.y + player.potential_move.y,
    };
    let mut is_hit = player.is_hit;
    let enemies: Vec<Enemy> = state
        .enemies
        .iter()
        .map(|e| {
            let moved = Enemy {
                loc: Vec2 {
                    x: e.loc.x + e.speed * dt,
                    y: e.loc.y,
                },
                ..e.clone()
            };
            if is_collision(moved.loc, moved.dim, next_player_loc, player.dim) {
                is_hit = true;
            }
            if !is_in_boundary(&state.grid, moved.loc.x, moved.loc.y, Some(Edge::Right)) {
                spawn_enemy(&state.grid, rng)
            } else {
                moved
            }
        })
        .collect();

    // ── 2. Player consumes the pending move ─────────────────────────────────
    let player = update_player(
        &Player {
            is_hit,
            ..player.clone()
        },
        &state.grid,
    );

    // ── 3. Timer ────────────────────────────────────────────────────────────
    let (mode, best_score) = if time_left <= 0.0 {
        (GameMode::Over, state.best_score.max(player.score))
    } else {
        (GameMode::Playing, state.best_score)
    };

    GameState {
        mode,
        enemies,
        player: Some(player),
        time_left,
        best_score,
        ..state.clone()
    }
}

/// Apply one tick's worth of player state: a hit trumps the pending move,
/// reaching the water row scores and resets, and the pending move is spent
/// regardless of branch.
fn update_player(player: &Player, grid: &GridConfig) -> Player {
    let mut player = player.clone();
    if player.is_hit {
        player.score = player.score.saturating_sub(1);
        player.loc = player_start(grid);
        player.is_hit = false;
    } else {
        player.loc.x += player.potential_move.x;
        player.loc.y += player.potential_move.y;
    }

    // Water row reached: score and go back to start.
    if player.loc.y < grid.tile.y {
        player.score += 1;
        player.loc = player_start(grid);
    }

    player.potential_move = Vec2 { x: 0.0, y: 0.0 };
    player
}

// ── Geometry predicates ──────────────────────────────────────────────────────

/// Axis-aligned bounding-box overlap.  Touching edges count as overlap.
pub fn is_collision(loc1: Vec2, dim1: Vec2, loc2: Vec2, dim2: Vec2) -> bool {
    !(loc1.x + dim1.x < loc2.x
        || loc1.x > loc2.x + dim2.x
        || loc1.y + dim1.y < loc2.y
        || loc1.y > loc2.y + dim2.y)
}

/// Check a point against the playfield pixel bounds — all four by default,
/// or a single edge.
pub fn is_in_boundary(grid: &GridConfig, x: f32, y: f32, edge: Option<Edge>) -> bool {
    let max_width = grid.width();
    let max_height = grid.height();
    match edge {
        None => x >= 0.0 && x < max_width && y >= 0.0 && y < max_height,
        Some(Edge::Top) => y >= 0.0,
        Some(Edge::Right) => x < max_width,
        Some(Edge::Bottom) => y < max_height,
        Some(Edge::Left) => x >= 0.0,
    }
}
