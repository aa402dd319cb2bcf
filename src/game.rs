//! Game session: state machine and the lock -> clear -> spawn cycle

use crate::bag::Bag;
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::piece::{Piece, Position};
use crate::score::Score;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Automatic downward-movement interval
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);
/// Lifetime of the locked-cell highlight
const LOCK_HIGHLIGHT: Duration = Duration::from_millis(200);

/// Sentinel marking the active piece in the display grid, distinct from
/// empty (0) and from any locked identity tag (positive)
pub const ACTIVE_CELL: i8 = -1;

/// Session states
///
/// `Uninitialized -> Running` happens once, lazily, on the first update
/// tick. `GameOver` is terminal; restart replaces the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Uninitialized,
    Running,
    Paused,
    GameOver,
}

/// Gameplay operations the engine accepts
///
/// Key-to-action mapping lives with the presentation layer; the engine only
/// knows these named operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    Hold,
    Pause,
}

/// One game session
pub struct Game {
    /// Settled cells
    pub board: Board,
    /// Falling piece (None only before initialization)
    current: Option<Piece>,
    /// Queued next piece
    next: Option<Piece>,
    /// Held piece, if any
    held: Option<Piece>,
    /// Whether hold is still available this lock cycle
    can_hold: bool,
    /// Bounding-box origin of the falling piece
    position: Position,
    /// Piece randomizer
    bag: Bag,
    /// Score tracking
    pub score: Score,
    /// Current session state
    pub state: GameState,
    /// Cells written by the most recent lock, for the transient highlight
    locked_cells: HashSet<(i32, i32)>,
    /// When the highlight expires
    highlight_until: Option<Instant>,
    /// Set on every lock; the presentation layer takes it for the audio cue
    lock_event: bool,
    /// Last automatic fall
    last_fall: Instant,
}

impl Game {
    /// Create a session; piece queues fill lazily on the first update tick
    pub fn new(high_score: u64) -> Self {
        Self::with_seed(high_score, rand::random())
    }

    /// Create a session with a fixed randomizer seed
    pub fn with_seed(high_score: u64, seed: u64) -> Self {
        Self {
            board: Board::new(),
            current: None,
            next: None,
            held: None,
            can_hold: true,
            position: Position::spawn(),
            bag: Bag::with_seed(seed),
            score: Score::new(high_score),
            state: GameState::Uninitialized,
            locked_cells: HashSet::new(),
            highlight_until: None,
            lock_event: false,
            last_fall: Instant::now(),
        }
    }

    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Cells still inside their post-lock highlight window
    pub fn locked_cells(&self) -> &HashSet<(i32, i32)> {
        &self.locked_cells
    }

    /// Take the pending lock signal, if any (audio hook)
    pub fn take_lock_event(&mut self) -> bool {
        std::mem::take(&mut self.lock_event)
    }

    /// Advance the session: lazy initialization, highlight expiry, gravity
    ///
    /// Called once per frame. The automatic fall only runs while `Running`,
    /// so pausing or ending the game tears the tick down with no residue.
    pub fn update(&mut self) {
        if self.state == GameState::Uninitialized {
            let (first, second) = self.bag.initialize();
            self.current = Some(Piece::new(first));
            self.next = Some(Piece::new(second));
            self.position = Position::spawn();
            self.last_fall = Instant::now();
            self.state = GameState::Running;
            tracing::info!(first = ?first, next = ?second, "session initialized");
            return;
        }

        if let Some(until) = self.highlight_until {
            if Instant::now() >= until {
                self.locked_cells.clear();
                self.highlight_until = None;
            }
        }

        if self.state != GameState::Running {
            return;
        }

        if self.last_fall.elapsed() >= TICK_INTERVAL {
            self.soft_drop();
            self.last_fall = Instant::now();
        }
    }

    /// Apply a gameplay operation
    ///
    /// Invalid moves are silent no-ops. While paused only the pause toggle
    /// is accepted; a finished or not-yet-started session accepts nothing.
    pub fn process_action(&mut self, action: Action) {
        match self.state {
            GameState::Uninitialized | GameState::GameOver => {}
            GameState::Paused => {
                if action == Action::Pause {
                    self.state = GameState::Running;
                    self.last_fall = Instant::now();
                }
            }
            GameState::Running => match action {
                Action::MoveLeft => self.shift(-1),
                Action::MoveRight => self.shift(1),
                Action::SoftDrop => self.soft_drop(),
                Action::HardDrop => self.hard_drop(),
                Action::Rotate => self.rotate(),
                Action::Hold => self.hold(),
                Action::Pause => self.state = GameState::Paused,
            },
        }
    }

    fn shift(&mut self, dx: i32) {
        if let Some(piece) = &self.current {
            let x = self.position.x + dx;
            if self.board.is_valid_move(&piece.shape, x, self.position.y) {
                self.position.x = x;
            }
        }
    }

    /// One row down; a blocked step triggers the lock cycle instead
    fn soft_drop(&mut self) {
        let Some(piece) = &self.current else { return };
        if self
            .board
            .is_valid_move(&piece.shape, self.position.x, self.position.y + 1)
        {
            self.position.y += 1;
        } else {
            self.lock_and_advance();
        }
    }

    /// Drop straight to the last valid row and lock there
    fn hard_drop(&mut self) {
        let Some(piece) = &self.current else { return };
        let mut y = self.position.y;
        while self.board.is_valid_move(&piece.shape, self.position.x, y + 1) {
            y += 1;
        }
        self.position.y = y;
        self.lock_and_advance();
    }

    /// Rotate clockwise; rejected outright if the result does not fit.
    /// There is no wall-kick correction, by long-standing game behavior.
    fn rotate(&mut self) {
        if let Some(piece) = &self.current {
            let rotated = piece.rotated();
            if self
                .board
                .is_valid_move(&rotated.shape, self.position.x, self.position.y)
            {
                self.current = Some(rotated);
            }
        }
    }

    /// Stash or swap the falling piece; single use per lock cycle
    fn hold(&mut self) {
        if !self.can_hold {
            return;
        }
        let Some(piece) = self.current.take() else {
            return;
        };

        match self.held.take() {
            None => {
                self.held = Some(piece);
                self.current = self.next.take();
                self.next = Some(Piece::new(self.bag.draw()));
            }
            Some(held) => {
                self.held = Some(piece);
                self.current = Some(held);
            }
        }

        self.position = Position::spawn();
        self.can_hold = false;
    }

    /// The lock -> clear -> score -> spawn sequence, atomic to callers
    fn lock_and_advance(&mut self) {
        let Some(piece) = self.current.take() else {
            return;
        };

        self.locked_cells = self
            .board
            .lock(&piece.shape, self.position.x, self.position.y, piece.kind);
        self.highlight_until = Some(Instant::now() + LOCK_HIGHLIGHT);
        self.lock_event = true;

        let cleared = self.board.clear_full_rows();
        self.score.add_clear(cleared);
        if cleared > 0 {
            tracing::debug!(cleared, points = self.score.points, "rows cleared");
        }

        let promoted = self.next.take().unwrap_or_else(|| Piece::new(self.bag.draw()));
        self.next = Some(Piece::new(self.bag.draw()));
        self.position = Position::spawn();
        self.can_hold = true;

        if !self
            .board
            .is_valid_move(&promoted.shape, self.position.x, self.position.y)
        {
            self.state = GameState::GameOver;
            tracing::info!(score = self.score.points, lines = self.score.lines, "game over");
        }
        self.current = Some(promoted);
    }

    /// Settled board overlaid with the active piece marked by [`ACTIVE_CELL`]
    ///
    /// This is the render input contract: 0 empty, positive N a cell locked
    /// by identity N-1, -1 the falling piece.
    pub fn display_grid(&self) -> [[i8; BOARD_WIDTH]; BOARD_HEIGHT] {
        let mut grid = [[0i8; BOARD_WIDTH]; BOARD_HEIGHT];
        for (y, row) in self.board.rows().enumerate() {
            for (x, &cell) in row.iter().enumerate() {
                grid[y][x] = cell as i8;
            }
        }

        if let Some(piece) = &self.current {
            for (py, row) in piece.shape.iter().enumerate() {
                for (px, &cell) in row.iter().enumerate() {
                    if cell == 0 {
                        continue;
                    }
                    let x = self.position.x + px as i32;
                    let y = self.position.y + py as i32;
                    if x >= 0 && x < BOARD_WIDTH as i32 && y >= 0 && y < BOARD_HEIGHT as i32 {
                        grid[y as usize][x as usize] = ACTIVE_CELL;
                    }
                }
            }
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::PieceType;

    fn started(seed: u64) -> Game {
        let mut game = Game::with_seed(0, seed);
        game.update(); // lazy init
        assert_eq!(game.state, GameState::Running);
        game
    }

    /// Pretend the auto-fall interval has elapsed
    fn force_tick_due(game: &mut Game) {
        game.last_fall = Instant::now() - TICK_INTERVAL;
    }

    #[test]
    fn test_lazy_initialization_on_first_update() {
        let mut game = Game::with_seed(0, 1);
        assert_eq!(game.state, GameState::Uninitialized);
        assert!(game.current().is_none());

        game.update();
        assert_eq!(game.state, GameState::Running);
        assert!(game.current().is_some());
        assert!(game.next_piece().is_some());
        assert_eq!(game.position, Position::spawn());
    }

    #[test]
    fn test_actions_ignored_before_initialization() {
        let mut game = Game::with_seed(0, 1);
        game.process_action(Action::MoveLeft);
        game.process_action(Action::HardDrop);
        assert_eq!(game.state, GameState::Uninitialized);
    }

    #[test]
    fn test_shift_moves_within_walls() {
        let mut game = started(1);
        let x0 = game.position.x;
        game.process_action(Action::MoveLeft);
        assert_eq!(game.position.x, x0 - 1);
        game.process_action(Action::MoveRight);
        assert_eq!(game.position.x, x0);

        // Walk into the left wall; extra moves are no-ops
        for _ in 0..BOARD_WIDTH {
            game.process_action(Action::MoveLeft);
        }
        let at_wall = game.position.x;
        game.process_action(Action::MoveLeft);
        assert_eq!(game.position.x, at_wall);
    }

    #[test]
    fn test_blocked_rotation_keeps_orientation() {
        let mut game = started(1);
        // Vertical I hugging the left wall, with a settled cell inside the
        // footprint its horizontal orientation would need
        game.current = Some(Piece::new(PieceType::I).rotated());
        game.position = Position { x: 0, y: 5 };
        game.board.set(2, 5, 1);

        let before = game.current.clone().unwrap();
        game.process_action(Action::Rotate);
        // No wall kick: the rotation is rejected outright
        assert_eq!(game.current.clone().unwrap().shape, before.shape);

        // With the obstruction gone the same rotation succeeds
        game.board.set(2, 5, 0);
        game.process_action(Action::Rotate);
        assert_ne!(game.current.unwrap().shape, before.shape);
    }

    #[test]
    fn test_hard_drop_locks_at_floor() {
        let mut game = started(1);
        game.current = Some(Piece::new(PieceType::O));
        game.position = Position::spawn();
        game.process_action(Action::HardDrop);

        // O is 2 rows tall, so it rests on rows 18 and 19
        assert_eq!(game.board.get(4, 19), Some(PieceType::O.id() + 1));
        assert_eq!(game.board.get(5, 18), Some(PieceType::O.id() + 1));
        // Cycle advanced: fresh piece back at spawn
        assert_eq!(game.position, Position::spawn());
        assert!(game.current().is_some());
    }

    #[test]
    fn test_lock_emits_event_and_highlight() {
        let mut game = started(1);
        game.current = Some(Piece::new(PieceType::O));
        game.process_action(Action::HardDrop);

        assert!(game.take_lock_event());
        assert!(!game.take_lock_event(), "event is consumed once");
        assert_eq!(game.locked_cells().len(), 4);

        // Highlight clears after its window passes
        game.highlight_until = Some(Instant::now() - Duration::from_millis(1));
        game.update();
        assert!(game.locked_cells().is_empty());
    }

    #[test]
    fn test_clearing_a_row_scores() {
        let mut game = started(1);
        for x in 0..BOARD_WIDTH {
            if !(3..7).contains(&x) {
                game.board.set(x, 19, 1);
            }
        }
        game.current = Some(Piece::new(PieceType::I));
        game.position = Position { x: 3, y: 0 };
        game.process_action(Action::HardDrop);

        assert_eq!(game.score.points, 100);
        assert_eq!(game.score.lines, 1);
    }

    #[test]
    fn test_hold_stashes_and_promotes_next() {
        let mut game = started(7);
        let active = game.current.clone().unwrap();
        let queued = game.next_piece().cloned().unwrap();

        game.process_action(Action::Hold);
        assert_eq!(game.held_piece().unwrap(), &active);
        assert_eq!(game.current().unwrap(), &queued);
        assert!(game.next_piece().is_some());
        assert_eq!(game.position, Position::spawn());
        assert!(!game.can_hold());
    }

    #[test]
    fn test_second_hold_before_lock_is_a_no_op() {
        let mut game = started(7);
        game.process_action(Action::Hold);
        let held = game.held_piece().cloned().unwrap();
        let active = game.current().cloned().unwrap();

        game.process_action(Action::Hold);
        assert_eq!(game.held_piece().unwrap(), &held);
        assert_eq!(game.current().unwrap(), &active);
    }

    #[test]
    fn test_hold_swaps_after_lock_reenables() {
        let mut game = started(7);
        game.process_action(Action::Hold);
        let held = game.held_piece().cloned().unwrap();

        game.process_action(Action::HardDrop);
        assert!(game.can_hold(), "lock cycle re-enables hold");

        let active = game.current().cloned().unwrap();
        let queued = game.next_piece().cloned().unwrap();
        game.process_action(Action::Hold);
        // Swap branch: held <-> active, queue untouched
        assert_eq!(game.current().unwrap(), &held);
        assert_eq!(game.held_piece().unwrap(), &active);
        assert_eq!(game.next_piece().unwrap(), &queued);
    }

    #[test]
    fn test_pause_freezes_the_tick() {
        let mut game = started(1);
        game.process_action(Action::Pause);
        assert_eq!(game.state, GameState::Paused);

        let pos = game.position;
        let grid = game.display_grid();
        let points = game.score.points;

        force_tick_due(&mut game);
        game.update();
        assert_eq!(game.position, pos);
        assert_eq!(game.display_grid(), grid);
        assert_eq!(game.score.points, points);

        // Movement input is ignored while paused
        game.process_action(Action::MoveLeft);
        assert_eq!(game.position, pos);

        // Toggling twice returns to the prior state
        game.process_action(Action::Pause);
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.position, pos);
        assert_eq!(game.display_grid(), grid);
    }

    #[test]
    fn test_spawn_collision_ends_the_session() {
        let mut game = started(3);
        // Pre-fill the spawn columns at rows 0-1 so whatever spawns next
        // collides in its spawn placement
        for y in 0..2 {
            for x in 3..9 {
                game.board.set(x, y, 1);
            }
        }
        game.current = Some(Piece::new(PieceType::O));
        game.position = Position::spawn();
        game.process_action(Action::HardDrop);

        assert_eq!(game.state, GameState::GameOver);

        // Terminal: no further operation may alter the board
        let board = game.board.clone();
        let pos = game.position;
        for action in [
            Action::MoveLeft,
            Action::MoveRight,
            Action::SoftDrop,
            Action::HardDrop,
            Action::Rotate,
            Action::Hold,
            Action::Pause,
        ] {
            game.process_action(action);
        }
        force_tick_due(&mut game);
        game.update();
        assert_eq!(game.board, board);
        assert_eq!(game.position, pos);
        assert_eq!(game.state, GameState::GameOver);
    }

    #[test]
    fn test_display_grid_marks_active_piece() {
        let game = started(5);
        let grid = game.display_grid();
        let sentinels = grid
            .iter()
            .flatten()
            .filter(|&&cell| cell == ACTIVE_CELL)
            .count();
        assert_eq!(sentinels, 4);
    }

    #[test]
    fn test_display_grid_empty_before_initialization() {
        let game = Game::with_seed(0, 5);
        let grid = game.display_grid();
        assert!(grid.iter().flatten().all(|&cell| cell == 0));
    }
}
