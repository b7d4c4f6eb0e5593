use crate::board::{Board, Cell, Direction::{*, self}};
use crate::signal::RenderSignal;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

const SPAWN_VALUE: Cell = 2;

/// Copy of everything the renderer needs, taken under the session lock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub game_over: bool,
    pub score: Cell,
}

/// One game from the first tile to the last move. Not synchronized; callers
/// keep it behind a lock.
pub struct GameSession {
    board: Board,
    score: Cell,
    game_over: bool,
    rng: StdRng,
    signal: RenderSignal,
}

impl GameSession {
    pub fn new(signal: RenderSignal) -> Self {
        Self::with_rng(StdRng::from_entropy(), signal)
    }

    pub fn with_rng(rng: StdRng, signal: RenderSignal) -> Self {
        let mut session = GameSession { board: Board::new(), score: 0, game_over: false, rng, signal };

        session.spawn_tile();
        session.score = session.board.sum();
        info!(board = %session.board, "Started a new session");

        session
    }

    pub fn up(&mut self) -> bool {
        self.apply(Up)
    }

    pub fn down(&mut self) -> bool {
        self.apply(Down)
    }

    pub fn left(&mut self) -> bool {
        self.apply(Left)
    }

    pub fn right(&mut self) -> bool {
        self.apply(Right)
    }

    /// Shifts the board and, if that changed anything, spawns a tile,
    /// refreshes score and game over, then wakes the renderer.
    ///
    /// Returns whether the move was effective. Moves after game over and
    /// moves that change nothing leave the session untouched.
    pub fn apply(&mut self, direction: Direction) -> bool {
        if self.game_over {
            return false;
        }

        let (next, changed) = self.board.shift(direction);
        if !changed {
            debug!(?direction, "Move had no effect");
            return false;
        }

        self.board = next;
        self.spawn_tile();
        self.score = self.board.sum();

        if self.board.is_stuck() {
            self.game_over = true;
        }

        debug!(?direction, score = self.score, game_over = self.game_over, "Applied move");
        if self.game_over {
            info!(score = self.score, board = %self.board, "Game over");
        }

        self.signal.notify();
        true
    }

    /// Marks the session as finished so nothing mutates it any more.
    pub fn end(&mut self) {
        self.game_over = true;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot { board: self.board, game_over: self.game_over, score: self.score }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Cell {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    ///////////////////////////////////////////////////////////////////////////

    fn spawn_tile(&mut self) {
        match self.board.empty_cells().choose(&mut self.rng) {
            Some(&(row, col)) => self.board.set(row, col, SPAWN_VALUE),
            None => self.game_over = true,
        }
    }
}
