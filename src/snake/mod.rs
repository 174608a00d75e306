mod board;
mod common;
mod game;

pub use board::{Board, LevelError};
pub use common::{Cell, CellKind, Direction, Position};
pub use game::{Game, SnakeError, TickOutcome, MAX_ATTEMPTS_FIND_FOOD};
