use thiserror::Error;
use tracing::{debug, info};

use super::{
    board::Board,
    common::{CellKind, Direction, Position},
};
use crate::configuration::{GameConfig, ReversalPolicy};

pub const MAX_ATTEMPTS_FIND_FOOD: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SnakeError {
    #[error("Cell at {0:?} carries no direction")]
    DirectionlessCell(Position),
    #[error("Could not find an empty cell for the food in {attempts} attempts")]
    FoodPlacementExhausted { attempts: usize },
    #[error("Next cell {position:?} is neither food nor empty: {kind:?}")]
    InvalidNextCell { position: Position, kind: CellKind },
    #[error("Moving {direction:?} from {from:?} leaves the board")]
    OutOfBounds { from: Position, direction: Direction },
    #[error("Snake chain is broken at {0:?}")]
    BrokenChain(Position),
    #[error("Board of {width}x{height} has no interior")]
    BoardTooSmall { width: usize, height: usize },
}

impl SnakeError {
    /// Whether the error is the snake running into something.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            SnakeError::InvalidNextCell { .. } | SnakeError::OutOfBounds { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Moved { head: Position },
    Ate { head: Position, food: Position },
}

#[derive(Debug)]
pub struct Game {
    board: Board,
    rng: fastrand::Rng,
    seed: u64,
    reversal: ReversalPolicy,
}

impl Game {
    pub fn new(width: usize, height: usize) -> Result<Self, SnakeError> {
        Self::with_config(&GameConfig::new(width, height))
    }

    /// Builds a board, puts a one-segment snake facing right on a random
    /// interior cell and places the first food.
    pub fn with_config(config: &GameConfig) -> Result<Self, SnakeError> {
        if config.width < 3 || config.height < 3 {
            return Err(SnakeError::BoardTooSmall {
                width: config.width,
                height: config.height,
            });
        }

        let mut game = Self::from_board(Board::new(config.width, config.height), config);
        game.set_random_snake()?;
        game.set_random_food()?;

        info!(
            "new game {}x{} with seed {}",
            config.width, config.height, game.seed
        );
        Ok(game)
    }

    /// Wraps an already populated board. Only `seed` and `reversal` are
    /// taken from `config`.
    pub fn from_board(board: Board, config: &GameConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
        Self {
            board,
            rng: fastrand::Rng::with_seed(seed),
            seed,
            reversal: config.reversal,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn next_tick(&mut self, direction: Direction) -> Result<TickOutcome, SnakeError> {
        info!("tick with {:?}", direction);

        let direction = self.board.resolve_heading(direction, self.reversal)?;
        let next_head_cell = self.board.next_head_cell(direction)?;

        match self.board[next_head_cell].kind {
            CellKind::Food => {
                self.board.update_head(next_head_cell, direction);
                let food = self.set_random_food()?;
                Ok(TickOutcome::Ate {
                    head: next_head_cell,
                    food,
                })
            }
            CellKind::Empty => {
                self.board.update_head(next_head_cell, direction);
                self.board.delete_tail()?;
                Ok(TickOutcome::Moved {
                    head: next_head_cell,
                })
            }
            kind => Err(SnakeError::InvalidNextCell {
                position: next_head_cell,
                kind,
            }),
        }
    }

    fn set_random_snake(&mut self) -> Result<(), SnakeError> {
        let position = self.random_cell()?;
        self.board.place_snake(position);
        Ok(())
    }

    fn set_random_food(&mut self) -> Result<Position, SnakeError> {
        for _ in 0..MAX_ATTEMPTS_FIND_FOOD {
            let position = self.random_cell()?;

            debug!("food position generated {:?}", position);

            if self.board[position].kind == CellKind::Empty {
                self.board.place_food(position);
                return Ok(position);
            }
        }

        Err(SnakeError::FoodPlacementExhausted {
            attempts: MAX_ATTEMPTS_FIND_FOOD,
        })
    }

    fn random_cell(&self) -> Result<Position, SnakeError> {
        let (width, height) = self.board.dimension();
        self.board
            .get_random_cell(&self.rng)
            .ok_or(SnakeError::BoardTooSmall { width, height })
    }
}
