use std::{
    collections::HashSet,
    fmt,
    ops::{Deref, DerefMut, Index},
    str::FromStr,
};

use thiserror::Error;
use tracing::debug;

use super::{
    common::{Cell, CellKind, Direction, Position},
    game::SnakeError,
};
use crate::configuration::ReversalPolicy;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LevelError {
    #[error("Level has no rows")]
    Empty,
    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unexpected glyph {glyph:?} at {position:?}")]
    UnknownGlyph { glyph: char, position: Position },
    #[error("Level has no snake")]
    NoSnake,
    #[error("Level has {0} food cells, at most one is allowed")]
    TooMuchFood(usize),
    #[error("Snake segments do not form a single chain")]
    BrokenChain,
}

#[derive(Debug, Clone)]
struct Row {
    cells: Vec<Cell>,
}
impl Deref for Row {
    type Target = Vec<Cell>;

    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}
impl DerefMut for Row {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cells
    }
}

/// The grid plus the two ends of the snake.
///
/// Rows are indexed by `x` and columns by `y`. The snake body is not stored
/// separately: each snake cell points at the next segment towards the head,
/// so the whole body can be recovered by walking from `tail` to `head`.
#[derive(Debug, Clone)]
pub struct Board {
    rows: Vec<Row>,
    dimension: (usize, usize),
    head: Position,
    tail: Position,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..width)
            .map(|x| Row {
                cells: (0..height).map(|y| Cell::new(Position::new(x, y))).collect(),
            })
            .collect();

        Self {
            rows,
            dimension: (width, height),
            head: Position::new(0, 0),
            tail: Position::new(0, 0),
        }
    }

    pub fn dimension(&self) -> (usize, usize) {
        self.dimension
    }

    pub fn head(&self) -> Position {
        self.head
    }

    pub fn tail(&self) -> Position {
        self.tail
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.rows.get(position.x)?.get(position.y)
    }

    /// Neighbor of `position` in `direction`: left/right move along the
    /// row (`y`), up/down move across rows (`x`).
    pub fn cell_at(
        &self,
        position: Position,
        direction: Direction,
    ) -> Result<Position, SnakeError> {
        let (width, height) = self.dimension;
        let neighbor = match direction {
            Direction::Left => position.y.checked_sub(1).map(|y| Position::new(position.x, y)),
            Direction::Right => Some(Position::new(position.x, position.y + 1)),
            Direction::Up => position.x.checked_sub(1).map(|x| Position::new(x, position.y)),
            Direction::Down => Some(Position::new(position.x + 1, position.y)),
        };

        match neighbor {
            Some(p) if p.x < width && p.y < height => Ok(p),
            _ => Err(SnakeError::OutOfBounds {
                from: position,
                direction,
            }),
        }
    }

    pub fn direction_of(&self, position: Position) -> Result<Direction, SnakeError> {
        self.cell(position)
            .and_then(|cell| cell.kind.facing())
            .ok_or(SnakeError::DirectionlessCell(position))
    }

    pub fn head_direction(&self) -> Result<Direction, SnakeError> {
        self.direction_of(self.head)
    }

    /// Direction the head will actually take when `requested` is asked for.
    pub fn resolve_heading(
        &self,
        requested: Direction,
        policy: ReversalPolicy,
    ) -> Result<Direction, SnakeError> {
        let heading = self.head_direction()?;
        if policy == ReversalPolicy::Ignore && heading.is_opposite(&requested) {
            debug!("ignoring reversal from {:?} to {:?}", heading, requested);
            return Ok(heading);
        }
        Ok(requested)
    }

    pub fn next_head_cell(&self, direction: Direction) -> Result<Position, SnakeError> {
        self.cell_at(self.head, direction)
    }

    /// Moves the head into `next`. The old head keeps a marker pointing at
    /// the new one and so becomes a body segment.
    pub fn update_head(&mut self, next: Position, direction: Direction) {
        let head = self.head;
        self.cell_mut(head).kind = CellKind::Snake(direction);
        self.cell_mut(next).kind = CellKind::Snake(direction);
        self.head = next;
    }

    pub fn delete_tail(&mut self) -> Result<(), SnakeError> {
        let last_tail = self.tail;
        let direction = self.direction_of(last_tail)?;
        self.tail = self.cell_at(last_tail, direction)?;
        self.cell_mut(last_tail).kind = CellKind::Empty;
        Ok(())
    }

    /// Uniform pick over the interior, i.e. everything but the outer ring.
    /// `None` when the board has no interior.
    pub fn get_random_cell(&self, rng: &fastrand::Rng) -> Option<Position> {
        let (width, height) = self.dimension;
        if width < 3 || height < 3 {
            return None;
        }
        let x = rng.usize(1..width - 1);
        let y = rng.usize(1..height - 1);
        Some(Position::new(x, y))
    }

    pub fn place_snake(&mut self, position: Position) {
        self.head = position;
        self.tail = position;
        self.cell_mut(position).kind = CellKind::Snake(Direction::Right);
    }

    pub fn place_food(&mut self, position: Position) {
        self.cell_mut(position).kind = CellKind::Food;
    }

    pub fn count(&self, predicate: impl Fn(&CellKind) -> bool) -> usize {
        self.cells().filter(|cell| predicate(&cell.kind)).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.count(CellKind::is_snake)
    }

    pub fn food_positions(&self) -> Vec<Position> {
        self.cells()
            .filter(|cell| cell.kind == CellKind::Food)
            .map(Cell::position)
            .collect()
    }

    /// Snake segments from tail to head.
    pub fn snake_positions(&self) -> Result<Vec<Position>, SnakeError> {
        let limit = self.occupied_count();
        let mut current = self.tail;
        let mut positions = vec![current];

        while current != self.head {
            if positions.len() >= limit {
                return Err(SnakeError::BrokenChain(current));
            }
            current = self.cell_at(current, self.direction_of(current)?)?;
            positions.push(current);
        }

        Ok(positions)
    }

    pub fn snake_len(&self) -> Result<usize, SnakeError> {
        self.snake_positions().map(|positions| positions.len())
    }

    fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flat_map(|row| row.iter())
    }

    fn cell_mut(&mut self, position: Position) -> &mut Cell {
        &mut self.rows[position.x][position.y]
    }

    fn find_tail(&self, snake: &[Position]) -> Result<Position, LevelError> {
        let pointed_at: HashSet<Position> = snake
            .iter()
            .filter_map(|p| {
                let next = self.cell_at(*p, self.direction_of(*p).ok()?).ok()?;
                self[next].kind.is_snake().then_some(next)
            })
            .collect();

        let mut candidates = snake.iter().filter(|p| !pointed_at.contains(*p));
        match (candidates.next(), candidates.next()) {
            (Some(tail), None) => Ok(*tail),
            _ => Err(LevelError::BrokenChain),
        }
    }

    fn find_head(&self, tail: Position, snake_len: usize) -> Result<Position, LevelError> {
        let mut visited = HashSet::from([tail]);
        let mut current = tail;

        loop {
            let next = self
                .direction_of(current)
                .and_then(|direction| self.cell_at(current, direction));
            match next {
                Ok(next) if self[next].kind.is_snake() && !visited.contains(&next) => {
                    visited.insert(next);
                    current = next;
                }
                _ => break,
            }
        }

        if visited.len() != snake_len {
            return Err(LevelError::BrokenChain);
        }
        Ok(current)
    }
}

impl Index<Position> for Board {
    type Output = Cell;

    fn index(&self, position: Position) -> &Self::Output {
        &self.rows[position.x][position.y]
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row.iter() {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Parses a board from the same glyphs it renders with, one row per line.
impl FromStr for Board {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let height = match lines.first() {
            None => return Err(LevelError::Empty),
            Some(line) => line.chars().count(),
        };

        let mut board = Board::new(lines.len(), height);
        let mut snake = vec![];
        for (x, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != height {
                return Err(LevelError::RaggedRow {
                    row: x,
                    expected: height,
                    found,
                });
            }

            for (y, glyph) in line.chars().enumerate() {
                let position = Position::new(x, y);
                let kind = CellKind::from_glyph(glyph)
                    .ok_or(LevelError::UnknownGlyph { glyph, position })?;
                if kind.is_snake() {
                    snake.push(position);
                }
                board.cell_mut(position).kind = kind;
            }
        }

        if snake.is_empty() {
            return Err(LevelError::NoSnake);
        }
        let food = board.food_positions().len();
        if food > 1 {
            return Err(LevelError::TooMuchFood(food));
        }

        board.tail = board.find_tail(&snake)?;
        board.head = board.find_head(board.tail, snake.len())?;

        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        configuration::ReversalPolicy,
        snake::{
            common::{CellKind, Direction, Position},
            game::SnakeError,
        },
    };

    use super::{Board, LevelError};

    #[test]
    fn test_new_board_renders_all_empty() {
        let board = Board::new(4, 3);
        assert_eq!(board.to_string(), "...\n...\n...\n...\n");
        assert_eq!(board.occupied_count(), 0);
        assert!(board.food_positions().is_empty());
    }

    #[test]
    fn test_cell_at_follows_row_and_column_axes() {
        let board = Board::new(5, 5);
        let center = Position::new(2, 2);
        assert_eq!(board.cell_at(center, Direction::Left), Ok(Position::new(2, 1)));
        assert_eq!(board.cell_at(center, Direction::Right), Ok(Position::new(2, 3)));
        assert_eq!(board.cell_at(center, Direction::Up), Ok(Position::new(1, 2)));
        assert_eq!(board.cell_at(center, Direction::Down), Ok(Position::new(3, 2)));
    }

    #[test]
    fn test_cell_at_reports_out_of_bounds() {
        let board = Board::new(3, 4);
        let corner = Position::new(0, 0);
        assert_eq!(
            board.cell_at(corner, Direction::Up),
            Err(SnakeError::OutOfBounds {
                from: corner,
                direction: Direction::Up
            })
        );
        assert!(board.cell_at(corner, Direction::Left).is_err());

        let far_corner = Position::new(2, 3);
        assert!(board.cell_at(far_corner, Direction::Down).is_err());
        assert!(board.cell_at(far_corner, Direction::Right).is_err());
    }

    #[test]
    fn test_head_direction_requires_a_marker() {
        let mut board = Board::new(5, 5);
        assert_eq!(
            board.head_direction(),
            Err(SnakeError::DirectionlessCell(Position::new(0, 0)))
        );

        board.place_snake(Position::new(2, 2));
        assert_eq!(board.head_direction(), Ok(Direction::Right));
    }

    #[test]
    fn test_update_head_then_delete_tail_moves_single_segment() {
        let mut board = Board::new(5, 5);
        board.place_snake(Position::new(2, 2));

        let next = board.next_head_cell(Direction::Down).unwrap();
        board.update_head(next, Direction::Down);
        assert_eq!(board.occupied_count(), 2);
        assert_eq!(board[Position::new(2, 2)].kind, CellKind::Snake(Direction::Down));

        board.delete_tail().unwrap();
        assert_eq!(board.head(), Position::new(3, 2));
        assert_eq!(board.tail(), Position::new(3, 2));
        assert_eq!(board[Position::new(2, 2)].kind, CellKind::Empty);
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_random_cells_stay_in_interior() {
        let board = Board::new(6, 4);
        let rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let p = board.get_random_cell(&rng).unwrap();
            assert!((1..=4).contains(&p.x), "{:?}", p);
            assert!((1..=2).contains(&p.y), "{:?}", p);
        }

        assert_eq!(Board::new(2, 5).get_random_cell(&rng), None);
    }

    #[test]
    fn test_resolve_heading() {
        let board: Board = "
.....
.←←..
.....
"
        .parse()
        .unwrap();

        assert_eq!(
            board.resolve_heading(Direction::Right, ReversalPolicy::Collide),
            Ok(Direction::Right)
        );
        assert_eq!(
            board.resolve_heading(Direction::Right, ReversalPolicy::Ignore),
            Ok(Direction::Left)
        );
        assert_eq!(
            board.resolve_heading(Direction::Up, ReversalPolicy::Ignore),
            Ok(Direction::Up)
        );
    }

    #[test]
    fn test_parse_finds_head_and_tail() {
        let level = "
#######
#.....#
#.→→↓.#
#...↓W#
#.....#
#######
";
        let board: Board = level.parse().unwrap();

        assert_eq!(board.dimension(), (6, 7));
        assert_eq!(board.tail(), Position::new(2, 2));
        assert_eq!(board.head(), Position::new(3, 4));
        assert_eq!(
            board.snake_positions().unwrap(),
            vec![
                Position::new(2, 2),
                Position::new(2, 3),
                Position::new(2, 4),
                Position::new(3, 4)
            ]
        );
        assert_eq!(board.food_positions(), vec![Position::new(3, 5)]);
        assert_eq!(board.to_string(), level.trim_start());
    }

    #[test]
    fn test_parse_head_facing_its_own_body() {
        // the head at (2, 1) faces up into the segment at (1, 1)
        let board: Board = "
.....
→→↓..
.↑←..
.....
"
        .parse()
        .unwrap();

        assert_eq!(board.tail(), Position::new(1, 0));
        assert_eq!(board.head(), Position::new(2, 1));
        assert_eq!(board.snake_len(), Ok(5));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Board>().unwrap_err(), LevelError::Empty);
        assert_eq!(
            "...\n..\n".parse::<Board>().unwrap_err(),
            LevelError::RaggedRow {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            ".x.\n".parse::<Board>().unwrap_err(),
            LevelError::UnknownGlyph {
                glyph: 'x',
                position: Position::new(0, 1)
            }
        );
        assert_eq!("...\n.W.\n".parse::<Board>().unwrap_err(), LevelError::NoSnake);
        assert_eq!(
            "W→W\n".parse::<Board>().unwrap_err(),
            LevelError::TooMuchFood(2)
        );
        assert_eq!(
            "→.→\n".parse::<Board>().unwrap_err(),
            LevelError::BrokenChain
        );
    }
}
