use std::fmt;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

impl Direction {
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn is_opposite(&self, direction: &Self) -> bool {
        self.opposite() == *direction
    }

    /// Maps the `w`/`a`/`s`/`d` keys to a direction.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(Direction::Up),
            'a' => Some(Direction::Left),
            's' => Some(Direction::Down),
            'd' => Some(Direction::Right),
            _ => None,
        }
    }
}

/// What a grid cell holds.
///
/// `Snake(d)` marks a segment of the snake; `d` points at the next segment
/// towards the head (for the head itself, the current heading).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Wall,
    Food,
    Snake(Direction),
}

impl CellKind {
    pub fn is_snake(&self) -> bool {
        matches!(self, CellKind::Snake(_))
    }

    pub fn facing(&self) -> Option<Direction> {
        match self {
            CellKind::Snake(direction) => Some(*direction),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            CellKind::Empty => '.',
            CellKind::Wall => '#',
            CellKind::Food => 'W',
            CellKind::Snake(Direction::Left) => '←',
            CellKind::Snake(Direction::Up) => '↑',
            CellKind::Snake(Direction::Right) => '→',
            CellKind::Snake(Direction::Down) => '↓',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        let kind = match glyph {
            '.' => CellKind::Empty,
            '#' => CellKind::Wall,
            'W' => CellKind::Food,
            '←' => CellKind::Snake(Direction::Left),
            '↑' => CellKind::Snake(Direction::Up),
            '→' => CellKind::Snake(Direction::Right),
            '↓' => CellKind::Snake(Direction::Down),
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone)]
pub struct Cell {
    position: Position,
    pub kind: CellKind,
}

impl Cell {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            kind: CellKind::Empty,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.glyph())
    }
}

#[cfg(test)]
mod tests {
    use super::{CellKind, Direction};

    #[test]
    fn test_opposite_directions() {
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);

        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        assert!(!Direction::Up.is_opposite(&Direction::Up));
    }

    #[test]
    fn test_keys_map_to_directions() {
        assert_eq!(Direction::from_key('w'), Some(Direction::Up));
        assert_eq!(Direction::from_key('a'), Some(Direction::Left));
        assert_eq!(Direction::from_key('S'), Some(Direction::Down));
        assert_eq!(Direction::from_key('d'), Some(Direction::Right));
        assert_eq!(Direction::from_key('q'), None);
    }

    #[test]
    fn test_glyphs_are_distinct_and_parse_back() {
        let kinds = [
            CellKind::Empty,
            CellKind::Wall,
            CellKind::Food,
            CellKind::Snake(Direction::Left),
            CellKind::Snake(Direction::Up),
            CellKind::Snake(Direction::Right),
            CellKind::Snake(Direction::Down),
        ];
        for kind in kinds {
            assert_eq!(CellKind::from_glyph(kind.glyph()), Some(kind));
        }
        assert_eq!(CellKind::from_glyph('x'), None);
    }

    #[test]
    fn test_only_snake_cells_have_a_facing() {
        assert_eq!(CellKind::Empty.facing(), None);
        assert_eq!(CellKind::Wall.facing(), None);
        assert_eq!(CellKind::Food.facing(), None);
        assert_eq!(
            CellKind::Snake(Direction::Down).facing(),
            Some(Direction::Down)
        );
        assert!(CellKind::Snake(Direction::Down).is_snake());
        assert!(!CellKind::Food.is_snake());
    }
}
