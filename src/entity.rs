#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Order in which held keys are considered when several are down at once.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// The mouse: grid cells it occupies, head first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snake {
    pub body: Vec<Position>,
}

impl Snake {
    pub fn new(head: Position) -> Self {
        Self { body: vec![head] }
    }

    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True if any segment, tail included, sits on `pos`.
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn push_head(&mut self, pos: Position) {
        self.body.insert(0, pos);
    }

    pub fn pop_tail(&mut self) -> Option<Position> {
        self.body.pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        for dir in Direction::PRIORITY {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_position_moved() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved(Direction::Up), Position::new(5, 4));
        assert_eq!(pos.moved(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.moved(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn test_snake_head_and_tail() {
        let mut snake = Snake::new(Position::new(2, 2));
        snake.push_head(Position::new(3, 2));
        assert_eq!(snake.head(), Some(Position::new(3, 2)));
        assert_eq!(snake.len(), 2);
        assert!(snake.occupies(Position::new(2, 2)));

        assert_eq!(snake.pop_tail(), Some(Position::new(2, 2)));
        assert!(!snake.occupies(Position::new(2, 2)));
    }
}
