use crate::entity::Direction;

/// Anything that can report whether an arrow key is currently down.
pub trait KeyState {
    fn is_held(&self, direction: Direction) -> bool;
}

/// Arrow keys held during the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(direction: Direction) -> Self {
        let mut keys = Self::default();
        keys.set(direction, true);
        keys
    }

    pub fn set(&mut self, direction: Direction, held: bool) {
        match direction {
            Direction::Up => self.up = held,
            Direction::Down => self.down = held,
            Direction::Left => self.left = held,
            Direction::Right => self.right = held,
        }
    }
}

impl KeyState for HeldKeys {
    fn is_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }
}

/// Pick the buffered direction for the next tick.
///
/// Held keys are checked Up, Down, Left, Right; the first one that would not
/// turn the mouse straight back into its own neck wins. With nothing usable
/// held, `buffered` is returned unchanged.
pub fn resolve_intent<K: KeyState + ?Sized>(
    keys: &K,
    committed: Direction,
    buffered: Direction,
) -> Direction {
    Direction::PRIORITY
        .into_iter()
        .find(|&dir| keys.is_held(dir) && dir != committed.opposite())
        .unwrap_or(buffered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_no_keys_keeps_buffer() {
        let keys = HeldKeys::none();
        assert_eq!(
            resolve_intent(&keys, Direction::Right, Direction::Up),
            Direction::Up
        );
    }

    #[test]
    fn test_reverse_is_ignored() {
        let keys = HeldKeys::only(Direction::Left);
        assert_eq!(
            resolve_intent(&keys, Direction::Right, Direction::Right),
            Direction::Right
        );
    }

    #[test]
    fn test_priority_order() {
        let keys = HeldKeys {
            up: true,
            down: false,
            left: true,
            right: true,
        };
        assert_eq!(
            resolve_intent(&keys, Direction::Right, Direction::Right),
            Direction::Up
        );
    }

    #[test]
    fn test_blocked_candidate_falls_through() {
        // moving down: up is a reversal, so down (next in order) wins
        let keys = HeldKeys {
            up: true,
            down: true,
            left: false,
            right: false,
        };
        assert_eq!(
            resolve_intent(&keys, Direction::Down, Direction::Down),
            Direction::Down
        );

        let keys = HeldKeys {
            up: true,
            down: false,
            left: true,
            right: false,
        };
        assert_eq!(
            resolve_intent(&keys, Direction::Down, Direction::Down),
            Direction::Left
        );
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_never_resolves_to_reverse(
            committed in direction_strategy(),
            up: bool, down: bool, left: bool, right: bool,
        ) {
            let keys = HeldKeys { up, down, left, right };
            // buffer starts legal, as the game maintains it
            let next = resolve_intent(&keys, committed, committed);
            prop_assert_ne!(next, committed.opposite());
        }
    }
}
