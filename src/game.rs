use crate::announce::{AnnouncementSink, CounterSink};
use crate::config::GameConfig;
use crate::entity::{Direction, Position, Snake};
use crate::grid::{GridWorld, Viewport};
use crate::input::{resolve_intent, KeyState};
use crate::vocab::{random_word, VocabItem};
use rand::rngs::StdRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// No board yet; waiting for the first reset
    Idle,
    Running,
    /// The mouse ran into itself. Stays here until restarted.
    Crashed,
}

/// What a call to [`Game::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, nothing happened
    Inactive,
    /// Running, but the tick interval has not elapsed yet
    Waiting,
    Moved,
    Ate(VocabItem),
    Crashed,
}

/// One play session of Maus & Käse.
pub struct Game {
    pub config: GameConfig,
    pub grid: GridWorld,
    pub snake: Snake,
    /// Direction applied on the last tick
    pub dir: Direction,
    /// Direction the next tick will apply
    pub next_dir: Direction,
    pub food: Option<Position>,
    pub speed_ms: f64,
    pub score: u32,
    /// Timestamp of the last tick
    pub moved_at: f64,
    /// Last word announced, shown until the next cheese
    pub current_word: Option<VocabItem>,
    pub state: GameState,
    rng: StdRng,
}

impl Game {
    /// An idle game; call `reset` to size the board and start playing.
    pub fn new(config: GameConfig, rng: StdRng) -> Self {
        Self {
            config,
            grid: GridWorld::default(),
            snake: Snake::default(),
            dir: Direction::Right,
            next_dir: Direction::Right,
            food: None,
            speed_ms: config.initial_speed_ms,
            score: 0,
            moved_at: 0.0,
            current_word: None,
            state: GameState::Idle,
            rng,
        }
    }

    /// Size the board from the viewport and start a fresh session.
    pub fn reset(&mut self, viewport: Viewport) {
        self.grid = GridWorld::from_viewport(viewport, &self.config.board);
        self.restart();
    }

    /// Start a fresh session on the current board.
    pub fn restart(&mut self) {
        self.snake = Snake::new(self.grid.center());
        self.dir = Direction::Right;
        self.next_dir = Direction::Right;
        self.food = self
            .grid
            .spawn_food(&self.snake, &mut self.rng, self.config.spawn_attempts);
        self.moved_at = 0.0;
        self.speed_ms = self.config.initial_speed_ms;
        self.score = 0;
        self.current_word = None;
        self.state = GameState::Running;

        log::debug!(
            "new session on {}x{} board, food at {:?}",
            self.grid.cols,
            self.grid.rows,
            self.food
        );
    }

    /// Buffer a turn from whatever arrows are held this frame.
    pub fn handle_input<K: KeyState + ?Sized>(&mut self, keys: &K) {
        if self.state != GameState::Running {
            return;
        }
        self.next_dir = resolve_intent(keys, self.dir, self.next_dir);
    }

    /// Advance one tick if `speed_ms` has passed since the last one.
    pub fn update<S>(&mut self, now: f64, sink: &mut S) -> TickOutcome
    where
        S: AnnouncementSink + CounterSink + ?Sized,
    {
        if self.state != GameState::Running {
            return TickOutcome::Inactive;
        }
        if now - self.moved_at < self.speed_ms {
            return TickOutcome::Waiting;
        }
        self.moved_at = now;
        self.dir = self.next_dir;

        let Some(head) = self.snake.head() else {
            return TickOutcome::Inactive;
        };
        let new_head = self.grid.wrap(head.moved(self.dir));

        // The tail still counts even though it would move out of the way.
        if self.snake.occupies(new_head) {
            self.state = GameState::Crashed;
            log::info!("mouse crashed at {:?} with score {}", new_head, self.score);
            return TickOutcome::Crashed;
        }

        self.snake.push_head(new_head);

        if self.food == Some(new_head) {
            self.score += 1;
            sink.increment_cheese_count();

            let word = random_word(&mut self.rng);
            self.current_word = Some(word);
            sink.announce(&word);

            self.speed_ms = (self.speed_ms - self.config.speed_step_ms).max(self.config.min_speed_ms);
            self.food = self
                .grid
                .spawn_food(&self.snake, &mut self.rng, self.config.spawn_attempts);
            sink.record_score(self.score);

            log::debug!(
                "cheese {} eaten, word {:?}, speed now {}ms",
                self.score,
                word.native,
                self.speed_ms
            );
            TickOutcome::Ate(word)
        } else {
            self.snake.pop_tail();
            TickOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announce::{NullSink, RecordingSink};
    use crate::input::HeldKeys;
    use proptest::prelude::*;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> Game {
        Game::new(GameConfig::default(), StdRng::seed_from_u64(seed))
    }

    /// Running game on a fixed board with a hand-placed body.
    fn running(cols: i32, rows: i32, body: &[(i32, i32)], dir: Direction, food: (i32, i32)) -> Game {
        let mut game = seeded(42);
        game.grid = GridWorld::new(cols, rows);
        game.restart();
        game.snake.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        game.dir = dir;
        game.next_dir = dir;
        game.food = Some(Position::new(food.0, food.1));
        game
    }

    /// Fire exactly one tick regardless of the current speed.
    fn tick<S: AnnouncementSink + CounterSink>(game: &mut Game, sink: &mut S) -> TickOutcome {
        let now = game.moved_at + game.speed_ms;
        game.update(now, sink)
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    #[test]
    fn test_new_game_is_idle() {
        let mut game = seeded(1);
        assert_eq!(game.state, GameState::Idle);
        assert_eq!(game.update(10_000.0, &mut NullSink), TickOutcome::Inactive);
        assert!(game.snake.is_empty());
    }

    #[test]
    fn test_reset_sizes_board_and_centers_mouse() {
        let mut game = seeded(1);
        game.reset(Viewport::new(312.0, 400.0));

        // (312 - 72) / 24 = 10, (400 - 160) / 24 = 10
        assert_eq!(game.grid, GridWorld::new(10, 10));
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.snake.body, vec![Position::new(5, 5)]);
        assert_eq!(game.dir, Direction::Right);
        let food = game.food.unwrap();
        assert_ne!(food, Position::new(5, 5));
    }

    #[test]
    fn test_waits_for_speed_interval() {
        let mut game = running(10, 10, &[(5, 5)], Direction::Right, (0, 0));
        game.moved_at = 1000.0;

        assert_eq!(game.update(1139.0, &mut NullSink), TickOutcome::Waiting);
        assert_eq!(game.snake.head(), Some(Position::new(5, 5)));

        assert_eq!(game.update(1140.0, &mut NullSink), TickOutcome::Moved);
        assert_eq!(game.snake.head(), Some(Position::new(6, 5)));
        assert_eq!(game.moved_at, 1140.0);
    }

    #[test]
    fn test_eating_scenario() {
        let mut game = running(10, 10, &[(5, 5)], Direction::Right, (6, 5));
        let mut sink = RecordingSink::default();

        let outcome = tick(&mut game, &mut sink);

        assert!(matches!(outcome, TickOutcome::Ate(_)));
        // grows by one: new head plus the old cell
        assert_eq!(game.snake.body, vec![Position::new(6, 5), Position::new(5, 5)]);
        assert_eq!(game.score, 1);
        assert_eq!(game.speed_ms, 136.0);
        let food = game.food.unwrap();
        assert!(!game.snake.occupies(food));
        assert_eq!(sink.cheese_count, 1);
        assert_eq!(sink.scores, vec![1]);
        assert_eq!(sink.announced.len(), 1);
        assert_eq!(game.current_word, Some(sink.announced[0]));
    }

    #[test]
    fn test_single_cell_mouse_moves_without_eating() {
        let mut game = running(10, 10, &[(5, 5)], Direction::Right, (0, 0));
        assert_eq!(tick(&mut game, &mut NullSink), TickOutcome::Moved);
        assert_eq!(game.snake.body, vec![Position::new(6, 5)]);
        assert_eq!(game.score, 0);
        assert_eq!(game.speed_ms, 140.0);
    }

    #[test]
    fn test_left_wrap_scenario() {
        let mut game = running(10, 10, &[(0, 5), (1, 5), (2, 5)], Direction::Left, (7, 7));

        assert_eq!(tick(&mut game, &mut NullSink), TickOutcome::Moved);
        assert_eq!(
            game.snake.body,
            vec![Position::new(9, 5), Position::new(0, 5), Position::new(1, 5)]
        );
    }

    #[test]
    fn test_wraps_in_every_direction() {
        let cases = [
            ((9, 4), Direction::Right, (0, 4)),
            ((0, 4), Direction::Left, (9, 4)),
            ((4, 0), Direction::Up, (4, 7)),
            ((4, 7), Direction::Down, (4, 0)),
        ];
        for (start, dir, expected) in cases {
            let mut game = running(10, 8, &[start], dir, (5, 5));
            tick(&mut game, &mut NullSink);
            assert_eq!(
                game.snake.head(),
                Some(Position::new(expected.0, expected.1)),
                "moving {:?} from {:?}",
                dir,
                start
            );
        }
    }

    #[test]
    fn test_collision_with_third_segment_freezes_body() {
        // 3 columns: moving left from x=0 wraps onto the segment at index 2
        let body = [(0, 0), (1, 0), (2, 0)];
        let mut game = running(3, 3, &body, Direction::Left, (1, 2));
        let before = game.snake.clone();
        let mut sink = RecordingSink::default();

        assert_eq!(tick(&mut game, &mut sink), TickOutcome::Crashed);
        assert_eq!(game.state, GameState::Crashed);
        assert_eq!(game.snake, before);

        // no further movement while crashed
        assert_eq!(game.update(f64::MAX, &mut sink), TickOutcome::Inactive);
        assert_eq!(game.snake, before);
        assert_eq!(sink.cheese_count, 0);
    }

    #[test]
    fn test_tail_cell_still_counts_as_occupied() {
        // a 2x2 loop: the head steps onto the tail that would have moved away
        let body = [(1, 1), (2, 1), (2, 2), (1, 2)];
        let mut game = running(6, 6, &body, Direction::Down, (4, 4));

        assert_eq!(tick(&mut game, &mut NullSink), TickOutcome::Crashed);
        assert_eq!(game.snake.len(), 4);
    }

    #[test]
    fn test_no_reverse_while_moving() {
        let mut game = running(10, 10, &[(5, 5), (4, 5)], Direction::Right, (0, 0));
        game.handle_input(&HeldKeys::only(Direction::Left));
        assert_eq!(game.next_dir, Direction::Right);

        tick(&mut game, &mut NullSink);
        assert_eq!(game.dir, Direction::Right);
        assert_eq!(game.snake.head(), Some(Position::new(6, 5)));
    }

    #[test]
    fn test_turn_is_buffered_until_tick() {
        let mut game = running(10, 10, &[(5, 5)], Direction::Right, (0, 0));
        game.handle_input(&HeldKeys::only(Direction::Up));
        assert_eq!(game.dir, Direction::Right);
        assert_eq!(game.next_dir, Direction::Up);

        // releasing the key keeps the buffered turn
        game.handle_input(&HeldKeys::none());
        tick(&mut game, &mut NullSink);
        assert_eq!(game.dir, Direction::Up);
        assert_eq!(game.snake.head(), Some(Position::new(5, 4)));
    }

    #[test]
    fn test_speed_ramp_hits_floor() {
        let mut game = running(40, 3, &[(0, 1)], Direction::Right, (1, 1));
        let mut last_speed = game.speed_ms;

        for step in 1..=30 {
            let head = game.snake.head().unwrap();
            game.food = Some(game.grid.wrap(head.moved(Direction::Right)));
            let outcome = tick(&mut game, &mut NullSink);
            assert!(matches!(outcome, TickOutcome::Ate(_)), "step {}", step);

            if last_speed > game.config.min_speed_ms {
                assert!(game.speed_ms < last_speed);
            } else {
                assert_eq!(game.speed_ms, last_speed);
            }
            assert!(game.speed_ms >= game.config.min_speed_ms);
            last_speed = game.speed_ms;
        }

        // 140 - 4 * 30 would be 20, the floor holds at 70
        assert_eq!(game.speed_ms, 70.0);
        assert_eq!(game.score, 30);
        assert_eq!(game.snake.len(), 31);
    }

    #[test]
    fn test_restart_matches_fresh_session() {
        let body = [(0, 0), (1, 0), (2, 0)];
        let mut game = running(3, 3, &body, Direction::Left, (1, 2));
        game.score = 9;
        game.speed_ms = 90.0;
        game.current_word = Some(crate::vocab::WORDS[0]);
        tick(&mut game, &mut NullSink);
        assert_eq!(game.state, GameState::Crashed);

        game.restart();

        let mut fresh = seeded(99);
        fresh.grid = game.grid;
        fresh.restart();

        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.score, 0);
        assert_eq!(game.speed_ms, game.config.initial_speed_ms);
        assert_eq!(game.snake.len(), 1);
        assert_eq!(game.snake.body, fresh.snake.body);
        assert_eq!(game.dir, fresh.dir);
        assert_eq!(game.next_dir, fresh.next_dir);
        assert_eq!(game.moved_at, fresh.moved_at);
        assert_eq!(game.current_word, None);
        assert!(game.food.is_some());
    }

    #[test]
    fn test_one_by_one_board_has_no_food() {
        let mut game = seeded(3);
        game.reset(Viewport::new(0.0, 0.0));
        assert_eq!(game.grid, GridWorld::new(1, 1));
        assert_eq!(game.food, None);
        // the only move wraps back onto the head
        assert_eq!(tick(&mut game, &mut NullSink), TickOutcome::Crashed);
    }

    proptest! {
        #[test]
        fn prop_length_tracks_food(
            seed: u64,
            moves in prop::collection::vec(direction_strategy(), 1..200),
        ) {
            let mut game = seeded(seed);
            game.grid = GridWorld::new(12, 10);
            game.restart();
            let mut sink = RecordingSink::default();

            for dir in moves {
                if game.state != GameState::Running {
                    break;
                }
                game.handle_input(&HeldKeys::only(dir));

                let before = game.snake.clone();
                let score_before = game.score;
                let speed_before = game.speed_ms;

                match tick(&mut game, &mut sink) {
                    TickOutcome::Moved => {
                        prop_assert_eq!(game.snake.len(), before.len());
                        // everything but the old tail shifted back by one
                        prop_assert_eq!(&game.snake.body[1..], &before.body[..before.len() - 1]);
                        prop_assert_eq!(game.score, score_before);
                    }
                    TickOutcome::Ate(_) => {
                        prop_assert_eq!(game.snake.len(), before.len() + 1);
                        prop_assert_eq!(&game.snake.body[1..], &before.body[..]);
                        prop_assert_eq!(game.score, score_before + 1);
                        if speed_before > game.config.min_speed_ms {
                            prop_assert!(game.speed_ms < speed_before);
                        } else {
                            prop_assert_eq!(game.speed_ms, speed_before);
                        }
                    }
                    TickOutcome::Crashed => {
                        prop_assert_eq!(&game.snake, &before);
                    }
                    other => prop_assert!(false, "unexpected outcome {:?}", other),
                }

                if let Some(food) = game.food {
                    prop_assert!(!game.snake.occupies(food) || game.state == GameState::Crashed);
                }
            }

            prop_assert_eq!(sink.cheese_count, game.score);
        }

        #[test]
        fn prop_body_has_no_duplicates_while_running(
            seed: u64,
            moves in prop::collection::vec(direction_strategy(), 1..150),
        ) {
            let mut game = seeded(seed);
            game.grid = GridWorld::new(8, 8);
            game.restart();

            for dir in moves {
                let prev_dir = game.dir;
                game.handle_input(&HeldKeys::only(dir));
                tick(&mut game, &mut NullSink);
                if game.state != GameState::Running {
                    break;
                }
                let mut cells = game.snake.body.clone();
                cells.sort_by_key(|p| (p.x, p.y));
                cells.dedup();
                prop_assert_eq!(cells.len(), game.snake.len());
                prop_assert_ne!(game.dir, prev_dir.opposite());
            }
        }
    }
}
