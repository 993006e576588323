use crate::activities::{Diary, Flashcards, HomeMenu, Quiz, Toast, MENU};
use crate::config::Config;
use crate::entity::Direction;
use crate::game::{Game, GameState};
use crate::grid::Viewport;
use crate::progress::Progress;
use crate::renderer::{Command, FrameInput, Input, Key};
use crate::scene::{SceneId, SceneTransition};
use crate::tracker::BoxedTracker;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// State of whichever scene is on screen. Leaving a scene drops it.
pub enum ActiveScene {
    Home(HomeMenu),
    Flashcards(Flashcards),
    Quiz(Quiz),
    Diary(Diary),
    Game(Game),
}

impl ActiveScene {
    pub fn id(&self) -> SceneId {
        match self {
            ActiveScene::Home(_) => SceneId::Home,
            ActiveScene::Flashcards(_) => SceneId::Flashcards,
            ActiveScene::Quiz(_) => SceneId::Quiz,
            ActiveScene::Diary(_) => SceneId::Diary,
            ActiveScene::Game(_) => SceneId::Game,
        }
    }
}

/// What a key press means in the scene it was pressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Intent {
    Command(Command),
    MoveSelection(i32, i32),
    Type(char),
    Newline,
    Backspace,
    Quit,
}

/// The whole learning app: scene routing plus the scene being shown.
pub struct App {
    config: Config,
    tracker: BoxedTracker,
    transition: SceneTransition,
    scene: ActiveScene,
    toast: Option<Toast>,
    viewport: Viewport,
    rng: StdRng,
    quit: bool,
}

impl App {
    pub fn new(config: Config, tracker: BoxedTracker, rng: StdRng, viewport: Viewport) -> Self {
        Self {
            config,
            tracker,
            transition: SceneTransition::new(SceneId::Home),
            scene: ActiveScene::Home(HomeMenu::default()),
            toast: None,
            viewport,
            rng,
            quit: false,
        }
    }

    pub fn scene(&self) -> &ActiveScene {
        &self.scene
    }

    pub fn transition(&self) -> &SceneTransition {
        &self.transition
    }

    pub fn progress(&self) -> &Progress {
        self.tracker.progress()
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Run one frame: resolve input, advance the active scene, then the fade.
    pub fn frame(&mut self, now: f64, input: &FrameInput, viewport: Viewport) {
        self.viewport = viewport;

        for event in &input.events {
            let intent = match *event {
                Input::Quit => Some(Intent::Quit),
                Input::Click(command) => Some(Intent::Command(command)),
                Input::Key(key) => self.key_intent(key),
            };
            if let Some(intent) = intent {
                self.apply(intent, now);
            }
        }

        match &mut self.scene {
            ActiveScene::Game(game) => {
                game.handle_input(&input.held);
                game.update(now, &mut self.tracker);
            }
            ActiveScene::Quiz(quiz) => {
                quiz.update(now, &mut self.rng);
            }
            _ => {}
        }

        if let Some(arrived) = self.transition.step(self.config.transition_step) {
            self.enter(arrived);
        }

        if self.toast.as_ref().is_some_and(|toast| !toast.is_visible(now)) {
            self.toast = None;
        }
    }

    fn key_intent(&self, key: Key) -> Option<Intent> {
        let navigate = |scene| Some(Intent::Command(Command::Navigate(scene)));
        let command = |command| Some(Intent::Command(command));

        match &self.scene {
            ActiveScene::Home(menu) => match key {
                Key::Arrow(dir) => {
                    let (dx, dy) = dir.delta();
                    Some(Intent::MoveSelection(dx, dy))
                }
                Key::Enter | Key::Char(' ') => navigate(menu.selected_item().scene),
                Key::Char(c @ '1'..='4') => navigate(MENU[c as usize - '1' as usize].scene),
                Key::Char('d' | 'D') => navigate(SceneId::Diary),
                Key::Escape | Key::Char('q' | 'Q') => Some(Intent::Quit),
                _ => None,
            },
            ActiveScene::Game(game) => match key {
                Key::Char('r' | 'R') if game.state == GameState::Crashed => command(Command::Restart),
                Key::Char('h' | 'H') | Key::Escape => navigate(SceneId::Home),
                _ => None,
            },
            ActiveScene::Flashcards(_) => match key {
                Key::Arrow(Direction::Left) => command(Command::PrevCard),
                Key::Arrow(Direction::Right) => command(Command::NextCard),
                Key::Enter | Key::Char('s' | 'S') => command(Command::Speak),
                Key::Char('h' | 'H') | Key::Escape => navigate(SceneId::Home),
                _ => None,
            },
            ActiveScene::Quiz(_) => match key {
                Key::Char(c @ '1'..='4') => command(Command::Answer(c as usize - '1' as usize)),
                Key::Char('h' | 'H') | Key::Escape => navigate(SceneId::Home),
                _ => None,
            },
            // everything printable is text here, so only Esc leaves
            ActiveScene::Diary(_) => match key {
                Key::Char(c) => Some(Intent::Type(c)),
                Key::Enter => Some(Intent::Newline),
                Key::Backspace => Some(Intent::Backspace),
                Key::Escape => navigate(SceneId::Home),
                Key::Arrow(_) => None,
            },
        }
    }

    fn apply(&mut self, intent: Intent, now: f64) {
        match (intent, &mut self.scene) {
            (Intent::Quit, _) => {
                log::info!("quit requested");
                self.quit = true;
            }
            (Intent::Command(Command::Navigate(to)), _) => self.transition.navigate(to),
            (Intent::MoveSelection(dx, dy), ActiveScene::Home(menu)) => menu.move_selection(dx, dy),
            (Intent::Command(Command::Restart), ActiveScene::Game(game)) => game.reset(self.viewport),
            (Intent::Command(Command::PrevCard), ActiveScene::Flashcards(cards)) => cards.prev(),
            (Intent::Command(Command::NextCard), ActiveScene::Flashcards(cards)) => cards.next(),
            (Intent::Command(Command::Speak), ActiveScene::Flashcards(cards)) => {
                self.tracker.review_flashcard(cards.card());
            }
            (Intent::Command(Command::Answer(option)), ActiveScene::Quiz(quiz)) => {
                if let Some(answer) = quiz.answer(option, now, self.config.quiz_advance_ms) {
                    log::debug!("quiz answer correct={} ({}/{})", answer.correct, answer.score, answer.total);
                    self.tracker.record_quiz(answer.score, answer.total);
                }
            }
            (Intent::Command(Command::SaveDiary), ActiveScene::Diary(diary)) => {
                let message = if self.tracker.save_diary(&diary.draft, Utc::now()) {
                    diary.clear();
                    "Diary saved!"
                } else {
                    "Write something first."
                };
                self.toast = Some(Toast::new(message, now, self.config.toast_ms));
            }
            (Intent::Type(c), ActiveScene::Diary(diary)) => diary.type_char(c),
            (Intent::Newline, ActiveScene::Diary(diary)) => diary.newline(),
            (Intent::Backspace, ActiveScene::Diary(diary)) => diary.backspace(),
            // a button from another scene, e.g. a click that raced a fade
            (intent, scene) => {
                log::trace!("ignoring {:?} in {}", intent, scene.id().title());
            }
        }
    }

    fn enter(&mut self, scene: SceneId) {
        self.scene = match scene {
            SceneId::Home => ActiveScene::Home(HomeMenu::default()),
            SceneId::Flashcards => ActiveScene::Flashcards(Flashcards::default()),
            SceneId::Quiz => ActiveScene::Quiz(Quiz::new(&mut self.rng)),
            SceneId::Diary => ActiveScene::Diary(Diary::default()),
            SceneId::Game => {
                let rng = StdRng::seed_from_u64(self.rng.gen());
                let mut game = Game::new(self.config.game, rng);
                game.reset(self.viewport);
                ActiveScene::Game(game)
            }
        };
        log::debug!("entered {}", scene.title());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Position;
    use crate::input::HeldKeys;
    use crate::progress::{MemoryStore, ProgressStore};
    use crate::speech::{Speaker, TranscriptSpeaker};
    use crate::tracker::ProgressTracker;

    const VIEWPORT: Viewport = Viewport {
        width: 312.0,
        height: 400.0,
    };

    fn app() -> App {
        let store: Box<dyn ProgressStore> = Box::new(MemoryStore::default());
        let speaker: Box<dyn Speaker> = Box::new(TranscriptSpeaker::default());
        App::new(
            Config::default(),
            ProgressTracker::new(store, speaker),
            StdRng::seed_from_u64(11),
            VIEWPORT,
        )
    }

    fn press(app: &mut App, now: f64, key: Key) {
        app.frame(now, &FrameInput::with_events([Input::Key(key)]), VIEWPORT);
    }

    /// Step idle frames until the fade finishes.
    fn settle(app: &mut App, mut now: f64) -> f64 {
        for _ in 0..100 {
            if !app.transition().is_active() {
                break;
            }
            now += 16.0;
            app.frame(now, &FrameInput::default(), VIEWPORT);
        }
        now
    }

    fn game(app: &mut App) -> &mut Game {
        match &mut app.scene {
            ActiveScene::Game(game) => game,
            _ => panic!("not in the game scene"),
        }
    }

    #[test]
    fn test_starts_on_home() {
        let app = app();
        assert_eq!(app.scene().id(), SceneId::Home);
        assert!(!app.transition().is_active());
    }

    #[test]
    fn test_entering_game_resets_session() {
        let mut app = app();
        press(&mut app, 0.0, Key::Enter);
        assert!(app.transition().is_active());
        // old scene stays until the fade completes
        assert_eq!(app.scene().id(), SceneId::Home);

        settle(&mut app, 0.0);
        assert_eq!(app.scene().id(), SceneId::Game);
        let game = game(&mut app);
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.grid.cols, 10);
        assert_eq!(game.grid.rows, 10);
        assert_eq!(game.snake.len(), 1);
    }

    #[test]
    fn test_eating_reaches_the_tracker() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('1'));
        let mut now = settle(&mut app, 0.0);

        {
            let game = game(&mut app);
            let head = game.snake.head().unwrap();
            game.food = Some(game.grid.wrap(head.moved(Direction::Right)));
            now = now.max(game.moved_at) + game.speed_ms;
        }
        app.frame(now, &FrameInput::default(), VIEWPORT);

        assert_eq!(game(&mut app).score, 1);
        assert_eq!(app.progress().total_cheese_eaten, 1);
        assert_eq!(app.progress().learned_words.len(), 1);
        assert_eq!(app.progress().best_game_score, 1);
    }

    #[test]
    fn test_held_arrow_steers() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('1'));
        let now = settle(&mut app, 0.0);
        let start = game(&mut app).snake.head().unwrap();
        game(&mut app).food = None;

        let tick_at = now + 1000.0;
        app.frame(tick_at, &FrameInput::holding(HeldKeys::only(Direction::Up)), VIEWPORT);

        assert_eq!(game(&mut app).snake.head(), Some(Position::new(start.x, start.y - 1)));
    }

    #[test]
    fn test_restart_only_after_crash() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('1'));
        settle(&mut app, 0.0);

        // before the first tick is due, so only the key press matters
        let now = 100.0;
        game(&mut app).score = 4;
        press(&mut app, now, Key::Char('r'));
        assert_eq!(game(&mut app).score, 4);

        game(&mut app).state = GameState::Crashed;
        press(&mut app, now, Key::Char('r'));
        let game = game(&mut app);
        assert_eq!(game.state, GameState::Running);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_leaving_game_discards_session() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('1'));
        let now = settle(&mut app, 0.0);
        press(&mut app, now, Key::Escape);
        settle(&mut app, now);
        assert_eq!(app.scene().id(), SceneId::Home);
    }

    #[test]
    fn test_quiz_answer_updates_best() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('3'));
        let now = settle(&mut app, 0.0);

        let right = match &app.scene {
            ActiveScene::Quiz(quiz) => (0..4).find(|&i| quiz.question.is_correct(i)).unwrap(),
            _ => panic!("not in the quiz scene"),
        };
        app.frame(now, &FrameInput::with_events([Input::Click(Command::Answer(right))]), VIEWPORT);

        assert_eq!(app.progress().quiz_best, 100);
    }

    #[test]
    fn test_diary_typing_and_saving() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('d'));
        let now = settle(&mut app, 0.0);

        let save = FrameInput::with_events([Input::Click(Command::SaveDiary)]);
        app.frame(now, &save, VIEWPORT);
        assert_eq!(app.toast().unwrap().message, "Write something first.");

        // 'q' and 'h' are text here, not shortcuts
        for c in "Ich habe Käse".chars() {
            press(&mut app, now, Key::Char(c));
        }
        press(&mut app, now, Key::Backspace);
        app.frame(now, &save, VIEWPORT);

        assert_eq!(app.toast().unwrap().message, "Diary saved!");
        assert_eq!(app.progress().diary_entries[0].text, "Ich habe Käs");
        assert!(!app.should_quit());

        // toast goes away on its own
        app.frame(now + 5000.0, &FrameInput::default(), VIEWPORT);
        assert!(app.toast().is_none());
    }

    #[test]
    fn test_flashcard_speak_counts_review() {
        let mut app = app();
        press(&mut app, 0.0, Key::Char('2'));
        let now = settle(&mut app, 0.0);

        press(&mut app, now, Key::Arrow(Direction::Right));
        press(&mut app, now, Key::Enter);

        assert_eq!(app.progress().flashcards_reviewed, 1);
        assert_eq!(app.progress().learned_words, vec!["Danke"]);
    }

    #[test]
    fn test_escape_on_home_quits() {
        let mut app = app();
        press(&mut app, 0.0, Key::Escape);
        assert!(app.should_quit());
    }

    #[test]
    fn test_stray_click_is_ignored() {
        let mut app = app();
        app.frame(0.0, &FrameInput::with_events([Input::Click(Command::Restart)]), VIEWPORT);
        assert_eq!(app.scene().id(), SceneId::Home);
        assert!(!app.transition().is_active());
    }
}
