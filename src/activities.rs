//! The non-game scenes: menu, flashcards, quiz and diary.

use crate::scene::SceneId;
use crate::vocab::{random_word, VocabItem, WORDS};
use rand::seq::SliceRandom;
use rand::Rng;

/// Menu tiles in reading order (2x2).
pub const MENU: [MenuItem; 4] = [
    MenuItem {
        label: "Maus & Käse",
        description: "Arrow keys. Eat cheese. Learn words.",
        scene: SceneId::Game,
        hot: true,
    },
    MenuItem {
        label: "Flashcards",
        description: "A1 essentials with TTS.",
        scene: SceneId::Flashcards,
        hot: false,
    },
    MenuItem {
        label: "Quiz",
        description: "Quick checks to cement memory.",
        scene: SceneId::Quiz,
        hot: false,
    },
    MenuItem {
        label: "Diary",
        description: "Track feelings and notes.",
        scene: SceneId::Diary,
        hot: false,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub description: &'static str,
    pub scene: SceneId,
    /// Highlighted as the featured activity
    pub hot: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeMenu {
    pub selected: usize,
}

impl HomeMenu {
    /// Move the selection around the 2x2 grid.
    pub fn move_selection(&mut self, dx: i32, dy: i32) {
        let col = (self.selected % 2) as i32;
        let row = (self.selected / 2) as i32;
        let col = (col + dx).clamp(0, 1);
        let row = (row + dy).clamp(0, 1);
        self.selected = (row * 2 + col) as usize;
    }

    pub fn selected_item(&self) -> &'static MenuItem {
        &MENU[self.selected.min(MENU.len() - 1)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flashcards {
    pub index: usize,
}

impl Flashcards {
    pub fn card(&self) -> &'static VocabItem {
        &WORDS[self.index % WORDS.len()]
    }

    pub fn next(&mut self) {
        self.index = (self.index + 1) % WORDS.len();
    }

    pub fn prev(&mut self) {
        self.index = (self.index + WORDS.len() - 1) % WORDS.len();
    }
}

/// One quiz question with four shuffled translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub word: VocabItem,
    pub options: Vec<&'static str>,
    /// Option picked, once answered
    pub selected: Option<usize>,
}

impl Question {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let word = random_word(rng);
        let mut options = vec![word.translation];
        while options.len() < 4 {
            let other = random_word(rng).translation;
            if !options.contains(&other) {
                options.push(other);
            }
        }
        options.shuffle(rng);
        Self {
            word,
            options,
            selected: None,
        }
    }

    pub fn is_correct(&self, option: usize) -> bool {
        self.options.get(option) == Some(&self.word.translation)
    }
}

/// Outcome of answering a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    pub correct: bool,
    pub score: u32,
    pub total: u32,
}

/// Running quiz for one visit to the quiz scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub question: Question,
    pub score: u32,
    pub total: u32,
    /// When the next question replaces an answered one
    pub advance_at: Option<f64>,
}

impl Quiz {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            question: Question::random(rng),
            score: 0,
            total: 0,
            advance_at: None,
        }
    }

    /// Answer the current question. Ignored while waiting for the next one or
    /// for an option that does not exist.
    pub fn answer(&mut self, option: usize, now: f64, delay_ms: f64) -> Option<Answer> {
        if self.advance_at.is_some() || option >= self.question.options.len() {
            return None;
        }
        let correct = self.question.is_correct(option);
        self.question.selected = Some(option);
        self.total += 1;
        if correct {
            self.score += 1;
        }
        self.advance_at = Some(now + delay_ms);
        Some(Answer {
            correct,
            score: self.score,
            total: self.total,
        })
    }

    /// Swap in a new question once the delay has passed.
    pub fn update<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) -> bool {
        match self.advance_at {
            Some(at) if now >= at => {
                self.question = Question::random(rng);
                self.advance_at = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diary {
    pub draft: String,
}

impl Diary {
    pub fn type_char(&mut self, c: char) {
        if !c.is_control() {
            self.draft.push(c);
        }
    }

    pub fn newline(&mut self) {
        self.draft.push('\n');
    }

    pub fn backspace(&mut self) {
        self.draft.pop();
    }

    pub fn clear(&mut self) {
        self.draft.clear();
    }
}

/// Short message drawn on top of every scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub until: f64,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: f64, duration_ms: f64) -> Self {
        Self {
            message: message.into(),
            until: now + duration_ms,
        }
    }

    pub fn is_visible(&self, now: f64) -> bool {
        now <= self.until
    }
}
