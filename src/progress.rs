use crate::error::StorageError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Key the browser build stores the record under.
pub const STORAGE_KEY: &str = "skyDeutschProgress";

pub const MAX_DIARY_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    #[serde(rename = "dateISO")]
    pub date: DateTime<Utc>,
    pub text: String,
}

/// Everything remembered between visits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Progress {
    pub name: String,
    pub streak_days: u32,
    pub last_visit: Option<DateTime<Utc>>,
    pub total_cheese_eaten: u32,
    pub flashcards_reviewed: u32,
    /// Best quiz accuracy in percent
    pub quiz_best: u32,
    /// Newest first
    pub diary_entries: Vec<DiaryEntry>,
    pub learned_words: Vec<String>,
    pub best_game_score: u32,
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            name: "SKY".to_string(),
            streak_days: 0,
            last_visit: None,
            total_cheese_eaten: 0,
            flashcards_reviewed: 0,
            quiz_best: 0,
            diary_entries: Vec::new(),
            learned_words: Vec::new(),
            best_game_score: 0,
        }
    }
}

impl Progress {
    /// Count consecutive days of use and stamp this visit.
    ///
    /// Days are compared in the time zone of `now`.
    pub fn update_streak<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        let today = now.date_naive();
        match self.last_visit {
            None => self.streak_days = 1,
            Some(last) => {
                let last_day = last.with_timezone(&now.timezone()).date_naive();
                match (today - last_day).num_days() {
                    1 => self.streak_days += 1,
                    d if d > 1 => self.streak_days = 1,
                    // same day, or the clock went backwards
                    _ => {}
                }
            }
        }
        self.last_visit = Some(now.with_timezone(&Utc));
    }

    /// Returns true if the word was new.
    pub fn learn_word(&mut self, word: &str) -> bool {
        if self.learned_words.iter().any(|w| w == word) {
            return false;
        }
        self.learned_words.push(word.to_string());
        true
    }

    pub fn record_quiz(&mut self, score: u32, total: u32) {
        if total == 0 {
            return;
        }
        let percent = (f64::from(score) / f64::from(total) * 100.0).round() as u32;
        self.quiz_best = self.quiz_best.max(percent);
    }

    /// Adds a diary entry unless `text` is blank. Returns whether it was kept.
    pub fn add_diary_entry(&mut self, text: &str, date: DateTime<Utc>) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.diary_entries.insert(
            0,
            DiaryEntry {
                date,
                text: text.to_string(),
            },
        );
        self.diary_entries.truncate(MAX_DIARY_ENTRIES);
        true
    }
}

/// Where progress lives between runs.
pub trait ProgressStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Progress>, StorageError>;
    fn save(&mut self, progress: &Progress) -> Result<(), StorageError>;
}

impl<T: ProgressStore + ?Sized> ProgressStore for Box<T> {
    fn load(&self) -> Result<Option<Progress>, StorageError> {
        (**self).load()
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StorageError> {
        (**self).save(progress)
    }
}

/// Loads the stored record, falling back to a fresh one if it is missing or
/// unreadable.
pub fn load_or_default(store: &dyn ProgressStore) -> Progress {
    match store.load() {
        Ok(Some(progress)) => progress,
        Ok(None) => Progress::default(),
        Err(err) => {
            log::warn!("could not load progress, starting fresh: {}", err);
            Progress::default()
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub saved: Option<String>,
    pub saves: usize,
}

impl ProgressStore for MemoryStore {
    fn load(&self) -> Result<Option<Progress>, StorageError> {
        self.saved
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(StorageError::from)
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StorageError> {
        self.saved = Some(serde_json::to_string(progress)?);
        self.saves += 1;
        Ok(())
    }
}

/// JSON file on disk, used by the terminal build.
#[cfg(not(target_arch = "wasm32"))]
pub struct JsonFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl ProgressStore for JsonFileStore {
    fn load(&self) -> Result<Option<Progress>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(progress)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}
