use crate::announce::{AnnouncementSink, CounterSink};
use crate::progress::{load_or_default, Progress, ProgressStore};
use crate::speech::Speaker;
use crate::vocab::VocabItem;
use chrono::{DateTime, TimeZone, Utc};

/// Owns the learner's progress and the speech/storage backends behind it.
///
/// Every backend failure stops here: it is logged and dropped so the
/// activities keep working without audio or persistence.
pub struct ProgressTracker<St, Sp> {
    progress: Progress,
    store: St,
    speaker: Sp,
}

pub type BoxedTracker = ProgressTracker<Box<dyn ProgressStore>, Box<dyn Speaker>>;

impl<St: ProgressStore, Sp: Speaker> ProgressTracker<St, Sp> {
    pub fn new(store: St, speaker: Sp) -> Self {
        let progress = load_or_default(&store);
        Self {
            progress,
            store,
            speaker,
        }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn speaker(&self) -> &Sp {
        &self.speaker
    }

    /// Stamp today's visit and update the streak.
    pub fn start_visit<Tz: TimeZone>(&mut self, now: DateTime<Tz>) {
        self.progress.update_streak(now);
        log::info!(
            "welcome back {}, streak is {} day(s)",
            self.progress.name,
            self.progress.streak_days
        );
        self.persist();
    }

    pub fn review_flashcard(&mut self, item: &VocabItem) {
        self.speak(item.native);
        self.progress.learn_word(item.native);
        self.progress.flashcards_reviewed += 1;
        self.persist();
    }

    pub fn record_quiz(&mut self, score: u32, total: u32) {
        self.progress.record_quiz(score, total);
        self.persist();
    }

    /// Returns false when the draft was blank and nothing was stored.
    pub fn save_diary(&mut self, text: &str, date: DateTime<Utc>) -> bool {
        if !self.progress.add_diary_entry(text, date) {
            return false;
        }
        self.persist();
        true
    }

    fn speak(&mut self, text: &str) {
        if let Err(err) = self.speaker.speak(text) {
            log::warn!("could not speak {:?}: {}", text, err);
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.progress) {
            log::warn!("could not save progress: {}", err);
        }
    }
}

impl<St: ProgressStore, Sp: Speaker> AnnouncementSink for ProgressTracker<St, Sp> {
    fn announce(&mut self, item: &VocabItem) {
        if self.progress.learn_word(item.native) {
            log::debug!("learned {:?}", item.native);
        }
        self.persist();
        self.speak(&item.spoken());
    }
}

impl<St: ProgressStore, Sp: Speaker> CounterSink for ProgressTracker<St, Sp> {
    fn increment_cheese_count(&mut self) {
        self.progress.total_cheese_eaten += 1;
        self.persist();
    }

    fn record_score(&mut self, score: u32) {
        if score > self.progress.best_game_score {
            self.progress.best_game_score = score;
            self.persist();
        }
    }
}
