use crate::vocab::VocabItem;

/// Receives the word behind every cheese the mouse eats.
///
/// Implementations are best-effort: whatever they do with the word (speech,
/// persistence) must not fail back into the game.
pub trait AnnouncementSink {
    fn announce(&mut self, item: &VocabItem);
}

/// Lifetime counters kept outside the play session.
pub trait CounterSink {
    fn increment_cheese_count(&mut self);
    fn record_score(&mut self, score: u32);
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AnnouncementSink for NullSink {
    fn announce(&mut self, _item: &VocabItem) {}
}

impl CounterSink for NullSink {
    fn increment_cheese_count(&mut self) {}
    fn record_score(&mut self, _score: u32) {}
}

/// Sink that remembers what it was told.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub announced: Vec<VocabItem>,
    pub cheese_count: u32,
    pub scores: Vec<u32>,
}

impl AnnouncementSink for RecordingSink {
    fn announce(&mut self, item: &VocabItem) {
        self.announced.push(*item);
    }
}

impl CounterSink for RecordingSink {
    fn increment_cheese_count(&mut self) {
        self.cheese_count += 1;
    }

    fn record_score(&mut self, score: u32) {
        self.scores.push(score);
    }
}
