//! Browser-side collaborators: localStorage, speech synthesis and the
//! performance clock.

use crate::clock::TimeSource;
use crate::error::{SpeechError, StorageError};
use crate::progress::{Progress, ProgressStore, STORAGE_KEY};
use crate::speech::{pick_german_voice, Speaker};
use gloo::storage::errors::StorageError as GlooStorageError;
use gloo::storage::{LocalStorage, Storage};
use wasm_bindgen::JsCast;
use web_sys::{Performance, SpeechSynthesis, SpeechSynthesisUtterance, SpeechSynthesisVoice};

/// Progress kept in `localStorage` under a single key.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl ProgressStore for LocalStorageStore {
    fn load(&self) -> Result<Option<Progress>, StorageError> {
        match LocalStorage::get(STORAGE_KEY) {
            Ok(progress) => Ok(Some(progress)),
            Err(GlooStorageError::KeyNotFound(_)) => Ok(None),
            Err(GlooStorageError::SerdeError(err)) => Err(StorageError::Json(err)),
            Err(err) => Err(StorageError::Unavailable(err.to_string())),
        }
    }

    fn save(&mut self, progress: &Progress) -> Result<(), StorageError> {
        LocalStorage::set(STORAGE_KEY, progress).map_err(|err| match err {
            GlooStorageError::SerdeError(err) => StorageError::Json(err),
            err => StorageError::Unavailable(err.to_string()),
        })
    }
}

/// German text-to-speech through `window.speechSynthesis`.
pub struct WebSpeaker {
    synth: Option<SpeechSynthesis>,
    voice: Option<SpeechSynthesisVoice>,
    rate: f32,
}

impl WebSpeaker {
    pub fn new() -> Self {
        let synth = web_sys::window().and_then(|window| window.speech_synthesis().ok());
        if synth.is_none() {
            log::warn!("speechSynthesis not available, words will not be read aloud");
        }
        Self {
            synth,
            voice: None,
            rate: 0.95,
        }
    }

    /// Voices load asynchronously, so this is retried until one is found.
    fn pick_voice(&mut self) {
        let Some(synth) = &self.synth else {
            return;
        };
        let voices: Vec<SpeechSynthesisVoice> = synth
            .get_voices()
            .iter()
            .filter_map(|voice| voice.dyn_into::<SpeechSynthesisVoice>().ok())
            .collect();
        let described: Vec<(String, String)> = voices
            .iter()
            .map(|voice| (voice.lang(), voice.name()))
            .collect();
        let picked = pick_german_voice(
            described
                .iter()
                .map(|(lang, name)| (lang.as_str(), name.as_str())),
        );
        if let Some(index) = picked {
            log::debug!("using voice {}", described[index].1);
            self.voice = voices.into_iter().nth(index);
        }
    }
}

impl Default for WebSpeaker {
    fn default() -> Self {
        Self::new()
    }
}

impl Speaker for WebSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if self.voice.is_none() {
            self.pick_voice();
        }
        let synth = self
            .synth
            .as_ref()
            .ok_or_else(|| SpeechError::Unavailable("no speechSynthesis".into()))?;

        let utterance = SpeechSynthesisUtterance::new_with_text(text)
            .map_err(|err| SpeechError::Rejected(format!("{:?}", err)))?;
        utterance.set_lang("de-DE");
        utterance.set_rate(self.rate);
        if let Some(voice) = &self.voice {
            utterance.set_voice(Some(voice));
        }
        // a new word cuts off the previous one
        synth.cancel();
        synth.speak(&utterance);
        Ok(())
    }
}

/// `performance.now()`, falling back to zero when the API is missing.
pub struct PerformanceClock {
    performance: Option<Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        Self {
            performance: web_sys::window().and_then(|window| window.performance()),
        }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.as_ref().map_or(0.0, |p| p.now())
    }
}
