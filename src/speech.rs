use crate::error::SpeechError;

/// Text-to-speech backend. German voice if the platform has one.
pub trait Speaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;
}

impl<T: Speaker + ?Sized> Speaker for Box<T> {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        (**self).speak(text)
    }
}

/// Speaker for platforms without speech; says nothing, only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeaker;

impl Speaker for SilentSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        log::debug!("(silent) {}", text);
        Ok(())
    }
}

/// Keeps every utterance; used to check what would have been read aloud.
#[derive(Debug, Default, Clone)]
pub struct TranscriptSpeaker {
    pub spoken: Vec<String>,
    /// When set, every call fails with this error instead
    pub fail_with: Option<SpeechError>,
}

impl Speaker for TranscriptSpeaker {
    fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        self.spoken.push(text.to_string());
        Ok(())
    }
}

/// Index of the voice to use for German: a de-DE voice named like "Evan" if
/// present, otherwise the first de-DE voice.
pub fn pick_german_voice<'a, I>(voices: I) -> Option<usize>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let german: Vec<(usize, &str)> = voices
        .into_iter()
        .enumerate()
        .filter(|(_, (lang, _))| lang.eq_ignore_ascii_case("de-de"))
        .map(|(i, (_, name))| (i, name))
        .collect();

    german
        .iter()
        .find(|(_, name)| name.to_lowercase().contains("evan"))
        .or_else(|| german.first())
        .map(|(i, _)| *i)
}
