/// One recognized word with its audio-relative timing in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptWord {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl TranscriptWord {
    pub fn new(word: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            word: word.into(),
            start_time,
            end_time,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// End time of the last word, or 0 for an empty transcript.
pub fn spoken_duration(words: &[TranscriptWord]) -> f64 {
    words.last().map(|w| w.end_time).unwrap_or(0.0)
}
