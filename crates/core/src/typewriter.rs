//! Character-by-character title reveal, driven by an injected clock.

use crate::settings::NavigationTiming;

/// Reveal state of one string started at a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    text: String,
    started_at: u64,
    delay_ms: u64,
    speed_ms: u64,
}

impl Typewriter {
    /// Start revealing `text` at `now` with the given timing.
    pub fn new(text: impl Into<String>, now: u64, timing: &NavigationTiming) -> Self {
        Self {
            text: text.into(),
            started_at: now,
            delay_ms: timing.typewriter_delay_ms,
            speed_ms: timing.typewriter_speed_ms.max(1),
        }
    }

    /// Full text being revealed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters shown at `now`.
    pub fn visible_chars(&self, now: u64) -> usize {
        let typing_start = self.started_at + self.delay_ms;
        if now < typing_start {
            return 0;
        }
        // The first character appears one interval after the delay.
        let typed = ((now - typing_start) / self.speed_ms) as usize;
        typed.min(self.text.chars().count())
    }

    /// Text shown at `now`.
    pub fn visible_text(&self, now: u64) -> &str {
        let count = self.visible_chars(now);
        match self.text.char_indices().nth(count) {
            Some((idx, _)) => &self.text[..idx],
            None => &self.text,
        }
    }

    /// Whether every character is shown at `now`.
    pub fn is_complete(&self, now: u64) -> bool {
        self.visible_chars(now) == self.text.chars().count()
    }

    /// Instant at which the reveal completes.
    pub fn completes_at(&self) -> u64 {
        self.started_at + self.delay_ms + self.speed_ms * self.text.chars().count() as u64
    }

    /// Whether the caret is drawn at `now`.
    pub fn show_caret(&self, now: u64) -> bool {
        !self.is_complete(now)
    }
}
