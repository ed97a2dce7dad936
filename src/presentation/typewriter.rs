//! Character-by-character text reveal

use crate::sequence::SequenceStatus;

/// Progressive disclosure of one line of text
///
/// The first character shows as soon as the reveal starts and one more
/// follows every `interval` seconds. Counting is done in `char`s, so
/// multi-byte text is never split inside a character.
#[derive(Debug, Clone, PartialEq)]
pub struct Typewriter {
    full_text: String,
    total_chars: usize,
    revealed: usize,
    elapsed: f32,
    interval: f32,
}

impl Typewriter {
    pub fn new(text: impl Into<String>, interval: f32) -> Self {
        let full_text = text.into();
        let total_chars = full_text.chars().count();
        let mut typewriter = Self {
            full_text,
            total_chars,
            revealed: 0,
            elapsed: 0.0,
            interval,
        };
        typewriter.reveal_due();
        typewriter
    }

    /// Advance the reveal by `dt` seconds
    pub fn step(&mut self, dt: f32) -> SequenceStatus {
        if !self.is_complete() {
            self.elapsed += dt.max(0.0);
            self.reveal_due();
        }
        self.status()
    }

    /// Reveal everything immediately
    pub fn skip(&mut self) {
        self.revealed = self.total_chars;
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total_chars
    }

    pub fn status(&self) -> SequenceStatus {
        if self.is_complete() {
            SequenceStatus::Done
        } else {
            SequenceStatus::Continuing
        }
    }

    /// Number of characters currently shown
    pub fn revealed_chars(&self) -> usize {
        self.revealed
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The currently visible prefix of the text
    pub fn visible_text(&self) -> &str {
        self.full_text
            .char_indices()
            .nth(self.revealed)
            .map(|(end, _)| &self.full_text[..end])
            .unwrap_or(&self.full_text)
    }

    fn reveal_due(&mut self) {
        let ratio = self.elapsed / self.interval;
        // ratio may be huge or NaN for tiny intervals and long ticks
        let past_end = ratio.is_nan() || ratio >= self.total_chars as f32;
        self.revealed = if self.interval <= 0.0 || past_end {
            self.total_chars
        } else {
            (1 + ratio as usize).min(self.total_chars)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reveals_one_char_per_interval() {
        let mut typewriter = Typewriter::new("abc", 0.1);
        assert_eq!(typewriter.visible_text(), "a");

        assert_eq!(typewriter.step(0.05), SequenceStatus::Continuing);
        assert_eq!(typewriter.visible_text(), "a");

        typewriter.step(0.06);
        assert_eq!(typewriter.visible_text(), "ab");

        assert_eq!(typewriter.step(0.1), SequenceStatus::Done);
        assert_eq!(typewriter.visible_text(), "abc");
    }

    #[test]
    fn large_tick_reveals_several_chars() {
        let mut typewriter = Typewriter::new("abcdef", 0.1);
        typewriter.step(0.35);
        assert_eq!(typewriter.visible_text(), "abcd");
    }

    #[test]
    fn skip_yields_exact_full_text() {
        for text in ["", "Hi", "こんにちは世界", "émoji 🎉 mix"] {
            let mut typewriter = Typewriter::new(text, 0.05);
            typewriter.step(0.05);
            typewriter.skip();
            assert_eq!(typewriter.visible_text(), text);
            assert!(typewriter.is_complete());

            typewriter.skip();
            typewriter.step(1.0);
            assert_eq!(typewriter.visible_text(), text);
        }
    }

    #[test]
    fn multibyte_prefix_respects_char_boundaries() {
        let mut typewriter = Typewriter::new("日本語", 0.1);
        typewriter.step(0.1);
        assert_eq!(typewriter.visible_text(), "日本");
        assert_eq!(typewriter.revealed_chars(), 2);
    }

    #[test]
    fn empty_text_is_complete_immediately() {
        let typewriter = Typewriter::new("", 0.1);
        assert!(typewriter.is_complete());
        assert_eq!(typewriter.visible_text(), "");
    }

    #[test]
    fn tiny_interval_or_huge_tick_completes_without_overflow() {
        let mut typewriter = Typewriter::new("Hello", 1e-30);
        assert_eq!(typewriter.step(0.016), SequenceStatus::Done);
        assert_eq!(typewriter.visible_text(), "Hello");

        let mut typewriter = Typewriter::new("Hello", 0.05);
        assert_eq!(typewriter.step(1e30), SequenceStatus::Done);
        assert_eq!(typewriter.visible_text(), "Hello");

        let mut typewriter = Typewriter::new("Hello", 0.05);
        assert_eq!(typewriter.step(f32::INFINITY), SequenceStatus::Done);
        assert_eq!(typewriter.revealed_chars(), 5);
    }

    #[test]
    fn zero_interval_reveals_everything() {
        let typewriter = Typewriter::new("fast", 0.0);
        assert_eq!(typewriter.visible_text(), "fast");
        assert_eq!(typewriter.status(), SequenceStatus::Done);
    }
}
