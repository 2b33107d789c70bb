// SPDX-License-Identifier: MIT
//
// Text statistics — the counts shown live on the character/word counter
// tool page as the visitor types.

use serde::{Deserialize, Serialize};

/// Reading speed assumed for the estimated reading time, in words per minute.
const READING_WPM: usize = 200;

/// Statistics for one piece of text.
///
/// The rules are deterministic and locale-independent: words split on
/// Unicode whitespace, sentences end at runs of `.`, `!`, or `?`, and
/// paragraphs are separated by blank lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextStats {
    /// Unicode scalar values, whitespace included.
    pub characters: usize,
    /// Unicode scalar values, whitespace excluded.
    pub characters_no_whitespace: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub lines: usize,
    /// Estimated reading time in whole minutes, rounded up.
    pub reading_time_minutes: usize,
}

impl TextStats {
    /// Analyze a piece of text. Empty input yields all-zero stats.
    pub fn analyze(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }

        let characters = text.chars().count();
        let characters_no_whitespace =
            text.chars().filter(|c| !c.is_whitespace()).count();
        let words = text.split_whitespace().count();

        Self {
            characters,
            characters_no_whitespace,
            words,
            sentences: count_sentences(text),
            paragraphs: count_paragraphs(text),
            lines: text.lines().count(),
            reading_time_minutes: words.div_ceil(READING_WPM),
        }
    }
}

/// Count sentence terminators, treating a run like "?!" or "..." as one.
fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut in_run = false;
    for c in text.chars() {
        let terminator = matches!(c, '.' | '!' | '?');
        if terminator && !in_run {
            count += 1;
        }
        in_run = terminator;
    }
    count
}

/// Count paragraphs: blocks of non-blank lines separated by blank lines.
fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if !blank && !in_paragraph {
            count += 1;
        }
        in_paragraph = !blank;
    }
    count
}
