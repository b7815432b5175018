//! Tokenizing and counting helpers shared by the analyzers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AnalysisError, AnalysisResult};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w+\b").unwrap());

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.!?]["'\u{201D}\u{2019})\]]*(?:\s|$)"#).unwrap());

static PARAGRAPH_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*\n").unwrap());

pub(crate) static QUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*"|\u{201C}[^\u{201D}]*\u{201D}"#).unwrap());

pub(crate) static NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\b").unwrap());

pub(crate) static FULL_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)",
        r"\s+\d{1,2},?\s+\d{4}\b",
    ))
    .unwrap()
});

// ---------------------------------------------------------------------------
// Splitting
// ---------------------------------------------------------------------------

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercased `\w+` tokens, punctuation dropped.
pub fn words(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

pub fn word_set(text: &str) -> HashSet<String> {
    words(text).into_iter().collect()
}

pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Blank-line separated blocks.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Character (not byte) offset of a byte index into `text`.
pub fn char_offset(text: &str, byte_idx: usize) -> usize {
    text.get(..byte_idx)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| text.chars().count())
}

/// Share of `facts` with at least `threshold` of their distinct words present
/// in `text`. Blank facts are ignored; `None` when nothing is left to check.
pub fn incorporation_rate(text: &str, facts: &[String], threshold: f64) -> Option<f64> {
    let text_words = word_set(text);
    let mut total = 0usize;
    let mut incorporated = 0usize;
    for fact in facts {
        let fact_words = word_set(fact);
        if fact_words.is_empty() {
            continue;
        }
        total += 1;
        let overlap = fact_words.intersection(&text_words).count();
        if overlap as f64 >= fact_words.len() as f64 * threshold {
            incorporated += 1;
        }
    }
    (total > 0).then(|| incorporated as f64 / total as f64)
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

pub fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<usize>() as f64 / values.len() as f64
}

/// Population standard deviation.
pub fn std_dev(values: &[usize]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values
        .iter()
        .map(|&v| (v as f64 - m).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}

/// `count` per 100 words; zero words yields zero.
pub fn per_hundred_words(count: usize, words: usize) -> f64 {
    if words == 0 {
        0.0
    } else {
        count as f64 / (words as f64 / 100.0)
    }
}

pub fn ensure_finite(metric: &'static str, value: f64) -> AnalysisResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::NonFiniteMetric(metric))
    }
}

/// Round to the nearest integer and clamp into the 0..=100 score range.
pub fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

// ---------------------------------------------------------------------------
// Readability
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readability {
    /// Flesch-Kincaid grade level.
    pub grade: f64,
    /// Flesch reading ease.
    pub ease: f64,
}

/// Vowel-group syllable estimate. Never less than one for a non-empty word.
pub fn syllables(word: &str) -> usize {
    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if letters.is_empty() {
        return 0;
    }
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0usize;
    let mut prev_vowel = false;
    for &c in &letters {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }
    let n = letters.len();
    // silent trailing e, but keep "-le" endings like "table"
    if n > 2 && letters[n - 1] == 'e' && letters[n - 2] != 'l' && !is_vowel(letters[n - 2]) {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

/// `None` for text without words.
pub fn readability(text: &str) -> Option<Readability> {
    let tokens: Vec<&str> = WORD_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|w| w.chars().any(|c| c.is_alphabetic()))
        .collect();
    if tokens.is_empty() {
        return None;
    }
    let sentence_count = sentences(text).len().max(1) as f64;
    let word_total = tokens.len() as f64;
    let syllable_total: usize = tokens.iter().map(|w| syllables(w)).sum();
    let words_per_sentence = word_total / sentence_count;
    let syllables_per_word = syllable_total as f64 / word_total;
    Some(Readability {
        grade: 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59,
        ease: 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word,
    })
}
