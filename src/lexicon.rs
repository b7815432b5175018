//! Lexicon / pattern store.
//!
//! Word lists are plain data ([`LexiconTables`]) so they can be overridden from
//! TOML; [`Lexicon`] is the compiled, read-only form every analyzer shares.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Match, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::LexiconError;

// ---------------------------------------------------------------------------
// Raw tables
// ---------------------------------------------------------------------------

/// A U.S. state as written out in copy, with its AP abbreviation if it has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconTables {
    pub strongly_positive: Vec<String>,
    pub strongly_negative: Vec<String>,
    pub loaded_language: Vec<String>,
    pub opinion_markers: Vec<String>,
    /// Emotional-intensity words. Terms already listed under a polarity
    /// category are skipped at compile time so they are only charged once.
    pub emotional_words: Vec<String>,
    pub unsubstantiated_phrases: Vec<String>,
    /// Regular expressions, not literal phrases.
    pub attribution_patterns: Vec<String>,
    pub vague_sources: Vec<String>,
    pub high_credibility_domains: Vec<String>,
    pub medium_credibility_domains: Vec<String>,
    pub verification_phrases: Vec<String>,
    pub neutral_alternatives: BTreeMap<String, String>,
    pub informal_words: Vec<String>,
    pub transition_words: Vec<String>,
    pub states: Vec<StateEntry>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for LexiconTables {
    fn default() -> Self {
        Self {
            strongly_positive: owned(&[
                "amazing",
                "incredible",
                "fantastic",
                "outstanding",
                "revolutionary",
                "groundbreaking",
                "miraculous",
            ]),
            strongly_negative: owned(&[
                "terrible",
                "awful",
                "disaster",
                "catastrophic",
                "devastating",
                "horrific",
                "appalling",
            ]),
            loaded_language: owned(&[
                "obviously",
                "clearly",
                "undoubtedly",
                "everyone knows",
                "it's clear that",
                "without question",
            ]),
            opinion_markers: owned(&[
                "i think",
                "i believe",
                "in my opinion",
                "personally",
                "it seems",
                "appears to be",
                "might be",
                "could be",
            ]),
            emotional_words: owned(&[
                "shocking",
                "stunning",
                "incredible",
                "unbelievable",
                "amazing",
                "devastating",
                "tragic",
                "wonderful",
            ]),
            unsubstantiated_phrases: owned(&[
                "everyone knows",
                "it's obvious",
                "clearly",
                "without a doubt",
            ]),
            attribution_patterns: owned(&[
                r"according to \w+",
                r"sources? (?:say|claim|report)",
                r"officials? (?:said|stated|confirmed)",
                r"spokesman? (?:said|told|announced)",
                r"in a statement",
                r"told reporters",
                r"during (?:a|an) (?:interview|press conference)",
            ]),
            vague_sources: owned(&["sources", "officials", "people"]),
            high_credibility_domains: owned(&[
                "reuters.com",
                "ap.org",
                "bbc.com",
                "npr.org",
                "pbs.org",
                "cbc.ca",
                "abc.net.au",
            ]),
            medium_credibility_domains: owned(&[
                "cnn.com",
                "foxnews.com",
                "nbc.com",
                "cbs.com",
                "abcnews.go.com",
                "washingtonpost.com",
                "nytimes.com",
            ]),
            verification_phrases: owned(&[
                "verified",
                "confirmed",
                "corroborated",
                "independently verified",
                "fact-checked",
            ]),
            neutral_alternatives: [
                ("amazing", "notable"),
                ("incredible", "significant"),
                ("terrible", "concerning"),
                ("devastating", "substantial"),
                ("obviously", "reportedly"),
                ("clearly", "according to sources"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            informal_words: owned(&[
                "gonna", "wanna", "gotta", "kinda", "sorta", "yeah", "okay", "ok", "wow", "hey",
            ]),
            transition_words: owned(&[
                "however",
                "furthermore",
                "additionally",
                "meanwhile",
                "consequently",
                "therefore",
                "moreover",
                "nevertheless",
                "in addition",
                "on the other hand",
                "as a result",
            ]),
            states: [
                ("California", Some("Calif.")),
                ("Florida", Some("Fla.")),
                ("New York", Some("N.Y.")),
                ("Massachusetts", Some("Mass.")),
                ("Pennsylvania", Some("Pa.")),
                ("Illinois", Some("Ill.")),
                ("Michigan", Some("Mich.")),
                ("Arizona", Some("Ariz.")),
                ("Colorado", Some("Colo.")),
                ("Texas", None),
            ]
            .into_iter()
            .map(|(name, abbr)| StateEntry {
                name: name.to_string(),
                abbreviation: abbr.map(str::to_string),
            })
            .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Compiled forms
// ---------------------------------------------------------------------------

/// A literal word list compiled into one case-insensitive, word-bounded
/// alternation. Longer phrases are tried first.
#[derive(Debug, Clone)]
pub struct TermList {
    pattern: Option<Regex>,
}

impl TermList {
    fn compile(list: &'static str, terms: &[String]) -> Result<Self, LexiconError> {
        let mut terms: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Self { pattern: None });
        }
        terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        terms.dedup();
        let alt = terms
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = RegexBuilder::new(&format!(r"\b(?:{alt})\b"))
            .case_insensitive(true)
            .build()
            .map_err(|source| LexiconError::InvalidPattern { list, source })?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Match<'t>> + 't {
        self.pattern.iter().flat_map(move |re| re.find_iter(text))
    }

    pub fn count(&self, text: &str) -> usize {
        self.find_iter(text).count()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|re| re.is_match(text))
    }
}

/// A list of independent regular expressions; matches are counted per pattern.
#[derive(Debug, Clone)]
pub struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    fn compile(list: &'static str, sources: &[String]) -> Result<Self, LexiconError> {
        let patterns = sources
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                RegexBuilder::new(s)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| LexiconError::InvalidPattern { list, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = Match<'t>> + 't {
        self.patterns.iter().flat_map(move |re| re.find_iter(text))
    }

    pub fn count(&self, text: &str) -> usize {
        self.find_iter(text).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasKind {
    StronglyPositive,
    StronglyNegative,
    LoadedLanguage,
}

impl BiasKind {
    pub const ALL: [BiasKind; 3] = [
        BiasKind::StronglyPositive,
        BiasKind::StronglyNegative,
        BiasKind::LoadedLanguage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BiasKind::StronglyPositive => "strongly_positive",
            BiasKind::StronglyNegative => "strongly_negative",
            BiasKind::LoadedLanguage => "loaded_language",
        }
    }

    pub fn is_strong_polarity(self) -> bool {
        matches!(self, BiasKind::StronglyPositive | BiasKind::StronglyNegative)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainTier {
    High,
    Medium,
}

/// Compiled, immutable lexicon. Build once, share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Lexicon {
    strongly_positive: TermList,
    strongly_negative: TermList,
    loaded_language: TermList,
    pub(crate) opinion_markers: TermList,
    pub(crate) emotional_words: TermList,
    pub(crate) unsubstantiated: TermList,
    pub(crate) attribution: PatternList,
    pub(crate) vague_sources: TermList,
    pub(crate) verification: TermList,
    pub(crate) informal: TermList,
    pub(crate) transitions: TermList,
    high_domains: Vec<String>,
    medium_domains: Vec<String>,
    alternatives: BTreeMap<String, String>,
    states: Vec<(Regex, StateEntry)>,
}

impl Lexicon {
    pub fn from_tables(tables: &LexiconTables) -> Result<Self, LexiconError> {
        let polarity: Vec<String> = tables
            .strongly_positive
            .iter()
            .chain(&tables.strongly_negative)
            .map(|w| w.to_lowercase())
            .collect();
        let emotional: Vec<String> = tables
            .emotional_words
            .iter()
            .filter(|w| !polarity.contains(&w.to_lowercase()))
            .cloned()
            .collect();

        let states = tables
            .states
            .iter()
            .map(|entry| {
                Regex::new(&format!(r"\b{}\b", regex::escape(&entry.name)))
                    .map(|re| (re, entry.clone()))
                    .map_err(|source| LexiconError::InvalidPattern {
                        list: "states",
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            strongly_positive: TermList::compile("strongly_positive", &tables.strongly_positive)?,
            strongly_negative: TermList::compile("strongly_negative", &tables.strongly_negative)?,
            loaded_language: TermList::compile("loaded_language", &tables.loaded_language)?,
            opinion_markers: TermList::compile("opinion_markers", &tables.opinion_markers)?,
            emotional_words: TermList::compile("emotional_words", &emotional)?,
            unsubstantiated: TermList::compile(
                "unsubstantiated_phrases",
                &tables.unsubstantiated_phrases,
            )?,
            attribution: PatternList::compile("attribution_patterns", &tables.attribution_patterns)?,
            vague_sources: TermList::compile("vague_sources", &tables.vague_sources)?,
            verification: TermList::compile("verification_phrases", &tables.verification_phrases)?,
            informal: TermList::compile("informal_words", &tables.informal_words)?,
            transitions: TermList::compile("transition_words", &tables.transition_words)?,
            high_domains: lowercase_all(&tables.high_credibility_domains),
            medium_domains: lowercase_all(&tables.medium_credibility_domains),
            alternatives: tables
                .neutral_alternatives
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.clone()))
                .collect(),
            states,
        })
    }

    pub fn bias_terms(&self, kind: BiasKind) -> &TermList {
        match kind {
            BiasKind::StronglyPositive => &self.strongly_positive,
            BiasKind::StronglyNegative => &self.strongly_negative,
            BiasKind::LoadedLanguage => &self.loaded_language,
        }
    }

    /// Neutral replacement for a biased term, if the synonym table has one.
    pub fn neutral_alternative(&self, term: &str) -> Option<&str> {
        self.alternatives
            .get(&term.to_lowercase())
            .map(String::as_str)
    }

    /// Classify a bare domain (`www.` already stripped) against the
    /// credible-source lists. A listed domain matches itself and its subdomains.
    pub fn domain_tier(&self, domain: &str) -> Option<DomainTier> {
        let domain = domain.to_lowercase();
        let listed = |d: &String| domain == *d || domain.ends_with(&format!(".{d}"));
        if self.high_domains.iter().any(listed) {
            Some(DomainTier::High)
        } else if self.medium_domains.iter().any(listed) {
            Some(DomainTier::Medium)
        } else {
            None
        }
    }

    /// States written out in full that AP style abbreviates.
    pub(crate) fn abbreviable_states_in<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.states.iter().filter_map(move |(re, entry)| {
            let abbr = entry.abbreviation.as_deref()?;
            re.is_match(text).then_some((entry.name.as_str(), abbr))
        })
    }

    /// Full-name state patterns paired with their AP abbreviation.
    pub(crate) fn state_abbreviations(&self) -> impl Iterator<Item = (&Regex, &str)> + '_ {
        self.states
            .iter()
            .filter_map(|(re, entry)| Some((re, entry.abbreviation.as_deref()?)))
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        // The built-in tables are escaped literals plus fixed attribution
        // patterns; compiling them cannot fail.
        DEFAULT_LEXICON.clone()
    }
}

fn lowercase_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.trim().to_lowercase()).collect()
}

static DEFAULT_LEXICON: Lazy<Lexicon> = Lazy::new(|| {
    Lexicon::from_tables(&LexiconTables::default()).unwrap()
});

// ---------------------------------------------------------------------------
// Fixed structural patterns
// ---------------------------------------------------------------------------

/// Five-W detectors used to grade a lead, in who/what/when/where/why order.
pub(crate) static LEAD_ELEMENTS: Lazy<[(&'static str, Regex); 5]> = Lazy::new(|| {
    [
        (
            "who",
            Regex::new(r"(?i)\b(?:said|announced|stated|reported|confirmed)\b").unwrap(),
        ),
        (
            "what",
            Regex::new(r"(?i)\b(?:happened|occurred|took place|resulted)\b").unwrap(),
        ),
        (
            "when",
            Regex::new(r"(?i)\b(?:today|yesterday|this week|on \w+day|\d{1,2}/\d{1,2})\b").unwrap(),
        ),
        // The place name must be capitalized, so "in private" or "at noon"
        // is not a location. Only the preposition ignores case.
        (
            "where",
            Regex::new(r"\b(?i:in|at|from)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").unwrap(),
        ),
        (
            "why",
            Regex::new(r"(?i)\b(?:because|due to|as a result|following)\b").unwrap(),
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_lists_are_case_insensitive_and_word_bounded() {
        let lex = Lexicon::default();
        let positive = lex.bias_terms(BiasKind::StronglyPositive);
        assert_eq!(positive.count("Amazing, truly AMAZING."), 2);
        assert_eq!(positive.count("amazingly fast"), 0);
    }

    #[test]
    fn emotional_words_skip_polarity_terms() {
        let lex = Lexicon::default();
        assert_eq!(lex.emotional_words.count("an amazing and incredible day"), 0);
        assert_eq!(lex.emotional_words.count("a shocking, tragic day"), 2);
    }

    #[test]
    fn longer_phrase_wins_in_alternation() {
        let lex = Lexicon::default();
        let hits: Vec<_> = lex
            .verification
            .find_iter("The figures were independently verified.")
            .map(|m| m.as_str().to_string())
            .collect();
        assert_eq!(hits, vec!["independently verified".to_string()]);
    }

    #[test]
    fn domain_tier_matches_subdomains_only() {
        let lex = Lexicon::default();
        assert_eq!(lex.domain_tier("reuters.com"), Some(DomainTier::High));
        assert_eq!(lex.domain_tier("uk.reuters.com"), Some(DomainTier::High));
        assert_eq!(lex.domain_tier("nytimes.com"), Some(DomainTier::Medium));
        assert_eq!(lex.domain_tier("cheap.org"), None);
    }

    #[test]
    fn empty_list_never_matches() {
        let tables = LexiconTables {
            informal_words: vec![],
            ..LexiconTables::default()
        };
        let lex = Lexicon::from_tables(&tables).unwrap();
        assert_eq!(lex.informal.count("yeah okay wow"), 0);
    }

    #[test]
    fn bad_attribution_pattern_is_reported() {
        let tables = LexiconTables {
            attribution_patterns: vec!["according to (".to_string()],
            ..LexiconTables::default()
        };
        let err = Lexicon::from_tables(&tables).unwrap_err();
        assert!(matches!(
            err,
            LexiconError::InvalidPattern {
                list: "attribution_patterns",
                ..
            }
        ));
    }

    #[test]
    fn texas_is_never_reported_for_abbreviation() {
        let lex = Lexicon::default();
        let found: Vec<_> = lex
            .abbreviable_states_in("From Texas to California.")
            .collect();
        assert_eq!(found, vec![("California", "Calif.")]);
    }

    #[test]
    fn lead_elements_detect_where() {
        let (_, where_re) = &LEAD_ELEMENTS[3];
        assert!(where_re.is_match("The council met in Springfield."));
        assert!(!where_re.is_match("the council met in private."));
        assert!(!where_re.is_match("They spoke at noon."));
    }

    #[test]
    fn attribution_matches_report_their_spans() {
        let lex = Lexicon::default();
        let text = "Officials said the road is closed.";
        let spans: Vec<_> = lex.attribution.find_iter(text).map(|m| m.range()).collect();
        assert_eq!(spans, vec![0..14]);
    }
}
