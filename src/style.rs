//! House-style compliance validator.
//!
//! Each profile owns an ordered list of rules. A rule inspects the text and
//! reports a deduction with its issue and, for most rules, a suggestion.
//! Scores start at 100 and only go down.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::fact::check_limits;
use crate::lexicon::Lexicon;

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    base_score: i32,
    oxford_comma_penalty: i32,
    state_name_penalty: i32,
    small_digit_penalty: i32,
    subheading_penalty: i32,
    engagement_penalty: i32,
    social_max_chars: usize,
    social_length_penalty: i32,
    hashtag_penalty: i32,
    visual_break_penalty: i32,
    personal_tone_penalty: i32,
}

static HP: Hyperparameters = Hyperparameters {
    base_score: 100,
    oxford_comma_penalty: 5,
    state_name_penalty: 3,
    small_digit_penalty: 5,
    subheading_penalty: 10,
    engagement_penalty: 5,
    social_max_chars: 280,
    social_length_penalty: 20,
    hashtag_penalty: 10,
    visual_break_penalty: 5,
    personal_tone_penalty: 5,
};

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

// A serial list of three or more items with a comma before the conjunction.
static OXFORD_COMMA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\w+,\s+\w+(?:\s+\w+){0,2},\s+(?:and|or)\s+\w+").unwrap()
});

static SMALL_DIGIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[1-9]\b").unwrap());

// Slash dates, clock times and lone small digits, tried in that order so the
// digits inside a date or time are never spelled out.
static WIRE_REWRITE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b|\b(\d{1,2}):(\d{2})\s*((?i:am|pm))\b|\b([1-9])\b")
        .unwrap()
});

const AP_MONTHS: [&str; 12] = [
    "Jan.", "Feb.", "March", "April", "May", "June", "July", "Aug.", "Sept.", "Oct.", "Nov.",
    "Dec.",
];

const SMALL_NUMBERS: [&str; 9] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

static SUBHEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#{2,6}\s+").unwrap());

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\w+").unwrap());

static VISUAL_BREAK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)\u{1F4F0}|\u{1F4CB}|^\s*(?:---+|\*\*\*+|___+)\s*$").unwrap()
});

static SECOND_PERSON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:you|your)\b").unwrap());

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleProfile {
    Wire,
    Blog,
    Social,
    Newsletter,
}

impl StyleProfile {
    pub const ALL: [StyleProfile; 4] = [Self::Wire, Self::Blog, Self::Social, Self::Newsletter];

    /// Resolve a style token, accepting the legacy long names. `None` for
    /// anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "wire" | "news_wire" | "ap" => Some(Self::Wire),
            "blog" => Some(Self::Blog),
            "social" | "social_media" => Some(Self::Social),
            "newsletter" => Some(Self::Newsletter),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wire => "wire",
            Self::Blog => "blog",
            Self::Social => "social",
            Self::Newsletter => "newsletter",
        }
    }

    fn rules(self) -> &'static [Rule] {
        match self {
            Self::Wire => WIRE_RULES,
            Self::Blog => BLOG_RULES,
            Self::Social => SOCIAL_RULES,
            Self::Newsletter => NEWSLETTER_RULES,
        }
    }
}

impl fmt::Display for StyleProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Rule = fn(&str, &Lexicon) -> RuleOutput;

const WIRE_RULES: &[Rule] = &[rule_oxford_comma, rule_state_names, rule_small_digits];
const BLOG_RULES: &[Rule] = &[rule_subheadings, rule_engagement];
const SOCIAL_RULES: &[Rule] = &[rule_social_length, rule_hashtags];
const NEWSLETTER_RULES: &[Rule] = &[rule_visual_breaks, rule_personal_tone];

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleReport {
    /// The style token as requested.
    pub style: String,
    pub score: u8,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl StyleReport {
    fn clean(style: &str) -> Self {
        Self {
            style: style.to_string(),
            score: HP.base_score as u8,
            issues: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    fn failed(style: &str, message: String) -> Self {
        Self {
            style: style.to_string(),
            score: 0,
            issues: vec![message],
            suggestions: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Default)]
struct RuleOutput {
    penalty: i32,
    issues: Vec<String>,
    suggestions: Vec<String>,
}

impl RuleOutput {
    fn flag(&mut self, penalty: i32, issue: impl Into<String>) -> &mut Self {
        self.penalty += penalty;
        self.issues.push(issue.into());
        self
    }

    fn suggest(&mut self, suggestion: &str) {
        self.suggestions.push(suggestion.to_string());
    }
}

fn rule_oxford_comma(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if OXFORD_COMMA_RE.is_match(text) {
        out.flag(
            HP.oxford_comma_penalty,
            "Oxford comma usage detected (wire style omits the serial comma)",
        );
    }
    out
}

fn rule_state_names(text: &str, lexicon: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    for (name, abbr) in lexicon.abbreviable_states_in(text) {
        out.flag(
            HP.state_name_penalty,
            format!("Use abbreviated form for {name} ({abbr})"),
        );
    }
    out
}

fn rule_small_digits(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if SMALL_DIGIT_RE.is_match(text) {
        out.flag(HP.small_digit_penalty, "Spell out numbers one through nine");
    }
    out
}

fn rule_subheadings(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if !SUBHEADING_RE.is_match(text) {
        out.flag(HP.subheading_penalty, "Blog should include subheadings")
            .suggest("Add ## subheadings to break up content");
    }
    out
}

fn rule_engagement(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if !text.contains(['!', '?']) {
        out.flag(HP.engagement_penalty, "Blog could be more engaging")
            .suggest("Add questions or exclamations for engagement");
    }
    out
}

fn rule_social_length(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    let chars = text.chars().count();
    if chars > HP.social_max_chars {
        out.flag(
            HP.social_length_penalty,
            format!("Content too long for a social post ({chars} chars)"),
        )
        .suggest("Reduce content to fit the 280 character limit");
    }
    out
}

fn rule_hashtags(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if !HASHTAG_RE.is_match(text) {
        out.flag(HP.hashtag_penalty, "No hashtags found")
            .suggest("Add relevant hashtags for better reach");
    }
    out
}

fn rule_visual_breaks(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if !VISUAL_BREAK_RE.is_match(text) {
        out.flag(HP.visual_break_penalty, "Newsletter missing visual elements")
            .suggest("Add emojis and visual breaks");
    }
    out
}

fn rule_personal_tone(text: &str, _: &Lexicon) -> RuleOutput {
    let mut out = RuleOutput::default();
    if !SECOND_PERSON_RE.is_match(text) {
        out.flag(HP.personal_tone_penalty, "Newsletter could be more personal")
            .suggest("Use 'you' and 'your' for personal connection");
    }
    out
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StyleValidator {
    lexicon: Arc<Lexicon>,
    limits: Limits,
}

impl Default for StyleValidator {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

impl StyleValidator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Score `text` against the named profile. Unknown names pass through
    /// with a clean report.
    pub fn validate_style_compliance(&self, text: &str, style_name: &str) -> StyleReport {
        if let Err(err) = check_limits(&self.limits, text) {
            tracing::error!(style = style_name, error = %err, "style validation failed");
            return StyleReport::failed(style_name, format!("Validation error: {err}"));
        }

        let Some(profile) = StyleProfile::from_name(style_name) else {
            tracing::debug!(style = style_name, "unknown style, skipping rule checks");
            return StyleReport::clean(style_name);
        };

        let lexicon: &Lexicon = &self.lexicon;
        let mut report = StyleReport::clean(style_name);
        let mut score = HP.base_score;
        for rule in profile.rules() {
            let out = rule(text, lexicon);
            score -= out.penalty;
            report.issues.extend(out.issues);
            report.suggestions.extend(out.suggestions);
        }
        report.score = score.max(0) as u8;

        tracing::info!(
            style = %profile,
            score = report.score,
            issues = report.issues.len(),
            "style validation completed"
        );
        report
    }

    /// Rewrite `text` toward wire style: `3/5/2024` becomes `March 5, 2024`,
    /// `09:30 PM` becomes `9:30 pm`, lone digits 1-9 are spelled out, and
    /// state names with an abbreviation are shortened. Oversized input is
    /// returned unchanged.
    pub fn apply_wire_style(&self, text: &str) -> String {
        if let Err(err) = check_limits(&self.limits, text) {
            tracing::warn!(error = %err, "wire rewrite skipped");
            return text.to_string();
        }

        let mut out = WIRE_REWRITE_RE
            .replace_all(text, rewrite_wire_token)
            .into_owned();
        for (re, abbr) in self.lexicon.state_abbreviations() {
            out = re.replace_all(&out, NoExpand(abbr)).into_owned();
        }
        out
    }
}

fn rewrite_wire_token(caps: &Captures) -> String {
    let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<usize>().ok());

    if let (Some(month), Some(day), Some(year)) = (number(1), number(2), caps.get(3)) {
        if let Some(name) = month.checked_sub(1).and_then(|i| AP_MONTHS.get(i)) {
            return format!("{name} {day}, {}", year.as_str());
        }
    } else if let (Some(hour), Some(minute), Some(meridiem)) = (number(4), caps.get(5), caps.get(6)) {
        return format!("{hour}:{} {}", minute.as_str(), meridiem.as_str().to_lowercase());
    } else if let Some(word) = number(7).and_then(|n| SMALL_NUMBERS.get(n - 1)) {
        return word.to_string();
    }
    caps[0].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(text: &str, style: &str) -> StyleReport {
        StyleValidator::default().validate_style_compliance(text, style)
    }

    #[test]
    fn long_social_post_without_hashtag() {
        let text = "word ".repeat(60);
        assert_eq!(text.chars().count(), 300);
        let report = validate(&text, "social");
        assert_eq!(report.score, 70);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].starts_with("Content too long"));
        assert_eq!(report.issues[1], "No hashtags found");
        assert_eq!(
            report.suggestions,
            vec![
                "Reduce content to fit the 280 character limit".to_string(),
                "Add relevant hashtags for better reach".to_string(),
            ]
        );
    }

    #[test]
    fn short_tagged_post_is_clean() {
        let report = validate("Polls close at eight tonight. #Election", "social");
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn wire_rules_stack() {
        let text = "Officials in California, Florida and Texas said 3 roads, two bridges, and a tunnel closed.";
        let report = validate(text, "wire");
        // oxford -5, California -3, Florida -3, digit -5
        assert_eq!(report.score, 84);
        assert_eq!(report.issues.len(), 4);
        assert!(report.issues[1].contains("California"));
        assert!(!report.issues.iter().any(|i| i.contains("Texas")));
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn two_item_list_is_not_an_oxford_comma() {
        assert!(!OXFORD_COMMA_RE.is_match("He left early, and she stayed."));
        assert!(OXFORD_COMMA_RE.is_match("red, white, and blue"));
    }

    #[test]
    fn wire_rewrite_spells_digits_and_abbreviates_states() {
        let validator = StyleValidator::default();
        let text = "Officials in California said 3 roads closed on 3/5/2024 at 09:30 PM in Texas.";
        assert_eq!(
            validator.apply_wire_style(text),
            "Officials in Calif. said three roads closed on March 5, 2024 at 9:30 pm in Texas."
        );
    }

    #[test]
    fn wire_rewrite_clears_state_and_digit_issues() {
        let validator = StyleValidator::default();
        let text = "Crews from Florida fixed 4 bridges and 12 roads.";
        assert_eq!(validate(text, "wire").issues.len(), 2);
        let rewritten = validator.apply_wire_style(text);
        assert_eq!(rewritten, "Crews from Fla. fixed four bridges and 12 roads.");
        assert_eq!(validate(&rewritten, "wire").score, 100);
    }

    #[test]
    fn wire_rewrite_leaves_invalid_dates_alone() {
        let validator = StyleValidator::default();
        assert_eq!(validator.apply_wire_style("Filed 13/40/2024."), "Filed 13/40/2024.");
    }

    #[test]
    fn oversized_text_is_not_rewritten() {
        let validator = StyleValidator::default().with_limits(Limits {
            max_text_bytes: Some(4),
        });
        assert_eq!(validator.apply_wire_style("3 in California"), "3 in California");
    }

    #[test]
    fn digits_above_nine_are_fine() {
        assert_eq!(validate("The vote was 12 to 10.", "wire").score, 100);
    }

    #[test]
    fn blog_needs_headings_and_engagement() {
        let report = validate("Plain text with no headings.", "blog");
        assert_eq!(report.score, 85);
        assert_eq!(report.suggestions.len(), 2);

        let report = validate("## Intro\n\nWhy does this matter?", "blog");
        assert_eq!(report.score, 100);
    }

    #[test]
    fn single_hash_is_not_a_subheading() {
        let report = validate("# Title\n\nReally?", "blog");
        assert_eq!(report.score, 90);
    }

    #[test]
    fn newsletter_markers() {
        assert_eq!(validate("Weekly update.", "newsletter").score, 90);
        assert_eq!(validate("\u{1F4F0} Your weekly update.", "newsletter").score, 100);
        assert_eq!(validate("Intro\n\n---\n\nYou made it.", "newsletter").score, 100);
    }

    #[test]
    fn legacy_names_resolve() {
        assert_eq!(StyleProfile::from_name("news_wire"), Some(StyleProfile::Wire));
        assert_eq!(StyleProfile::from_name("AP"), Some(StyleProfile::Wire));
        assert_eq!(StyleProfile::from_name("social_media"), Some(StyleProfile::Social));
        assert_eq!(StyleProfile::from_name("press_release"), None);
    }

    #[test]
    fn unknown_style_passes_through() {
        let report = validate(&"x".repeat(500), "press_release");
        assert_eq!(report.style, "press_release");
        assert_eq!(report.score, 100);
        assert!(report.issues.is_empty() && report.suggestions.is_empty());
    }

    #[test]
    fn wire_deductions_cap_and_faults_zero_the_score() {
        let states = "California Florida New York Massachusetts Pennsylvania Illinois Michigan Arizona Colorado";
        let text = format!("{states} {states} a, b, and c 1");
        let report = validate(&text, "wire");
        // 5 + 9 * 3 + 5 = 37 is the most wire can deduct
        assert_eq!(report.score, 63);

        let limits = Limits {
            max_text_bytes: Some(4),
        };
        let report = StyleValidator::default()
            .with_limits(limits)
            .validate_style_compliance("too long", "social");
        assert_eq!(report.score, 0);
        assert_eq!(report.issues.len(), 1);
    }
}
