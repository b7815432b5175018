//! Fact and objectivity checker.
//!
//! Scores source attribution, neutrality, consistency with supplied facts and
//! source credibility, then extracts checkable claims and flags biased spans.
//! Credibility is judged from static domain lists only.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::{BiasKind, DomainTier, Lexicon};
use crate::report::{
    CategoryScore, Claim, ClaimKind, FlaggedItem, ScoreReport, Severity, WeightTable,
};
use crate::text::{
    self, char_offset, ensure_finite, incorporation_rate, per_hundred_words, FULL_DATE_RE,
    QUOTE_RE,
};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    attribution_low_ratio: f64,
    attribution_low_penalty: i32,
    attribution_mid_ratio: f64,
    attribution_mid_penalty: i32,
    vague_share: f64,
    vague_penalty: i32,
    strong_polarity_penalty: i32,
    loaded_language_penalty: i32,
    opinion_marker_penalty: i32,
    emotional_word_penalty: i32,
    no_facts_default: u8,
    fact_overlap_threshold: f64,
    consistency_bands: [(f64, i32); 3],
    high_tier_points: u32,
    medium_tier_points: u32,
    institutional_points: u32,
    credible_low_ratio: f64,
    credible_low_penalty: i32,
    credible_mid_ratio: f64,
    credible_mid_penalty: i32,
    verification_bonus: i32,
    verification_bonus_cap: i32,
    recommendation_threshold: u8,
    flag_review_min: usize,
    major_revision_below: u8,
}

static HP: Hyperparameters = Hyperparameters {
    attribution_low_ratio: 0.5,
    attribution_low_penalty: 30,
    attribution_mid_ratio: 1.0,
    attribution_mid_penalty: 15,
    vague_share: 0.7,
    vague_penalty: 20,
    strong_polarity_penalty: 15,
    loaded_language_penalty: 10,
    opinion_marker_penalty: 5,
    emotional_word_penalty: 3,
    no_facts_default: 85,
    fact_overlap_threshold: 0.6,
    consistency_bands: [(0.5, 40), (0.7, 20), (0.9, 10)],
    high_tier_points: 2,
    medium_tier_points: 1,
    institutional_points: 2,
    credible_low_ratio: 0.3,
    credible_low_penalty: 30,
    credible_mid_ratio: 0.6,
    credible_mid_penalty: 15,
    verification_bonus: 5,
    verification_bonus_cap: 20,
    recommendation_threshold: 70,
    flag_review_min: 5,
    major_revision_below: 60,
};

pub const SOURCE_ATTRIBUTION: &str = "source_attribution";
pub const OBJECTIVITY: &str = "objectivity";
pub const FACT_CONSISTENCY: &str = "fact_consistency";
pub const CREDIBILITY: &str = "credibility";

pub const WEIGHTS: WeightTable = WeightTable(&[
    (SOURCE_ATTRIBUTION, 0.25),
    (OBJECTIVITY, 0.30),
    (FACT_CONSISTENCY, 0.25),
    (CREDIBILITY, 0.20),
]);

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://(?:[-\w.])+(?:\.[a-zA-Z]{2,})+(?:/[^,\s]*)?").unwrap()
});

static DOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://(?:www\.)?([^/\s:?#]+)").unwrap());

static STATISTIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d+(?:\.\d+)?%|\b\d+(?:,\d{3})*(?:\.\d+)?\s*(?:million|billion|thousand)")
        .unwrap()
});

static ATTRIBUTED_CLAIM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)according to [^,.]+,\s*([^.]+)").unwrap());

const FALLBACK_NEUTRAL: &str = "use more neutral language";
const FALLBACK_EVIDENCE: &str = "Provide evidence or attribution for this claim";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactReport {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub claims: Vec<Claim>,
    pub issues: Vec<String>,
}

impl FactReport {
    fn new() -> Self {
        Self {
            report: ScoreReport::new(),
            claims: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn overall_score(&self) -> u8 {
        self.report.overall_score
    }

    pub fn source_attribution(&self) -> u8 {
        self.report.category(SOURCE_ATTRIBUTION)
    }

    pub fn objectivity(&self) -> u8 {
        self.report.category(OBJECTIVITY)
    }

    pub fn fact_consistency(&self) -> u8 {
        self.report.category(FACT_CONSISTENCY)
    }

    pub fn credibility(&self) -> u8 {
        self.report.category(CREDIBILITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Unknown,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReliability {
    pub reliability: Reliability,
    pub score: u8,
    pub category: String,
}

impl SourceReliability {
    fn new(reliability: Reliability, score: u8, category: &str) -> Self {
        Self {
            reliability,
            score,
            category: category.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Stateless apart from the shared lexicon; one instance can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct FactChecker {
    lexicon: Arc<Lexicon>,
    limits: Limits,
}

impl Default for FactChecker {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

impl FactChecker {
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

    /// Score `text` against the objectivity rubric. Never fails: faults are
    /// recorded in `issues` and the affected category is zeroed, everything
    /// else computed so far is kept.
    pub fn verify_facts(&self, text: &str, source_facts: &[String]) -> FactReport {
        let mut out = FactReport::new();

        if let Err(err) = check_limits(&self.limits, text) {
            tracing::error!(error = %err, "fact verification rejected input");
            for name in WEIGHTS.categories() {
                out.report
                    .set_category(name, CategoryScore::failed(&err.to_string()));
            }
            out.issues.push(format!("Verification error: {err}"));
            out.report
                .recommendations
                .push("Fix verification error and retry the check".to_string());
            return out;
        }

        let categories: [(&str, AnalysisResult<CategoryScore>); 4] = [
            (SOURCE_ATTRIBUTION, self.source_attribution(text)),
            (OBJECTIVITY, self.objectivity(text)),
            (FACT_CONSISTENCY, fact_consistency(text, source_facts)),
            (CREDIBILITY, self.credibility(text)),
        ];
        for (name, result) in categories {
            let category = match result {
                Ok(c) => c,
                Err(err) => {
                    tracing::warn!(category = name, error = %err, "category check failed");
                    out.issues.push(format!("Verification error: {err}"));
                    CategoryScore::failed(&err.to_string())
                }
            };
            tracing::debug!(category = name, score = category.score, "fact category scored");
            out.report.set_category(name, category);
        }

        out.claims = extract_claims(text);
        out.report.flagged_items = self.flag_bias(text);
        out.report.overall_score = WEIGHTS.overall(&out.report.category_scores);
        out.report.recommendations = recommendations(&out.report);

        tracing::info!(
            overall_score = out.report.overall_score,
            flagged = out.report.flagged_items.len(),
            claims = out.claims.len(),
            "fact check completed"
        );
        out
    }

    fn source_attribution(&self, text: &str) -> AnalysisResult<CategoryScore> {
        let words = text::word_count(text);
        if words == 0 {
            return Ok(CategoryScore::new(0).with_detail("note", "No words to evaluate"));
        }
        let spans: Vec<_> = self
            .lexicon
            .attribution
            .find_iter(text)
            .map(|m| m.range())
            .collect();
        let found = spans.len();
        let ratio = ensure_finite("attribution_ratio", per_hundred_words(found, words))?;

        let mut score: i32 = 100;
        if ratio < HP.attribution_low_ratio {
            score -= HP.attribution_low_penalty;
        } else if ratio < HP.attribution_mid_ratio {
            score -= HP.attribution_mid_penalty;
        }

        // "officials said" is an attribution, not a bare vague source
        let vague = self
            .lexicon
            .vague_sources
            .find_iter(text)
            .filter(|m| {
                !spans
                    .iter()
                    .any(|span| span.start <= m.start() && m.end() <= span.end)
            })
            .count();
        if vague as f64 > found as f64 * HP.vague_share {
            score -= HP.vague_penalty;
        }

        Ok(CategoryScore::new(score.max(0) as u8)
            .with_detail("attributions", found)
            .with_detail("vague_mentions", vague)
            .with_detail("attributions_per_100_words", round2(ratio)))
    }

    fn objectivity(&self, text: &str) -> AnalysisResult<CategoryScore> {
        let mut score: i32 = 100;
        let mut category = CategoryScore::new(0);

        for kind in BiasKind::ALL {
            let hits = self.lexicon.bias_terms(kind).count(text);
            let per_hit = if kind.is_strong_polarity() {
                HP.strong_polarity_penalty
            } else {
                HP.loaded_language_penalty
            };
            score -= hits as i32 * per_hit;
            category = category.with_detail(kind.as_str(), hits);
        }

        let opinions = self.lexicon.opinion_markers.count(text);
        score -= opinions as i32 * HP.opinion_marker_penalty;

        let emotional = self.lexicon.emotional_words.count(text);
        score -= emotional as i32 * HP.emotional_word_penalty;

        category.score = score.max(0) as u8;
        Ok(category
            .with_detail("opinion_markers", opinions)
            .with_detail("emotional_words", emotional))
    }

    fn credibility(&self, text: &str) -> AnalysisResult<CategoryScore> {
        let urls: Vec<&str> = URL_RE.find_iter(text).map(|m| m.as_str()).collect();

        let mut points = 0u32;
        for url in &urls {
            let Some(domain) = url_domain(url) else {
                continue;
            };
            points += match self.lexicon.domain_tier(&domain) {
                Some(DomainTier::High) => HP.high_tier_points,
                Some(DomainTier::Medium) => HP.medium_tier_points,
                None if domain.ends_with(".edu") || domain.ends_with(".gov") => {
                    HP.institutional_points
                }
                None => 0,
            };
        }

        let mut score: i32 = 100;
        let mut ratio = 0.0;
        if !urls.is_empty() {
            ratio = ensure_finite("credible_fraction", points as f64 / urls.len() as f64)?;
            if ratio < HP.credible_low_ratio {
                score -= HP.credible_low_penalty;
            } else if ratio < HP.credible_mid_ratio {
                score -= HP.credible_mid_penalty;
            }
        }

        let verifications = self.lexicon.verification.count(text);
        score += (verifications as i32 * HP.verification_bonus).min(HP.verification_bonus_cap);

        Ok(CategoryScore::new(score.clamp(0, 100) as u8)
            .with_detail("urls", urls.len())
            .with_detail("credible_fraction", round2(ratio))
            .with_detail("verification_phrases", verifications))
    }

    fn flag_bias(&self, text: &str) -> Vec<FlaggedItem> {
        let mut flagged = Vec::new();

        for kind in BiasKind::ALL {
            let severity = if kind.is_strong_polarity() {
                Severity::High
            } else {
                Severity::Medium
            };
            for m in self.lexicon.bias_terms(kind).find_iter(text) {
                let suggestion = self
                    .lexicon
                    .neutral_alternative(m.as_str())
                    .unwrap_or(FALLBACK_NEUTRAL);
                flagged.push(FlaggedItem {
                    kind: "bias_indicator".to_string(),
                    subtype: Some(kind.as_str().to_string()),
                    content: m.as_str().to_string(),
                    position: char_offset(text, m.start()),
                    severity,
                    suggestion: Some(suggestion.to_string()),
                });
            }
        }

        for m in self.lexicon.unsubstantiated.find_iter(text) {
            let suggestion = self
                .lexicon
                .neutral_alternative(m.as_str())
                .unwrap_or(FALLBACK_EVIDENCE);
            flagged.push(FlaggedItem {
                kind: "unsubstantiated_claim".to_string(),
                subtype: None,
                content: m.as_str().to_string(),
                position: char_offset(text, m.start()),
                severity: Severity::Medium,
                suggestion: Some(suggestion.to_string()),
            });
        }

        flagged.sort_by_key(|f| f.position);
        flagged
    }

    /// Rate a single source URL from the static domain lists.
    pub fn check_source_reliability(&self, source_url: &str) -> SourceReliability {
        if source_url.trim().is_empty() {
            return SourceReliability::new(Reliability::Unknown, 50, "unverified");
        }
        let Some(domain) = url_domain(source_url.trim()) else {
            return SourceReliability::new(Reliability::Invalid, 0, "invalid_url");
        };
        match self.lexicon.domain_tier(&domain) {
            Some(DomainTier::High) => {
                SourceReliability::new(Reliability::High, 90, "major_news_outlet")
            }
            Some(DomainTier::Medium) => {
                SourceReliability::new(Reliability::Medium, 70, "established_media")
            }
            None if domain.ends_with(".edu") => {
                SourceReliability::new(Reliability::High, 85, "academic")
            }
            None if domain.ends_with(".gov") => {
                SourceReliability::new(Reliability::High, 95, "government")
            }
            None if domain.ends_with(".org") => {
                SourceReliability::new(Reliability::Medium, 60, "organization")
            }
            None => SourceReliability::new(Reliability::Unknown, 40, "unverified_source"),
        }
    }
}

// ---------------------------------------------------------------------------
// Free-standing checks
// ---------------------------------------------------------------------------

pub(crate) fn check_limits(limits: &Limits, text: &str) -> AnalysisResult<()> {
    match limits.max_text_bytes {
        Some(max) if text.len() > max => Err(AnalysisError::InputTooLarge {
            len: text.len(),
            max,
        }),
        _ => Ok(()),
    }
}

fn url_domain(url: &str) -> Option<String> {
    DOMAIN_RE
        .captures(url)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_lowercase())
}

fn fact_consistency(text: &str, source_facts: &[String]) -> AnalysisResult<CategoryScore> {
    let Some(rate) = incorporation_rate(text, source_facts, HP.fact_overlap_threshold) else {
        return Ok(CategoryScore::new(HP.no_facts_default).with_detail("facts_checked", 0));
    };
    let rate = ensure_finite("incorporation_rate", rate)?;

    let penalty = HP
        .consistency_bands
        .iter()
        .find(|(below, _)| rate < *below)
        .map_or(0, |(_, penalty)| *penalty);

    Ok(CategoryScore::new((100 - penalty).max(0) as u8)
        .with_detail("facts_checked", source_facts.len())
        .with_detail("incorporation_rate", round2(rate)))
}

/// Pull out statistics, full dates, quotes and "according to X, ..." clauses.
pub fn extract_claims(text: &str) -> Vec<Claim> {
    let mut claims = Vec::new();
    claims.extend(
        STATISTIC_RE
            .find_iter(text)
            .map(|m| Claim::new(ClaimKind::Statistic, m.as_str())),
    );
    claims.extend(
        FULL_DATE_RE
            .find_iter(text)
            .map(|m| Claim::new(ClaimKind::Date, m.as_str())),
    );
    claims.extend(
        QUOTE_RE
            .find_iter(text)
            .map(|m| Claim::new(ClaimKind::Quote, m.as_str())),
    );
    claims.extend(
        ATTRIBUTED_CLAIM_RE
            .captures_iter(text)
            .filter_map(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(|s| Claim::new(ClaimKind::AttributedClaim, s)),
    );
    claims
}

fn recommendations(report: &ScoreReport) -> Vec<String> {
    let tips = [
        (
            SOURCE_ATTRIBUTION,
            "Add more specific source attributions. Use names, titles, and organizations when possible.",
        ),
        (
            OBJECTIVITY,
            "Remove emotional language and opinion markers. Stick to factual reporting.",
        ),
        (
            FACT_CONSISTENCY,
            "Ensure all provided facts are incorporated accurately in the article.",
        ),
        (
            CREDIBILITY,
            "Include more references to credible sources and verification statements.",
        ),
    ];

    let mut out: Vec<String> = tips
        .iter()
        .filter(|(name, _)| report.category(name) < HP.recommendation_threshold)
        .map(|(_, tip)| tip.to_string())
        .collect();

    if report.flagged_items.len() > HP.flag_review_min {
        out.push(
            "Review flagged content for potential bias and replace with neutral language."
                .to_string(),
        );
    }
    if report.overall_score < HP.major_revision_below {
        out.push(
            "Consider major revision focusing on objectivity and source verification.".to_string(),
        );
    }
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> FactChecker {
        FactChecker::default()
    }

    fn facts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn three_attributions_in_250_words_keep_full_attribution_score() {
        let mut words: Vec<&str> = Vec::new();
        for _ in 0..3 {
            words.extend(["according", "to", "Smith"]);
        }
        words.extend(std::iter::repeat("word").take(241));
        let text = words.join(" ");
        assert_eq!(text::word_count(&text), 250);

        let report = checker().verify_facts(&text, &[]);
        assert_eq!(report.source_attribution(), 100);
    }

    fn padded(phrase: &str, times: usize, total_words: usize) -> String {
        let mut text = format!("{phrase} ").repeat(times);
        let used = text::word_count(&text);
        text.push_str(&vec!["word"; total_words - used].join(" "));
        text
    }

    #[test]
    fn vague_words_inside_attributions_are_not_bare() {
        for phrase in ["officials said", "sources say"] {
            let text = padded(phrase, 3, 250);
            assert_eq!(text::word_count(&text), 250);
            let report = checker().verify_facts(&text, &[]);
            assert_eq!(report.source_attribution(), 100, "{phrase} x3");
            let details = &report.report.category_scores[SOURCE_ATTRIBUTION].details;
            assert_eq!(details["vague_mentions"], 0);
        }
    }

    #[test]
    fn mid_density_attribution_costs_fifteen() {
        // 2 per 250 words -> 0.8 per hundred
        let text = padded("according to Smith", 2, 250);
        let report = checker().verify_facts(&text, &[]);
        assert_eq!(report.source_attribution(), 85);
    }

    #[test]
    fn empty_text_scores_zero_attribution() {
        for text in ["", "  \n\t "] {
            let report = checker().verify_facts(text, &[]);
            assert_eq!(report.source_attribution(), 0, "{:?}", text);
            assert!(report.issues.is_empty());
        }
    }

    #[test]
    fn sparse_attribution_is_penalized() {
        let text = "The council approved the budget after a long debate on Tuesday night.";
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.source_attribution(), 70);
    }

    #[test]
    fn vague_sources_cost_twenty_more() {
        let text = "Sources say people are worried and officials are quiet.";
        // one attribution ("Sources say"), two bare vague mentions
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.source_attribution(), 80);
    }

    #[test]
    fn amazing_twice_costs_thirty() {
        let text = "The amazing parade drew an amazing crowd downtown.";
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.objectivity(), 70);
    }

    #[test]
    fn opinion_and_emotion_deductions_stack() {
        let text = "I think the shocking result was tragic.";
        // opinion -5, two emotional words -6
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.objectivity(), 89);
    }

    #[test]
    fn no_facts_defaults_to_85() {
        let report = checker().verify_facts("Anything at all.", &[]);
        assert_eq!(report.fact_consistency(), 85);
    }

    #[test]
    fn two_of_five_facts_scores_60() {
        let text = "The mayor resigned Monday. The budget passed.";
        let source = facts(&[
            "The mayor resigned",
            "The budget passed",
            "Zebras escaped zoo",
            "Rain flooded streets",
            "Prices fell sharply",
        ]);
        let report = checker().verify_facts(text, &source);
        assert_eq!(report.fact_consistency(), 60);
    }

    #[test]
    fn consistency_bands_below_seventy_and_ninety() {
        let source = facts(&[
            "The mayor resigned",
            "The budget passed",
            "Zebras escaped zoo",
            "Rain flooded streets",
            "Prices fell sharply",
        ]);
        let three = "The mayor resigned. The budget passed. Zebras escaped the zoo.";
        assert_eq!(checker().verify_facts(three, &source).fact_consistency(), 80);
        let four = "The mayor resigned. The budget passed. Zebras escaped the zoo. \
                    Rain flooded streets.";
        assert_eq!(checker().verify_facts(four, &source).fact_consistency(), 90);
    }

    #[test]
    fn all_facts_incorporated_scores_100() {
        let text = "The mayor resigned Monday and the budget passed.";
        let source = facts(&["mayor resigned", "budget passed"]);
        let report = checker().verify_facts(text, &source);
        assert_eq!(report.fact_consistency(), 100);
    }

    #[test]
    fn credible_urls_keep_full_credibility() {
        let text = "Details at https://www.reuters.com/world/story and https://data.census.gov/x.";
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.credibility(), 100);
    }

    #[test]
    fn unknown_urls_lose_thirty_but_verification_adds_back() {
        let text = "See https://myblog.example.com/post. The numbers were verified and confirmed.";
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.credibility(), 80);
    }

    #[test]
    fn half_credible_links_cost_fifteen() {
        // one high-tier link (2 points) over four links -> 0.5
        let text = "Links: https://www.reuters.com/a https://one.example.com/a \
                    https://two.example.com/b https://three.example.com/c done";
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.credibility(), 85);
    }

    #[test]
    fn verification_bonus_is_capped() {
        let text = "See https://myblog.example.com/post for more. \
                    It was verified, confirmed, corroborated, verified and confirmed.";
        // -30 for the unknown link, five phrases worth 25 capped at 20
        let report = checker().verify_facts(text, &[]);
        assert_eq!(report.credibility(), 90);
    }

    #[test]
    fn low_overall_adds_major_revision_tip() {
        let mut report = ScoreReport::new();
        for name in WEIGHTS.categories() {
            report.set_category(name, CategoryScore::new(50));
        }
        report.overall_score = WEIGHTS.overall(&report.category_scores);
        let tips = recommendations(&report);
        assert_eq!(tips.len(), 5);
        assert!(tips[4].starts_with("Consider major revision"));

        for name in WEIGHTS.categories() {
            report.set_category(name, CategoryScore::new(60));
        }
        report.overall_score = WEIGHTS.overall(&report.category_scores);
        assert!(!recommendations(&report)
            .iter()
            .any(|t| t.starts_with("Consider major revision")));
    }

    #[test]
    fn extracts_each_claim_kind() {
        let text = "Unemployment fell to 4.2% on March 3, 2024. \
                    \"We are pleased,\" the minister said. \
                    According to the ministry, hiring rose in every region.";
        let claims = extract_claims(text);
        let kinds: Vec<ClaimKind> = claims.iter().map(|c| c.kind).collect();
        assert!(kinds.contains(&ClaimKind::Statistic));
        assert!(kinds.contains(&ClaimKind::Date));
        assert!(kinds.contains(&ClaimKind::Quote));
        assert!(kinds.contains(&ClaimKind::AttributedClaim));

        let attributed = claims
            .iter()
            .find(|c| c.kind == ClaimKind::AttributedClaim)
            .unwrap();
        assert_eq!(attributed.content, "hiring rose in every region");
        let quote = claims.iter().find(|c| c.kind == ClaimKind::Quote).unwrap();
        assert!(!quote.verifiable);
    }

    #[test]
    fn large_numbers_with_magnitude_are_statistics() {
        let claims = extract_claims("The city spent 2,500 million on roads.");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].content, "2,500 million");
    }

    #[test]
    fn bias_flags_carry_severity_and_suggestion() {
        let text = "It was a terrible storm, and clearly the city was unprepared.";
        let report = checker().verify_facts(text, &[]);
        let items = &report.report.flagged_items;

        let terrible = items.iter().find(|f| f.content == "terrible").unwrap();
        assert_eq!(terrible.severity, Severity::High);
        assert_eq!(terrible.position, 9);
        assert_eq!(terrible.suggestion.as_deref(), Some("concerning"));

        let clearly: Vec<_> = items.iter().filter(|f| f.content == "clearly").collect();
        assert_eq!(clearly.len(), 2, "flagged as loaded language and unsubstantiated");
        assert!(clearly.iter().all(|f| f.severity == Severity::Medium));
    }

    #[test]
    fn unmapped_bias_term_falls_back_to_generic_suggestion() {
        let report = checker().verify_facts("An awful outcome.", &[]);
        let awful = &report.report.flagged_items[0];
        assert_eq!(awful.suggestion.as_deref(), Some(FALLBACK_NEUTRAL));
    }

    #[test]
    fn many_flags_trigger_review_tip() {
        let text = "Amazing! Incredible! Fantastic! Terrible! Awful! Horrific!";
        let report = checker().verify_facts(text, &[]);
        assert!(report.report.flagged_items.len() > 5);
        assert!(report
            .report
            .recommendations
            .iter()
            .any(|r| r.starts_with("Review flagged content")));
    }

    #[test]
    fn overall_is_weighted_sum() {
        let report = checker().verify_facts("The amazing parade drew an amazing crowd.", &[]);
        let expected = (f64::from(report.source_attribution()) * 0.25
            + f64::from(report.objectivity()) * 0.30
            + f64::from(report.fact_consistency()) * 0.25
            + f64::from(report.credibility()) * 0.20)
            .round() as u8;
        assert_eq!(report.overall_score(), expected);
    }

    #[test]
    fn oversized_input_yields_failed_report() {
        let limited = checker().with_limits(Limits {
            max_text_bytes: Some(10),
        });
        let report = limited.verify_facts("This text is longer than ten bytes.", &[]);
        assert_eq!(report.overall_score(), 0);
        assert!(report.report.is_failure());
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].starts_with("Verification error"));
    }

    #[test]
    fn source_reliability_table() {
        let c = checker();
        assert_eq!(c.check_source_reliability("").score, 50);
        assert_eq!(
            c.check_source_reliability("not a url").reliability,
            Reliability::Invalid
        );
        assert_eq!(c.check_source_reliability("https://www.bbc.com/news").score, 90);
        assert_eq!(c.check_source_reliability("https://cnn.com/x").score, 70);
        assert_eq!(c.check_source_reliability("https://mit.edu").category, "academic");
        assert_eq!(c.check_source_reliability("https://cdc.gov").score, 95);
        assert_eq!(c.check_source_reliability("https://wikipedia.org").score, 60);
        assert_eq!(c.check_source_reliability("http://example.com").score, 40);
    }
}
