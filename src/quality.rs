//! Article quality evaluator.
//!
//! Four weighted categories: writing quality, accuracy, structure and variety.
//! Each category is a blend of banded sub-scores; every band edge and weight
//! lives in [`HP`].

use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Limits;
use crate::error::AnalysisResult;
use crate::fact::{check_limits, FactReport};
use crate::lexicon::{Lexicon, LEAD_ELEMENTS};
use crate::report::{CategoryScore, ScoreReport, WeightTable};
use crate::text::{
    self, clamp_score, ensure_finite, incorporation_rate, mean, per_hundred_words, std_dev,
    FULL_DATE_RE, NUMBER_RE, QUOTE_RE,
};

// ---------------------------------------------------------------------------
// Hyperparameters
// ---------------------------------------------------------------------------

struct Hyperparameters {
    readability_weight: f64,
    sentence_weight: f64,
    grammar_weight: f64,
    tone_weight: f64,
    sentence_ideal: (f64, f64),
    sentence_near: (f64, f64),
    sentence_variety_min_std: f64,
    sentence_variety_bonus: u8,
    passive_ratio_max: f64,
    passive_penalty: i32,
    lowercase_start_penalty: i32,
    run_on_words: usize,
    run_on_share: f64,
    run_on_penalty: i32,
    informal_penalty: i32,
    first_person_max: usize,
    first_person_penalty: i32,
    contraction_penalty: i32,
    fact_report_weights: (f64, f64, f64),
    basic_accuracy_base: i32,
    basic_detail_points: i32,
    basic_detail_cap: i32,
    accuracy_blend: (f64, f64),
    no_facts_incorporation: u8,
    fact_overlap_threshold: f64,
    structure_weights: (f64, f64, f64, f64),
    lead_element_weight: f64,
    lead_length_weight: f64,
    pyramid_ideal: (f64, f64, f64),
    pyramid_scale: f64,
    paragraph_ideal: (f64, f64),
    paragraph_near: (f64, f64),
    paragraph_length_weight: f64,
    paragraph_variety_weight: f64,
    vocab_weight: f64,
    opener_weight: f64,
    content_weight: f64,
    strength_min: u8,
    improvement_below: u8,
    recommendation_below: u8,
    readable_grade_max: f64,
    attribution_strength_min: usize,
    active_voice_max_ratio: f64,
    short_article_words: usize,
    long_article_words: usize,
}

static HP: Hyperparameters = Hyperparameters {
    readability_weight: 0.3,
    sentence_weight: 0.25,
    grammar_weight: 0.25,
    tone_weight: 0.2,
    sentence_ideal: (15.0, 25.0),
    sentence_near: (10.0, 30.0),
    sentence_variety_min_std: 5.0,
    sentence_variety_bonus: 10,
    passive_ratio_max: 0.1,
    passive_penalty: 15,
    lowercase_start_penalty: 5,
    run_on_words: 40,
    run_on_share: 0.2,
    run_on_penalty: 10,
    informal_penalty: 10,
    first_person_max: 2,
    first_person_penalty: 20,
    contraction_penalty: 5,
    fact_report_weights: (0.4, 0.3, 0.3),
    basic_accuracy_base: 80,
    basic_detail_points: 2,
    basic_detail_cap: 20,
    accuracy_blend: (0.7, 0.3),
    no_facts_incorporation: 85,
    fact_overlap_threshold: 0.6,
    structure_weights: (0.35, 0.25, 0.25, 0.15),
    lead_element_weight: 0.6,
    lead_length_weight: 0.4,
    pyramid_ideal: (0.3, 0.6, 0.1),
    pyramid_scale: 200.0,
    paragraph_ideal: (50.0, 150.0),
    paragraph_near: (30.0, 200.0),
    paragraph_length_weight: 0.7,
    paragraph_variety_weight: 0.3,
    vocab_weight: 0.4,
    opener_weight: 0.3,
    content_weight: 0.3,
    strength_min: 85,
    improvement_below: 70,
    recommendation_below: 80,
    readable_grade_max: 9.0,
    attribution_strength_min: 3,
    active_voice_max_ratio: 0.1,
    short_article_words: 100,
    long_article_words: 2000,
};

pub const WRITING_QUALITY: &str = "writing_quality";
pub const ACCURACY: &str = "accuracy";
pub const STRUCTURE: &str = "structure";
pub const VARIETY: &str = "variety";

pub const WEIGHTS: WeightTable = WeightTable(&[
    (WRITING_QUALITY, 0.40),
    (ACCURACY, 0.25),
    (STRUCTURE, 0.20),
    (VARIETY, 0.15),
]);

// ---------------------------------------------------------------------------
// Compiled patterns
// ---------------------------------------------------------------------------

static PASSIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:was|were|been)\s+\w+ed\b").unwrap());

static FIRST_PERSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:i|me|my|myself|we|us|our)\b").unwrap());

static CONTRACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)\b\w+(?:n['\u{2019}]t|['\u{2019}](?:re|ve|ll|d|m))\b",
        r"|\b(?:it|that|there|here|what|who|he|she|let)['\u{2019}]s\b",
    ))
    .unwrap()
});

static SLASH_DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b").unwrap());

static ATTRIBUTION_MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)according to|sources say|officials").unwrap());

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// An article to evaluate. Sections are optional substrings of `full_text`;
/// when none are given they are derived from its paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    pub full_text: String,
    #[serde(default)]
    pub lead: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub source_facts: Vec<String>,
    #[serde(default)]
    pub fact_report: Option<FactReport>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub lead: String,
    pub body: String,
    pub conclusion: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleValidation {
    pub is_valid: bool,
    pub missing_fields: Vec<String>,
    pub warnings: Vec<String>,
}

impl ArticleInput {
    pub fn new(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            ..Self::default()
        }
    }

    pub fn with_sections(
        mut self,
        lead: impl Into<String>,
        body: impl Into<String>,
        conclusion: impl Into<String>,
    ) -> Self {
        self.lead = Some(lead.into());
        self.body = Some(body.into());
        self.conclusion = Some(conclusion.into());
        self
    }

    pub fn with_facts(mut self, facts: Vec<String>) -> Self {
        self.source_facts = facts;
        self
    }

    pub fn with_fact_report(mut self, report: FactReport) -> Self {
        self.fact_report = Some(report);
        self
    }

    /// Lead/body/conclusion, falling back to paragraph positions when the
    /// caller supplied none: first paragraph leads, the last concludes once
    /// there are at least three.
    pub fn sections(&self) -> Sections {
        if self.lead.is_some() || self.body.is_some() || self.conclusion.is_some() {
            return Sections {
                lead: self.lead.clone().unwrap_or_default(),
                body: self.body.clone().unwrap_or_default(),
                conclusion: self.conclusion.clone().unwrap_or_default(),
            };
        }
        let paras = text::paragraphs(&self.full_text);
        match paras.as_slice() {
            [] => Sections::default(),
            [lead] => Sections {
                lead: lead.to_string(),
                ..Sections::default()
            },
            [lead, body] => Sections {
                lead: lead.to_string(),
                body: body.to_string(),
                conclusion: String::new(),
            },
            [lead, middle @ .., last] => Sections {
                lead: lead.to_string(),
                body: middle.join("\n\n"),
                conclusion: last.to_string(),
            },
        }
    }

    /// Completeness check before evaluation. Only the text itself is required.
    pub fn validate(&self) -> ArticleValidation {
        let mut missing_fields = Vec::new();
        let mut warnings = Vec::new();

        if self.full_text.trim().is_empty() {
            missing_fields.push("fullText".to_string());
        }
        for (name, value) in [
            ("lead", &self.lead),
            ("body", &self.body),
            ("conclusion", &self.conclusion),
        ] {
            if value.as_deref().map_or(true, |s| s.trim().is_empty()) {
                warnings.push(format!("Optional field '{name}' is missing"));
            }
        }
        if self.fact_report.is_none() {
            warnings.push("Optional field 'factReport' is missing".to_string());
        }

        let words = text::word_count(&self.full_text);
        if words > 0 && words < HP.short_article_words {
            warnings.push(format!("Article is very short ({words} words)"));
        } else if words > HP.long_article_words {
            warnings.push(format!("Article is very long ({words} words)"));
        }

        ArticleValidation {
            is_valid: missing_fields.is_empty(),
            missing_fields,
            warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfessionalRating {
    #[serde(rename = "Excellent - Publication Ready")]
    Excellent,
    #[serde(rename = "Very Good - Minor Revisions")]
    VeryGood,
    #[serde(rename = "Good - Some Improvements Needed")]
    Good,
    #[serde(rename = "Fair - Significant Revisions Required")]
    Fair,
    #[serde(rename = "Poor - Major Overhaul Needed")]
    Poor,
    #[serde(rename = "Assessment Failed")]
    AssessmentFailed,
}

impl ProfessionalRating {
    pub fn for_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Excellent,
            80..=89 => Self::VeryGood,
            70..=79 => Self::Good,
            60..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub readability_grade: Option<f64>,
    pub flesch_score: Option<f64>,
    pub avg_sentence_length: f64,
    pub quote_count: usize,
    pub attribution_count: usize,
    pub passive_voice_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    #[serde(flatten)]
    pub report: ScoreReport,
    pub professional_rating: ProfessionalRating,
    pub grade_level: Option<f64>,
    pub detailed_metrics: Option<DetailedMetrics>,
    pub strengths: Vec<String>,
    pub areas_for_improvement: Vec<String>,
}

impl QualityReport {
    /// Zero-filled report with the error text in every category.
    pub fn failed(message: &str) -> Self {
        let mut report = ScoreReport::new();
        for name in WEIGHTS.categories() {
            report.set_category(name, CategoryScore::failed(message));
        }
        report.recommendations = vec!["Fix evaluation error and retry assessment".to_string()];
        Self {
            report,
            professional_rating: ProfessionalRating::AssessmentFailed,
            grade_level: None,
            detailed_metrics: None,
            strengths: Vec::new(),
            areas_for_improvement: vec!["Address technical evaluation issues".to_string()],
        }
    }

    pub fn overall_score(&self) -> u8 {
        self.report.overall_score
    }

    pub fn category(&self, name: &str) -> u8 {
        self.report.category(name)
    }
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QualityEvaluator {
    lexicon: Arc<Lexicon>,
    limits: Limits,
}

impl Default for QualityEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::default()))
    }
}

impl QualityEvaluator {
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

    /// Evaluate an article. Never fails: any fault produces
    /// [`QualityReport::failed`].
    pub fn evaluate_article(&self, article: &ArticleInput) -> QualityReport {
        match self.try_evaluate(article) {
            Ok(report) => {
                tracing::info!(
                    overall_score = report.report.overall_score,
                    rating = ?report.professional_rating,
                    "quality evaluation completed"
                );
                report
            }
            Err(err) => {
                tracing::error!(error = %err, "quality evaluation failed");
                QualityReport::failed(&err.to_string())
            }
        }
    }

    fn try_evaluate(&self, article: &ArticleInput) -> AnalysisResult<QualityReport> {
        check_limits(&self.limits, &article.full_text)?;

        let text = article.full_text.as_str();
        let mut report = ScoreReport::new();
        report.set_category(WRITING_QUALITY, self.writing_quality(text)?);
        report.set_category(ACCURACY, self.accuracy(article)?);
        report.set_category(STRUCTURE, self.structure(text, &article.sections())?);
        report.set_category(VARIETY, variety(text)?);
        for (name, category) in &report.category_scores {
            tracing::debug!(category = %name, score = category.score, "quality category scored");
        }
        report.overall_score = WEIGHTS.overall(&report.category_scores);
        report.recommendations = recommendations(&report);

        let metrics = (!text.trim().is_empty()).then(|| detailed_metrics(text));
        let (strengths, areas_for_improvement) = strengths_and_improvements(&report, metrics.as_ref());

        Ok(QualityReport {
            professional_rating: ProfessionalRating::for_score(report.overall_score),
            grade_level: metrics.as_ref().and_then(|m| m.readability_grade),
            detailed_metrics: metrics,
            strengths,
            areas_for_improvement,
            report,
        })
    }

    // -- writing quality ----------------------------------------------------

    fn writing_quality(&self, text: &str) -> AnalysisResult<CategoryScore> {
        if text.trim().is_empty() {
            return Ok(CategoryScore::new(0).with_detail("note", "No article text to evaluate"));
        }

        let readability = text::readability(text);
        let grade = readability.map(|r| r.grade);
        let readability_score = match grade {
            Some(g) => readability_band(ensure_finite("grade_level", g)?),
            None => 0,
        };

        let sentences = text::sentences(text);
        let lengths: Vec<usize> = sentences.iter().map(|s| text::word_count(s)).collect();
        let (sentence_score, avg_len, spread) = sentence_length_score(&lengths);

        let grammar = grammar_score(&sentences, &lengths);
        let tone = self.tone_score(text);

        let blended = f64::from(readability_score) * HP.readability_weight
            + f64::from(sentence_score) * HP.sentence_weight
            + f64::from(grammar) * HP.grammar_weight
            + f64::from(tone) * HP.tone_weight;

        let mut category = CategoryScore::new(clamp_score(ensure_finite("writing_quality", blended)?))
            .with_detail("readability_score", readability_score)
            .with_detail("sentence_score", sentence_score)
            .with_detail("avg_sentence_length", round_to(avg_len, 1))
            .with_detail("sentence_variety", round_to(spread, 2))
            .with_detail("grammar_score", grammar)
            .with_detail("tone_score", tone);
        if let Some(r) = readability {
            category = category
                .with_detail("grade_level", round_to(r.grade, 1))
                .with_detail("flesch_score", round_to(r.ease, 1));
        }
        Ok(category)
    }

    fn tone_score(&self, text: &str) -> u8 {
        let mut score: i32 = 100;
        score -= self.lexicon.informal.count(text) as i32 * HP.informal_penalty;
        if FIRST_PERSON_RE.find_iter(text).count() > HP.first_person_max {
            score -= HP.first_person_penalty;
        }
        score -= CONTRACTION_RE.find_iter(text).count() as i32 * HP.contraction_penalty;
        score.max(0) as u8
    }

    // -- accuracy -----------------------------------------------------------

    fn accuracy(&self, article: &ArticleInput) -> AnalysisResult<CategoryScore> {
        let text = article.full_text.as_str();
        let usable_report = article.fact_report.as_ref().filter(|r| !r.report.is_failure());

        let (base, source) = match usable_report {
            Some(fact) => {
                let (w_cons, w_attr, w_cred) = HP.fact_report_weights;
                let blended = f64::from(fact.fact_consistency()) * w_cons
                    + f64::from(fact.source_attribution()) * w_attr
                    + f64::from(fact.credibility()) * w_cred;
                (blended, "fact_report")
            }
            None => (f64::from(self.basic_accuracy(text)), "heuristic"),
        };
        let base = ensure_finite("accuracy_base", base)?;

        let incorporation = match incorporation_rate(text, &article.source_facts, HP.fact_overlap_threshold) {
            Some(rate) => clamp_score(ensure_finite("fact_incorporation", rate * 100.0)?),
            None => HP.no_facts_incorporation,
        };

        let (w_base, w_inc) = HP.accuracy_blend;
        let blended = base * w_base + f64::from(incorporation) * w_inc;
        Ok(CategoryScore::new(clamp_score(blended))
            .with_detail("fact_check_score", round_to(base, 2))
            .with_detail("fact_check_source", source)
            .with_detail("fact_incorporation_score", incorporation)
            .with_detail("verified_facts", article.source_facts.len()))
    }

    fn basic_accuracy(&self, text: &str) -> u8 {
        let words = text::word_count(text);
        if words == 0 {
            return 0;
        }
        let mut score = HP.basic_accuracy_base;
        let ratio = per_hundred_words(self.lexicon.attribution.count(text), words);
        if ratio >= 2.0 {
            score += 10;
        } else if ratio >= 1.0 {
            score += 5;
        } else if ratio < 0.5 {
            score -= 10;
        }

        let dates = SLASH_DATE_RE.find_iter(text).count() + FULL_DATE_RE.find_iter(text).count();
        let numbers = NUMBER_RE.find_iter(text).count();
        score += ((dates + numbers) as i32 * HP.basic_detail_points).min(HP.basic_detail_cap);

        score.clamp(0, 100) as u8
    }

    // -- structure ----------------------------------------------------------

    fn structure(&self, text: &str, sections: &Sections) -> AnalysisResult<CategoryScore> {
        let lead = lead_score(&sections.lead);
        let pyramid = pyramid_score(&sections.lead, &sections.body, &sections.conclusion);
        let paragraph = paragraph_score(text);
        let transition = self.transition_score(text);

        let (w_lead, w_pyr, w_para, w_trans) = HP.structure_weights;
        let blended = f64::from(lead) * w_lead
            + f64::from(pyramid) * w_pyr
            + f64::from(paragraph) * w_para
            + f64::from(transition) * w_trans;

        Ok(CategoryScore::new(clamp_score(ensure_finite("structure", blended)?))
            .with_detail("lead_score", lead)
            .with_detail("pyramid_score", pyramid)
            .with_detail("paragraph_score", paragraph)
            .with_detail("transition_score", transition))
    }

    fn transition_score(&self, text: &str) -> u8 {
        let paras = text::paragraphs(text);
        if paras.len() < 2 {
            return 100;
        }
        let found = paras[1..]
            .iter()
            .filter(|p| {
                let first_sentence = p.split('.').next().unwrap_or_default();
                self.lexicon.transitions.is_match(first_sentence)
            })
            .count();
        let rate = found as f64 / (paras.len() - 1) as f64;
        if rate >= 0.7 {
            100
        } else if rate >= 0.5 {
            85
        } else if rate >= 0.3 {
            70
        } else {
            50
        }
    }
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

fn readability_band(grade: f64) -> u8 {
    if (6.0..=9.0).contains(&grade) {
        100
    } else if grade > 9.0 && grade <= 12.0 {
        80
    } else if grade > 12.0 && grade <= 16.0 {
        60
    } else {
        40
    }
}

/// Returns (score, mean length, standard deviation).
fn sentence_length_score(lengths: &[usize]) -> (u8, f64, f64) {
    if lengths.is_empty() {
        return (0, 0.0, 0.0);
    }
    let avg = mean(lengths);
    let spread = std_dev(lengths);
    let (ideal_lo, ideal_hi) = HP.sentence_ideal;
    let (near_lo, near_hi) = HP.sentence_near;
    let mut score = if (ideal_lo..=ideal_hi).contains(&avg) {
        100
    } else if (near_lo..ideal_lo).contains(&avg) || (avg > ideal_hi && avg <= near_hi) {
        80
    } else {
        60
    };
    if spread > HP.sentence_variety_min_std {
        score = (score + HP.sentence_variety_bonus).min(100);
    }
    (score, avg, spread)
}

fn passive_ratio(sentences: &[&str]) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }
    let passive = sentences.iter().filter(|s| PASSIVE_RE.is_match(s)).count();
    passive as f64 / sentences.len() as f64
}

fn grammar_score(sentences: &[&str], lengths: &[usize]) -> u8 {
    let mut score: i32 = 100;

    if passive_ratio(sentences) > HP.passive_ratio_max {
        score -= HP.passive_penalty;
    }

    let lowercase_start = sentences
        .iter()
        .any(|s| s.chars().next().is_some_and(char::is_lowercase));
    if lowercase_start {
        score -= HP.lowercase_start_penalty;
    }

    let run_ons = lengths.iter().filter(|&&n| n > HP.run_on_words).count();
    if !lengths.is_empty() && run_ons as f64 > lengths.len() as f64 * HP.run_on_share {
        score -= HP.run_on_penalty;
    }

    score.max(0) as u8
}

fn lead_score(lead: &str) -> u8 {
    if lead.trim().is_empty() {
        return 0;
    }
    let elements = LEAD_ELEMENTS
        .iter()
        .filter(|(_, re)| re.is_match(lead))
        .count();
    let element_score = elements as f64 / LEAD_ELEMENTS.len() as f64 * 100.0;

    let words = text::word_count(lead);
    let length_score = match words {
        25..=35 => 100.0,
        20..=24 | 36..=40 => 85.0,
        15..=19 | 41..=50 => 70.0,
        _ => 50.0,
    };
    clamp_score(element_score * HP.lead_element_weight + length_score * HP.lead_length_weight)
}

/// 100 minus 200x the summed deviation from the ideal 0.3/0.6/0.1 word shares.
pub fn pyramid_score(lead: &str, body: &str, conclusion: &str) -> u8 {
    let lead_words = text::word_count(lead);
    let body_words = text::word_count(body);
    let conclusion_words = text::word_count(conclusion);
    let total = lead_words + body_words + conclusion_words;
    if total == 0 {
        return 0;
    }
    let total = total as f64;
    let (ideal_lead, ideal_body, ideal_conclusion) = HP.pyramid_ideal;
    let deviation = (lead_words as f64 / total - ideal_lead).abs()
        + (body_words as f64 / total - ideal_body).abs()
        + (conclusion_words as f64 / total - ideal_conclusion).abs();
    clamp_score(100.0 - deviation * HP.pyramid_scale)
}

fn paragraph_score(text: &str) -> u8 {
    let lengths: Vec<usize> = text::paragraphs(text)
        .iter()
        .map(|p| text::word_count(p))
        .collect();
    if lengths.is_empty() {
        return 0;
    }
    let avg = mean(&lengths);
    let (ideal_lo, ideal_hi) = HP.paragraph_ideal;
    let (near_lo, near_hi) = HP.paragraph_near;
    let length_score = if (ideal_lo..=ideal_hi).contains(&avg) {
        100.0
    } else if (near_lo..ideal_lo).contains(&avg) || (avg > ideal_hi && avg <= near_hi) {
        85.0
    } else {
        60.0
    };
    let variety_score = if lengths.len() > 1 {
        (std_dev(&lengths) * 2.0).min(100.0)
    } else {
        0.0
    };
    clamp_score(length_score * HP.paragraph_length_weight + variety_score * HP.paragraph_variety_weight)
}

fn variety(text: &str) -> AnalysisResult<CategoryScore> {
    let words = text::words(text);
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    let diversity = if words.is_empty() {
        0.0
    } else {
        unique.len() as f64 / words.len() as f64
    };
    let vocab_score: u8 = if words.is_empty() {
        0
    } else if diversity > 0.6 {
        100
    } else if diversity > 0.5 {
        85
    } else if diversity > 0.4 {
        70
    } else {
        50
    };

    let opener_score = opener_diversity(text);
    let content_score = content_variety(text);

    let blended = f64::from(vocab_score) * HP.vocab_weight
        + f64::from(opener_score) * HP.opener_weight
        + f64::from(content_score) * HP.content_weight;

    Ok(CategoryScore::new(clamp_score(ensure_finite("variety", blended)?))
        .with_detail("vocabulary_diversity", round_to(diversity, 3))
        .with_detail("vocab_score", vocab_score)
        .with_detail("structure_variety", opener_score)
        .with_detail("content_variety", content_score))
}

/// Unique sentence openers as a percentage of sentences.
fn opener_diversity(text: &str) -> u8 {
    let openers: Vec<String> = text::sentences(text)
        .iter()
        .filter_map(|s| s.split_whitespace().next())
        .map(str::to_lowercase)
        .collect();
    if openers.is_empty() {
        return 0;
    }
    let unique: HashSet<&String> = openers.iter().collect();
    clamp_score(unique.len() as f64 / openers.len() as f64 * 100.0)
}

fn content_variety(text: &str) -> u8 {
    let words = text::word_count(text);
    if words == 0 {
        return 0;
    }
    let elements = QUOTE_RE.find_iter(text).count()
        + NUMBER_RE.find_iter(text).count()
        + ATTRIBUTION_MENTION_RE.find_iter(text).count();
    let ratio = per_hundred_words(elements, words);
    if ratio >= 5.0 {
        100
    } else if ratio >= 3.0 {
        85
    } else if ratio >= 2.0 {
        70
    } else {
        50
    }
}

fn detailed_metrics(text: &str) -> DetailedMetrics {
    let sentences = text::sentences(text);
    let words = text::word_count(text);
    let readability = text::readability(text);
    DetailedMetrics {
        word_count: words,
        sentence_count: sentences.len(),
        paragraph_count: text::paragraphs(text).len(),
        readability_grade: readability.map(|r| round_to(r.grade, 1)),
        flesch_score: readability.map(|r| round_to(r.ease, 1)),
        avg_sentence_length: round_to(words as f64 / sentences.len().max(1) as f64, 1),
        quote_count: QUOTE_RE.find_iter(text).count(),
        attribution_count: ATTRIBUTION_MENTION_RE.find_iter(text).count(),
        passive_voice_ratio: round_to(passive_ratio(&sentences), 3),
    }
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

fn recommendations(report: &ScoreReport) -> Vec<String> {
    let tips: [(&str, [&str; 2]); 4] = [
        (
            WRITING_QUALITY,
            [
                "Improve readability by using shorter sentences and simpler vocabulary",
                "Vary sentence structure to maintain reader engagement",
            ],
        ),
        (
            ACCURACY,
            [
                "Add more source attributions and fact verification",
                "Ensure all claims are properly substantiated",
            ],
        ),
        (
            STRUCTURE,
            [
                "Strengthen the lead paragraph with all essential elements",
                "Better organize content using inverted pyramid structure",
            ],
        ),
        (
            VARIETY,
            [
                "Increase vocabulary diversity and sentence variety",
                "Include more diverse content types (quotes, statistics, analysis)",
            ],
        ),
    ];
    tips.iter()
        .filter(|(name, _)| report.category(name) < HP.recommendation_below)
        .flat_map(|(_, pair)| pair.iter().map(|s| s.to_string()))
        .collect()
}

fn strengths_and_improvements(
    report: &ScoreReport,
    metrics: Option<&DetailedMetrics>,
) -> (Vec<String>, Vec<String>) {
    let mut strengths = Vec::new();
    let mut improvements = Vec::new();

    for name in WEIGHTS.categories() {
        let score = report.category(name);
        let label = name.replace('_', " ");
        if score >= HP.strength_min {
            strengths.push(format!("Strong {label}"));
        } else if score < HP.improvement_below {
            improvements.push(format!("Improve {label}"));
        }
    }

    if let Some(m) = metrics {
        if m.readability_grade.is_some_and(|g| g <= HP.readable_grade_max) {
            strengths.push("Excellent readability for target audience".to_string());
        }
        if m.attribution_count >= HP.attribution_strength_min {
            strengths.push("Good source attribution".to_string());
        }
        if m.sentence_count > 0 && m.passive_voice_ratio <= HP.active_voice_max_ratio {
            strengths.push("Effective use of active voice".to_string());
        }
    }

    (strengths, improvements)
}

fn round_to(v: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (v * factor).round() / factor
}
