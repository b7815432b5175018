//! Report schema shared by the analyzers.
//!
//! Field names serialize in camelCase (`overallScore`, `categoryScores`, ...)
//! because downstream renderers and stored JSON snapshots key on them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::text::clamp_score;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// A located span worth a reviewer's attention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedItem {
    pub kind: String,
    #[serde(default)]
    pub subtype: Option<String>,
    pub content: String,
    /// Character offset of the span in the analyzed text.
    pub position: usize,
    pub severity: Severity,
    #[serde(default)]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimKind {
    Statistic,
    Date,
    Quote,
    AttributedClaim,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub kind: ClaimKind,
    pub content: String,
    pub verifiable: bool,
    pub confidence: Confidence,
}

impl Claim {
    /// Build a claim with the verifiability and confidence its kind implies:
    /// quotes are never verifiable, dates are always high confidence.
    pub fn new(kind: ClaimKind, content: impl Into<String>) -> Self {
        let (verifiable, confidence) = match kind {
            ClaimKind::Statistic => (true, Confidence::Medium),
            ClaimKind::Date => (true, Confidence::High),
            ClaimKind::Quote => (false, Confidence::Low),
            ClaimKind::AttributedClaim => (true, Confidence::Medium),
        };
        Self {
            kind,
            content: content.into(),
            verifiable,
            confidence,
        }
    }
}

pub type Details = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub score: u8,
    #[serde(default)]
    pub details: Details,
}

impl CategoryScore {
    pub fn new(score: u8) -> Self {
        Self {
            score,
            details: Details::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// A zeroed category carrying the failure message.
    pub fn failed(message: &str) -> Self {
        Self::new(0).with_detail("error", format!("Error: {message}"))
    }
}

/// Fixed per-analyzer category weights. Weights sum to 1.0.
#[derive(Debug, Clone, Copy)]
pub struct WeightTable(pub &'static [(&'static str, f64)]);

impl WeightTable {
    pub fn categories(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(|(name, _)| *name)
    }

    /// `round(sum(weight * score))`, clamped to 0..=100. Missing categories
    /// count as zero.
    pub fn overall(&self, categories: &BTreeMap<String, CategoryScore>) -> u8 {
        let total: f64 = self
            .0
            .iter()
            .map(|(name, weight)| {
                let score = categories.get(*name).map_or(0, |c| c.score);
                f64::from(score) * weight
            })
            .sum();
        clamp_score(total)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub overall_score: u8,
    pub category_scores: BTreeMap<String, CategoryScore>,
    pub flagged_items: Vec<FlaggedItem>,
    pub recommendations: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl ScoreReport {
    pub fn new() -> Self {
        Self {
            overall_score: 0,
            category_scores: BTreeMap::new(),
            flagged_items: Vec::new(),
            recommendations: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn set_category(&mut self, name: &str, category: CategoryScore) {
        self.category_scores.insert(name.to_string(), category);
    }

    pub fn category(&self, name: &str) -> u8 {
        self.category_scores.get(name).map_or(0, |c| c.score)
    }

    /// A present-but-zeroed report is how a failed analysis looks: every
    /// category carries an `error` detail.
    pub fn is_failure(&self) -> bool {
        !self.category_scores.is_empty()
            && self
                .category_scores
                .values()
                .all(|c| c.score == 0 && c.details.contains_key("error"))
    }
}

impl Default for ScoreReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEIGHTS: WeightTable = WeightTable(&[("a", 0.25), ("b", 0.30), ("c", 0.25), ("d", 0.20)]);

    fn report(scores: &[(&str, u8)]) -> ScoreReport {
        let mut r = ScoreReport::new();
        for (name, score) in scores {
            r.set_category(name, CategoryScore::new(*score));
        }
        r
    }

    #[test]
    fn overall_is_rounded_weighted_sum() {
        let r = report(&[("a", 70), ("b", 70), ("c", 85), ("d", 100)]);
        // 17.5 + 21 + 21.25 + 20 = 79.75
        assert_eq!(WEIGHTS.overall(&r.category_scores), 80);
    }

    #[test]
    fn missing_category_counts_as_zero() {
        let r = report(&[("a", 100)]);
        assert_eq!(WEIGHTS.overall(&r.category_scores), 25);
    }

    #[test]
    fn claim_rules_follow_kind() {
        let quote = Claim::new(ClaimKind::Quote, "\"We will rebuild\"");
        assert!(!quote.verifiable);
        let date = Claim::new(ClaimKind::Date, "March 3, 2024");
        assert_eq!(date.confidence, Confidence::High);
    }

    #[test]
    fn failure_detection_needs_error_details() {
        let mut r = report(&[("a", 0)]);
        assert!(!r.is_failure());
        r.set_category("a", CategoryScore::failed("boom"));
        assert!(r.is_failure());
    }

    #[test]
    fn serializes_camel_case_fields() {
        let json = serde_json::to_value(report(&[("a", 10)])).unwrap();
        assert!(json.get("overallScore").is_some());
        assert!(json.get("categoryScores").is_some());
        assert!(json.get("flaggedItems").is_some());
        assert!(json.get("recommendations").is_some());
        assert!(json.get("timestamp").is_some());
    }
}
