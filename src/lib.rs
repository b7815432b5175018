//! Content compliance scoring for generated news prose.
//!
//! Three independent analyzers score a draft on a 0-100 scale (higher is
//! better) and explain the score:
//!
//! - [`FactChecker`]: source attribution, objectivity, fact consistency and
//!   credibility, plus extracted claims and flagged bias.
//! - [`QualityEvaluator`]: writing quality, accuracy, structure and variety.
//! - [`StyleValidator`]: deduction-based checks against a house style profile.
//!
//! All analyzers share one read-only [`Lexicon`] and never fail past their
//! public entry points: faults come back as zeroed reports that say why.
//!
//! ```
//! use copydesk::{AnalysisInput, ComplianceEngine};
//!
//! let engine = ComplianceEngine::default();
//! let input = AnalysisInput::new("The council approved the budget on Monday, officials said.")
//!     .with_style("wire");
//! let assessment = engine.assess(&input);
//! assert!(assessment.fact.overall_score() <= 100);
//! assert_eq!(assessment.style.style, "wire");
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod config;
pub mod error;
pub mod fact;
pub mod lexicon;
pub mod quality;
pub mod report;
pub mod style;
pub mod text;

pub use config::{Config, Limits};
pub use error::{AnalysisError, ConfigError, LexiconError};
pub use fact::{FactChecker, FactReport, Reliability, SourceReliability};
pub use lexicon::{Lexicon, LexiconTables};
pub use quality::{ArticleInput, ArticleValidation, ProfessionalRating, QualityEvaluator, QualityReport};
pub use report::{CategoryScore, Claim, ClaimKind, FlaggedItem, ScoreReport, Severity};
pub use style::{StyleProfile, StyleReport, StyleValidator};

/// One article and the context the analyzers need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub text: String,
    #[serde(default)]
    pub source_facts: Vec<String>,
    #[serde(default)]
    pub style_name: String,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_facts(mut self, facts: Vec<String>) -> Self {
        self.source_facts = facts;
        self
    }

    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = style_name.into();
        self
    }
}

/// The three reports for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub fact: FactReport,
    pub quality: QualityReport,
    pub style: StyleReport,
}

/// All three analyzers over one shared lexicon.
#[derive(Debug, Clone)]
pub struct ComplianceEngine {
    facts: FactChecker,
    quality: QualityEvaluator,
    style: StyleValidator,
}

impl Default for ComplianceEngine {
    fn default() -> Self {
        Self::with_lexicon(Arc::new(Lexicon::default()), Limits::default())
    }
}

impl ComplianceEngine {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let lexicon = config.build_lexicon()?;
        Ok(Self::with_lexicon(lexicon, config.limits.clone()))
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>, limits: Limits) -> Self {
        Self {
            facts: FactChecker::new(Arc::clone(&lexicon)).with_limits(limits.clone()),
            quality: QualityEvaluator::new(Arc::clone(&lexicon)).with_limits(limits.clone()),
            style: StyleValidator::new(lexicon).with_limits(limits),
        }
    }

    pub fn fact_checker(&self) -> &FactChecker {
        &self.facts
    }

    pub fn quality_evaluator(&self) -> &QualityEvaluator {
        &self.quality
    }

    pub fn style_validator(&self) -> &StyleValidator {
        &self.style
    }

    /// Run every analyzer. The quality evaluation reuses the fact report
    /// computed here instead of falling back to its own accuracy heuristic.
    pub fn assess(&self, input: &AnalysisInput) -> Assessment {
        let fact = self.facts.verify_facts(&input.text, &input.source_facts);
        let article = ArticleInput::new(input.text.as_str())
            .with_facts(input.source_facts.clone())
            .with_fact_report(fact.clone());
        let quality = self.quality.evaluate_article(&article);
        let style = self
            .style
            .validate_style_compliance(&input.text, &input.style_name);
        tracing::debug!(
            fact = fact.overall_score(),
            quality = quality.overall_score(),
            style = style.score,
            "assessment completed"
        );
        Assessment {
            fact,
            quality,
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ComplianceEngine>();
    }

    #[test]
    fn assess_feeds_fact_report_into_quality() {
        let engine = ComplianceEngine::default();
        let assessment = engine.assess(&AnalysisInput::new("The mayor resigned on Monday."));
        let accuracy = &assessment.quality.report.category_scores[quality::ACCURACY];
        assert_eq!(accuracy.details["fact_check_source"], "fact_report");
    }

    #[test]
    fn config_limits_reach_every_analyzer() {
        let config = Config::from_toml("[limits]\nmax_text_bytes = 8\n").unwrap();
        let engine = ComplianceEngine::from_config(&config).unwrap();
        let assessment = engine.assess(&AnalysisInput::new("far too long for the limit").with_style("blog"));
        assert!(assessment.fact.report.is_failure());
        assert_eq!(
            assessment.quality.professional_rating,
            ProfessionalRating::AssessmentFailed
        );
        assert_eq!(assessment.style.score, 0);
    }
}
