//! Template-database action recognition.
//!
//! [`ActionMatcher`] holds a collection of labeled template sequences
//! and classifies a query capture by normalizing both sides and taking
//! the label of the template with the minimal DTW alignment cost. The
//! crate is agnostic to where templates come from (file, database, or
//! a live recording session); it only consumes the in-memory sequences.

use tracing::debug;

use crate::config::ScreenConfig;
use crate::dtw::{self, Alignment};
use crate::features::FeatureNormalizer;
use crate::skeleton::{JointWeights, PoseSequence};

/// Label reported when no template produced a meaningful comparison.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// One labeled template in the database.
#[derive(Debug, Clone)]
pub struct ActionTemplate {
    /// Action label this template exemplifies.
    pub label: String,
    /// Recorded reference sequence.
    pub sequence: PoseSequence,
    /// Per-joint emphasis for comparisons against this template.
    pub weights: JointWeights,
}

impl ActionTemplate {
    /// Create a template with uniform joint weights.
    #[must_use]
    pub fn new(label: impl Into<String>, sequence: PoseSequence) -> Self {
        Self {
            label: label.into(),
            sequence,
            weights: JointWeights::uniform(),
        }
    }

    /// Create a template with explicit joint weights.
    #[must_use]
    pub fn with_weights(
        label: impl Into<String>,
        sequence: PoseSequence,
        weights: JointWeights,
    ) -> Self {
        Self {
            label: label.into(),
            sequence,
            weights,
        }
    }
}

/// Outcome of matching a query against the template database.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Best-matching label, or [`UNKNOWN_LABEL`].
    pub label: String,
    /// Alignment cost of the winning template; +∞ when nothing matched.
    pub cost: f64,
}

impl MatchResult {
    /// The no-match sentinel: label "Unknown", infinite cost.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            label: UNKNOWN_LABEL.to_string(),
            cost: f64::INFINITY,
        }
    }

    /// Whether any template produced a finite comparison.
    #[must_use]
    pub fn is_match(&self) -> bool {
        self.cost.is_finite()
    }
}

/// Matches query captures against a labeled template database.
#[derive(Debug)]
pub struct ActionMatcher {
    config: ScreenConfig,
    templates: Vec<ActionTemplate>,
    /// Shortest and longest template length; callers use these to gate
    /// what counts as a plausible query capture.
    min_template_len: usize,
    max_template_len: usize,
}

impl ActionMatcher {
    /// Create an empty matcher.
    #[must_use]
    pub fn new(config: ScreenConfig) -> Self {
        Self {
            config,
            templates: Vec::new(),
            min_template_len: usize::MAX,
            max_template_len: 0,
        }
    }

    /// Add a template to the database.
    pub fn add_template(&mut self, template: ActionTemplate) {
        let len = template.sequence.tracked_len();
        self.min_template_len = self.min_template_len.min(len);
        self.max_template_len = self.max_template_len.max(len);
        self.templates.push(template);
    }

    /// Number of templates in the database.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Shortest template length, if any templates are loaded.
    #[must_use]
    pub fn min_template_len(&self) -> Option<usize> {
        (!self.templates.is_empty()).then_some(self.min_template_len)
    }

    /// Longest template length, if any templates are loaded.
    #[must_use]
    pub fn max_template_len(&self) -> Option<usize> {
        (!self.templates.is_empty()).then_some(self.max_template_len)
    }

    /// Classify a query capture.
    ///
    /// Never fails: an empty database, an unusable query, or a query
    /// that every template prunes away yields [`MatchResult::unknown`].
    #[must_use]
    pub fn best_match(&self, query: &PoseSequence) -> MatchResult {
        self.match_with_alignment(query).0
    }

    /// Classify a query and keep the winning alignment so the caller
    /// can run frame-correspondence lookups against the best template.
    #[must_use]
    pub fn match_with_alignment(&self, query: &PoseSequence) -> (MatchResult, Option<Alignment>) {
        let query_len = query.tracked_len();
        if query_len == 0 {
            debug!("query has no tracked frames, reporting unknown");
            return (MatchResult::unknown(), None);
        }

        let mut best = MatchResult::unknown();
        let mut best_alignment = None;

        for template in &self.templates {
            if self.prune_by_length(query_len, template.sequence.tracked_len()) {
                debug!(label = %template.label, "template pruned by length ratio");
                continue;
            }

            // Weights differ per template, so the query is re-normalized
            // for each; normalization is linear in the sequence while
            // the alignment is quadratic, so this is not the hot path.
            let mut normalizer = FeatureNormalizer::new(&self.config);
            let Ok(query_features) =
                normalizer.normalize_sequence_weighted(query, Some(&template.weights))
            else {
                continue;
            };
            normalizer.reset();
            let Ok(template_features) = normalizer
                .normalize_sequence_weighted(&template.sequence, Some(&template.weights))
            else {
                continue;
            };

            match dtw::align(&query_features, &template_features) {
                Ok(alignment) => {
                    if alignment.cost < best.cost {
                        best = MatchResult {
                            label: template.label.clone(),
                            cost: alignment.cost,
                        };
                        best_alignment = Some(alignment);
                    }
                }
                Err(e) => {
                    debug!(label = %template.label, error = %e, "template comparison failed");
                }
            }
        }

        (best, best_alignment)
    }

    fn prune_by_length(&self, query_len: usize, template_len: usize) -> bool {
        let Some(ratio) = self.config.length_prune_ratio else {
            return false;
        };
        if template_len == 0 {
            return true;
        }
        let longer = query_len.max(template_len) as f64;
        let shorter = query_len.min(template_len) as f64;
        longer / shorter > ratio
    }
}
