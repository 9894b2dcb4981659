use super::domain::{Criterion, CriterionId, Evaluation, Rating, Section};
use super::redistribution::WeightRedistribution;
use super::scale::RatingLabel;
use serde::Serialize;
use tracing::debug;

/// Per-criterion result (the "ponderado" column).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Contribution {
    NotApplicable,
    /// Applicable but not rated yet; counts as zero without freeing its weight.
    Unrated,
    Weighted(f64),
}

impl Contribution {
    pub fn value(self) -> f64 {
        match self {
            Self::Weighted(value) => value,
            Self::NotApplicable | Self::Unrated => 0.0,
        }
    }

    /// Display text: `N/A`, `0`, or the value rounded to three decimals.
    pub fn display(self) -> String {
        match self {
            Self::NotApplicable => "N/A".to_string(),
            Self::Unrated => "0".to_string(),
            Self::Weighted(value) => format!("{value:.3}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionScore {
    pub id: CriterionId,
    pub name: String,
    pub weight: f64,
    pub adjusted_weight: f64,
    pub rating: Option<Rating>,
    pub contribution: Contribution,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SectionOutcome {
    Scored {
        subtotal: f64,
        normalized: f64,
        label: RatingLabel,
    },
    /// Every criterion is N/A; reported as such rather than as zero.
    NotApplicable,
}

impl SectionOutcome {
    pub fn subtotal(self) -> Option<f64> {
        match self {
            Self::Scored { subtotal, .. } => Some(subtotal),
            Self::NotApplicable => None,
        }
    }

    pub fn label(self) -> Option<RatingLabel> {
        match self {
            Self::Scored { label, .. } => Some(label),
            Self::NotApplicable => None,
        }
    }

    pub fn subtotal_display(self) -> String {
        match self {
            Self::Scored { subtotal, .. } => format!("{subtotal:.3}"),
            Self::NotApplicable => "N/A".to_string(),
        }
    }

    pub fn label_display(self) -> &'static str {
        match self {
            Self::Scored { label, .. } => label.label(),
            Self::NotApplicable => "N/A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionScore {
    pub number: u8,
    pub title: String,
    pub nominal_weight: f64,
    pub redistribution: WeightRedistribution,
    pub criteria: Vec<CriterionScore>,
    pub outcome: SectionOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationScore {
    pub sections: Vec<SectionScore>,
    pub total: f64,
    pub normalized_total: f64,
    pub label: RatingLabel,
}

impl EvaluationScore {
    pub fn total_display(&self) -> String {
        format!("{:.3}", self.total)
    }

    pub fn section(&self, number: u8) -> Option<&SectionScore> {
        self.sections.iter().find(|section| section.number == number)
    }
}

/// Stateless scorer. Every call recomputes from the form as given; nothing is cached between
/// edits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, evaluation: &Evaluation) -> EvaluationScore {
        let sections: Vec<SectionScore> = evaluation
            .sections()
            .iter()
            .map(|section| self.score_section(section))
            .collect();

        let total: f64 = sections
            .iter()
            .filter_map(|section| section.outcome.subtotal())
            .sum();
        // Section shares sum to 1, so the global subtotal spans [1, 5].
        let normalized_total = (total - 1.0) / 4.0;
        let label = RatingLabel::classify(normalized_total);

        debug!(total, normalized_total, %label, "evaluation scored");

        EvaluationScore {
            sections,
            total,
            normalized_total,
            label,
        }
    }

    pub fn score_section(&self, section: &Section) -> SectionScore {
        let redistribution = WeightRedistribution::compute(
            section
                .criteria()
                .iter()
                .map(|criterion| (criterion.weight, criterion.applicable)),
        );

        let mut subtotal = 0.0;
        let criteria: Vec<CriterionScore> = section
            .criteria()
            .iter()
            .map(|criterion| {
                let scored = score_criterion(criterion, &redistribution);
                subtotal += scored.contribution.value();
                scored
            })
            .collect();

        let outcome = if redistribution.all_not_applicable() {
            SectionOutcome::NotApplicable
        } else {
            let nominal = section.nominal_weight();
            let normalized = (subtotal - nominal) / (nominal * 4.0);
            SectionOutcome::Scored {
                subtotal,
                normalized,
                label: RatingLabel::classify(normalized),
            }
        };

        debug!(
            section = section.number(),
            factor = redistribution.factor,
            subtotal = %outcome.subtotal_display(),
            label = outcome.label_display(),
            "section scored"
        );

        SectionScore {
            number: section.number(),
            title: section.title().to_string(),
            nominal_weight: section.nominal_weight(),
            redistribution,
            criteria,
            outcome,
        }
    }
}

fn score_criterion(criterion: &Criterion, redistribution: &WeightRedistribution) -> CriterionScore {
    let (adjusted_weight, contribution) = if !criterion.applicable {
        (0.0, Contribution::NotApplicable)
    } else {
        let adjusted = redistribution.adjusted(criterion.weight);
        let contribution = match criterion.rating() {
            Some(rating) => Contribution::Weighted(rating.value() as f64 * adjusted),
            None => Contribution::Unrated,
        };
        (adjusted, contribution)
    };

    CriterionScore {
        id: criterion.id,
        name: criterion.name.clone(),
        weight: criterion.weight,
        adjusted_weight,
        rating: criterion.rating(),
        contribution,
    }
}
