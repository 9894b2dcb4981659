//! Metric-to-rating calculators.
//!
//! Each calculator turns a raw operational metric (SLA consumption, uptime, ticket ratios,
//! delivery delay) into a suggested 1-5 rating for a specific criterion of the standard form.
//! Suggestions are advisory: the host decides whether to write them into the evaluation.

mod duration;
mod thresholds;

pub use duration::parse_minutes;
pub use thresholds::MetricKind;

use super::domain::{CriterionId, Evaluation, EvaluationError, Rating, SlaPriority};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::warn;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Typed input for one calculator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricInput {
    ResponseTime {
        agreed_minutes: f64,
        actual_minutes: f64,
    },
    ProblemResolution {
        agreed_minutes: f64,
        actual_minutes: f64,
    },
    Uptime {
        percent: f64,
    },
    TicketResolution {
        opened: u32,
        resolved: u32,
    },
    ReopenRate {
        resolved: u32,
        reopened: u32,
    },
    DeliveryDelay {
        committed: NaiveDateTime,
        delivered: NaiveDateTime,
    },
}

impl MetricInput {
    /// Builds a response-time input from free-text durations such as `"4 horas"`.
    /// Unrecognized text counts as zero minutes.
    pub fn response_time_from_text(agreed: &str, actual: &str) -> Self {
        Self::ResponseTime {
            agreed_minutes: parse_minutes(agreed),
            actual_minutes: parse_minutes(actual),
        }
    }

    /// Builds a delivery input from `YYYY-MM-DD` or RFC 3339 strings.
    pub fn delivery_delay_from_text(
        committed: &str,
        delivered: &str,
    ) -> Result<Self, MetricInputError> {
        Ok(Self::DeliveryDelay {
            committed: parse_datetime(committed)?,
            delivered: parse_datetime(delivered)?,
        })
    }

    pub const fn kind(&self) -> MetricKind {
        match self {
            Self::ResponseTime { .. } => MetricKind::ResponseTime,
            Self::ProblemResolution { .. } => MetricKind::ProblemResolution,
            Self::Uptime { .. } => MetricKind::Uptime,
            Self::TicketResolution { .. } => MetricKind::TicketResolution,
            Self::ReopenRate { .. } => MetricKind::ReopenRate,
            Self::DeliveryDelay { .. } => MetricKind::DeliveryDelay,
        }
    }

    /// Runs the calculator. Invalid input is reported instead of defaulting to a rating.
    pub fn suggest(&self) -> Result<RatingSuggestion, MetricInputError> {
        let kind = self.kind();
        let (metric, detail) = match *self {
            Self::ResponseTime {
                agreed_minutes,
                actual_minutes,
            } => {
                let pct = time_ratio(agreed_minutes, actual_minutes)?;
                (pct, format!("Porcentaje del SLA: {pct:.2}%"))
            }
            Self::ProblemResolution {
                agreed_minutes,
                actual_minutes,
            } => {
                let pct = time_ratio(agreed_minutes, actual_minutes)?;
                (pct, format!("Porcentaje del promedio acordado: {pct:.2}%"))
            }
            Self::Uptime { percent } => {
                if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
                    return Err(MetricInputError::PercentOutOfRange(percent));
                }
                (percent, format!("Uptime: {percent}%"))
            }
            Self::TicketResolution { opened, resolved } => {
                if opened == 0 {
                    return Err(MetricInputError::NoTicketsOpened);
                }
                let pct = resolved as f64 / opened as f64 * 100.0;
                (pct, format!("Porcentaje de resolución: {pct:.2}%"))
            }
            Self::ReopenRate { resolved, reopened } => {
                if resolved == 0 {
                    return Err(MetricInputError::NoTicketsResolved);
                }
                let pct = reopened as f64 / resolved as f64 * 100.0;
                (pct, format!("Porcentaje de reapertura: {pct:.2}%"))
            }
            Self::DeliveryDelay {
                committed,
                delivered,
            } => {
                let seconds = (delivered - committed).num_seconds() as f64;
                let days = (seconds / SECONDS_PER_DAY).ceil();
                (
                    days,
                    format!("Días de diferencia: {days} (positivo = retraso, negativo = anticipado)"),
                )
            }
        };

        let rating = kind.rate(metric);
        Ok(RatingSuggestion {
            kind,
            target: kind.target(),
            metric,
            rating,
            justification: kind.justification(rating),
            detail,
        })
    }
}

fn time_ratio(agreed_minutes: f64, actual_minutes: f64) -> Result<f64, MetricInputError> {
    if !agreed_minutes.is_finite() || agreed_minutes <= 0.0 {
        return Err(MetricInputError::NonPositiveAgreedTime);
    }
    if !actual_minutes.is_finite() || actual_minutes < 0.0 {
        return Err(MetricInputError::NegativeActualTime);
    }
    Ok(actual_minutes / agreed_minutes * 100.0)
}

fn parse_datetime(value: &str) -> Result<NaiveDateTime, MetricInputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MetricInputError::MissingDate);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.naive_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| MetricInputError::InvalidDate(trimmed.to_string()))
}

/// Calculator output, ready to be written into its target criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSuggestion {
    pub kind: MetricKind,
    pub target: CriterionId,
    /// Derived value the threshold table was applied to (percentage or days).
    pub metric: f64,
    pub rating: Rating,
    pub justification: &'static str,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricInputError {
    #[error("agreed time must be greater than zero")]
    NonPositiveAgreedTime,
    #[error("actual time cannot be negative")]
    NegativeActualTime,
    #[error("percentage {0} is outside 0-100")]
    PercentOutOfRange(f64),
    #[error("opened ticket count must be greater than zero")]
    NoTicketsOpened,
    #[error("resolved ticket count must be greater than zero")]
    NoTicketsResolved,
    #[error("both dates are required")]
    MissingDate,
    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

impl MetricInputError {
    /// Short message for the transient notice shown to the evaluator.
    pub fn notice(&self) -> &'static str {
        match self {
            Self::NonPositiveAgreedTime => {
                "Error: Ingrese un tiempo acordado válido (mayor que 0)"
            }
            Self::NegativeActualTime => "Error: Ingrese un tiempo real válido (0 o mayor)",
            Self::PercentOutOfRange(_) => "Error: Ingrese un porcentaje válido (0-100)",
            Self::NoTicketsOpened => {
                "Error: Ingrese un número válido de tickets abiertos (mayor que 0)"
            }
            Self::NoTicketsResolved => {
                "Error: Ingrese un número válido de tickets resueltos (mayor que 0)"
            }
            Self::MissingDate => "Error: Ingrese ambas fechas para calcular.",
            Self::InvalidDate(_) => "Error: Formato de fecha inválido. Use AAAA-MM-DD.",
        }
    }
}

/// Result of deriving suggestions from the metrics already entered on the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionBatch {
    pub suggestions: Vec<RatingSuggestion>,
    pub skipped: Vec<(MetricKind, MetricInputError)>,
}

/// Derives suggestions from the ticket statistics and the critical-priority SLA row.
///
/// Metrics that were not filled in are left alone. Metrics that were filled in but are
/// unusable end up in `skipped`.
pub fn suggest_from_form(evaluation: &Evaluation) -> SuggestionBatch {
    let mut batch = SuggestionBatch::default();
    let tickets = evaluation.tickets;

    if tickets.opened > 0 && tickets.resolved > 0 {
        batch.push(MetricInput::TicketResolution {
            opened: tickets.opened,
            resolved: tickets.resolved,
        });
        batch.push(MetricInput::ReopenRate {
            resolved: tickets.resolved,
            reopened: tickets.reopened,
        });
    }

    if let Some(sla) = evaluation.sla_for(SlaPriority::Critical) {
        if !sla.agreed.trim().is_empty() && !sla.actual.trim().is_empty() {
            batch.push(MetricInput::response_time_from_text(&sla.agreed, &sla.actual));
        }
    }

    batch
}

impl SuggestionBatch {
    fn push(&mut self, input: MetricInput) {
        match input.suggest() {
            Ok(suggestion) => self.suggestions.push(suggestion),
            Err(err) => {
                warn!(kind = ?input.kind(), error = %err, "metric skipped");
                self.skipped.push((input.kind(), err));
            }
        }
    }
}

impl Evaluation {
    /// Writes a suggested rating into its target criterion. N/A targets are refused.
    pub fn apply_suggestion(
        &mut self,
        suggestion: &RatingSuggestion,
    ) -> Result<(), EvaluationError> {
        self.rate(suggestion.target, Some(i64::from(suggestion.rating.value())))
    }

    /// Applies every suggestion in the batch and returns the ones that could not be written.
    pub fn apply_suggestions(&mut self, batch: &SuggestionBatch) -> Vec<EvaluationError> {
        batch
            .suggestions
            .iter()
            .filter_map(|suggestion| {
                self.apply_suggestion(suggestion)
                    .map_err(|err| {
                        warn!(criterion = %suggestion.target, error = %err, "suggestion not applied");
                        err
                    })
                    .err()
            })
            .collect()
    }
}
