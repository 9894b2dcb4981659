pub mod converters;
pub mod domain;
pub mod engine;
pub mod export;
pub mod redistribution;
pub mod scale;
pub mod template;

#[cfg(test)]
mod tests;

pub use converters::{
    parse_minutes, suggest_from_form, MetricInput, MetricInputError, MetricKind,
    RatingSuggestion, SuggestionBatch,
};
pub use domain::{
    format_percent, Criterion, CriterionId, Evaluation, EvaluationError, EvaluationMetadata,
    KeyMetric, Observations, Rating, Section, SlaParameter, SlaPriority, TicketStatistics,
    SECTION_COUNT,
};
pub use engine::{
    Contribution, CriterionScore, EvaluationScore, ScoringEngine, SectionOutcome, SectionScore,
};
pub use export::{export_to_path, to_csv_bytes, write_csv, ExportError};
pub use redistribution::WeightRedistribution;
pub use scale::RatingLabel;
pub use template::{CriterionTemplate, EvaluationTemplate, SectionTemplate};
