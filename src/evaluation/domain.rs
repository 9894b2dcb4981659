use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of sections on every vendor evaluation form.
pub const SECTION_COUNT: usize = 6;

pub(crate) const WEIGHT_TOLERANCE: f64 = 1e-6;

/// Integer rating on the 1 (worst) to 5 (best) scale.
///
/// Construction clamps out-of-range input, mirroring the form field, so a stored rating is
/// always within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN as i64, Self::MAX as i64) as u8)
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Rating {
    fn from(value: i64) -> Self {
        Self::clamped(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable address of a criterion: 1-based section number and 1-based position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CriterionId {
    pub section: u8,
    pub position: u8,
}

impl CriterionId {
    pub const fn new(section: u8, position: u8) -> Self {
        Self { section, position }
    }
}

impl fmt::Display for CriterionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}.C{}", self.section, self.position)
    }
}

/// One evaluable row of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: CriterionId,
    pub name: String,
    /// Share of the whole form, e.g. `0.10` for a 10% criterion.
    pub weight: f64,
    #[serde(default = "default_applicable")]
    pub applicable: bool,
    #[serde(default)]
    rating: Option<Rating>,
    #[serde(default)]
    pub observation: String,
}

fn default_applicable() -> bool {
    true
}

impl Criterion {
    pub fn new(id: CriterionId, name: impl Into<String>, weight: f64) -> Self {
        Self {
            id,
            name: name.into(),
            weight,
            applicable: true,
            rating: None,
            observation: String::new(),
        }
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    /// Toggles the N/A flag. Marking a criterion N/A discards its rating, and clearing the
    /// flag again leaves it unrated.
    pub fn set_applicable(&mut self, applicable: bool) {
        self.applicable = applicable;
        if !applicable {
            self.rating = None;
        }
    }

    /// Sets or clears the rating, clamping to the 1-5 scale.
    pub fn rate(&mut self, value: Option<i64>) -> Result<(), EvaluationError> {
        if !self.applicable {
            return Err(EvaluationError::CriterionNotApplicable(self.id));
        }
        self.rating = value.map(Rating::clamped);
        Ok(())
    }
}

/// Ordered group of criteria sharing one nominal share of the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection")]
pub struct Section {
    number: u8,
    title: String,
    nominal_weight: f64,
    criteria: Vec<Criterion>,
}

#[derive(Deserialize)]
struct RawSection {
    number: u8,
    title: String,
    nominal_weight: f64,
    criteria: Vec<Criterion>,
}

impl TryFrom<RawSection> for Section {
    type Error = EvaluationError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        Section::new(raw.number, raw.title, raw.nominal_weight, raw.criteria)
    }
}

impl Section {
    /// Builds a section, checking that member weights add up to the nominal share.
    pub fn new(
        number: u8,
        title: impl Into<String>,
        nominal_weight: f64,
        mut criteria: Vec<Criterion>,
    ) -> Result<Self, EvaluationError> {
        if !(nominal_weight.is_finite() && nominal_weight > 0.0) {
            return Err(EvaluationError::InvalidSectionWeight(number));
        }
        if criteria.is_empty() {
            return Err(EvaluationError::EmptySection(number));
        }

        for (index, criterion) in criteria.iter_mut().enumerate() {
            let expected = CriterionId::new(number, (index + 1) as u8);
            if criterion.id != expected {
                return Err(EvaluationError::MisplacedCriterion {
                    expected,
                    found: criterion.id,
                });
            }
            if !(criterion.weight.is_finite() && criterion.weight > 0.0) {
                return Err(EvaluationError::InvalidWeight(criterion.id));
            }
            if !criterion.applicable {
                criterion.rating = None;
            }
        }

        let total: f64 = criteria.iter().map(|criterion| criterion.weight).sum();
        let covers_share = (total - nominal_weight).abs() <= WEIGHT_TOLERANCE;
        if !covers_share {
            return Err(EvaluationError::SectionWeightMismatch {
                section: number,
                nominal: nominal_weight,
                total,
            });
        }

        Ok(Self {
            number,
            title: title.into(),
            nominal_weight,
            criteria,
        })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nominal_weight(&self) -> f64 {
        self.nominal_weight
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn total_weight(&self) -> f64 {
        self.criteria.iter().map(|criterion| criterion.weight).sum()
    }

    pub fn na_weight(&self) -> f64 {
        self.criteria
            .iter()
            .filter(|criterion| !criterion.applicable)
            .map(|criterion| criterion.weight)
            .sum()
    }

    pub fn applicable_weight(&self) -> f64 {
        self.total_weight() - self.na_weight()
    }

    fn criterion_mut(&mut self, position: u8) -> Option<&mut Criterion> {
        self.criteria
            .iter_mut()
            .find(|criterion| criterion.id.position == position)
    }
}

/// Header block of the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub evaluator: String,
    #[serde(default)]
    pub evaluation_date: Option<NaiveDate>,
    #[serde(default)]
    pub next_evaluation: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaPriority {
    Critical,
    High,
    Medium,
    Low,
}

impl SlaPriority {
    pub const fn ordered() -> [Self; 4] {
        [Self::Critical, Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Critical => "Crítica",
            Self::High => "Alta",
            Self::Medium => "Media",
            Self::Low => "Baja",
        }
    }
}

/// Agreed vs. observed response time for one priority, as typed by the evaluator
/// (for example "4 horas" / "3.5 horas").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlaParameter {
    pub priority: SlaPriority,
    #[serde(default)]
    pub agreed: String,
    #[serde(default)]
    pub actual: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketStatistics {
    pub opened: u32,
    pub resolved: u32,
    pub reopened: u32,
}

impl TicketStatistics {
    pub fn resolution_rate(&self) -> Option<f64> {
        (self.opened > 0).then(|| self.resolved as f64 / self.opened as f64 * 100.0)
    }

    pub fn reopen_rate(&self) -> Option<f64> {
        (self.resolved > 0).then(|| self.reopened as f64 / self.resolved as f64 * 100.0)
    }

    pub fn resolution_rate_display(&self) -> String {
        percent_or_na(self.resolution_rate())
    }

    pub fn reopen_rate_display(&self) -> String {
        percent_or_na(self.reopen_rate())
    }
}

fn percent_or_na(value: Option<f64>) -> String {
    match value {
        Some(pct) => format!("{pct:.2}%"),
        None => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetric {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observations {
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub improvement_areas: String,
    #[serde(default)]
    pub action_plan: String,
}

/// Complete in-session form state. The host owns the only mutable instance and rescores it
/// from scratch after every edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvaluation")]
pub struct Evaluation {
    pub metadata: EvaluationMetadata,
    pub sla: Vec<SlaParameter>,
    pub tickets: TicketStatistics,
    sections: [Section; SECTION_COUNT],
    pub key_metrics: Vec<KeyMetric>,
    pub observations: Observations,
}

#[derive(Deserialize)]
struct RawEvaluation {
    #[serde(default)]
    metadata: EvaluationMetadata,
    #[serde(default)]
    sla: Vec<SlaParameter>,
    #[serde(default)]
    tickets: TicketStatistics,
    sections: [Section; SECTION_COUNT],
    #[serde(default)]
    key_metrics: Vec<KeyMetric>,
    #[serde(default)]
    observations: Observations,
}

impl TryFrom<RawEvaluation> for Evaluation {
    type Error = EvaluationError;

    fn try_from(raw: RawEvaluation) -> Result<Self, Self::Error> {
        let mut evaluation = Evaluation::new(raw.metadata, raw.sections)?;
        if !raw.sla.is_empty() {
            evaluation.sla = raw.sla;
        }
        evaluation.tickets = raw.tickets;
        evaluation.key_metrics = raw.key_metrics;
        evaluation.observations = raw.observations;
        Ok(evaluation)
    }
}

impl Evaluation {
    /// Builds a form from six sections numbered 1 through 6 whose shares sum to 1.
    pub fn new(
        metadata: EvaluationMetadata,
        sections: [Section; SECTION_COUNT],
    ) -> Result<Self, EvaluationError> {
        for (index, section) in sections.iter().enumerate() {
            let expected = (index + 1) as u8;
            if section.number != expected {
                return Err(EvaluationError::SectionOutOfOrder {
                    expected,
                    found: section.number,
                });
            }
        }

        let total: f64 = sections.iter().map(Section::nominal_weight).sum();
        let sums_to_one = (total - 1.0).abs() <= WEIGHT_TOLERANCE;
        if !sums_to_one {
            return Err(EvaluationError::FormWeightMismatch(total));
        }

        Ok(Self {
            metadata,
            sla: SlaPriority::ordered()
                .into_iter()
                .map(|priority| SlaParameter {
                    priority,
                    agreed: String::new(),
                    actual: String::new(),
                })
                .collect(),
            tickets: TicketStatistics::default(),
            sections,
            key_metrics: Vec::new(),
            observations: Observations::default(),
        })
    }

    /// Like [`Evaluation::new`], for callers that collect sections into a `Vec`.
    pub fn from_sections(
        metadata: EvaluationMetadata,
        sections: Vec<Section>,
    ) -> Result<Self, EvaluationError> {
        let sections: [Section; SECTION_COUNT] = sections
            .try_into()
            .map_err(|rest: Vec<Section>| EvaluationError::SectionCount(rest.len()))?;
        Self::new(metadata, sections)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn criterion(&self, id: CriterionId) -> Option<&Criterion> {
        self.section_for(id.section)?
            .criteria
            .iter()
            .find(|criterion| criterion.id == id)
    }

    pub fn sla_for(&self, priority: SlaPriority) -> Option<&SlaParameter> {
        self.sla.iter().find(|row| row.priority == priority)
    }

    pub fn sla_for_mut(&mut self, priority: SlaPriority) -> Option<&mut SlaParameter> {
        self.sla.iter_mut().find(|row| row.priority == priority)
    }

    pub fn rate(&mut self, id: CriterionId, value: Option<i64>) -> Result<(), EvaluationError> {
        self.criterion_mut(id)?.rate(value)
    }

    pub fn set_applicable(
        &mut self,
        id: CriterionId,
        applicable: bool,
    ) -> Result<(), EvaluationError> {
        self.criterion_mut(id)?.set_applicable(applicable);
        Ok(())
    }

    pub fn set_observation(
        &mut self,
        id: CriterionId,
        observation: impl Into<String>,
    ) -> Result<(), EvaluationError> {
        self.criterion_mut(id)?.observation = observation.into();
        Ok(())
    }

    fn section_for(&self, number: u8) -> Option<&Section> {
        self.sections.iter().find(|section| section.number == number)
    }

    fn criterion_mut(&mut self, id: CriterionId) -> Result<&mut Criterion, EvaluationError> {
        self.sections
            .iter_mut()
            .find(|section| section.number == id.section)
            .and_then(|section| section.criterion_mut(id.position))
            .ok_or(EvaluationError::UnknownCriterion(id))
    }
}

/// Structural and editing errors raised by the form model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    #[error("section {0} has no criteria")]
    EmptySection(u8),
    #[error("criterion {found} found where {expected} was expected")]
    MisplacedCriterion {
        expected: CriterionId,
        found: CriterionId,
    },
    #[error("criterion {0} must have a positive, finite weight")]
    InvalidWeight(CriterionId),
    #[error("section {0} must have a positive, finite share")]
    InvalidSectionWeight(u8),
    #[error("section {section} criteria weigh {total:.4} but the section share is {nominal:.4}")]
    SectionWeightMismatch {
        section: u8,
        nominal: f64,
        total: f64,
    },
    #[error("a form has {} sections, got {0}", SECTION_COUNT)]
    SectionCount(usize),
    #[error("section {found} found where section {expected} was expected")]
    SectionOutOfOrder { expected: u8, found: u8 },
    #[error("section shares must sum to 1, got {0:.4}")]
    FormWeightMismatch(f64),
    #[error("criterion {0} does not exist on this form")]
    UnknownCriterion(CriterionId),
    #[error("criterion {0} is marked not applicable and cannot be rated")]
    CriterionNotApplicable(CriterionId),
}

/// Renders a weight share the way the form shows it, e.g. `0.25` as `25%` and `0.075` as
/// `7.5%`.
pub fn format_percent(share: f64) -> String {
    let text = format!("{:.2}", share * 100.0);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criterion(section: u8, position: u8, weight: f64) -> Criterion {
        Criterion::new(CriterionId::new(section, position), "criterion", weight)
    }

    #[test]
    fn rating_clamps_to_scale() {
        assert_eq!(Rating::clamped(0).value(), 1);
        assert_eq!(Rating::clamped(-4).value(), 1);
        assert_eq!(Rating::clamped(3).value(), 3);
        assert_eq!(Rating::clamped(9).value(), 5);
    }

    #[test]
    fn rating_deserializes_with_clamp() {
        let rating: Rating = serde_json::from_str("7").expect("rating parses");
        assert_eq!(rating.value(), 5);
        assert_eq!(serde_json::to_string(&rating).expect("serializes"), "5");
    }

    #[test]
    fn toggling_not_applicable_forgets_rating() {
        let mut item = criterion(1, 1, 0.1);
        item.rate(Some(4)).expect("applicable criterion accepts rating");
        item.set_applicable(false);
        assert_eq!(item.rating(), None);
        assert_eq!(
            item.rate(Some(3)),
            Err(EvaluationError::CriterionNotApplicable(item.id))
        );

        item.set_applicable(true);
        assert_eq!(item.rating(), None);
    }

    #[test]
    fn section_rejects_weight_mismatch() {
        let members = vec![criterion(1, 1, 0.1), criterion(1, 2, 0.1)];
        let error =
            Section::new(1, "SLA", 0.25, members).expect_err("weights do not cover the share");
        assert!(matches!(
            error,
            EvaluationError::SectionWeightMismatch { section: 1, .. }
        ));
    }

    #[test]
    fn section_rejects_nan_share() {
        let error = Section::new(1, "SLA", f64::NAN, vec![criterion(1, 1, 0.25)])
            .expect_err("NaN share is not a weight");
        assert_eq!(error, EvaluationError::InvalidSectionWeight(1));
    }

    #[test]
    fn section_rejects_zero_share_within_tolerance() {
        let error = Section::new(1, "SLA", 0.0, vec![criterion(1, 1, 5e-7)])
            .expect_err("zero share cannot be scored");
        assert_eq!(error, EvaluationError::InvalidSectionWeight(1));

        let error = Section::new(1, "SLA", -0.25, vec![criterion(1, 1, 0.25)])
            .expect_err("negative share");
        assert_eq!(error, EvaluationError::InvalidSectionWeight(1));
    }

    #[test]
    fn zero_share_section_is_rejected_when_loading_json() {
        let raw = r#"{
            "number": 1,
            "title": "SLA",
            "nominal_weight": 0.0,
            "criteria": [
                { "id": { "section": 1, "position": 1 }, "name": "a", "weight": 5e-7 }
            ]
        }"#;
        let error = serde_json::from_str::<Section>(raw).expect_err("zero share rejected");
        assert!(error.to_string().contains("positive, finite share"));
    }

    #[test]
    fn section_rejects_misplaced_ids() {
        let error = Section::new(2, "Tickets", 0.2, vec![criterion(1, 1, 0.2)])
            .expect_err("criterion belongs to another section");
        assert_eq!(
            error,
            EvaluationError::MisplacedCriterion {
                expected: CriterionId::new(2, 1),
                found: CriterionId::new(1, 1),
            }
        );
    }

    #[test]
    fn section_derives_weights_from_applicability() {
        let mut members = vec![
            criterion(1, 1, 0.10),
            criterion(1, 2, 0.10),
            criterion(1, 3, 0.05),
        ];
        members[1].set_applicable(false);
        let section = Section::new(1, "SLA", 0.25, members).expect("valid section");

        assert!((section.total_weight() - 0.25).abs() < 1e-12);
        assert!((section.na_weight() - 0.10).abs() < 1e-12);
        assert!((section.applicable_weight() - 0.15).abs() < 1e-12);
    }

    #[test]
    fn ticket_rates_render_na_without_denominator() {
        let tickets = TicketStatistics {
            opened: 0,
            resolved: 0,
            reopened: 0,
        };
        assert_eq!(tickets.resolution_rate_display(), "N/A");
        assert_eq!(tickets.reopen_rate_display(), "N/A");

        let tickets = TicketStatistics {
            opened: 120,
            resolved: 102,
            reopened: 7,
        };
        assert_eq!(tickets.resolution_rate_display(), "85.00%");
        assert_eq!(tickets.reopen_rate_display(), "6.86%");
    }

    #[test]
    fn form_needs_every_section() {
        let single = Section::new(1, "SLA", 0.25, vec![criterion(1, 1, 0.25)]).expect("valid");
        let error = Evaluation::from_sections(EvaluationMetadata::default(), vec![single])
            .expect_err("five sections missing");
        assert_eq!(error, EvaluationError::SectionCount(1));
    }

    #[test]
    fn percent_formatting_trims_trailing_zeros() {
        assert_eq!(format_percent(0.25), "25%");
        assert_eq!(format_percent(0.075), "7.5%");
        assert_eq!(format_percent(1.0), "100%");
    }
}
