use chrono::NaiveDate;

use crate::evaluation::domain::{
    Criterion, CriterionId, Evaluation, EvaluationMetadata, Section, SlaPriority,
    TicketStatistics, SECTION_COUNT,
};
use crate::evaluation::template::{EvaluationTemplate, SectionTemplate};

pub(super) const APPROX: f64 = 1e-4;

pub(super) fn metadata() -> EvaluationMetadata {
    EvaluationMetadata {
        vendor: "Soporte Integral TI".to_string(),
        period: "2024-Q1".to_string(),
        evaluator: "Mesa de Servicios".to_string(),
        evaluation_date: NaiveDate::from_ymd_opt(2024, 4, 5),
        next_evaluation: NaiveDate::from_ymd_opt(2024, 7, 5),
    }
}

pub(super) fn standard_evaluation() -> Evaluation {
    EvaluationTemplate::standard()
        .instantiate(metadata())
        .expect("standard form is consistent")
}

/// Standard form whose first section is replaced by three criteria with the given weights.
/// The weights must still add up to the section's 25% share.
pub(super) fn evaluation_with_first_section(weights: [f64; 3]) -> Evaluation {
    let template = EvaluationTemplate::standard();
    let mut sections = Vec::with_capacity(SECTION_COUNT);

    let criteria = weights
        .iter()
        .enumerate()
        .map(|(index, weight)| {
            Criterion::new(
                CriterionId::new(1, (index + 1) as u8),
                format!("Criterio {}", index + 1),
                *weight,
            )
        })
        .collect();
    sections.push(
        Section::new(1, "1. Cumplimiento de Niveles de Servicio (SLA)", 0.25, criteria)
            .expect("first section is consistent"),
    );

    for (index, section) in template.sections().iter().enumerate().skip(1) {
        sections.push(section_from_template((index + 1) as u8, section));
    }

    Evaluation::from_sections(metadata(), sections).expect("form is consistent")
}

fn section_from_template(number: u8, template: &SectionTemplate) -> Section {
    let criteria = template
        .criteria
        .iter()
        .enumerate()
        .map(|(position, criterion)| {
            Criterion::new(
                CriterionId::new(number, (position + 1) as u8),
                criterion.name,
                criterion.weight,
            )
        })
        .collect();
    Section::new(number, template.title, template.nominal_weight, criteria)
        .expect("template section is consistent")
}

/// Rates every applicable criterion of the form with the same value.
pub(super) fn rate_all(evaluation: &mut Evaluation, value: i64) {
    let ids: Vec<CriterionId> = evaluation
        .sections()
        .iter()
        .flat_map(|section| section.criteria())
        .filter(|criterion| criterion.applicable)
        .map(|criterion| criterion.id)
        .collect();
    for id in ids {
        evaluation.rate(id, Some(value)).expect("criterion exists");
    }
}

/// Form with ticket statistics and a critical SLA row filled in.
pub(super) fn evaluation_with_metrics() -> Evaluation {
    let mut evaluation = standard_evaluation();
    evaluation.tickets = TicketStatistics {
        opened: 120,
        resolved: 102,
        reopened: 7,
    };
    let critical = evaluation
        .sla_for_mut(SlaPriority::Critical)
        .expect("critical SLA row exists");
    critical.agreed = "4 horas".to_string();
    critical.actual = "3 horas".to_string();
    evaluation
}

pub(super) fn approx(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < APPROX
}
