use chrono::NaiveDate;
use vendor_eval::evaluation::{
    suggest_from_form, CriterionId, EvaluationMetadata, EvaluationTemplate, RatingLabel,
    ScoringEngine, SectionOutcome, SlaPriority, TicketStatistics,
};

fn metadata() -> EvaluationMetadata {
    EvaluationMetadata {
        vendor: "Redes del Norte".to_string(),
        period: "Enero - Marzo 2024".to_string(),
        evaluator: "Coordinación de Infraestructura".to_string(),
        evaluation_date: NaiveDate::from_ymd_opt(2024, 4, 2),
        next_evaluation: None,
    }
}

#[test]
fn evaluator_session_scores_completed_form() {
    let engine = ScoringEngine::new();
    let mut evaluation = EvaluationTemplate::standard()
        .instantiate(metadata())
        .expect("standard form builds");

    let blank = engine.score(&evaluation);
    assert_eq!(blank.total, 0.0);
    assert!(blank
        .sections
        .iter()
        .all(|section| section.outcome.subtotal() == Some(0.0)));

    evaluation.tickets = TicketStatistics {
        opened: 200,
        resolved: 195,
        reopened: 4,
    };
    let critical = evaluation
        .sla_for_mut(SlaPriority::Critical)
        .expect("critical SLA row exists");
    critical.agreed = "2 horas".to_string();
    critical.actual = "1 hora".to_string();

    let batch = suggest_from_form(&evaluation);
    assert!(evaluation.apply_suggestions(&batch).is_empty());

    // Security section does not apply to this vendor.
    for position in 1..=3 {
        evaluation
            .set_applicable(CriterionId::new(5, position), false)
            .expect("criterion exists");
    }

    for section in 1..=6u8 {
        for position in 1..=4u8 {
            let id = CriterionId::new(section, position);
            let Some(criterion) = evaluation.criterion(id) else {
                continue;
            };
            if criterion.applicable && criterion.rating().is_none() {
                evaluation.rate(id, Some(4)).expect("criterion rated");
            }
        }
    }

    let score = engine.score(&evaluation);

    let sla = score.section(1).expect("sla section");
    assert_eq!(
        sla.criteria[0].rating.map(|rating| rating.value()),
        Some(5),
        "50% of the SLA should be suggested as excellent"
    );
    assert_eq!(score.section(5).map(|s| s.outcome), Some(SectionOutcome::NotApplicable));
    assert!(score.total > 3.0 && score.total < 4.0, "total was {}", score.total);
    assert_eq!(score.label, RatingLabel::Bueno);
}

#[test]
fn ratings_are_clamped_and_na_rating_is_rejected() {
    let mut evaluation = EvaluationTemplate::standard()
        .instantiate(metadata())
        .expect("standard form builds");
    let id = CriterionId::new(3, 1);

    evaluation.rate(id, Some(9)).expect("criterion rated");
    assert_eq!(
        evaluation.criterion(id).and_then(|c| c.rating()).map(|r| r.value()),
        Some(5)
    );
    evaluation.rate(id, Some(0)).expect("criterion rated");
    assert_eq!(
        evaluation.criterion(id).and_then(|c| c.rating()).map(|r| r.value()),
        Some(1)
    );

    evaluation.set_applicable(id, false).expect("criterion exists");
    assert!(evaluation.rate(id, Some(3)).is_err());
    assert!(evaluation.rate(CriterionId::new(9, 1), Some(3)).is_err());
}

#[test]
fn form_survives_json_round_trip() {
    let mut evaluation = EvaluationTemplate::standard()
        .instantiate(metadata())
        .expect("standard form builds");
    evaluation
        .rate(CriterionId::new(2, 2), Some(3))
        .expect("criterion rated");
    evaluation
        .set_applicable(CriterionId::new(4, 3), false)
        .expect("criterion exists");

    let json = serde_json::to_string(&evaluation).expect("serializes");
    let restored: vendor_eval::evaluation::Evaluation =
        serde_json::from_str(&json).expect("deserializes");

    assert_eq!(restored, evaluation);
}
