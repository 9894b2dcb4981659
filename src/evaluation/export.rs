//! CSV rendering of a completed evaluation.
//!
//! The document is a sequence of titled blocks separated by blank lines, prefixed with a
//! UTF-8 byte-order mark so spreadsheet tools pick the right encoding.

use super::domain::{format_percent, Evaluation};
use super::engine::EvaluationScore;
use chrono::NaiveDate;
use std::io::Write;
use std::path::Path;
use tracing::info;

const BOM: &str = "\u{feff}";

pub const SECTION_HEADER: [&str; 5] = [
    "Criterio",
    "Peso",
    "Calificación (1-5)",
    "Ponderado",
    "Observaciones",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// One exported field. Free-text and computed columns are always quoted; labels and
/// numbers are quoted only when they contain a separator, quote or newline.
#[derive(Debug, Clone)]
enum Cell {
    Plain(String),
    Quoted(String),
}

type Block = Vec<Vec<Cell>>;

/// Renders the evaluation and its score as CSV bytes.
pub fn to_csv_bytes(
    evaluation: &Evaluation,
    score: &EvaluationScore,
) -> Result<Vec<u8>, ExportError> {
    let mut output = BOM.as_bytes().to_vec();
    let blocks = document_blocks(evaluation, score);
    let last = blocks.len().saturating_sub(1);

    for (index, block) in blocks.iter().enumerate() {
        output.extend(encode_block(block)?);
        if index != last {
            output.push(b'\n');
        }
    }

    Ok(output)
}

pub fn write_csv<W: Write>(
    mut writer: W,
    evaluation: &Evaluation,
    score: &EvaluationScore,
) -> Result<(), ExportError> {
    writer.write_all(&to_csv_bytes(evaluation, score)?)?;
    writer.flush()?;
    Ok(())
}

pub fn export_to_path<P: AsRef<Path>>(
    path: P,
    evaluation: &Evaluation,
    score: &EvaluationScore,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), evaluation, score)?;
    info!(path = %path.display(), vendor = %evaluation.metadata.vendor, "evaluation exported");
    Ok(())
}

fn encode_block(block: &Block) -> Result<Vec<u8>, ExportError> {
    let mut output = Vec::new();
    for record in block {
        for (index, cell) in record.iter().enumerate() {
            if index > 0 {
                output.push(b',');
            }
            output.extend(encode_cell(cell)?);
        }
        output.push(b'\n');
    }
    Ok(output)
}

fn encode_cell(cell: &Cell) -> Result<Vec<u8>, ExportError> {
    let (text, style) = match cell {
        Cell::Plain(text) if text.is_empty() => return Ok(Vec::new()),
        Cell::Plain(text) => (text, csv::QuoteStyle::Necessary),
        Cell::Quoted(text) => (text, csv::QuoteStyle::Always),
    };

    let mut writer = csv::WriterBuilder::new()
        .quote_style(style)
        .from_writer(Vec::new());
    writer.write_field(text)?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}

fn document_blocks(evaluation: &Evaluation, score: &EvaluationScore) -> Vec<Block> {
    let mut blocks = vec![
        general_block(evaluation),
        sla_block(evaluation),
        tickets_block(evaluation),
    ];
    blocks.extend(section_blocks(evaluation, score));
    blocks.push(results_block(score));
    blocks.push(key_metrics_block(evaluation));
    blocks.push(observations_block(evaluation));
    blocks
}

fn row<const N: usize>(fields: [&str; N]) -> Vec<Cell> {
    fields
        .iter()
        .map(|field| Cell::Plain(field.to_string()))
        .collect()
}

fn plain(text: &str) -> Cell {
    Cell::Plain(text.to_string())
}

fn quoted(text: &str) -> Cell {
    Cell::Quoted(text.to_string())
}

fn date_text(date: Option<NaiveDate>) -> String {
    date.map(|value| value.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

fn general_block(evaluation: &Evaluation) -> Block {
    let metadata = &evaluation.metadata;
    vec![
        row(["Datos Generales"]),
        row(["Nombre del Proveedor", &metadata.vendor]),
        row(["Período de Evaluación", &metadata.period]),
        row(["Responsable de la Evaluación", &metadata.evaluator]),
        row([
            "Fecha de Evaluación",
            &date_text(metadata.evaluation_date),
        ]),
    ]
}

fn sla_block(evaluation: &Evaluation) -> Block {
    let mut block = vec![
        row(["Parámetros de Evaluación - Tiempos de Respuesta Acordados (SLA)"]),
        row(["Prioridad", "Tiempo Acordado", "Valor Actual"]),
    ];
    block.extend(
        evaluation
            .sla
            .iter()
            .map(|sla| {
                vec![
                    plain(sla.priority.label()),
                    quoted(&sla.agreed),
                    quoted(&sla.actual),
                ]
            }),
    );
    block
}

fn tickets_block(evaluation: &Evaluation) -> Block {
    let tickets = evaluation.tickets;
    vec![
        row(["Parámetros de Evaluación - Estadísticas de Tickets"]),
        row(["Métricas", "Valor"]),
        vec![plain("Tickets abiertos"), quoted(&tickets.opened.to_string())],
        vec![plain("Tickets resueltos"), quoted(&tickets.resolved.to_string())],
        vec![plain("Tickets reabiertos"), quoted(&tickets.reopened.to_string())],
        vec![
            plain("Porcentaje de resolución"),
            quoted(&tickets.resolution_rate_display()),
        ],
        vec![
            plain("Porcentaje de reapertura"),
            quoted(&tickets.reopen_rate_display()),
        ],
    ]
}

fn section_blocks(evaluation: &Evaluation, score: &EvaluationScore) -> Vec<Block> {
    evaluation
        .sections()
        .iter()
        .zip(&score.sections)
        .map(|(section, scored)| {
            let mut block = vec![row([section.title()]), row(SECTION_HEADER)];
            for (criterion, criterion_score) in section.criteria().iter().zip(&scored.criteria) {
                let rating = criterion
                    .rating()
                    .map(|rating| rating.to_string())
                    .unwrap_or_default();
                block.push(vec![
                    quoted(&criterion.name),
                    plain(&format_percent(criterion.weight)),
                    plain(&rating),
                    quoted(&criterion_score.contribution.display()),
                    quoted(&criterion.observation),
                ]);
            }
            block.push(row([
                "Subtotal",
                &format_percent(section.nominal_weight()),
                "",
                &scored.outcome.subtotal_display(),
                "",
            ]));
            block
        })
        .collect()
}

fn results_block(score: &EvaluationScore) -> Block {
    let mut block = vec![
        row(["Resultados Finales"]),
        row(["Sección", "Peso", "Puntaje Ponderado", "Calificación"]),
    ];
    block.extend(score.sections.iter().map(|section| {
        vec![
            quoted(&section.title),
            plain(&format_percent(section.nominal_weight)),
            quoted(&section.outcome.subtotal_display()),
            quoted(section.outcome.label_display()),
        ]
    }));
    block.push(vec![
        quoted("Total"),
        plain("100%"),
        quoted(&score.total_display()),
        quoted(score.label.label()),
    ]);
    block
}

fn key_metrics_block(evaluation: &Evaluation) -> Block {
    let mut block = vec![row(["Análisis de Métricas Clave"])];
    block.extend(
        evaluation
            .key_metrics
            .iter()
            .map(|metric| {
                vec![
                    quoted(metric.label.trim().trim_end_matches(':')),
                    quoted(&metric.value),
                ]
            }),
    );
    block
}

fn observations_block(evaluation: &Evaluation) -> Block {
    let observations = &evaluation.observations;
    vec![
        row(["Observaciones Generales y Plan de Acción"]),
        vec![
            plain("Fortalezas identificadas"),
            quoted(&observations.strengths),
        ],
        vec![plain("Áreas de mejora"), quoted(&observations.improvement_areas)],
        vec![
            plain("Plan de acción recomendado"),
            quoted(&observations.action_plan),
        ],
        row([
            "Fecha de próxima evaluación",
            &date_text(evaluation.metadata.next_evaluation),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::{CriterionId, EvaluationMetadata};
    use crate::evaluation::engine::ScoringEngine;
    use crate::evaluation::template::EvaluationTemplate;

    fn rendered(evaluation: &Evaluation) -> String {
        let score = ScoringEngine::new().score(evaluation);
        let bytes = to_csv_bytes(evaluation, &score).expect("export renders");
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn document_starts_with_bom_and_general_block() {
        let metadata = EvaluationMetadata {
            vendor: "Acme, S.A.".to_string(),
            ..EvaluationMetadata::default()
        };
        let evaluation = EvaluationTemplate::standard()
            .instantiate(metadata)
            .expect("standard form");

        let text = rendered(&evaluation);
        assert!(text.starts_with('\u{feff}'));
        let mut lines = text.trim_start_matches('\u{feff}').lines();
        assert_eq!(lines.next(), Some("Datos Generales"));
        assert_eq!(lines.next(), Some("Nombre del Proveedor,\"Acme, S.A.\""));
    }

    #[test]
    fn not_applicable_criteria_render_as_na() {
        let mut evaluation = EvaluationTemplate::standard()
            .instantiate(EvaluationMetadata::default())
            .expect("standard form");
        evaluation
            .set_applicable(CriterionId::new(1, 3), false)
            .expect("criterion exists");
        evaluation
            .rate(CriterionId::new(1, 1), Some(4))
            .expect("criterion exists");

        let text = rendered(&evaluation);
        assert!(text.contains("\"Disponibilidad del servicio (uptime)\",7%,,\"N/A\",\"\"\n"));
        assert!(text.contains("\"Tiempo de respuesta a incidentes críticos\",10%,4,\"0.556\","));
        assert!(text.contains("\nSubtotal,25%,,0.556,\n"));
        assert!(text.contains("\n\nResultados Finales\n"));
        assert!(text.ends_with("Fecha de próxima evaluación,\n"));
    }

    #[test]
    fn text_columns_are_always_quoted_and_escaped() {
        let mut evaluation = EvaluationTemplate::standard()
            .instantiate(EvaluationMetadata::default())
            .expect("standard form");
        evaluation
            .set_observation(CriterionId::new(6, 2), "Factura \"B-12\" duplicada")
            .expect("criterion exists");
        evaluation.observations.strengths = "Atención rápida".to_string();

        let text = rendered(&evaluation);
        assert!(text.contains(
            "\"Precisión en la facturación\",3%,,\"0\",\"Factura \"\"B-12\"\" duplicada\"\n"
        ));
        assert!(text.contains("Fortalezas identificadas,\"Atención rápida\"\n"));
        assert!(text.contains("Áreas de mejora,\"\"\n"));
        assert!(text.contains("Crítica,\"\",\"\"\n"));
        assert!(text.contains("\"Total\",100%,\"0.000\",\"Deficiente\"\n"));
    }
}
