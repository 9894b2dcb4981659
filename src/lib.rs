//! Weighted scoring for IT vendor evaluations.
//!
//! The library holds the evaluation form model, the scoring engine that redistributes the
//! weight of "not applicable" criteria, the metric-to-rating suggestion calculators, and the
//! CSV export. The binary in `main.rs` is a thin command-line host over these pieces.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod telemetry;
