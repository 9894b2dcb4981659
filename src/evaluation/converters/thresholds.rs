use crate::evaluation::domain::{CriterionId, Rating};
use serde::{Deserialize, Serialize};

/// Metrics the rating calculator knows how to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    ResponseTime,
    ProblemResolution,
    Uptime,
    TicketResolution,
    ReopenRate,
    DeliveryDelay,
}

impl MetricKind {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::ResponseTime,
            Self::ProblemResolution,
            Self::Uptime,
            Self::TicketResolution,
            Self::ReopenRate,
            Self::DeliveryDelay,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ResponseTime => "Tiempo de respuesta a incidentes críticos",
            Self::ProblemResolution => "Tiempo de resolución de problemas",
            Self::Uptime => "Disponibilidad del servicio (uptime)",
            Self::TicketResolution => "Cantidad de tickets resueltos vs. pendientes",
            Self::ReopenRate => "Tasa de reapertura de tickets",
            Self::DeliveryDelay => "Cumplimiento de entregables documentales",
        }
    }

    /// Criterion on the standard form that receives this metric's suggested rating.
    pub const fn target(self) -> CriterionId {
        match self {
            Self::ResponseTime => CriterionId::new(1, 1),
            Self::ProblemResolution => CriterionId::new(1, 2),
            Self::Uptime => CriterionId::new(1, 3),
            Self::TicketResolution => CriterionId::new(2, 1),
            Self::ReopenRate => CriterionId::new(2, 4),
            Self::DeliveryDelay => CriterionId::new(6, 1),
        }
    }

    /// Applies this metric's threshold table to the derived value.
    pub fn rate(self, metric: f64) -> Rating {
        let rating = match self {
            // Percentage of the agreed SLA actually consumed.
            Self::ResponseTime => {
                if metric > 150.0 {
                    1
                } else if metric > 100.0 {
                    2
                } else if metric >= 90.0 {
                    3
                } else if metric >= 70.0 {
                    4
                } else {
                    5
                }
            }
            // Percentage of the agreed average resolution time.
            Self::ProblemResolution => {
                if metric > 150.0 {
                    1
                } else if metric >= 120.0 {
                    2
                } else if metric >= 100.0 {
                    3
                } else if metric >= 80.0 {
                    4
                } else {
                    5
                }
            }
            Self::Uptime => {
                if metric < 98.0 {
                    1
                } else if metric < 99.0 {
                    2
                } else if metric < 99.6 {
                    3
                } else if metric < 99.9 {
                    4
                } else {
                    5
                }
            }
            Self::TicketResolution => {
                if metric < 60.0 {
                    1
                } else if metric < 75.0 {
                    2
                } else if metric < 85.0 {
                    3
                } else if metric < 95.0 {
                    4
                } else {
                    5
                }
            }
            Self::ReopenRate => {
                if metric > 30.0 {
                    1
                } else if metric > 20.0 {
                    2
                } else if metric > 10.0 {
                    3
                } else if metric > 5.0 {
                    4
                } else {
                    5
                }
            }
            // Whole days late; zero or negative means on time or early.
            Self::DeliveryDelay => {
                if metric > 10.0 {
                    1
                } else if metric > 5.0 {
                    2
                } else if metric > 2.0 {
                    3
                } else if metric > 0.0 {
                    4
                } else {
                    5
                }
            }
        };

        Rating::clamped(rating)
    }

    pub fn justification(self, rating: Rating) -> &'static str {
        let table: [&'static str; 5] = match self {
            Self::ResponseTime => [
                ">150% del SLA acordado",
                "101-150% del SLA",
                "90-100% del SLA",
                "70-89% del SLA",
                "<70% del SLA",
            ],
            Self::ProblemResolution => [
                ">150% del promedio acordado",
                "120-150% del promedio",
                "100-119% del promedio",
                "80-99% del promedio",
                "<80% del promedio",
            ],
            Self::Uptime => ["<98%", "98-98.9%", "99-99.5%", "99.6-99.8%", ">99.8%"],
            Self::TicketResolution => [
                "<60% resueltos",
                "60-74% resueltos",
                "75-84% resueltos",
                "85-94% resueltos",
                "≥95% resueltos",
            ],
            Self::ReopenRate => [
                ">30% reabiertos",
                "21-30% reabiertos",
                "11-20% reabiertos",
                "6-10% reabiertos",
                "≤5% reabiertos",
            ],
            Self::DeliveryDelay => [
                ">10 días de retraso",
                "6-10 días de retraso",
                "3-5 días de retraso",
                "1-2 días de retraso",
                "En fecha o anticipado",
            ],
        };

        table
            .get(usize::from(rating.value()).saturating_sub(1))
            .copied()
            .unwrap_or("No disponible")
    }
}
