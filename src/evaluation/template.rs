use super::domain::{
    Criterion, CriterionId, Evaluation, EvaluationError, EvaluationMetadata, Section,
    SECTION_COUNT,
};

#[derive(Debug, Clone, Copy)]
pub struct SectionTemplate {
    pub title: &'static str,
    pub nominal_weight: f64,
    pub criteria: &'static [CriterionTemplate],
}

#[derive(Debug, Clone, Copy)]
pub struct CriterionTemplate {
    pub name: &'static str,
    pub weight: f64,
}

/// Fixed layout of the vendor evaluation form.
#[derive(Debug)]
pub struct EvaluationTemplate {
    sections: [SectionTemplate; SECTION_COUNT],
}

impl EvaluationTemplate {
    pub fn standard() -> Self {
        Self {
            sections: STANDARD_SECTIONS,
        }
    }

    pub fn sections(&self) -> &[SectionTemplate] {
        &self.sections
    }

    /// Builds a blank evaluation: every criterion applicable and unrated.
    pub fn instantiate(
        &self,
        metadata: EvaluationMetadata,
    ) -> Result<Evaluation, EvaluationError> {
        let mut built = Vec::with_capacity(SECTION_COUNT);
        for (index, template) in self.sections.iter().enumerate() {
            let number = (index + 1) as u8;
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
            built.push(Section::new(
                number,
                template.title,
                template.nominal_weight,
                criteria,
            )?);
        }

        Evaluation::from_sections(metadata, built)
    }
}

const STANDARD_SECTIONS: [SectionTemplate; SECTION_COUNT] = [
    SectionTemplate {
        title: "1. Cumplimiento de Niveles de Servicio (SLA)",
        nominal_weight: 0.25,
        criteria: &[
            CriterionTemplate {
                name: "Tiempo de respuesta a incidentes críticos",
                weight: 0.10,
            },
            CriterionTemplate {
                name: "Tiempo de resolución de problemas",
                weight: 0.08,
            },
            CriterionTemplate {
                name: "Disponibilidad del servicio (uptime)",
                weight: 0.07,
            },
        ],
    },
    SectionTemplate {
        title: "2. Gestión de Tickets",
        nominal_weight: 0.20,
        criteria: &[
            CriterionTemplate {
                name: "Cantidad de tickets resueltos vs. pendientes",
                weight: 0.06,
            },
            CriterionTemplate {
                name: "Tiempo promedio de cierre de tickets",
                weight: 0.05,
            },
            CriterionTemplate {
                name: "Calidad de la documentación de tickets",
                weight: 0.04,
            },
            CriterionTemplate {
                name: "Tasa de reapertura de tickets",
                weight: 0.05,
            },
        ],
    },
    SectionTemplate {
        title: "3. Calidad del Servicio",
        nominal_weight: 0.20,
        criteria: &[
            CriterionTemplate {
                name: "Competencia técnica del personal",
                weight: 0.07,
            },
            CriterionTemplate {
                name: "Proactividad en la identificación de problemas",
                weight: 0.07,
            },
            CriterionTemplate {
                name: "Satisfacción de usuarios internos",
                weight: 0.06,
            },
        ],
    },
    SectionTemplate {
        title: "4. Comunicación y Relación Comercial",
        nominal_weight: 0.15,
        criteria: &[
            CriterionTemplate {
                name: "Claridad y oportunidad de la comunicación",
                weight: 0.05,
            },
            CriterionTemplate {
                name: "Disponibilidad del gerente de cuenta",
                weight: 0.05,
            },
            CriterionTemplate {
                name: "Gestión de escalamientos",
                weight: 0.05,
            },
        ],
    },
    SectionTemplate {
        title: "5. Seguridad y Cumplimiento",
        nominal_weight: 0.10,
        criteria: &[
            CriterionTemplate {
                name: "Cumplimiento de políticas de seguridad de la información",
                weight: 0.04,
            },
            CriterionTemplate {
                name: "Gestión de incidentes de seguridad",
                weight: 0.03,
            },
            CriterionTemplate {
                name: "Cumplimiento normativo y contractual",
                weight: 0.03,
            },
        ],
    },
    SectionTemplate {
        title: "6. Gestión Administrativa",
        nominal_weight: 0.10,
        criteria: &[
            CriterionTemplate {
                name: "Cumplimiento de entregables documentales",
                weight: 0.04,
            },
            CriterionTemplate {
                name: "Precisión en la facturación",
                weight: 0.03,
            },
            CriterionTemplate {
                name: "Asistencia a reuniones de seguimiento",
                weight: 0.03,
            },
        ],
    },
];
