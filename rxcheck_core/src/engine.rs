//! Analysis engine: turns user-supplied substance names into reports.
//!
//! Unknown names are never an error. They are collected on the report so
//! the caller can warn about them, and the analysis runs on what remains.

use crate::advisory::{
    combination_warnings, combined_risk_description, safety_recommendations, Advisory,
    InteractionAssessment,
};
use crate::catalogue::{get_default_catalogue, Catalogue};
use crate::combination::{combination_breakdown, CombinationBreakdown};
use crate::matrix::{get_default_matrix, InteractionMatrix};
use crate::resolver::resolve;
use crate::risk_table::{RiskCategory, RiskTable};
use crate::types::{InteractionEffect, Substance, SubstanceClass};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Minimum recognised substances for an interaction analysis
pub const MIN_INTERACTION_SUBSTANCES: usize = 2;

/// Minimum recognised substances for an overdose assessment
pub const MIN_OVERDOSE_SUBSTANCES: usize = 1;

/// Names split into those the tables recognise and those they don't
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub known: Vec<String>,
    pub unknown: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct InteractionReport {
    pub generated_at: DateTime<Utc>,
    pub substances: Vec<String>,
    pub unknown: Vec<String>,
    /// Sorted by severity, most severe first
    pub effects: Vec<InteractionEffect>,
    pub assessment: InteractionAssessment,
}

#[derive(Clone, Debug, Serialize)]
pub struct SubstanceRisk {
    pub name: String,
    pub percentage: u8,
    pub category: RiskCategory,
    pub description: &'static str,
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverdoseAssessment {
    Single {
        risk: SubstanceRisk,
        recommendations: Advisory,
    },
    Combination {
        individual: Vec<SubstanceRisk>,
        breakdown: CombinationBreakdown,
        description: &'static str,
        warnings: Vec<Advisory>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct OverdoseReport {
    pub generated_at: DateTime<Utc>,
    pub substances: Vec<String>,
    pub unknown: Vec<String>,
    pub assessment: OverdoseAssessment,
}

impl OverdoseReport {
    /// The single or combined percentage the report leads with
    pub fn headline_percentage(&self) -> u8 {
        match &self.assessment {
            OverdoseAssessment::Single { risk, .. } => risk.percentage,
            OverdoseAssessment::Combination { breakdown, .. } => breakdown.percentage,
        }
    }
}

/// One row of the catalogue listing
#[derive(Clone, Debug, Serialize)]
pub struct CatalogueRow {
    pub id: String,
    pub class: SubstanceClass,
    pub half_life_hours: f64,
    pub onset_hours: f64,
    pub peak_hours: f64,
    pub respiratory_depression: bool,
    pub masks_other_drugs: bool,
    pub risk_percentage: u8,
}

/// Read-only view over the static tables plus an owned risk table
#[derive(Clone, Debug)]
pub struct Analyzer<'a> {
    pub catalogue: &'a Catalogue,
    pub matrix: &'a InteractionMatrix,
    pub risks: RiskTable,
}

impl Analyzer<'static> {
    /// Analyzer over the built-in tables
    pub fn with_defaults(risks: RiskTable) -> Self {
        Self::new(get_default_catalogue(), get_default_matrix(), risks)
    }
}

impl<'a> Analyzer<'a> {
    pub fn new(catalogue: &'a Catalogue, matrix: &'a InteractionMatrix, risks: RiskTable) -> Self {
        Self {
            catalogue,
            matrix,
            risks,
        }
    }

    /// Check every static table; returns the problems found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.catalogue.validate();
        errors.extend(self.matrix.validate());
        errors.extend(self.risks.validate());
        errors
    }

    /// Fail with `CatalogueValidation` if any table is inconsistent
    pub fn ensure_valid(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::CatalogueValidation(errors.join("; ")))
        }
    }

    fn split<S: AsRef<str>>(names: &[S], is_known: impl Fn(&str) -> bool) -> Selection {
        let mut selection = Selection::default();
        for name in names {
            let name = name.as_ref();
            if is_known(name) {
                selection.known.push(name.to_string());
            } else {
                tracing::debug!("Unrecognised substance '{}'", name);
                selection.unknown.push(name.to_string());
            }
        }
        selection
    }

    /// Names the catalogue recognises, for interaction analysis
    pub fn select_for_interaction<S: AsRef<str>>(&self, names: &[S]) -> Selection {
        Self::split(names, |n| self.catalogue.contains(n))
    }

    /// Names the catalogue or the risk table recognises, for overdose assessment
    pub fn select_for_overdose<S: AsRef<str>>(&self, names: &[S]) -> Selection {
        Self::split(names, |n| self.catalogue.contains(n) || self.risks.contains(n))
    }

    /// Pairwise interaction analysis
    pub fn analyze_interactions<S: AsRef<str>>(&self, names: &[S]) -> Result<InteractionReport> {
        let selection = self.select_for_interaction(names);
        if selection.known.len() < MIN_INTERACTION_SUBSTANCES {
            return Err(Error::InsufficientSubstances {
                analysis: "interaction analysis",
                needed: MIN_INTERACTION_SUBSTANCES,
                found: selection.known.len(),
            });
        }

        let substances: Vec<&Substance> = selection
            .known
            .iter()
            .filter_map(|name| self.catalogue.get(name))
            .collect();

        let mut effects: Vec<InteractionEffect> =
            resolve(self.matrix, &substances).into_values().collect();
        effects.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.effect.cmp(&b.effect)));

        let assessment = InteractionAssessment::from_effects(&effects);
        tracing::info!(
            "Interaction analysis of {} substance(s): {} effect(s), assessment {}",
            substances.len(),
            effects.len(),
            assessment
        );

        Ok(InteractionReport {
            generated_at: Utc::now(),
            substances: selection.known,
            unknown: selection.unknown,
            effects,
            assessment,
        })
    }

    fn substance_risk(&self, name: &str) -> SubstanceRisk {
        let percentage = self.risks.percentage(name);
        let category = RiskCategory::from_percentage(percentage);
        SubstanceRisk {
            name: name.to_string(),
            percentage,
            category,
            description: category.description(),
        }
    }

    /// Overdose assessment of one substance or a combination
    pub fn assess_overdose<S: AsRef<str>>(&self, names: &[S]) -> Result<OverdoseReport> {
        let selection = self.select_for_overdose(names);
        if selection.known.len() < MIN_OVERDOSE_SUBSTANCES {
            return Err(Error::InsufficientSubstances {
                analysis: "overdose assessment",
                needed: MIN_OVERDOSE_SUBSTANCES,
                found: selection.known.len(),
            });
        }

        let assessment = if let [only] = selection.known.as_slice() {
            let risk = self.substance_risk(only);
            let recommendations = safety_recommendations(risk.percentage);
            OverdoseAssessment::Single {
                risk,
                recommendations,
            }
        } else {
            let individual = selection
                .known
                .iter()
                .map(|name| self.substance_risk(name))
                .collect();
            let breakdown = combination_breakdown(&self.risks, &selection.known);
            let substances: Vec<&Substance> = selection
                .known
                .iter()
                .filter_map(|name| self.catalogue.get(name))
                .collect();
            let warnings = combination_warnings(&substances, breakdown.percentage);

            OverdoseAssessment::Combination {
                individual,
                description: combined_risk_description(breakdown.percentage),
                breakdown,
                warnings,
            }
        };

        let report = OverdoseReport {
            generated_at: Utc::now(),
            substances: selection.known,
            unknown: selection.unknown,
            assessment,
        };
        tracing::info!(
            "Overdose assessment of {} substance(s): {}%",
            report.substances.len(),
            report.headline_percentage()
        );
        Ok(report)
    }

    /// Catalogue listing, optionally restricted to one class
    pub fn catalogue_rows(&self, class: Option<SubstanceClass>) -> Vec<CatalogueRow> {
        let names = match class {
            Some(class) => self.catalogue.by_class(class),
            None => self.catalogue.names(),
        };

        names
            .into_iter()
            .filter_map(|name| self.catalogue.get(name))
            .map(|s| CatalogueRow {
                id: s.id.clone(),
                class: s.class,
                half_life_hours: s.pharmacokinetics.half_life_hours,
                onset_hours: s.pharmacokinetics.onset_hours,
                peak_hours: s.pharmacokinetics.peak_hours,
                respiratory_depression: s.respiratory_depression,
                masks_other_drugs: s.masks_other_drugs,
                risk_percentage: self.risks.percentage(&s.id),
            })
            .collect()
    }
}

/// Write catalogue rows as CSV with a header line
pub fn write_rows_csv<W: Write>(rows: &[CatalogueRow], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
