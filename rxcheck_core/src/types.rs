//! Core domain types for rxcheck.
//!
//! This module defines the fundamental types used throughout the system:
//! - Substance classes and effect tags
//! - Severity levels and interaction mechanisms
//! - Substance profiles
//! - Interaction effect records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Classification
// ============================================================================

/// Coarse pharmacological category, used as the interaction-matrix key
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SubstanceClass {
    Opioid,
    Stimulant,
    Benzodiazepine,
    Alcohol,
    Depressant,
    Hallucinogen,
    Cannabis,
    Inhalant,
    Synthetic,
    Dissociative,
}

impl SubstanceClass {
    pub const ALL: [SubstanceClass; 10] = [
        SubstanceClass::Opioid,
        SubstanceClass::Stimulant,
        SubstanceClass::Benzodiazepine,
        SubstanceClass::Alcohol,
        SubstanceClass::Depressant,
        SubstanceClass::Hallucinogen,
        SubstanceClass::Cannabis,
        SubstanceClass::Inhalant,
        SubstanceClass::Synthetic,
        SubstanceClass::Dissociative,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubstanceClass::Opioid => "opioid",
            SubstanceClass::Stimulant => "stimulant",
            SubstanceClass::Benzodiazepine => "benzodiazepine",
            SubstanceClass::Alcohol => "alcohol",
            SubstanceClass::Depressant => "depressant",
            SubstanceClass::Hallucinogen => "hallucinogen",
            SubstanceClass::Cannabis => "cannabis",
            SubstanceClass::Inhalant => "inhalant",
            SubstanceClass::Synthetic => "synthetic",
            SubstanceClass::Dissociative => "dissociative",
        }
    }

    /// Parse a class name, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == lower)
    }
}

impl fmt::Display for SubstanceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A discrete named physiological outcome
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    RespiratoryDepression,
    Nodding,
    Drowsiness,
    DeathRisk,
    CardiacArrhythmia,
    Mania,
    Hyperthermia,
    TorsadesDePointes,
    Nausea,
    Hallucinations,
    Seizure,
    SerotoninSyndrome,
}

impl EffectTag {
    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            EffectTag::RespiratoryDepression => "Respiratory Depression",
            EffectTag::Nodding => "Nodding",
            EffectTag::Drowsiness => "Drowsiness",
            EffectTag::DeathRisk => "Risk of Death",
            EffectTag::CardiacArrhythmia => "Cardiac Arrhythmia",
            EffectTag::Mania => "Mania or hypomania",
            EffectTag::Hyperthermia => "Hyperthermia",
            EffectTag::TorsadesDePointes => "Torsades de Pointes",
            EffectTag::Nausea => "Nausea",
            EffectTag::Hallucinations => "Hallucinations",
            EffectTag::Seizure => "Seizure",
            EffectTag::SerotoninSyndrome => "Serotonin Syndrome",
        }
    }
}

impl fmt::Display for EffectTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered risk level of an interaction effect
///
/// Variants are declared in rank order; the derived `Ord` is the severity
/// order (`Minor < Moderate < Major < Lethal`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Minor,
    Moderate,
    Major,
    Lethal,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Minor => "MINOR",
            Severity::Moderate => "MODERATE",
            Severity::Major => "MAJOR",
            Severity::Lethal => "LETHAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How two substances produce a combined effect
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mechanism {
    /// Effects add together
    Synergistic,
    /// Effects oppose each other
    Antagonistic,
    /// One substance hides the effects of another
    Masking,
    /// Effects appear after one substance wears off
    DelayedOnset,
    /// Metabolism interference
    Pharmacokinetic,
    /// Competing for the same receptors
    ReceptorCompetition,
    /// Increased sensitivity to effects
    Sensitization,
}

// ============================================================================
// Substance Profiles
// ============================================================================

/// Lethal dose bounds; `min <= max`, both non-negative
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct LethalDoseRange {
    pub min: f64,
    pub max: f64,
}

/// Timing constants, all in hours
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Pharmacokinetics {
    pub half_life_hours: f64,
    pub onset_hours: f64,
    pub peak_hours: f64,
}

/// Static pharmacological profile of one substance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Substance {
    pub id: String,
    pub class: SubstanceClass,
    pub effects: Vec<EffectTag>,
    pub pharmacokinetics: Pharmacokinetics,
    pub respiratory_depression: bool,
    pub masks_other_drugs: bool,
    pub stimulant_potency: f64,
    pub depressant_potency: f64,
    pub metabolic_pathways: Vec<String>,
    pub receptor_affinities: BTreeMap<String, f64>,
    pub lethal_dose: LethalDoseRange,
}

impl Substance {
    /// Start a profile with the fields every substance has
    pub fn new(
        id: &str,
        class: SubstanceClass,
        effects: &[EffectTag],
        half_life_hours: f64,
        onset_hours: f64,
        peak_hours: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            class,
            effects: effects.to_vec(),
            pharmacokinetics: Pharmacokinetics {
                half_life_hours,
                onset_hours,
                peak_hours,
            },
            respiratory_depression: false,
            masks_other_drugs: false,
            stimulant_potency: 0.0,
            depressant_potency: 0.0,
            metabolic_pathways: Vec::new(),
            receptor_affinities: BTreeMap::new(),
            lethal_dose: LethalDoseRange { min: 0.0, max: 0.0 },
        }
    }

    pub fn with_respiratory_depression(mut self) -> Self {
        self.respiratory_depression = true;
        self
    }

    pub fn with_masking(mut self) -> Self {
        self.masks_other_drugs = true;
        self
    }

    pub fn with_stimulant_potency(mut self, potency: f64) -> Self {
        self.stimulant_potency = potency;
        self
    }

    pub fn with_depressant_potency(mut self, potency: f64) -> Self {
        self.depressant_potency = potency;
        self
    }

    pub fn with_pathway(mut self, pathway: &str) -> Self {
        self.metabolic_pathways.push(pathway.to_string());
        self
    }

    pub fn with_affinity(mut self, receptor: &str, affinity: f64) -> Self {
        self.receptor_affinities.insert(receptor.to_string(), affinity);
        self
    }

    pub fn with_lethal_dose(mut self, min: f64, max: f64) -> Self {
        self.lethal_dose = LethalDoseRange { min, max };
        self
    }

    pub fn has_effect(&self, effect: EffectTag) -> bool {
        self.effects.contains(&effect)
    }
}

// ============================================================================
// Interaction Effects
// ============================================================================

/// Extended clinical detail attached to some interaction effects
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EffectDetail {
    pub mechanism: Mechanism,
    pub onset_hours: f64,
    pub duration_hours: f64,
    pub warning_signs_early: Vec<String>,
    pub warning_signs_late: Vec<String>,
    pub requires_special_treatment: bool,
    pub treatment_notes: String,
}

/// One outcome of combining two substances
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InteractionEffect {
    pub effect: EffectTag,
    pub severity: Severity,
    /// Likelihood in [0.0, 1.0]
    pub probability: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<EffectDetail>,
}

impl InteractionEffect {
    pub fn new(effect: EffectTag, severity: Severity, probability: f64, description: &str) -> Self {
        Self {
            effect,
            severity,
            probability,
            description: description.to_string(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: EffectDetail) -> Self {
        self.detail = Some(detail);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_total_order() {
        assert!(Severity::Minor < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Major);
        assert!(Severity::Major < Severity::Lethal);
        assert_eq!(Severity::Major.max(Severity::Lethal), Severity::Lethal);
    }

    #[test]
    fn test_class_parse_is_case_insensitive() {
        assert_eq!(SubstanceClass::parse("Opioid"), Some(SubstanceClass::Opioid));
        assert_eq!(
            SubstanceClass::parse("DISSOCIATIVE"),
            Some(SubstanceClass::Dissociative)
        );
        assert_eq!(SubstanceClass::parse("nootropic"), None);
    }

    #[test]
    fn test_builder_sets_fields() {
        let s = Substance::new("x", SubstanceClass::Opioid, &[EffectTag::Nodding], 1.0, 0.1, 0.5)
            .with_respiratory_depression()
            .with_pathway("CYP3A4")
            .with_affinity("mu-opioid", 0.5)
            .with_lethal_dose(0.1, 0.2);

        assert!(s.respiratory_depression);
        assert!(!s.masks_other_drugs);
        assert!(s.has_effect(EffectTag::Nodding));
        assert!(!s.has_effect(EffectTag::Seizure));
        assert_eq!(s.metabolic_pathways, vec!["CYP3A4".to_string()]);
        assert_eq!(s.receptor_affinities.get("mu-opioid"), Some(&0.5));
        assert_eq!(s.lethal_dose.max, 0.2);
    }

    #[test]
    fn test_severity_serializes_snake_case() {
        let json = serde_json::to_string(&Severity::Lethal).unwrap();
        assert_eq!(json, "\"lethal\"");
    }
}
