//! Class-level interaction matrix.
//!
//! Every entry is stored under both orderings of its class pair, so a lookup
//! never has to care which substance came first.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

static DEFAULT_MATRIX: Lazy<InteractionMatrix> = Lazy::new(build_default_matrix);

/// (class, class) → effects of combining the two classes
#[derive(Clone, Debug, Default)]
pub struct InteractionMatrix {
    entries: HashMap<(SubstanceClass, SubstanceClass), Vec<InteractionEffect>>,
}

/// Get a reference to the cached default matrix
pub fn get_default_matrix() -> &'static InteractionMatrix {
    &DEFAULT_MATRIX
}

impl InteractionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under both (a, b) and (b, a)
    pub fn add(&mut self, a: SubstanceClass, b: SubstanceClass, effects: Vec<InteractionEffect>) {
        self.entries.insert((b, a), effects.clone());
        self.entries.insert((a, b), effects);
    }

    /// Effects for a class pair; empty when the pair has no entry
    pub fn lookup(&self, a: SubstanceClass, b: SubstanceClass) -> &[InteractionEffect] {
        self.entries
            .get(&(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of stored keys (each unordered pair counts once per ordering)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for ((a, b), effects) in &self.entries {
            match self.entries.get(&(*b, *a)) {
                Some(mirror) if mirror == effects => {}
                Some(_) => errors.push(format!("Entry ({}, {}) differs from its mirror", a, b)),
                None => errors.push(format!("Entry ({}, {}) has no mirror", a, b)),
            }

            for effect in effects {
                if !(0.0..=1.0).contains(&effect.probability) {
                    errors.push(format!(
                        "Entry ({}, {}): probability of {} out of range: {}",
                        a, b, effect.effect, effect.probability
                    ));
                }
            }
        }

        errors
    }
}

fn effect(tag: EffectTag, severity: Severity, probability: f64, description: &str) -> InteractionEffect {
    InteractionEffect::new(tag, severity, probability, description)
}

/// Builds the default matrix
pub fn build_default_matrix() -> InteractionMatrix {
    use EffectTag::*;
    use Severity::*;
    use SubstanceClass::*;

    let mut matrix = InteractionMatrix::new();

    // Depressant + depressant
    matrix.add(
        Depressant,
        Depressant,
        vec![
            effect(RespiratoryDepression, Major, 0.85, "Synergistic CNS depression leading to respiratory failure"),
            effect(Drowsiness, Major, 0.95, "Extreme sedation and loss of consciousness"),
            effect(DeathRisk, Lethal, 0.35, "High risk of fatal overdose"),
        ],
    );

    // Opioid + benzodiazepine
    matrix.add(
        Opioid,
        Benzodiazepine,
        vec![
            effect(
                RespiratoryDepression,
                Lethal,
                0.90,
                "Severe respiratory depression - frequent cause of overdose deaths",
            )
            .with_detail(EffectDetail {
                mechanism: Mechanism::Synergistic,
                onset_hours: 0.5,
                duration_hours: 8.0,
                warning_signs_early: vec![
                    "Slow or shallow breathing".into(),
                    "Pinpoint pupils".into(),
                    "Slurred speech".into(),
                ],
                warning_signs_late: vec![
                    "Blue lips or fingertips".into(),
                    "Unresponsive to voice or pain".into(),
                    "Gurgling or snoring sounds".into(),
                ],
                requires_special_treatment: true,
                treatment_notes: "Naloxone reverses only the opioid component; sustained \
                                  ventilatory support may be needed for the benzodiazepine"
                    .into(),
            }),
            effect(Nodding, Major, 0.80, "Characteristic opioid nodding intensified"),
            effect(DeathRisk, Lethal, 0.45, "Extremely high fatality risk"),
        ],
    );

    // Alcohol + opioid
    matrix.add(
        Alcohol,
        Opioid,
        vec![
            effect(RespiratoryDepression, Lethal, 0.88, "Alcohol potentiates opioid respiratory depression"),
            effect(Drowsiness, Major, 0.92, "Severe sedation and impaired consciousness"),
            effect(DeathRisk, Lethal, 0.40, "High risk of fatal respiratory failure"),
        ],
    );

    // Stimulant + depressant (masking)
    matrix.add(
        Stimulant,
        Depressant,
        vec![
            effect(CardiacArrhythmia, Major, 0.65, "Opposing effects on cardiovascular system"),
            effect(DeathRisk, Major, 0.25, "Masked intoxication leading to overdose").with_detail(EffectDetail {
                mechanism: Mechanism::Masking,
                onset_hours: 1.0,
                duration_hours: 6.0,
                warning_signs_early: vec![
                    "Feeling less intoxicated than expected".into(),
                    "Redosing the depressant".into(),
                ],
                warning_signs_late: vec![
                    "Sudden sedation as the stimulant wears off".into(),
                    "Irregular heartbeat".into(),
                ],
                requires_special_treatment: true,
                treatment_notes: "Monitor for delayed depressant toxicity after stimulant clearance".into(),
            }),
        ],
    );

    // Stimulant + stimulant
    matrix.add(
        Stimulant,
        Stimulant,
        vec![
            effect(CardiacArrhythmia, Major, 0.75, "Additive cardiovascular stress"),
            effect(TorsadesDePointes, Major, 0.30, "QT prolongation and dangerous arrhythmias"),
            effect(Hyperthermia, Major, 0.60, "Dangerous hyperthermia especially with physical activity"),
        ],
    );

    // Opioid + opioid
    matrix.add(
        Opioid,
        Opioid,
        vec![
            effect(RespiratoryDepression, Lethal, 0.80, "Stacked mu-opioid agonism suppresses breathing"),
            effect(Nodding, Major, 0.85, "Deep sedation and nodding"),
            effect(DeathRisk, Lethal, 0.35, "Cumulative opioid load raises fatality risk"),
        ],
    );

    // Alcohol + benzodiazepine
    matrix.add(
        Alcohol,
        Benzodiazepine,
        vec![
            effect(RespiratoryDepression, Major, 0.75, "Combined GABAergic depression of breathing"),
            effect(Drowsiness, Major, 0.90, "Profound sedation and memory blackouts"),
            effect(DeathRisk, Major, 0.25, "Elevated risk of fatal overdose"),
        ],
    );

    // Alcohol + barbiturate
    matrix.add(
        Alcohol,
        Depressant,
        vec![
            effect(RespiratoryDepression, Lethal, 0.85, "Barbiturates and alcohol act synergistically on GABA-A"),
            effect(Drowsiness, Major, 0.95, "Coma-level sedation"),
            effect(DeathRisk, Lethal, 0.40, "High risk of fatal overdose"),
        ],
    );

    // Benzodiazepine + barbiturate
    matrix.add(
        Benzodiazepine,
        Depressant,
        vec![
            effect(RespiratoryDepression, Major, 0.80, "Additive GABA-A potentiation"),
            effect(Drowsiness, Major, 0.92, "Extreme sedation"),
            effect(DeathRisk, Major, 0.30, "Elevated risk of fatal overdose"),
        ],
    );

    // Stimulant + opioid ("speedball")
    matrix.add(
        Stimulant,
        Opioid,
        vec![
            effect(
                RespiratoryDepression,
                Major,
                0.60,
                "Delayed respiratory depression once the stimulant wears off",
            ),
            effect(CardiacArrhythmia, Major, 0.55, "Conflicting demands on the cardiovascular system"),
            effect(DeathRisk, Major, 0.30, "Masked opioid intoxication encourages redosing"),
        ],
    );

    // Stimulant + alcohol
    matrix.add(
        Stimulant,
        Alcohol,
        vec![
            effect(CardiacArrhythmia, Major, 0.55, "Increased cardiac workload"),
            effect(DeathRisk, Moderate, 0.15, "Masked drunkenness leads to heavier drinking"),
        ],
    );

    // Stimulant + benzodiazepine
    matrix.add(
        Stimulant,
        Benzodiazepine,
        vec![
            effect(Drowsiness, Moderate, 0.40, "Rebound sedation as the stimulant clears"),
            effect(DeathRisk, Moderate, 0.10, "Masked sedation encourages redosing"),
        ],
    );

    // Dissociative + opioid
    matrix.add(
        Dissociative,
        Opioid,
        vec![
            effect(RespiratoryDepression, Moderate, 0.55, "Additive suppression of respiratory drive"),
            effect(Drowsiness, Moderate, 0.70, "Heavy sedation and disorientation"),
            effect(DeathRisk, Major, 0.20, "Impaired airway protection while dissociated"),
        ],
    );

    // Dissociative + barbiturate
    matrix.add(
        Dissociative,
        Depressant,
        vec![
            effect(RespiratoryDepression, Major, 0.60, "Additive respiratory depression"),
            effect(Nausea, Moderate, 0.50, "Vomiting with impaired consciousness"),
        ],
    );

    // Hallucinogen + stimulant
    matrix.add(
        Hallucinogen,
        Stimulant,
        vec![
            effect(Hyperthermia, Moderate, 0.35, "Elevated body temperature"),
            effect(Mania, Moderate, 0.30, "Agitation and manic episodes"),
            effect(Hallucinations, Minor, 0.60, "Intensified perceptual distortion"),
        ],
    );

    matrix
}
