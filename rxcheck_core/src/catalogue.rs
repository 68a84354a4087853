//! Built-in substance catalogue.
//!
//! Profiles are keyed by lowercase identifier. A handful of brand names are
//! accepted as aliases for their generic entry.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Cached default catalogue - built once and shared read-only
static DEFAULT_CATALOGUE: Lazy<Catalogue> = Lazy::new(build_default_catalogue);

/// Brand name → catalogue identifier
const ALIASES: &[(&str, &str)] = &[
    ("xanax", "alprazolam"),
    ("valium", "diazepam"),
    ("klonopin", "clonazepam"),
    ("ativan", "lorazepam"),
];

/// The complete set of substance profiles
#[derive(Clone, Debug)]
pub struct Catalogue {
    pub substances: HashMap<String, Substance>,
    pub aliases: HashMap<String, String>,
}

/// Get a reference to the cached default catalogue
pub fn get_default_catalogue() -> &'static Catalogue {
    &DEFAULT_CATALOGUE
}

/// Builds the default catalogue
///
/// **Note**: prefer `get_default_catalogue()`, which returns the cached copy.
pub fn build_default_catalogue() -> Catalogue {
    let mut catalogue = Catalogue {
        substances: HashMap::new(),
        aliases: ALIASES
            .iter()
            .map(|(alias, id)| (alias.to_string(), id.to_string()))
            .collect(),
    };

    use EffectTag::*;
    use SubstanceClass::*;

    // ========================================================================
    // Opioids
    // ========================================================================

    catalogue.insert(
        Substance::new("fentanyl", Opioid, &[RespiratoryDepression, DeathRisk, Nodding], 0.5, 0.08, 0.25)
            .with_respiratory_depression()
            .with_depressant_potency(15.0)
            .with_pathway("CYP3A4")
            .with_affinity("mu-opioid", 0.95)
            .with_lethal_dose(0.002, 0.01),
    );

    catalogue.insert(
        Substance::new("carfentanil", Opioid, &[RespiratoryDepression, DeathRisk], 7.7, 0.1, 0.5)
            .with_respiratory_depression()
            .with_depressant_potency(25.0)
            .with_pathway("CYP3A4")
            .with_affinity("mu-opioid", 0.98)
            .with_lethal_dose(0.00002, 0.0001),
    );

    catalogue.insert(
        Substance::new("heroin", Opioid, &[RespiratoryDepression, Nodding, Drowsiness], 0.5, 0.1, 0.5)
            .with_respiratory_depression()
            .with_depressant_potency(8.0)
            .with_pathway("CYP2D6")
            .with_affinity("mu-opioid", 0.85)
            .with_lethal_dose(0.075, 0.375),
    );

    catalogue.insert(
        Substance::new("morphine", Opioid, &[RespiratoryDepression, Drowsiness], 3.0, 0.5, 1.0)
            .with_respiratory_depression()
            .with_depressant_potency(6.0)
            .with_pathway("UGT2B7")
            .with_affinity("mu-opioid", 0.80)
            .with_lethal_dose(0.2, 1.0),
    );

    catalogue.insert(
        Substance::new("oxycodone", Opioid, &[RespiratoryDepression, Drowsiness], 4.5, 0.5, 1.5)
            .with_respiratory_depression()
            .with_depressant_potency(5.5)
            .with_pathway("CYP3A4")
            .with_pathway("CYP2D6")
            .with_affinity("mu-opioid", 0.75)
            .with_lethal_dose(0.08, 0.4),
    );

    // Atypical opioid with SNRI properties
    catalogue.insert(
        Substance::new("tramadol", Opioid, &[Seizure, SerotoninSyndrome, Drowsiness], 6.3, 1.0, 2.0)
            .with_depressant_potency(2.0)
            .with_stimulant_potency(1.5)
            .with_pathway("CYP2D6")
            .with_affinity("mu-opioid", 0.30)
            .with_affinity("serotonin", 0.40)
            .with_affinity("norepinephrine", 0.35)
            .with_lethal_dose(2.0, 8.0),
    );

    // ========================================================================
    // Stimulants
    // ========================================================================

    catalogue.insert(
        Substance::new(
            "methamphetamine",
            Stimulant,
            &[CardiacArrhythmia, Hyperthermia, TorsadesDePointes],
            12.0,
            0.5,
            3.0,
        )
        .with_stimulant_potency(9.0)
        .with_masking()
        .with_pathway("CYP2D6")
        .with_pathway("CYP3A4")
        .with_affinity("dopamine", 0.90)
        .with_affinity("norepinephrine", 0.85)
        .with_affinity("serotonin", 0.60)
        .with_lethal_dose(0.2, 1.5),
    );

    catalogue.insert(
        Substance::new("cocaine", Stimulant, &[CardiacArrhythmia, Hyperthermia, Seizure], 1.0, 0.08, 0.5)
            .with_stimulant_potency(7.5)
            .with_masking()
            .with_pathway("CYP3A4")
            .with_pathway("pseudocholinesterase")
            .with_affinity("dopamine", 0.85)
            .with_affinity("sodium_channel", 0.70)
            .with_lethal_dose(0.5, 1.4),
    );

    catalogue.insert(
        Substance::new("amphetamine", Stimulant, &[CardiacArrhythmia, Hyperthermia], 8.0, 0.75, 2.0)
            .with_stimulant_potency(6.0)
            .with_pathway("CYP2D6")
            .with_affinity("dopamine", 0.75)
            .with_affinity("norepinephrine", 0.80)
            .with_lethal_dose(0.5, 5.0),
    );

    catalogue.insert(
        Substance::new("mdma", Stimulant, &[Hyperthermia, SerotoninSyndrome, CardiacArrhythmia], 8.0, 0.5, 2.0)
            .with_stimulant_potency(5.0)
            .with_pathway("CYP2D6")
            .with_pathway("CYP3A4")
            .with_affinity("serotonin", 0.90)
            .with_affinity("dopamine", 0.60)
            .with_affinity("norepinephrine", 0.70)
            .with_lethal_dose(0.5, 2.0),
    );

    // Synthetic cathinone ("bath salts")
    catalogue.insert(
        Substance::new("mephedrone", Stimulant, &[Hyperthermia, CardiacArrhythmia, SerotoninSyndrome], 2.0, 0.25, 1.0)
            .with_stimulant_potency(6.5)
            .with_pathway("CYP2D6")
            .with_affinity("dopamine", 0.70)
            .with_affinity("serotonin", 0.75)
            .with_lethal_dose(0.5, 2.0),
    );

    // ========================================================================
    // Benzodiazepines
    // ========================================================================

    catalogue.insert(
        Substance::new("alprazolam", Benzodiazepine, &[Drowsiness, RespiratoryDepression], 12.0, 0.5, 1.5)
            .with_depressant_potency(7.0)
            .with_pathway("CYP3A4")
            .with_affinity("GABA-A", 0.85)
            .with_lethal_dose(10.0, 50.0),
    );

    catalogue.insert(
        Substance::new("diazepam", Benzodiazepine, &[Drowsiness], 36.0, 1.0, 2.0)
            .with_depressant_potency(4.0)
            .with_pathway("CYP3A4")
            .with_pathway("CYP2C19")
            .with_affinity("GABA-A", 0.80)
            .with_lethal_dose(50.0, 200.0),
    );

    catalogue.insert(
        Substance::new("clonazepam", Benzodiazepine, &[Drowsiness, RespiratoryDepression], 30.0, 1.0, 4.0)
            .with_depressant_potency(6.5)
            .with_pathway("CYP3A4")
            .with_affinity("GABA-A", 0.88)
            .with_lethal_dose(20.0, 80.0),
    );

    catalogue.insert(
        Substance::new("lorazepam", Benzodiazepine, &[Drowsiness, RespiratoryDepression], 14.0, 1.0, 2.0)
            .with_depressant_potency(5.5)
            .with_pathway("UGT")
            .with_affinity("GABA-A", 0.82)
            .with_lethal_dose(30.0, 120.0),
    );

    // ========================================================================
    // Alcohol and barbiturates
    // ========================================================================

    // Lethal range is blood alcohol in mg/dL
    catalogue.insert(
        Substance::new("alcohol", Alcohol, &[Drowsiness, RespiratoryDepression], 1.0, 0.25, 1.0)
            .with_depressant_potency(4.0)
            .with_pathway("ADH")
            .with_pathway("CYP2E1")
            .with_affinity("GABA-A", 0.50)
            .with_affinity("NMDA", 0.40)
            .with_lethal_dose(300.0, 500.0),
    );

    catalogue.insert(
        Substance::new("phenobarbital", Depressant, &[Drowsiness, RespiratoryDepression], 72.0, 1.0, 4.0)
            .with_respiratory_depression()
            .with_depressant_potency(8.0)
            .with_pathway("CYP2C19")
            .with_affinity("GABA-A", 0.75)
            .with_lethal_dose(6.0, 10.0),
    );

    catalogue.insert(
        Substance::new(
            "secobarbital",
            Depressant,
            &[Drowsiness, RespiratoryDepression, DeathRisk],
            28.0,
            0.5,
            2.0,
        )
        .with_respiratory_depression()
        .with_depressant_potency(9.0)
        .with_pathway("CYP2C19")
        .with_affinity("GABA-A", 0.80)
        .with_lethal_dose(2.0, 5.0),
    );

    // ========================================================================
    // Hallucinogens
    // ========================================================================

    catalogue.insert(
        Substance::new("lsd", Hallucinogen, &[CardiacArrhythmia], 5.0, 0.5, 3.0)
            .with_stimulant_potency(2.0)
            .with_pathway("CYP2D6")
            .with_affinity("5-HT2A", 0.95)
            .with_lethal_dose(0.2, 1.0),
    );

    catalogue.insert(
        Substance::new("psilocybin", Hallucinogen, &[], 2.5, 0.5, 2.0)
            .with_pathway("alkaline_phosphatase")
            .with_affinity("5-HT2A", 0.85)
            .with_lethal_dose(17.0, 280.0),
    );

    // Synthetic cannabinoid (K2/Spice)
    catalogue.insert(
        Substance::new("jwh-018", Hallucinogen, &[Seizure, CardiacArrhythmia], 6.0, 0.1, 0.5)
            .with_pathway("CYP1A2")
            .with_affinity("CB1", 0.90)
            .with_lethal_dose(0.01, 0.1),
    );

    catalogue.insert(
        Substance::new(
            "25i-nbome",
            Hallucinogen,
            &[Seizure, Hyperthermia, CardiacArrhythmia, DeathRisk],
            5.0,
            0.5,
            2.0,
        )
        .with_stimulant_potency(3.0)
        .with_pathway("CYP2D6")
        .with_affinity("5-HT2A", 0.95)
        .with_lethal_dose(0.0005, 0.002),
    );

    catalogue.insert(
        Substance::new("2c-b", Hallucinogen, &[Hyperthermia], 8.0, 1.0, 3.0)
            .with_stimulant_potency(2.5)
            .with_pathway("CYP2D6")
            .with_affinity("5-HT2A", 0.80)
            .with_lethal_dose(0.2, 1.0),
    );

    // ========================================================================
    // Dissociatives
    // ========================================================================

    // Lethal range in mg/kg
    catalogue.insert(
        Substance::new("ketamine", Dissociative, &[RespiratoryDepression], 2.5, 0.25, 1.0)
            .with_depressant_potency(3.0)
            .with_pathway("CYP3A4")
            .with_pathway("CYP2B6")
            .with_affinity("NMDA", 0.85)
            .with_lethal_dose(4.0, 11.0),
    );

    catalogue.insert(
        Substance::new("pcp", Dissociative, &[Hyperthermia, CardiacArrhythmia], 21.0, 0.5, 2.0)
            .with_stimulant_potency(4.0)
            .with_pathway("CYP3A4")
            .with_affinity("NMDA", 0.90)
            .with_affinity("dopamine", 0.40)
            .with_lethal_dose(0.2, 1.0),
    );

    catalogue
}

impl Catalogue {
    fn insert(&mut self, substance: Substance) {
        self.substances.insert(substance.id.clone(), substance);
    }

    /// Look up a substance by identifier or brand alias
    ///
    /// Identifiers are case-sensitive; unknown names yield `None`.
    pub fn get(&self, name: &str) -> Option<&Substance> {
        self.substances.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|id| self.substances.get(id))
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.substances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }

    /// All identifiers, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.substances.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Identifiers of one class, sorted
    pub fn by_class(&self, class: SubstanceClass) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .substances
            .values()
            .filter(|s| s.class == class)
            .map(|s| s.id.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Identifiers containing `term`, ignoring case, sorted
    pub fn search(&self, term: &str) -> Vec<&str> {
        let needle = term.to_lowercase();
        let mut matches: Vec<&str> = self
            .substances
            .keys()
            .filter(|id| id.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect();
        matches.sort_unstable();
        matches
    }

    /// Validate the catalogue for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for (id, substance) in &self.substances {
            if id.is_empty() {
                errors.push("Substance has empty ID".to_string());
            }
            if id != &substance.id {
                errors.push(format!(
                    "Substance key '{}' doesn't match substance.id '{}'",
                    id, substance.id
                ));
            }
            if id.chars().any(|c| c.is_uppercase() || c.is_whitespace()) {
                errors.push(format!("Substance '{}' is not a lowercase token", id));
            }

            let pk = &substance.pharmacokinetics;
            if pk.half_life_hours < 0.0 || pk.onset_hours < 0.0 || pk.peak_hours < 0.0 {
                errors.push(format!("Substance '{}' has negative timing values", id));
            }

            let dose = &substance.lethal_dose;
            if dose.min < 0.0 || dose.max < 0.0 {
                errors.push(format!("Substance '{}' has a negative lethal dose", id));
            }
            if dose.min > dose.max {
                errors.push(format!(
                    "Substance '{}': lethal dose min {} > max {}",
                    id, dose.min, dose.max
                ));
            }

            for (receptor, affinity) in &substance.receptor_affinities {
                if !(0.0..=1.0).contains(affinity) {
                    errors.push(format!(
                        "Substance '{}': affinity for {} out of range: {}",
                        id, receptor, affinity
                    ));
                }
            }
        }

        for (alias, id) in &self.aliases {
            if !self.substances.contains_key(id) {
                errors.push(format!(
                    "Alias '{}' references non-existent substance '{}'",
                    alias, id
                ));
            }
            if self.substances.contains_key(alias) {
                errors.push(format!("Alias '{}' shadows a catalogue entry", alias));
            }
        }

        errors
    }
}
