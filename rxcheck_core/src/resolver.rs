//! Pairwise interaction resolution.
//!
//! Every unordered pair of the selected substances is looked up by class,
//! adjusted by the substance-specific overrides, then merged so that each
//! effect tag appears once.

use crate::matrix::InteractionMatrix;
use crate::overrides::apply_overrides;
use crate::types::{EffectTag, InteractionEffect, Substance};
use std::collections::BTreeMap;

/// Weight given to a repeated effect's probability when merging
pub const REPEAT_WEIGHT: f64 = 0.5;

/// Consolidated effects keyed by tag
pub type EffectMap = BTreeMap<EffectTag, InteractionEffect>;

/// Raw effects for one pair, with overrides applied
pub fn pair_effects(
    matrix: &InteractionMatrix,
    a: &Substance,
    b: &Substance,
) -> Vec<InteractionEffect> {
    let mut effects = matrix.lookup(a.class, b.class).to_vec();
    apply_overrides(&a.id, &b.id, &mut effects);
    effects
}

/// All effects of combining `substances`, merged by tag
///
/// Fewer than two substances produce no pairs and thus an empty map.
pub fn resolve(matrix: &InteractionMatrix, substances: &[&Substance]) -> EffectMap {
    let mut raw = Vec::new();

    for (i, a) in substances.iter().enumerate() {
        for b in &substances[i + 1..] {
            let effects = pair_effects(matrix, a, b);
            tracing::debug!("{} + {}: {} effect(s)", a.id, b.id, effects.len());
            raw.extend(effects);
        }
    }

    consolidate(raw)
}

/// Merge raw effects so each tag appears once
///
/// The first record of a tag is kept. Each later record adds half its
/// probability (capped at 1.0) and, when strictly more severe, replaces the
/// severity, description and detail.
pub fn consolidate(effects: impl IntoIterator<Item = InteractionEffect>) -> EffectMap {
    let mut merged = EffectMap::new();

    for incoming in effects {
        match merged.get_mut(&incoming.effect) {
            None => {
                merged.insert(incoming.effect, incoming);
            }
            Some(existing) => {
                existing.probability =
                    (existing.probability + incoming.probability * REPEAT_WEIGHT).min(1.0);
                if incoming.severity > existing.severity {
                    existing.severity = incoming.severity;
                    existing.description = incoming.description;
                    existing.detail = incoming.detail;
                }
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::get_default_catalogue;
    use crate::matrix::get_default_matrix;
    use crate::types::Severity;

    fn lookup(names: &[&str]) -> Vec<&'static Substance> {
        let catalogue = get_default_catalogue();
        names.iter().map(|n| catalogue.get(n).unwrap()).collect()
    }

    fn raw() -> Vec<InteractionEffect> {
        vec![
            InteractionEffect::new(EffectTag::RespiratoryDepression, Severity::Major, 0.6, "first"),
            InteractionEffect::new(EffectTag::DeathRisk, Severity::Major, 0.2, "death"),
            InteractionEffect::new(EffectTag::RespiratoryDepression, Severity::Lethal, 0.4, "worse"),
            InteractionEffect::new(EffectTag::RespiratoryDepression, Severity::Moderate, 0.2, "milder"),
        ]
    }

    #[test]
    fn test_consolidate_merges_by_tag() {
        let merged = consolidate(raw());
        assert_eq!(merged.len(), 2);

        let resp = &merged[&EffectTag::RespiratoryDepression];
        // 0.6 + 0.4 * 0.5 + 0.2 * 0.5
        assert!((resp.probability - 0.9).abs() < 1e-9);
        assert_eq!(resp.severity, Severity::Lethal);
        assert_eq!(resp.description, "worse");

        assert_eq!(merged[&EffectTag::DeathRisk].description, "death");
    }

    #[test]
    fn test_consolidate_caps_probability() {
        let merged = consolidate(vec![
            InteractionEffect::new(EffectTag::Drowsiness, Severity::Major, 0.95, "a"),
            InteractionEffect::new(EffectTag::Drowsiness, Severity::Major, 0.92, "b"),
        ]);
        assert_eq!(merged[&EffectTag::Drowsiness].probability, 1.0);
        // Equal severity keeps the first description
        assert_eq!(merged[&EffectTag::Drowsiness].description, "a");
    }

    #[test]
    fn test_consolidate_keys_and_severity_ignore_order() {
        let forward = consolidate(raw());
        let mut reversed_input = raw();
        reversed_input.reverse();
        let reversed = consolidate(reversed_input);

        assert_eq!(
            forward.keys().collect::<Vec<_>>(),
            reversed.keys().collect::<Vec<_>>()
        );
        for (tag, effect) in &forward {
            assert_eq!(effect.severity, reversed[tag].severity);
        }
    }

    #[test]
    fn test_consolidate_empty() {
        assert!(consolidate(Vec::new()).is_empty());
    }

    #[test]
    fn test_resolve_single_pair_matches_matrix() {
        crate::logging::init_test();
        let substances = lookup(&["fentanyl", "xanax"]);
        let merged = resolve(get_default_matrix(), &substances);

        assert_eq!(merged.len(), 3);
        assert_eq!(merged[&EffectTag::RespiratoryDepression].severity, Severity::Lethal);
        assert_eq!(merged[&EffectTag::Nodding].probability, 0.80);
    }

    #[test]
    fn test_resolve_no_matrix_entry_is_empty() {
        let substances = lookup(&["lsd", "psilocybin"]);
        assert!(resolve(get_default_matrix(), &substances).is_empty());
    }

    #[test]
    fn test_resolve_fewer_than_two_is_empty() {
        let substances = lookup(&["heroin"]);
        assert!(resolve(get_default_matrix(), &substances).is_empty());
    }

    #[test]
    fn test_resolve_three_substances_merges_pairs() {
        // heroin+alprazolam (opioid/benzo), heroin+alcohol (alcohol/opioid),
        // alprazolam+alcohol (alcohol/benzo)
        let substances = lookup(&["heroin", "alprazolam", "alcohol"]);
        let merged = resolve(get_default_matrix(), &substances);

        let resp = &merged[&EffectTag::RespiratoryDepression];
        assert_eq!(resp.severity, Severity::Lethal);
        assert_eq!(resp.probability, 1.0);
        // First pair's Lethal description survives equal-severity merges
        assert!(resp.description.contains("frequent cause of overdose deaths"));
        assert!(merged.contains_key(&EffectTag::Drowsiness));
        assert!(merged.contains_key(&EffectTag::Nodding));
    }

    #[test]
    fn test_resolve_applies_cocaethylene_override() {
        let substances = lookup(&["alcohol", "cocaine"]);
        let merged = resolve(get_default_matrix(), &substances);

        let cardiac = &merged[&EffectTag::CardiacArrhythmia];
        assert_eq!(cardiac.severity, Severity::Lethal);
        assert!((cardiac.probability - 0.715).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_applies_speedball_override() {
        for names in [["heroin", "cocaine"], ["cocaine", "heroin"]] {
            let merged = resolve(get_default_matrix(), &lookup(&names));

            let death = &merged[&EffectTag::DeathRisk];
            assert_eq!(death.severity, Severity::Lethal);
            assert!((death.probability - 0.42).abs() < 1e-9, "{:?}", names);
        }
    }

    #[test]
    fn test_resolve_applies_pcp_opioid_override() {
        let substances = lookup(&["pcp", "oxycodone"]);
        let merged = resolve(get_default_matrix(), &substances);

        let resp = &merged[&EffectTag::RespiratoryDepression];
        assert_eq!(resp.severity, Severity::Major);
        assert!((resp.probability - 0.715).abs() < 1e-9);

        let death = &merged[&EffectTag::DeathRisk];
        assert!((death.probability - 0.24).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_override_only_for_named_pair() {
        // Same classes as cocaine+alcohol, but no override
        let substances = lookup(&["amphetamine", "alcohol"]);
        let merged = resolve(get_default_matrix(), &substances);

        let cardiac = &merged[&EffectTag::CardiacArrhythmia];
        assert_eq!(cardiac.severity, Severity::Major);
        assert_eq!(cardiac.probability, 0.55);
    }
}
