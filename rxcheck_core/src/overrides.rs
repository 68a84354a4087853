//! Substance-specific adjustments to class-level interaction effects.
//!
//! A few named pairs behave worse than their classes suggest. Each rule names
//! an unordered pair of identifiers and the transforms applied to that pair's
//! effects before consolidation.

use crate::types::{EffectTag, InteractionEffect, Severity};

/// One adjustment to the effects of a pair
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectTransform {
    /// Effect to adjust; `None` adjusts every effect
    pub tag: Option<EffectTag>,
    /// Probability multiplier; the result is capped at 1.0
    pub probability_scale: f64,
    /// Severity is raised to at least this level
    pub min_severity: Option<Severity>,
}

impl EffectTransform {
    pub fn applies_to(&self, effect: &InteractionEffect) -> bool {
        self.tag.map_or(true, |tag| tag == effect.effect)
    }

    pub fn apply(&self, effect: &mut InteractionEffect) {
        if !self.applies_to(effect) {
            return;
        }
        effect.probability = (effect.probability * self.probability_scale).min(1.0);
        if let Some(floor) = self.min_severity {
            effect.severity = effect.severity.max(floor);
        }
    }
}

/// Transforms attached to an unordered pair of substance identifiers
#[derive(Clone, Copy, Debug)]
pub struct OverrideRule {
    pub pair: (&'static str, &'static str),
    pub reason: &'static str,
    pub transforms: &'static [EffectTransform],
}

impl OverrideRule {
    pub fn matches(&self, a: &str, b: &str) -> bool {
        (self.pair.0 == a && self.pair.1 == b) || (self.pair.0 == b && self.pair.1 == a)
    }
}

pub const OVERRIDE_RULES: &[OverrideRule] = &[
    OverrideRule {
        pair: ("pcp", "oxycodone"),
        reason: "PCP masks opioid sedation while both suppress airway reflexes",
        transforms: &[
            EffectTransform {
                tag: Some(EffectTag::RespiratoryDepression),
                probability_scale: 1.3,
                min_severity: Some(Severity::Major),
            },
            EffectTransform {
                tag: Some(EffectTag::DeathRisk),
                probability_scale: 1.2,
                min_severity: None,
            },
        ],
    },
    OverrideRule {
        pair: ("cocaine", "alcohol"),
        reason: "Hepatic formation of cardiotoxic cocaethylene",
        transforms: &[EffectTransform {
            tag: Some(EffectTag::CardiacArrhythmia),
            probability_scale: 1.3,
            min_severity: Some(Severity::Lethal),
        }],
    },
    OverrideRule {
        pair: ("heroin", "cocaine"),
        reason: "Speedball: stimulant wears off first and leaves the opioid unopposed",
        transforms: &[EffectTransform {
            tag: Some(EffectTag::DeathRisk),
            probability_scale: 1.4,
            min_severity: Some(Severity::Lethal),
        }],
    },
];

/// Rule for a pair of identifiers, if any
pub fn find_rule(a: &str, b: &str) -> Option<&'static OverrideRule> {
    OVERRIDE_RULES.iter().find(|rule| rule.matches(a, b))
}

/// Apply the rule for (a, b) to `effects`; no rule means no change
pub fn apply_overrides(a: &str, b: &str, effects: &mut [InteractionEffect]) {
    let Some(rule) = find_rule(a, b) else {
        return;
    };

    tracing::debug!("Applying override for {} + {}: {}", a, b, rule.reason);
    for transform in rule.transforms {
        for effect in effects.iter_mut() {
            transform.apply(effect);
        }
    }
}
