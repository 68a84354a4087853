//! Safety guidance derived from risk scores and substance classes.

use crate::types::{InteractionEffect, Severity, Substance, SubstanceClass};
use serde::Serialize;
use std::fmt;

/// Headline verdict for a set of interaction effects
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAssessment {
    None,
    Moderate,
    High,
    Extreme,
}

impl InteractionAssessment {
    pub fn from_effects<'a>(effects: impl IntoIterator<Item = &'a InteractionEffect>) -> Self {
        let worst = effects.into_iter().map(|e| e.severity).max();
        match worst {
            None => InteractionAssessment::None,
            Some(Severity::Lethal) => InteractionAssessment::Extreme,
            Some(Severity::Major) => InteractionAssessment::High,
            Some(_) => InteractionAssessment::Moderate,
        }
    }

    pub fn advice(self) -> &'static [&'static str] {
        match self {
            InteractionAssessment::Extreme => &[
                "EXTREME DANGER: This combination has LETHAL potential.",
                "Immediate medical supervision required.",
            ],
            InteractionAssessment::High => &[
                "HIGH RISK: This combination poses significant health risks.",
                "Medical consultation strongly recommended.",
            ],
            InteractionAssessment::Moderate => &["MODERATE RISK: Monitor for side effects."],
            InteractionAssessment::None => &["No specific dangerous interactions found in database."],
        }
    }
}

impl fmt::Display for InteractionAssessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InteractionAssessment::None => "none",
            InteractionAssessment::Moderate => "moderate",
            InteractionAssessment::High => "high",
            InteractionAssessment::Extreme => "extreme",
        };
        f.write_str(label)
    }
}

/// A titled block of advice lines
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Advisory {
    pub title: &'static str,
    pub lines: Vec<&'static str>,
}

impl Advisory {
    fn new(title: &'static str, lines: &[&'static str]) -> Self {
        Self {
            title,
            lines: lines.to_vec(),
        }
    }
}

/// Recommendations for a single substance by its tabled risk
pub fn safety_recommendations(percentage: u8) -> Advisory {
    match percentage {
        90..=u8::MAX => Advisory::new(
            "CRITICAL WARNING: Extremely high overdose risk!",
            &[
                "Never use without medical supervision",
                "Have naloxone (Narcan) immediately available",
                "Consider addiction treatment resources",
            ],
        ),
        75..=89 => Advisory::new(
            "HIGH RISK WARNING",
            &[
                "Use extreme caution with dosing",
                "Never use alone - have someone present",
                "Keep emergency contacts readily available",
            ],
        ),
        60..=74 => Advisory::new(
            "MODERATE-HIGH RISK",
            &[
                "Start with lower doses",
                "Avoid mixing with other substances",
                "Monitor for adverse effects",
            ],
        ),
        40..=59 => Advisory::new(
            "MODERATE RISK",
            &[
                "Follow prescribed dosages carefully",
                "Be aware of tolerance changes",
            ],
        ),
        _ => Advisory::new(
            "LOWER RISK",
            &[
                "Still exercise caution with dosing",
                "Monitor for unexpected reactions",
            ],
        ),
    }
}

/// One-line description of a combined risk percentage
pub fn combined_risk_description(percentage: u8) -> &'static str {
    match percentage {
        90..=u8::MAX => "Extremely High Risk - Life Threatening",
        75..=89 => "Very High Risk - Dangerous Combination",
        60..=74 => "High Risk - Significant Danger",
        40..=59 => "Moderate Risk - Exercise Caution",
        20..=39 => "Low-Moderate Risk - Monitor Closely",
        _ => "Lower Risk - Still Requires Caution",
    }
}

/// Combined risk at or above which emergency preparedness is advised
pub const EMERGENCY_THRESHOLD: u8 = 80;

/// Warnings for a combination, based on the classes present
pub fn combination_warnings(substances: &[&Substance], combined_risk: u8) -> Vec<Advisory> {
    let has = |class: SubstanceClass| substances.iter().any(|s| s.class == class);
    let opioid = has(SubstanceClass::Opioid);
    let benzo = has(SubstanceClass::Benzodiazepine);
    let alcohol = has(SubstanceClass::Alcohol);
    let stimulant = has(SubstanceClass::Stimulant);

    let mut warnings = Vec::new();

    if (opioid && benzo) || (opioid && alcohol) || (benzo && alcohol) {
        warnings.push(Advisory::new(
            "LETHAL COMBINATION DETECTED!",
            &[
                "Respiratory depression risk extremely high",
                "This combination is responsible for majority of overdose deaths",
                "Seek immediate medical help if experiencing breathing difficulties",
            ],
        ));
    }

    if stimulant && (opioid || benzo || alcohol) {
        warnings.push(Advisory::new(
            "DANGEROUS SPEEDBALL COMBINATION!",
            &[
                "Masking effects can lead to unexpected overdose",
                "Cardiac stress significantly increased",
            ],
        ));
    }

    if combined_risk >= EMERGENCY_THRESHOLD {
        warnings.push(Advisory::new(
            "EMERGENCY PREPAREDNESS ESSENTIAL",
            &[
                "Have naloxone (Narcan) immediately available",
                "Ensure someone trained in overdose response is present",
                "Know emergency contact numbers",
            ],
        ));
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::get_default_catalogue;
    use crate::types::EffectTag;

    fn substances(names: &[&str]) -> Vec<&'static Substance> {
        let catalogue = get_default_catalogue();
        names.iter().map(|n| catalogue.get(n).unwrap()).collect()
    }

    #[test]
    fn test_assessment_from_worst_severity() {
        let minor = InteractionEffect::new(EffectTag::Nausea, Severity::Minor, 0.1, "");
        let major = InteractionEffect::new(EffectTag::Drowsiness, Severity::Major, 0.1, "");
        let lethal = InteractionEffect::new(EffectTag::DeathRisk, Severity::Lethal, 0.1, "");

        assert_eq!(
            InteractionAssessment::from_effects(Vec::<&InteractionEffect>::new()),
            InteractionAssessment::None
        );
        assert_eq!(InteractionAssessment::from_effects([&minor]), InteractionAssessment::Moderate);
        assert_eq!(
            InteractionAssessment::from_effects([&minor, &major]),
            InteractionAssessment::High
        );
        assert_eq!(
            InteractionAssessment::from_effects([&lethal, &major]),
            InteractionAssessment::Extreme
        );
    }

    #[test]
    fn test_recommendation_bands() {
        assert!(safety_recommendations(95).title.starts_with("CRITICAL"));
        assert_eq!(safety_recommendations(75).title, "HIGH RISK WARNING");
        assert_eq!(safety_recommendations(60).title, "MODERATE-HIGH RISK");
        assert_eq!(safety_recommendations(40).title, "MODERATE RISK");
        assert_eq!(safety_recommendations(0).title, "LOWER RISK");
    }

    #[test]
    fn test_combined_description_bands() {
        assert_eq!(combined_risk_description(100), "Extremely High Risk - Life Threatening");
        assert_eq!(combined_risk_description(80), "Very High Risk - Dangerous Combination");
        assert_eq!(combined_risk_description(25), "Low-Moderate Risk - Monitor Closely");
        assert_eq!(combined_risk_description(5), "Lower Risk - Still Requires Caution");
    }

    #[test]
    fn test_opioid_benzo_is_lethal_combination() {
        let warnings = combination_warnings(&substances(&["fentanyl", "xanax"]), 10);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].title, "LETHAL COMBINATION DETECTED!");
    }

    #[test]
    fn test_stimulant_with_depressant_is_speedball() {
        let warnings = combination_warnings(&substances(&["cocaine", "heroin"]), 100);
        let titles: Vec<_> = warnings.iter().map(|w| w.title).collect();
        assert_eq!(
            titles,
            vec!["DANGEROUS SPEEDBALL COMBINATION!", "EMERGENCY PREPAREDNESS ESSENTIAL"]
        );
    }

    #[test]
    fn test_hallucinogens_have_no_class_warnings() {
        let warnings = combination_warnings(&substances(&["lsd", "psilocybin"]), 56);
        assert!(warnings.is_empty());
    }
}
