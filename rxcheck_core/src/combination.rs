//! Blended overdose risk for a set of substances.
//!
//! The tabled scores are summed as fractions, bent by `1 - (1 - sum)^1.3`,
//! and scaled by 1.4 when a respiratory depressant is mixed with a stimulant.
//! Membership in those two sets follows the built-in generic-name aliases, so
//! `alprazolam` counts as `xanax` and `diazepam` as `valium`.
//!
//! Once the summed fraction exceeds 1.0 the power of a negative base is NaN.
//! That case reports 100, one above the normal cap of 99. This mirrors the
//! long-standing behaviour of the tool rather than a deliberate saturation
//! rule; see the `saturated_*` tests.

use crate::risk_table::{RiskTable, MAX_PERCENTAGE};
use serde::Serialize;

/// Exponent of the blending curve
pub const BLEND_EXPONENT: f64 = 1.3;

/// Multiplier for a stimulant + respiratory depressant mix
pub const SPEEDBALL_MULTIPLIER: f64 = 1.4;

/// Reported when the blend leaves the real numbers
pub const OVERFLOW_PERCENTAGE: u8 = 100;

/// Risk-table keys counted as respiratory depressants
pub const RESPIRATORY_DEPRESSANTS: &[&str] = &["alcohol", "heroin", "fentanyl", "xanax", "valium"];

/// Risk-table keys counted as stimulants
pub const STIMULANTS: &[&str] = &["cocaine", "methamphetamine", "adderall"];

/// Intermediate values of one combination-risk computation
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CombinationBreakdown {
    /// Σ risk / 100
    pub summed: f64,
    /// After the blending curve and the optional multiplier
    pub blended: f64,
    pub speedball: bool,
    pub percentage: u8,
}

/// Combined overdose-risk percentage in `0..=100`
pub fn combination_risk<S: AsRef<str>>(table: &RiskTable, names: &[S]) -> u8 {
    combination_breakdown(table, names).percentage
}

/// Combined overdose risk with its intermediate values
pub fn combination_breakdown<S: AsRef<str>>(table: &RiskTable, names: &[S]) -> CombinationBreakdown {
    if names.is_empty() {
        return CombinationBreakdown {
            summed: 0.0,
            blended: 0.0,
            speedball: false,
            percentage: 0,
        };
    }

    let summed: f64 = names
        .iter()
        .map(|name| table.percentage(name.as_ref()) as f64 / 100.0)
        .sum();

    let speedball = contains_any(table, names, RESPIRATORY_DEPRESSANTS)
        && contains_any(table, names, STIMULANTS);

    let mut blended = 1.0 - (1.0 - summed).powf(BLEND_EXPONENT);
    if speedball {
        blended *= SPEEDBALL_MULTIPLIER;
    }

    let percentage = to_percentage(blended);
    tracing::debug!(
        "Combination risk: summed={:.3} blended={:.3} speedball={} -> {}%",
        summed,
        blended,
        speedball,
        percentage
    );

    CombinationBreakdown {
        summed,
        blended,
        speedball,
        percentage,
    }
}

fn contains_any<S: AsRef<str>>(table: &RiskTable, names: &[S], set: &[&str]) -> bool {
    names
        .iter()
        .any(|name| set.contains(&table.membership_key(name.as_ref())))
}

fn to_percentage(blended: f64) -> u8 {
    let scaled = (blended * 100.0).floor();
    if scaled.is_nan() || scaled < 0.0 {
        return OVERFLOW_PERCENTAGE;
    }
    scaled.min(MAX_PERCENTAGE as f64) as u8
}
