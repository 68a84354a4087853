//! Tabled overdose-risk percentages.
//!
//! Scores are static relative danger ratings in `0..=99`, not calibrated
//! clinical probabilities.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Highest percentage any entry may hold
pub const MAX_PERCENTAGE: u8 = 99;

static DEFAULT_RISK_TABLE: Lazy<RiskTable> = Lazy::new(RiskTable::builtin);

const BUILTIN_RISKS: &[(&str, u8)] = &[
    // Synthetic opioids and sudden-death inhalants
    ("fentanyl", 95),
    ("carfentanil", 98),
    ("butane", 92),
    // Potent opioids and respiratory depressants
    ("heroin", 85),
    ("morphine", 78),
    ("oxycodone", 76),
    ("hydrocodone", 74),
    ("methadone", 82),
    ("rohypnol", 79),
    ("ghb", 81),
    ("barbiturates", 83),
    ("phenobarbital", 80),
    ("secobarbital", 84),
    ("quaaludes", 77),
    // Other opioids and strong depressants
    ("buprenorphine", 65),
    ("codeine", 62),
    ("tramadol", 68),
    ("xanax", 72),
    ("ativan", 70),
    ("midazolam", 74),
    ("alcohol", 69),
    ("ambien", 66),
    ("soma", 71),
    ("pregabalin", 63),
    ("toluene", 73),
    ("nitrous_oxide", 61),
    // Benzodiazepines and some stimulants
    ("valium", 45),
    ("klonopin", 48),
    ("temazepam", 52),
    ("cocaine", 58),
    ("methamphetamine", 55),
    ("amphetamine", 51),
    ("mdma", 49),
    ("pcp", 56),
    ("ketamine", 42),
    ("gabapentin", 41),
    ("spice", 54),
    ("bath_salts", 57),
    ("flakka", 53),
    // Prescription stimulants and hallucinogens
    ("adderall", 35),
    ("dextroamphetamine", 38),
    ("methylphenidate", 32),
    ("ritalin", 30),
    ("lsd", 25),
    ("psilocybin", 22),
    ("mescaline", 28),
    ("dmt", 24),
    ("dxm", 36),
    ("2cb", 33),
    ("synthetic_cannabis", 39),
    // Cannabis and mild stimulants
    ("thc", 15),
    ("cbd", 12),
    ("caffeine", 18),
    ("nicotine", 16),
];

/// Catalogue identifier → risk-table key, for names tabled under a street or brand name
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("alprazolam", "xanax"),
    ("diazepam", "valium"),
    ("clonazepam", "klonopin"),
    ("lorazepam", "ativan"),
    ("2c-b", "2cb"),
    ("jwh-018", "spice"),
    ("mephedrone", "bath_salts"),
];

/// Coarse banding of a risk percentage
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    VeryLow,
    Low,
    Moderate,
    High,
    VeryHigh,
    ExtremelyHigh,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::ExtremelyHigh,
        RiskCategory::VeryHigh,
        RiskCategory::High,
        RiskCategory::Moderate,
        RiskCategory::Low,
        RiskCategory::VeryLow,
    ];

    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            90..=u8::MAX => RiskCategory::ExtremelyHigh,
            75..=89 => RiskCategory::VeryHigh,
            60..=74 => RiskCategory::High,
            40..=59 => RiskCategory::Moderate,
            20..=39 => RiskCategory::Low,
            _ => RiskCategory::VeryLow,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            RiskCategory::ExtremelyHigh => "Extremely High Risk - Fatal overdose highly likely",
            RiskCategory::VeryHigh => "Very High Risk - Significant overdose potential",
            RiskCategory::High => "High Risk - Notable overdose danger",
            RiskCategory::Moderate => "Moderate Risk - Overdose possible with misuse",
            RiskCategory::Low => "Low Risk - Overdose unlikely but possible",
            RiskCategory::VeryLow => "Very Low Risk - Overdose extremely rare",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().replace('-', "_").as_str() {
            "extremely_high" => Some(RiskCategory::ExtremelyHigh),
            "very_high" => Some(RiskCategory::VeryHigh),
            "high" => Some(RiskCategory::High),
            "moderate" => Some(RiskCategory::Moderate),
            "low" => Some(RiskCategory::Low),
            "very_low" => Some(RiskCategory::VeryLow),
            _ => None,
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Substance name → overdose-risk percentage
#[derive(Clone, Debug)]
pub struct RiskTable {
    entries: HashMap<String, u8>,
    aliases: HashMap<String, String>,
}

/// Get a reference to the cached built-in table
pub fn get_default_risk_table() -> &'static RiskTable {
    &DEFAULT_RISK_TABLE
}

impl RiskTable {
    /// Build the table of built-in scores
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_RISKS
                .iter()
                .map(|(name, pct)| (name.to_string(), *pct))
                .collect(),
            aliases: BUILTIN_ALIASES
                .iter()
                .map(|(alias, key)| (alias.to_string(), key.to_string()))
                .collect(),
        }
    }

    /// Map a name onto the key it is tabled under
    ///
    /// Names without an alias are returned unchanged.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        if self.entries.contains_key(name) {
            return name;
        }
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Identity of a name for class-membership checks
    ///
    /// Follows the built-in aliases only, so custom entries never change
    /// which substance a name refers to.
    pub fn membership_key<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Tabled percentage, or 0 for unknown names
    pub fn percentage(&self, name: &str) -> u8 {
        self.entries
            .get(self.canonical(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(self.canonical(name))
    }

    pub fn category(&self, name: &str) -> RiskCategory {
        RiskCategory::from_percentage(self.percentage(name))
    }

    /// Insert or replace an entry, clamping the score to `0..=99`
    pub fn add_custom(&mut self, name: &str, percentage: i64) {
        let clamped = percentage.clamp(0, MAX_PERCENTAGE as i64) as u8;
        if clamped as i64 != percentage {
            tracing::warn!(
                "Risk for '{}' clamped from {} to {}",
                name,
                percentage,
                clamped
            );
        }
        self.entries.insert(name.to_string(), clamped);
    }

    /// Names in one category, sorted
    pub fn by_category(&self, category: RiskCategory) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, pct)| RiskCategory::from_percentage(**pct) == category)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, pct) in &self.entries {
            if *pct > MAX_PERCENTAGE {
                errors.push(format!("Risk for '{}' exceeds {}: {}", name, MAX_PERCENTAGE, pct));
            }
        }
        for (alias, key) in &self.aliases {
            if !self.entries.contains_key(key) {
                errors.push(format!(
                    "Risk alias '{}' references non-existent entry '{}'",
                    alias, key
                ));
            }
        }
        errors
    }
}
