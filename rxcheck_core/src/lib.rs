#![forbid(unsafe_code)]

//! Core domain model and analysis logic for rxcheck.
//!
//! This crate provides:
//! - Domain types (substance classes, effects, severities, profiles)
//! - Static tables (substance catalogue, risk table, interaction matrix)
//! - Interaction resolution with substance-specific overrides
//! - Combination overdose-risk calculation
//! - Advisory text and report building

pub mod types;
pub mod error;
pub mod catalogue;
pub mod risk_table;
pub mod matrix;
pub mod overrides;
pub mod resolver;
pub mod combination;
pub mod advisory;
pub mod config;
pub mod logging;
pub mod engine;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalogue::{get_default_catalogue, Catalogue};
pub use risk_table::{get_default_risk_table, RiskCategory, RiskTable};
pub use matrix::{get_default_matrix, InteractionMatrix};
pub use resolver::{consolidate, resolve, EffectMap};
pub use combination::{combination_breakdown, combination_risk, CombinationBreakdown};
pub use advisory::{Advisory, InteractionAssessment};
pub use config::{Config, OutputFormat};
pub use engine::{
    Analyzer, CatalogueRow, InteractionReport, OverdoseAssessment, OverdoseReport, SubstanceRisk,
};
