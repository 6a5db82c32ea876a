use serde::Serialize;
use std::fmt;

use crate::schema::CanonicalField;

/// Failure to read the dataset source at all.
#[derive(Debug)]
pub enum LoadError {
    Unreadable(String),
    Malformed(String),
    NoHeader,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Unreadable(msg) => write!(f, "Dataset unreadable: {}", msg),
            LoadError::Malformed(msg) => write!(f, "Malformed CSV: {}", msg),
            LoadError::NoHeader => write!(f, "CSV has no header row"),
        }
    }
}

impl std::error::Error for LoadError {}

/// A mandatory canonical field could not be resolved from the table's columns.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    pub missing: Vec<CanonicalField>,
    pub available: Vec<String>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let missing: Vec<&str> = self.missing.iter().map(|m| m.as_str()).collect();
        write!(
            f,
            "CSV must include product and category columns (or similar). Unresolved: {}. Detected columns: {}",
            missing.join(", "),
            self.available.join(", ")
        )
    }
}

impl std::error::Error for SchemaError {}

/// Invalid what-if parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    TweakOutOfRange(f64),
    SafetyGainOutOfRange(f64),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::TweakOutOfRange(t) => {
                write!(f, "tweak must be between 0.5 and 2.0, got {}", t)
            }
            SimulationError::SafetyGainOutOfRange(g) => {
                write!(f, "safety gain must be between 0 and 100, got {}", g)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// A non-fatal problem attached to a partial result.
///
/// `MissingData` means a feature was skipped because its inputs are absent or
/// non-numeric. `Undefined` means a metric has no mathematical value for the
/// given inputs (e.g. a ratio over a zero price).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    MissingData { feature: String, reason: String },
    Undefined { metric: String, reason: String },
}

impl Notice {
    pub fn missing(feature: impl Into<String>, reason: impl Into<String>) -> Self {
        Notice::MissingData {
            feature: feature.into(),
            reason: reason.into(),
        }
    }

    pub fn undefined(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        Notice::Undefined {
            metric: metric.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::MissingData { feature, reason } => write!(f, "{} unavailable: {}", feature, reason),
            Notice::Undefined { metric, reason } => write!(f, "{} undefined: {}", metric, reason),
        }
    }
}
