//! Chain validation report types.
//!
//! Violations are structured so they can be printed for users, serialized
//! for tooling, or matched on programmatically.

use serde::Serialize;
use std::fmt;

/// The result of validating a transform chain.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ChainReport {
    /// Number of adjacent transform pairs inspected.
    pub transform_pairs: usize,

    /// How many dimension pairs matched at each compatible tier.
    pub tiers: TierCounts,

    /// All violations found, in chain order.
    pub violations: Vec<Violation>,
}

impl ChainReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if no violations were found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of dimension pairs checked, compatible or not.
    pub fn dimension_pairs(&self) -> usize {
        self.tiers.total()
            + self
                .violations
                .iter()
                .filter(|v| v.code == ViolationCode::IncompatibleDimensions)
                .count()
    }
}

impl fmt::Display for ChainReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            writeln!(
                f,
                "Chain is compatible: {} transform pair(s), {} dimension pair(s) checked",
                self.transform_pairs,
                self.dimension_pairs()
            )?;
            return writeln!(f, "  {}", self.tiers);
        }

        writeln!(
            f,
            "Chain validation found {} violation(s) across {} transform pair(s):",
            self.violations.len(),
            self.transform_pairs
        )?;
        writeln!(f)?;

        for violation in &self.violations {
            writeln!(f, "  {}", violation)?;
        }

        Ok(())
    }
}

/// Counts of compatible dimension pairs per tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub identical: usize,
    pub local_equivalent: usize,
    pub semantically_equivalent: usize,
}

impl TierCounts {
    pub fn total(&self) -> usize {
        self.identical + self.local_equivalent + self.semantically_equivalent
    }
}

impl fmt::Display for TierCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "identical: {}, local-equivalent: {}, semantically-equivalent: {}",
            self.identical, self.local_equivalent, self.semantically_equivalent
        )
    }
}

/// A single incompatibility between adjacent transforms.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Violation {
    pub severity: Severity,

    pub code: ViolationCode,

    /// Index of the transform whose outputs feed the next transform.
    pub transform_index: usize,

    /// Position of the offending dimension pair.
    pub dimension_index: usize,

    pub output_dim_summary: String,

    pub input_dim_summary: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} between transform {} and {} at dimension {}: output {} -> input {}",
            severity,
            self.code,
            self.transform_index,
            self.transform_index + 1,
            self.dimension_index,
            self.output_dim_summary,
            self.input_dim_summary
        )
    }
}

/// Severity of a violation: errors in strict mode, warnings otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// A stable code identifying the kind of violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCode {
    /// An output dimension matches its input dimension at no tier.
    IncompatibleDimensions,
    /// Adjacent transforms disagree on the number of dimensions.
    ArityMismatch,
}
