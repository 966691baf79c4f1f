//! Compatibility checking for transform chains.
//!
//! Adjacent transforms are compatible when each output dimension of one
//! matches the input dimension of the next at the same position. A pair
//! matches at the first applicable tier:
//!
//! 1. **Identical**: equal global ids.
//! 2. **Local-equivalent**: equal local ids, both dimensions owned (possibly
//!    by different coordinate systems).
//! 3. **Semantically equivalent**: equal kind and unit.
//!
//! Anything else is a [`Violation`]. Tier 2 does not compare units or
//! kinds; two owned `x` axes in different units are accepted.

mod report;

pub use report::{ChainReport, Severity, TierCounts, Violation, ViolationCode};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CoordregError;
use crate::identity::Dimension;
use crate::transform::CoordinateTransform;

/// Options for chain validation.
#[derive(Clone, Debug, Default)]
pub struct ValidateOptions {
    /// If true, any violation fails validation.
    pub strict: bool,
}

/// The tier at which two dimensions were found compatible, or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Compatibility {
    Identical,
    LocalEquivalent,
    SemanticallyEquivalent,
    Incompatible,
}

impl Compatibility {
    pub fn is_compatible(&self) -> bool {
        *self != Compatibility::Incompatible
    }
}

/// Decides the compatibility tier for one output/input dimension pair.
pub fn classify(output: &Dimension, input: &Dimension) -> Compatibility {
    if output.global_id() == input.global_id() {
        Compatibility::Identical
    } else if output.is_owned() && input.is_owned() && output.local_id() == input.local_id() {
        Compatibility::LocalEquivalent
    } else if output.kind() == input.kind() && output.unit() == input.unit() {
        Compatibility::SemanticallyEquivalent
    } else {
        Compatibility::Incompatible
    }
}

/// Validates that each transform's outputs fit the next transform's inputs.
///
/// Every adjacent pair is checked in full before deciding the outcome, so
/// a failure carries all violations in the chain.
///
/// # Errors
/// In strict mode, returns [`CoordregError::ChainValidationFailed`] with the
/// complete report if any violation was found. Otherwise violations are
/// returned in the report as warnings.
pub fn validate_chain(
    transforms: &[CoordinateTransform],
    opts: &ValidateOptions,
) -> Result<ChainReport, CoordregError> {
    let severity = if opts.strict {
        Severity::Error
    } else {
        Severity::Warning
    };
    let mut report = ChainReport::new();

    for (index, pair) in transforms.windows(2).enumerate() {
        check_pair(index, &pair[0], &pair[1], severity, &mut report);
        report.transform_pairs += 1;
    }

    if !opts.strict {
        for violation in &report.violations {
            warn!(
                transform_index = violation.transform_index,
                dimension_index = violation.dimension_index,
                "{}",
                violation
            );
        }
        return Ok(report);
    }

    if report.is_clean() {
        Ok(report)
    } else {
        Err(CoordregError::ChainValidationFailed {
            violation_count: report.violation_count(),
            report,
        })
    }
}

fn check_pair(
    index: usize,
    upstream: &CoordinateTransform,
    downstream: &CoordinateTransform,
    severity: Severity,
    report: &mut ChainReport,
) {
    let outputs = &upstream.output_dimensions;
    let inputs = &downstream.input_dimensions;

    if outputs.len() != inputs.len() {
        report.add(Violation {
            severity,
            code: ViolationCode::ArityMismatch,
            transform_index: index,
            dimension_index: outputs.len().min(inputs.len()),
            output_dim_summary: format!("{} dimension(s)", outputs.len()),
            input_dim_summary: format!("{} dimension(s)", inputs.len()),
        });
    }

    for (position, (output, input)) in outputs.iter().zip(inputs).enumerate() {
        match classify(output, input) {
            Compatibility::Identical => report.tiers.identical += 1,
            Compatibility::LocalEquivalent => {
                debug!(output = %output, input = %input, "local-equivalent dimensions");
                report.tiers.local_equivalent += 1;
            }
            Compatibility::SemanticallyEquivalent => {
                debug!(output = %output, input = %input, "semantically equivalent dimensions");
                report.tiers.semantically_equivalent += 1;
            }
            Compatibility::Incompatible => report.add(Violation {
                severity,
                code: ViolationCode::IncompatibleDimensions,
                transform_index: index,
                dimension_index: position,
                output_dim_summary: output.summary(),
                input_dim_summary: input.summary(),
            }),
        }
    }
}
