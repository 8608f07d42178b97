//! Verdicts: the outcome of assessing a single report

use std::fmt;

/// Encoding used by tabular consumers for a rejected entry
pub const REJECTED_SENTINEL: f64 = -1.0;

/// Reason a report was excluded
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// A context value was negative (no observation)
    InvalidContext,
    /// Distance reached or exceeded the admissible maximum
    OutOfRange,
    /// Geometry or decay produced a non-finite value
    Degenerate,
}

impl RejectReason {
    pub fn name(&self) -> &'static str {
        match self {
            RejectReason::InvalidContext => "invalid-context",
            RejectReason::OutOfRange => "out-of-range",
            RejectReason::Degenerate => "degenerate",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance or weight of a report, or the reason it was excluded.
///
/// Rejections flow unchanged through weighting and are skipped by the
/// trust aggregation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Verdict {
    Accepted(f64),
    Rejected(RejectReason),
}

impl Verdict {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        !self.is_accepted()
    }

    /// Accepted value, if any
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Verdict::Accepted(v) => Some(*v),
            Verdict::Rejected(_) => None,
        }
    }

    pub fn reason(&self) -> Option<RejectReason> {
        match self {
            Verdict::Accepted(_) => None,
            Verdict::Rejected(reason) => Some(*reason),
        }
    }

    /// Apply `f` to an accepted value; rejections pass through
    pub fn and_then(self, f: impl FnOnce(f64) -> Verdict) -> Verdict {
        match self {
            Verdict::Accepted(v) => f(v),
            rejected => rejected,
        }
    }

    /// Flatten to the numeric table encoding (`-1` for rejected)
    pub fn sentinel(&self) -> f64 {
        self.value().unwrap_or(REJECTED_SENTINEL)
    }

    /// Parse the numeric table encoding. Any negative value is rejected.
    pub fn from_sentinel(value: f64) -> Verdict {
        if value.is_nan() {
            Verdict::Rejected(RejectReason::Degenerate)
        } else if value < 0.0 {
            Verdict::Rejected(RejectReason::InvalidContext)
        } else {
            Verdict::Accepted(value)
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Verdict::Rejected(RejectReason::InvalidContext)
    }
}
