//! Report restriction - keep only reports close enough to the target

use ctm_core::{RejectReason, Report, ReportTable, TargetContext, TrustResult, Verdict};
use tracing::{debug, trace, warn};

use crate::distance::{report_distance_with, Spread};

/// Restriction counters for a batch of reports
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestrictionStats {
    pub accepted: u32,
    pub invalid_context: u32,
    pub out_of_range: u32,
    pub degenerate: u32,
}

impl RestrictionStats {
    pub fn from_verdicts(verdicts: &[Verdict]) -> Self {
        let mut stats = RestrictionStats::default();
        for verdict in verdicts {
            match verdict {
                Verdict::Accepted(_) => stats.accepted += 1,
                Verdict::Rejected(RejectReason::InvalidContext) => stats.invalid_context += 1,
                Verdict::Rejected(RejectReason::OutOfRange) => stats.out_of_range += 1,
                Verdict::Rejected(RejectReason::Degenerate) => stats.degenerate += 1,
            }
        }
        stats
    }

    pub fn rejected(&self) -> u32 {
        self.invalid_context + self.out_of_range + self.degenerate
    }
}

/// Assess a single report against a precomputed spread and bound `t`
fn restrict_one(report: &Report, ctx: &TargetContext, spread: &Spread, t: f64) -> Verdict {
    if !report.has_valid_context() {
        trace!(
            service = report.service,
            capability = report.capability,
            "Report without observation"
        );
        return Verdict::Rejected(RejectReason::InvalidContext);
    }

    let distance = report_distance_with(report, ctx, spread);
    if !distance.is_finite() {
        warn!(
            "Degenerate distance for report {:?} against target {:?}",
            report, ctx
        );
        return Verdict::Rejected(RejectReason::Degenerate);
    }

    // Boundary is exclusive: a report exactly at t is dropped
    if distance >= t {
        trace!("Report out of range: distance {} >= {}", distance, t);
        return Verdict::Rejected(RejectReason::OutOfRange);
    }

    Verdict::Accepted(distance)
}

/// Compute each report's distance and drop the implausible ones.
///
/// The output is index-aligned with `reports`.
pub fn restrict_reports(reports: &[Report], ctx: &TargetContext) -> Vec<Verdict> {
    let spread = Spread::of(ctx);
    let t = spread.max_distance();

    let verdicts: Vec<Verdict> = reports
        .iter()
        .map(|report| restrict_one(report, ctx, &spread, t))
        .collect();

    let stats = RestrictionStats::from_verdicts(&verdicts);
    debug!(
        accepted = stats.accepted,
        rejected = stats.rejected(),
        max_distance = t,
        "Restricted reports"
    );

    verdicts
}

/// Decode a raw report table and restrict its rows
pub fn restrict_table(table: &ReportTable, ctx: &TargetContext) -> TrustResult<Vec<Verdict>> {
    let reports = table.reports()?;
    Ok(restrict_reports(&reports, ctx))
}
