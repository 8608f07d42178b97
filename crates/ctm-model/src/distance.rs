//! Distance engine - geometry of reports in the service/capability plane
//!
//! A report's distance is the smaller of two candidates:
//! - the shared distance, a normalised Euclidean distance to the target
//! - the unique distance of the regime selected by the report's note
//!
//! Any zero denominator makes the affected candidate infinite. The
//! restriction stage rejects non-finite distances as degenerate, so NaN
//! never leaves this module.

use ctm_core::{Note, Report, TargetContext};

/// Absolute distance between a target and a current context value
#[inline]
pub fn abs_distance(target: i64, current: i64) -> u64 {
    target.abs_diff(current)
}

/// Squared spreads of the target context, `dS_max_sq` and `dC_max_sq`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Spread {
    pub ds_max_sq: f64,
    pub dc_max_sq: f64,
}

impl Spread {
    pub fn new(ds_max_sq: f64, dc_max_sq: f64) -> Self {
        Spread {
            ds_max_sq,
            dc_max_sq,
        }
    }

    /// Spreads between the targets and the scale maxima
    pub fn of(ctx: &TargetContext) -> Self {
        Spread {
            ds_max_sq: ctx.ds_max_sq(),
            dc_max_sq: ctx.dc_max_sq(),
        }
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.ds_max_sq + self.dc_max_sq
    }

    /// Admissible distance bound `t`
    pub fn max_distance(&self) -> f64 {
        self.total().sqrt()
    }
}

/// `num / den`, infinite when `den` is zero
#[inline]
fn quotient(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        f64::INFINITY
    } else {
        num / den
    }
}

/// Truncating integer quotient, infinite when `den` is zero
#[inline]
fn int_quotient(num: i64, den: i64) -> f64 {
    match num.checked_div(den) {
        Some(q) => q as f64,
        None if den == 0 => f64::INFINITY,
        // i64::MIN / -1
        None => -(i64::MIN as f64),
    }
}

/// `sqrt(spread * sum)`, kept infinite when `sum` is
#[inline]
fn scaled_norm(spread: &Spread, sum: f64) -> f64 {
    if sum.is_infinite() {
        f64::INFINITY
    } else {
        (spread.total() * sum).sqrt()
    }
}

/// Which dimension the unique distance treats as informative
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DistanceRegime {
    /// Non-negative notes: measured from the service ceiling
    PositiveBias,
    /// Negative notes: measured from the capability ceiling
    NegativeBias,
}

impl DistanceRegime {
    pub fn for_note(note: Note) -> Self {
        if note.is_negative() {
            DistanceRegime::NegativeBias
        } else {
            DistanceRegime::PositiveBias
        }
    }

    /// Regime-specific distance of a report.
    ///
    /// Both ratios are integer quotients, so a report inside the favourable
    /// region has a unique distance of 0.
    pub fn unique_distance(&self, report: &Report, ctx: &TargetContext, spread: &Spread) -> f64 {
        let (ceiling, other) = match self {
            DistanceRegime::PositiveBias => (
                int_quotient(
                    ctx.service_max.saturating_sub(report.service),
                    ctx.service_max
                        .saturating_sub(ctx.service_target.saturating_sub(ctx.eta)),
                ),
                int_quotient(
                    report.capability,
                    ctx.capability_target.saturating_add(ctx.eta),
                ),
            ),
            DistanceRegime::NegativeBias => (
                int_quotient(
                    ctx.capability_max.saturating_sub(report.capability),
                    ctx.capability_max
                        .saturating_sub(ctx.capability_target.saturating_sub(ctx.eta)),
                ),
                int_quotient(report.service, ctx.service_target.saturating_add(ctx.eta)),
            ),
        };

        scaled_norm(spread, ceiling * ceiling + other * other)
    }
}

/// Normalised Euclidean distance from the report to the target
pub fn shared_distance(report: &Report, ctx: &TargetContext, spread: &Spread) -> f64 {
    let ds = abs_distance(ctx.service_target, report.service) as f64;
    let dc = abs_distance(ctx.capability_target, report.capability) as f64;

    scaled_norm(
        spread,
        quotient(ds * ds, spread.ds_max_sq) + quotient(dc * dc, spread.dc_max_sq),
    )
}

/// Distance of a report using explicit spreads
pub fn report_distance_with(report: &Report, ctx: &TargetContext, spread: &Spread) -> f64 {
    let shared = shared_distance(report, ctx, spread);
    let unique = DistanceRegime::for_note(report.note).unique_distance(report, ctx, spread);
    shared.min(unique)
}

/// Distance of a report from the target context
pub fn report_distance(report: &Report, ctx: &TargetContext) -> f64 {
    report_distance_with(report, ctx, &Spread::of(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> (Report, TargetContext, Spread) {
        (
            Report::new(50, 50, Note::Positive, 0),
            TargetContext::new(51, 51, 101, 101, 1),
            Spread::new(50.0, 50.0),
        )
    }

    #[test]
    fn test_abs_distance() {
        assert_eq!(abs_distance(51, 50), 1);
        assert_eq!(abs_distance(50, 51), 1);
        assert_eq!(abs_distance(7, 7), 0);
    }

    #[test]
    fn test_canonical_regression() {
        let (report, ctx, spread) = canonical();
        let d = report_distance_with(&report, &ctx, &spread);
        assert!((d - 2.0).abs() < 1e-9, "got {}", d);
    }

    #[test]
    fn test_canonical_parts() {
        let (report, ctx, spread) = canonical();

        let shared = shared_distance(&report, &ctx, &spread);
        assert!((shared - 2.0).abs() < 1e-9);

        // Quotients 51/51 and 50/52 truncate to 1 and 0: sqrt(100 * 1)
        let unique = DistanceRegime::PositiveBias.unique_distance(&report, &ctx, &spread);
        assert_eq!(unique, 10.0);
    }

    #[test]
    fn test_canonical_with_derived_spread() {
        let (report, ctx, _) = canonical();
        assert!((report_distance(&report, &ctx) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_regime_selection() {
        assert_eq!(DistanceRegime::for_note(Note::Positive), DistanceRegime::PositiveBias);
        assert_eq!(DistanceRegime::for_note(Note::Neutral), DistanceRegime::PositiveBias);
        assert_eq!(DistanceRegime::for_note(Note::Negative), DistanceRegime::NegativeBias);
    }

    #[test]
    fn test_negative_regime_swaps_dimensions() {
        let ctx = TargetContext::new(40, 60, 100, 100, 2);
        let spread = Spread::of(&ctx);
        let report = Report::new(45, 10, Note::Negative, 0);

        // 90/42 -> 2 and 45/42 -> 1
        let unique = DistanceRegime::NegativeBias.unique_distance(&report, &ctx, &spread);
        assert_eq!(unique, (spread.total() * 5.0).sqrt());

        // 55/62 -> 0 and 10/62 -> 0
        let unique = DistanceRegime::PositiveBias.unique_distance(&report, &ctx, &spread);
        assert_eq!(unique, 0.0);
    }

    #[test]
    fn test_favourable_report_has_zero_distance() {
        let ctx = TargetContext::new(51, 51, 101, 101, 1);
        let report = Report::new(60, 40, Note::Positive, 0);

        // 41/51 and 40/52 both truncate to 0
        let spread = Spread::of(&ctx);
        assert_eq!(
            DistanceRegime::PositiveBias.unique_distance(&report, &ctx, &spread),
            0.0
        );
        assert!(shared_distance(&report, &ctx, &spread) > 20.0);
        assert_eq!(report_distance(&report, &ctx), 0.0);
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        assert_eq!(abs_distance(i64::MIN, 1), i64::MAX as u64 + 2);
        assert_eq!(abs_distance(i64::MAX, i64::MIN), u64::MAX);

        let ctx = TargetContext::new(i64::MIN, 0, i64::MAX, 100, i64::MAX);
        let report = Report::new(i64::MAX, 0, Note::Positive, 0);
        let d = DistanceRegime::PositiveBias.unique_distance(&report, &ctx, &Spread::new(1.0, 1.0));
        assert!(!d.is_nan());
    }

    #[test]
    fn test_exact_match_is_zero() {
        let ctx = TargetContext::new(40, 60, 100, 100, 1);
        let report = Report::new(40, 60, Note::Positive, 0);
        assert_eq!(shared_distance(&report, &ctx, &Spread::of(&ctx)), 0.0);
        assert_eq!(report_distance(&report, &ctx), 0.0);
    }

    #[test]
    fn test_zero_denominator_is_infinite_not_nan() {
        // S_max == S_target - eta
        let ctx = TargetContext::new(101, 51, 100, 101, 1);
        let spread = Spread::of(&ctx);
        let report = Report::new(50, 50, Note::Positive, 0);

        let unique = DistanceRegime::PositiveBias.unique_distance(&report, &ctx, &spread);
        assert!(unique.is_infinite());

        let d = report_distance(&report, &ctx);
        assert!(!d.is_nan());
        assert_eq!(d, shared_distance(&report, &ctx, &spread));
    }

    #[test]
    fn test_target_at_ceiling_falls_back_to_unique() {
        // dS_max_sq == 0 makes the shared part unusable
        let ctx = TargetContext::new(100, 50, 100, 100, 2);
        let spread = Spread::of(&ctx);
        let report = Report::new(99, 50, Note::Positive, 0);

        assert!(shared_distance(&report, &ctx, &spread).is_infinite());
        let d = report_distance(&report, &ctx);
        assert!(d.is_finite());
    }
}
