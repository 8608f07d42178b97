//! Decay weighting - turn restricted distances into report weights
//!
//! ```text
//! w = lambda^distance * theta^((s(note) + 1) * (current_time - report_time))
//! ```
//!
//! `s(note)` is 1 for a negative note and 0 otherwise, so negative reports
//! age twice as fast.

use ctm_core::{Note, RejectReason, Report, TrustError, TrustResult, Verdict};
use tracing::warn;

/// `0.5 * (note² - note)`: 1 for a negative note, 0 for neutral or positive
#[inline]
pub fn find_s(note: i64) -> i64 {
    note.saturating_mul(note).saturating_sub(note) / 2
}

/// Time-decay multiplier of a note
#[inline]
pub fn note_decay_factor(note: Note) -> i64 {
    find_s(note.value()) + 1
}

/// Weight of a single accepted report
pub fn weight_calc(
    lambda: f64,
    theta: f64,
    distance: f64,
    note: i64,
    current_time: i64,
    report_time: i64,
) -> f64 {
    let elapsed = current_time.saturating_sub(report_time);
    let exponent = (find_s(note) + 1).saturating_mul(elapsed);
    lambda.powf(distance) * theta.powf(exponent as f64)
}

/// Weigh each report by its distance and age.
///
/// `distances` must be index-aligned with `reports`. Rejected distances
/// keep their rejection; a non-finite weight is rejected as degenerate.
pub fn weigh_reports(
    lambda: f64,
    theta: f64,
    reports: &[Report],
    distances: &[Verdict],
    current_time: i64,
) -> TrustResult<Vec<Verdict>> {
    if reports.len() != distances.len() {
        return Err(TrustError::DimensionMismatch {
            expected: reports.len(),
            actual: distances.len(),
        });
    }

    let weights = reports
        .iter()
        .zip(distances)
        .map(|(report, distance)| {
            distance.and_then(|d| {
                let w = weight_calc(lambda, theta, d, report.note.value(), current_time, report.time);
                if w.is_finite() {
                    Verdict::Accepted(w)
                } else {
                    warn!(
                        "Non-finite weight for report {:?} at time {}",
                        report, current_time
                    );
                    Verdict::Rejected(RejectReason::Degenerate)
                }
            })
        })
        .collect();

    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_s() {
        assert_eq!(find_s(-1), 1);
        assert_eq!(find_s(0), 0);
        assert_eq!(find_s(1), 0);
    }

    #[test]
    fn test_note_decay_factor() {
        assert_eq!(note_decay_factor(Note::Negative), 2);
        assert_eq!(note_decay_factor(Note::Neutral), 1);
        assert_eq!(note_decay_factor(Note::Positive), 1);
    }

    #[test]
    fn test_weight_fresh_exact_report() {
        // Zero distance, zero age = full weight
        assert_eq!(weight_calc(0.7, 0.7, 0.0, 1, 10, 10), 1.0);
    }

    #[test]
    fn test_weight_values() {
        let w = weight_calc(0.5, 0.5, 2.0, 1, 3, 1);
        assert!((w - 0.25 * 0.25).abs() < 1e-12);

        // Negative note doubles the time exponent
        let w = weight_calc(0.5, 0.5, 2.0, -1, 3, 1);
        assert!((w - 0.25 * 0.0625).abs() < 1e-12);
    }

    #[test]
    fn test_negative_decays_faster() {
        let positive = weight_calc(0.8, 0.9, 1.5, 1, 20, 10);
        let negative = weight_calc(0.8, 0.9, 1.5, -1, 20, 10);
        assert!(negative < positive);
    }

    #[test]
    fn test_weigh_reports_propagates_rejection() {
        let reports = vec![
            Report::new(50, 50, Note::Positive, 5),
            Report::new(-5, 50, Note::Positive, 5),
        ];
        let distances = vec![
            Verdict::Accepted(2.0),
            Verdict::Rejected(RejectReason::InvalidContext),
        ];

        let weights = weigh_reports(0.7, 0.7, &reports, &distances, 5).unwrap();
        assert!((weights[0].value().unwrap() - 0.49).abs() < 1e-12);
        assert_eq!(weights[1], Verdict::Rejected(RejectReason::InvalidContext));
        assert_eq!(weights[1].sentinel(), -1.0);
    }

    #[test]
    fn test_weigh_reports_length_mismatch() {
        let reports = vec![Report::new(1, 1, Note::Neutral, 0)];
        let err = weigh_reports(0.7, 0.7, &reports, &[], 0).unwrap_err();
        assert_eq!(err, TrustError::DimensionMismatch { expected: 1, actual: 0 });
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        // theta = 0 with a report from the future blows up
        let reports = vec![Report::new(1, 1, Note::Positive, 10)];
        let weights = weigh_reports(0.5, 0.0, &reports, &[Verdict::Accepted(1.0)], 0).unwrap();
        assert_eq!(weights[0], Verdict::Rejected(RejectReason::Degenerate));
    }
}
