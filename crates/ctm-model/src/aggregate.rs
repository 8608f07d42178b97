//! Trust aggregation over the full node-by-node weight matrix

use ctm_core::{Note, NoteMatrix, TrustError, TrustResult, Verdict, WeightMatrix};
use tracing::warn;

/// Trust of one node from everything reported about it.
///
/// ```text
/// trust = Σ w_j * qr_j * note_j / Σ w_j      (accepted w_j only)
/// ```
///
/// Returns 0 when no report carries weight.
pub fn aggregate_row(weights: &[Verdict], qrs: &[f64], notes: &[Note]) -> f64 {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for ((weight, qr), note) in weights.iter().zip(qrs).zip(notes) {
        if let Verdict::Accepted(w) = weight {
            if *w >= 0.0 && w.is_finite() {
                numerator += w * qr * note.value() as f64;
                denominator += w;
            }
        }
    }

    if denominator == 0.0 {
        return 0.0;
    }

    let trust = numerator / denominator;
    if trust.is_finite() {
        trust
    } else {
        warn!("Non-finite trust aggregate {}/{}", numerator, denominator);
        0.0
    }
}

fn check_size(expected: usize, actual: usize) -> TrustResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TrustError::DimensionMismatch { expected, actual })
    }
}

/// Trust value of every node in the network.
///
/// `weights` and `notes` must be `node_count × node_count` and `qrs` must
/// hold one QR per reporting node.
pub fn calculate_trust(
    node_count: usize,
    weights: &WeightMatrix,
    qrs: &[f64],
    notes: &NoteMatrix,
) -> TrustResult<Vec<f64>> {
    check_size(node_count, weights.size())?;
    check_size(node_count, notes.size())?;
    check_size(node_count, qrs.len())?;

    Ok((0..node_count)
        .map(|i| aggregate_row(weights.row(i), qrs, notes.row(i)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctm_core::RejectReason;

    #[test]
    fn test_weighted_average() {
        let weights = vec![Verdict::Accepted(1.0), Verdict::Accepted(3.0)];
        let qrs = vec![1.0, 0.5];
        let notes = vec![Note::Positive, Note::Negative];

        // (1*1*1 + 3*0.5*-1) / 4
        let trust = aggregate_row(&weights, &qrs, &notes);
        assert!((trust - (-0.125)).abs() < 1e-12);
    }

    #[test]
    fn test_no_valid_reports_is_zero() {
        let weights = WeightMatrix::from_sentinels(vec![vec![-1.0, -1.0], vec![0.5, -1.0]]).unwrap();
        let notes = NoteMatrix::from_codes(vec![vec![1, 1], vec![1, 1]]).unwrap();

        let trust = calculate_trust(2, &weights, &[1.0, 1.0], &notes).unwrap();
        assert_eq!(trust[0], 0.0);
        assert_eq!(trust[1], 1.0);
    }

    #[test]
    fn test_rejections_excluded_from_both_sums() {
        let weights = vec![
            Verdict::Accepted(0.5),
            Verdict::Rejected(RejectReason::OutOfRange),
        ];
        let trust = aggregate_row(&weights, &[0.8, 1.0], &[Note::Positive, Note::Negative]);
        assert!((trust - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_zero_weights_is_zero() {
        let trust = aggregate_row(&[Verdict::Accepted(0.0)], &[1.0], &[Note::Positive]);
        assert_eq!(trust, 0.0);
    }

    #[test]
    fn test_empty_network() {
        let trust =
            calculate_trust(0, &WeightMatrix::new(0), &[], &NoteMatrix::new(0)).unwrap();
        assert!(trust.is_empty());
    }

    #[test]
    fn test_dimension_checks() {
        let weights = WeightMatrix::new(2);
        let notes = NoteMatrix::new(2);

        assert!(calculate_trust(2, &weights, &[1.0], &notes).is_err());
        assert!(calculate_trust(3, &weights, &[1.0; 3], &notes).is_err());
        assert!(calculate_trust(2, &weights, &[1.0; 2], &NoteMatrix::new(3)).is_err());
    }
}
