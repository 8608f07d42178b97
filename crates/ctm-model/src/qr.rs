//! Quality of recommendation (QR) feedback
//!
//! A reporter's QR is a recency-weighted average of its past QR values,
//! nudged by a per-round feedback term (QRXF) and damped by a penalty (CF).
//! The result is always within [-1, 1].

use ctm_core::QrObservation;
use tracing::trace;

/// Lower bound of a QR value
pub const MIN_QR: f64 = -1.0;
/// Upper bound of a QR value
pub const MAX_QR: f64 = 1.0;
/// QR a node starts with
pub const INITIAL_QR: f64 = 1.0;

/// Position in the history whose time is the decay reference.
///
/// This is the second observation, not the first; callers that align
/// their histories depend on it.
pub const QR_REFERENCE_INDEX: usize = 1;

/// Decay coefficient of an observation at `ti` relative to `t1`
#[inline]
pub fn find_c_i(theta: f64, t1: i64, ti: i64) -> f64 {
    theta.powf(t1.saturating_sub(ti) as f64)
}

/// Compute a reporter's next QR from its history.
///
/// ```text
/// QR = Σ (c_i * QR_i + QRXF) / Σ (c_i + |CF|),   c_i = theta^(t_ref - t_i)
/// ```
///
/// `t_ref` is the time of the observation at [`QR_REFERENCE_INDEX`]; a
/// single-observation history uses its only entry. An empty history, a
/// zero denominator or a NaN quotient yield 0.
pub fn calculate_qr(theta: f64, qrxf: f64, cf: f64, history: &[QrObservation]) -> f64 {
    let Some(reference) = history.get(QR_REFERENCE_INDEX).or_else(|| history.first()) else {
        return 0.0;
    };

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for obs in history {
        let c_i = find_c_i(theta, reference.time, obs.time);
        numerator += c_i * obs.qr + qrxf;
        denominator += c_i + cf.abs();
    }

    let qr = if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    };

    if qr.is_nan() {
        trace!("QR quotient {}/{} is NaN", numerator, denominator);
        return 0.0;
    }

    qr.clamp(MIN_QR, MAX_QR)
}

/// Newest-first QR series of one reporter
#[derive(Clone, Debug)]
pub struct QrHistory {
    observations: Vec<QrObservation>,
    capacity: Option<usize>,
}

impl QrHistory {
    /// Start a history with a single observation
    pub fn new(initial_qr: f64, time: i64) -> Self {
        QrHistory {
            observations: vec![QrObservation::new(initial_qr, time)],
            capacity: None,
        }
    }

    /// Keep at most `capacity` observations, dropping the oldest
    pub fn with_limit(mut self, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        self.capacity = Some(capacity);
        self.observations.truncate(capacity);
        self
    }

    /// Most recent QR
    pub fn latest(&self) -> f64 {
        self.observations
            .first()
            .map(|obs| obs.qr)
            .unwrap_or(INITIAL_QR)
    }

    /// Observations, newest first
    pub fn observations(&self) -> &[QrObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Compute the next QR from the stored series and record it at `now`
    pub fn update(&mut self, theta: f64, qrxf: f64, cf: f64, now: i64) -> f64 {
        let next = calculate_qr(theta, qrxf, cf, &self.observations);
        self.observations.insert(0, QrObservation::new(next, now));
        if let Some(capacity) = self.capacity {
            self.observations.truncate(capacity);
        }
        next
    }
}

impl Default for QrHistory {
    fn default() -> Self {
        Self::new(INITIAL_QR, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_c_i() {
        assert_eq!(find_c_i(0.5, 3, 3), 1.0);
        assert_eq!(find_c_i(0.5, 3, 1), 0.25);
        assert!(find_c_i(0.5, 3, 2) > find_c_i(0.5, 3, 0));
    }

    #[test]
    fn test_calculate_qr_plain_average() {
        // Same time everywhere: c_i = 1, plain mean
        let history = QrObservation::zip(&[1.0, 0.0, 0.5], &[4, 4, 4]).unwrap();
        let qr = calculate_qr(0.7, 0.0, 0.0, &history);
        assert!((qr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_reference_is_second_observation() {
        // Times 10, 5: reference t = 5, so c_0 = 0.5^-5 = 32, c_1 = 1
        let history = QrObservation::zip(&[1.0, -1.0], &[10, 5]).unwrap();
        let qr = calculate_qr(0.5, 0.0, 1.0, &history);
        assert!((qr - 31.0 / 35.0).abs() < 1e-12);

        // Referencing the first entry instead would give 31/97
        assert!((qr - 31.0 / 97.0).abs() > 0.5);
    }

    #[test]
    fn test_feedback_and_penalty() {
        let history = vec![QrObservation::new(0.0, 0), QrObservation::new(0.0, 0)];
        // (0 + 0.5) * 2 / ((1 + 1) * 2)
        let qr = calculate_qr(0.7, 0.5, 1.0, &history);
        assert!((qr - 0.25).abs() < 1e-12);

        // Sign of CF is ignored
        assert_eq!(qr, calculate_qr(0.7, 0.5, -1.0, &history));
    }

    #[test]
    fn test_calculate_qr_clamped() {
        let history = vec![QrObservation::new(1.0, 0), QrObservation::new(1.0, 0)];
        assert_eq!(calculate_qr(0.7, 50.0, 0.0, &history), 1.0);
        assert_eq!(calculate_qr(0.7, -50.0, 0.0, &history), -1.0);
    }

    #[test]
    fn test_calculate_qr_degenerate() {
        assert_eq!(calculate_qr(0.7, 1.0, 1.0, &[]), 0.0);

        // theta = 0 with an observation newer than the reference: c_0 is infinite
        let history = vec![QrObservation::new(1.0, 5), QrObservation::new(1.0, 0)];
        assert_eq!(calculate_qr(0.0, 0.0, 0.0, &history[1..]), 1.0);
        let nan_free = calculate_qr(0.0, 0.0, 0.0, &history);
        assert!(!nan_free.is_nan());
    }

    #[test]
    fn test_single_observation_uses_it_as_reference() {
        let history = vec![QrObservation::new(0.4, 9)];
        assert!((calculate_qr(0.7, 0.0, 0.0, &history) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_history_update_prepends() {
        let mut history = QrHistory::default();
        assert_eq!(history.latest(), 1.0);

        let next = history.update(0.7, 0.0, 0.0, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.latest(), next);
        assert_eq!(history.observations()[0].time, 1);
        assert_eq!(history.observations()[1].time, 0);
    }

    #[test]
    fn test_history_negative_feedback_lowers_qr() {
        let mut history = QrHistory::default();
        let mut last = history.latest();
        for tick in 1..10 {
            let next = history.update(0.7, -1.0, 0.5, tick);
            assert!(next <= last);
            assert!((MIN_QR..=MAX_QR).contains(&next));
            last = next;
        }
        assert!(last < 0.0);
    }

    #[test]
    fn test_history_capacity() {
        let mut history = QrHistory::default().with_limit(3);
        for tick in 1..10 {
            history.update(0.7, 0.0, 0.0, tick);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.observations()[0].time, 9);
    }
}
