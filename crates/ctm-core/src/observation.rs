//! Quality-of-recommendation observations

use crate::{TrustError, TrustResult};

/// One past QR value of a reporting node and the tick it was recorded at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QrObservation {
    pub qr: f64,
    pub time: i64,
}

impl QrObservation {
    pub fn new(qr: f64, time: i64) -> Self {
        QrObservation { qr, time }
    }

    /// Pair a QR series with its time series
    pub fn zip(qrs: &[f64], times: &[i64]) -> TrustResult<Vec<QrObservation>> {
        if qrs.len() != times.len() {
            return Err(TrustError::DimensionMismatch {
                expected: qrs.len(),
                actual: times.len(),
            });
        }
        Ok(qrs
            .iter()
            .zip(times)
            .map(|(&qr, &time)| QrObservation { qr, time })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zip() {
        let obs = QrObservation::zip(&[1.0, 0.5], &[3, 2]).unwrap();
        assert_eq!(obs[1], QrObservation::new(0.5, 2));
        assert!(QrObservation::zip(&[1.0], &[]).is_err());
    }
}
