//! Trust model configuration

use ctm_core::{ReportSchema, TargetContext, TrustError, TrustResult};

/// Trust model configuration
#[derive(Clone, Debug, PartialEq)]
pub struct TrustConfig {
    /// Distance decay rate, in (0, 1)
    pub lambda: f64,
    /// Time decay rate for weights and QR history, in (0, 1)
    pub theta: f64,
    /// Tolerance margin added to targets in the biased regimes
    pub eta: i64,
    /// Upper bound of the service scale
    pub service_max: i64,
    /// Upper bound of the capability scale
    pub capability_max: i64,
    /// Column layout of raw report tables
    pub schema: ReportSchema,
}

impl Default for TrustConfig {
    fn default() -> Self {
        TrustConfig {
            lambda: 0.7,
            theta: 0.7,
            eta: 1,
            service_max: 100,
            capability_max: 100,
            schema: ReportSchema::default(),
        }
    }
}

impl TrustConfig {
    /// Fast decay, no tolerance: distant or stale reports barely count
    pub fn strict() -> Self {
        TrustConfig {
            lambda: 0.5,
            theta: 0.5,
            eta: 0,
            ..Default::default()
        }
    }

    /// Slow decay and a wide tolerance
    pub fn lenient() -> Self {
        TrustConfig {
            lambda: 0.9,
            theta: 0.95,
            eta: 5,
            ..Default::default()
        }
    }

    /// Target context for a node expected at the given values
    pub fn target(&self, service_target: i64, capability_target: i64) -> TargetContext {
        TargetContext::new(
            service_target,
            capability_target,
            self.service_max,
            self.capability_max,
            self.eta,
        )
    }

    /// Check the documented parameter domains.
    ///
    /// The pipeline itself never calls this; out-of-domain values just
    /// produce whatever the formulas give.
    pub fn validate(&self) -> TrustResult<()> {
        let unit_open = |v: f64| v > 0.0 && v < 1.0;

        if !unit_open(self.lambda) {
            return Err(TrustError::InvalidParameter {
                name: "lambda",
                value: self.lambda,
            });
        }
        if !unit_open(self.theta) {
            return Err(TrustError::InvalidParameter {
                name: "theta",
                value: self.theta,
            });
        }
        if self.eta < 0 {
            return Err(TrustError::InvalidParameter {
                name: "eta",
                value: self.eta as f64,
            });
        }
        if self.service_max <= 0 {
            return Err(TrustError::InvalidParameter {
                name: "service_max",
                value: self.service_max as f64,
            });
        }
        if self.capability_max <= 0 {
            return Err(TrustError::InvalidParameter {
                name: "capability_max",
                value: self.capability_max as f64,
            });
        }
        Ok(())
    }
}
