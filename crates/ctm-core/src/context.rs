//! Target context: the reference point reports are measured against

/// Expected context values for a target node at evaluation time,
/// together with the scale bounds and the tolerance margin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetContext {
    /// Expected service value (S_target)
    pub service_target: i64,
    /// Expected capability value (C_target)
    pub capability_target: i64,
    /// Upper bound of the service scale (S_max)
    pub service_max: i64,
    /// Upper bound of the capability scale (C_max)
    pub capability_max: i64,
    /// Tolerance margin for the biased distance regimes
    pub eta: i64,
}

impl TargetContext {
    pub fn new(
        service_target: i64,
        capability_target: i64,
        service_max: i64,
        capability_max: i64,
        eta: i64,
    ) -> Self {
        TargetContext {
            service_target,
            capability_target,
            service_max,
            capability_max,
            eta,
        }
    }

    /// Squared service spread, `|S_target - S_max|²`
    pub fn ds_max_sq(&self) -> f64 {
        let d = self.service_target.abs_diff(self.service_max) as f64;
        d * d
    }

    /// Squared capability spread, `|C_target - C_max|²`
    pub fn dc_max_sq(&self) -> f64 {
        let d = self.capability_target.abs_diff(self.capability_max) as f64;
        d * d
    }

    /// Largest admissible report distance `t`
    pub fn max_distance(&self) -> f64 {
        (self.ds_max_sq() + self.dc_max_sq()).sqrt()
    }
}
