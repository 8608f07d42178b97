//! Trust Engine - runs restriction, weighting and aggregation for a round

use ctm_core::{
    NodeId, NoteMatrix, Report, ReportTable, SquareMatrix, TargetContext, TrustError,
    TrustResult, Verdict, WeightMatrix,
};
use tracing::debug;

use crate::{
    calculate_trust, restrict_reports, weigh_reports, QrHistory, RestrictionStats, TrustConfig,
    INITIAL_QR,
};

/// Everything needed to evaluate one round
#[derive(Clone, Debug)]
pub struct RoundInput {
    current_time: i64,
    targets: Vec<TargetContext>,
    reports: SquareMatrix<Option<Report>>,
    qrs: Vec<f64>,
}

impl RoundInput {
    /// One node per target context, no reports yet, every QR at its initial value
    pub fn new(targets: Vec<TargetContext>, current_time: i64) -> Self {
        let n = targets.len();
        RoundInput {
            current_time,
            targets,
            reports: SquareMatrix::new(n),
            qrs: vec![INITIAL_QR; n],
        }
    }

    pub fn node_count(&self) -> usize {
        self.targets.len()
    }

    pub fn current_time(&self) -> i64 {
        self.current_time
    }

    /// Record `reporter`'s report about `target`
    pub fn add_report(
        &mut self,
        target: NodeId,
        reporter: NodeId,
        report: Report,
    ) -> TrustResult<()> {
        self.reports.set(target.index(), reporter.index(), Some(report))
    }

    /// Replace the reporters' QR vector
    pub fn set_qrs(&mut self, qrs: Vec<f64>) -> TrustResult<()> {
        if qrs.len() != self.node_count() {
            return Err(TrustError::DimensionMismatch {
                expected: self.node_count(),
                actual: qrs.len(),
            });
        }
        self.qrs = qrs;
        Ok(())
    }

    pub fn qrs(&self) -> &[f64] {
        &self.qrs
    }

    pub fn target(&self, node: NodeId) -> Option<&TargetContext> {
        self.targets.get(node.index())
    }

    pub fn report(&self, target: NodeId, reporter: NodeId) -> Option<&Report> {
        self.reports.entry(target, reporter).and_then(Option::as_ref)
    }
}

/// Result of a round evaluation
#[derive(Clone, Debug)]
pub struct RoundOutcome {
    /// Trust value per node
    pub trust: Vec<f64>,
    /// `W(i, j)` as assessed this round
    pub weights: WeightMatrix,
    /// `note(i, j)` as reported this round
    pub notes: NoteMatrix,
    /// Reports that received a weight
    pub accepted: u32,
    /// Reports that were submitted but rejected
    pub rejected: u32,
}

impl RoundOutcome {
    pub fn trust_of(&self, node: NodeId) -> Option<f64> {
        self.trust.get(node.index()).copied()
    }
}

/// Trust Engine - applies the trust model with a fixed configuration
#[derive(Clone, Debug, Default)]
pub struct TrustEngine {
    config: TrustConfig,
}

impl TrustEngine {
    /// Create a Trust Engine with default configuration
    pub fn new() -> Self {
        Self::with_config(TrustConfig::default())
    }

    /// Create a Trust Engine with custom configuration
    pub fn with_config(config: TrustConfig) -> Self {
        TrustEngine { config }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Target context built from the configured bounds and tolerance
    pub fn target_context(&self, service_target: i64, capability_target: i64) -> TargetContext {
        self.config.target(service_target, capability_target)
    }

    /// Restrict and weigh a batch of reports about one target
    pub fn assess(
        &self,
        reports: &[Report],
        ctx: &TargetContext,
        current_time: i64,
    ) -> TrustResult<Vec<Verdict>> {
        let distances = restrict_reports(reports, ctx);
        weigh_reports(
            self.config.lambda,
            self.config.theta,
            reports,
            &distances,
            current_time,
        )
    }

    /// Assess raw rows laid out by the configured schema
    pub fn assess_rows(
        &self,
        rows: Vec<Vec<i64>>,
        ctx: &TargetContext,
        current_time: i64,
    ) -> TrustResult<Vec<Verdict>> {
        let table = ReportTable::from_rows(rows, self.config.schema);
        self.assess(&table.reports()?, ctx, current_time)
    }

    /// Evaluate a full round: weight matrix, note matrix and trust per node
    pub fn evaluate_round(&self, input: &RoundInput) -> TrustResult<RoundOutcome> {
        let n = input.node_count();
        let mut weights = WeightMatrix::new(n);
        let mut notes = NoteMatrix::new(n);
        let mut stats = RestrictionStats::default();

        for (target, ctx) in input.targets.iter().enumerate() {
            let submitted: Vec<(usize, Report)> = input
                .reports
                .row(target)
                .iter()
                .enumerate()
                .filter_map(|(reporter, report)| report.map(|r| (reporter, r)))
                .collect();
            let reports: Vec<Report> = submitted.iter().map(|(_, r)| *r).collect();

            let verdicts = self.assess(&reports, ctx, input.current_time)?;
            let row_stats = RestrictionStats::from_verdicts(&verdicts);
            stats.accepted += row_stats.accepted;
            stats.invalid_context += row_stats.invalid_context;
            stats.out_of_range += row_stats.out_of_range;
            stats.degenerate += row_stats.degenerate;

            for ((reporter, report), verdict) in submitted.into_iter().zip(verdicts) {
                weights.set(target, reporter, verdict)?;
                notes.set(target, reporter, report.note)?;
            }
        }

        let trust = calculate_trust(n, &weights, &input.qrs, &notes)?;

        debug!(
            nodes = n,
            time = input.current_time,
            accepted = stats.accepted,
            rejected = stats.rejected(),
            "Evaluated trust round"
        );

        Ok(RoundOutcome {
            trust,
            weights,
            notes,
            accepted: stats.accepted,
            rejected: stats.rejected(),
        })
    }

    /// Advance a reporter's QR with this round's feedback and penalty
    pub fn update_qr(&self, history: &mut QrHistory, qrxf: f64, cf: f64, now: i64) -> f64 {
        history.update(self.config.theta, qrxf, cf, now)
    }
}
