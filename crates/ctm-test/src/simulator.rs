//! Multi-round trust simulator
//!
//! Every node reports on every other node once per round. Honest reporters
//! observe the target's actual context with some noise and endorse it when
//! the observation is within eta of what the target is expected to deliver.
//! Hostile reporters forge their honest report through an [`Attack`].
//!
//! After each round a reporter's QR moves toward agreement with the round's
//! trust values and is penalised by the share of its reports that were
//! rejected.

use ctm_adversary::{Attack, AttackConfig};
use ctm_core::{NodeId, Note, Report, TargetContext, TrustError, TrustResult, Verdict};
use ctm_model::{QrHistory, RoundInput, RoundOutcome, TrustConfig, TrustEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// A node as the scenario describes it
#[derive(Clone, Debug)]
struct NodeSetup {
    expected: (i64, i64),
    actual: (i64, i64),
    attack: Option<AttackConfig>,
}

/// Builder for a [`TrustSimulator`]
#[derive(Clone, Debug)]
pub struct ScenarioBuilder {
    config: TrustConfig,
    nodes: Vec<NodeSetup>,
    noise: i64,
    seed: u64,
    history_limit: Option<usize>,
}

impl Default for ScenarioBuilder {
    fn default() -> Self {
        ScenarioBuilder {
            config: TrustConfig::default(),
            nodes: Vec::new(),
            noise: 0,
            seed: 0,
            history_limit: None,
        }
    }
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: TrustConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a node that delivers what it is expected to
    pub fn node(self, service: i64, capability: i64) -> Self {
        self.faulty_node((service, capability), (service, capability))
    }

    /// Add `count` identical well-behaved nodes
    pub fn nodes(mut self, count: usize, service: i64, capability: i64) -> Self {
        for _ in 0..count {
            self = self.node(service, capability);
        }
        self
    }

    /// Add a node whose actual context differs from its expected one
    pub fn faulty_node(mut self, expected: (i64, i64), actual: (i64, i64)) -> Self {
        self.nodes.push(NodeSetup {
            expected,
            actual,
            attack: None,
        });
        self
    }

    /// Make an already added node report through an attack
    pub fn attacker(mut self, node: NodeId, attack: AttackConfig) -> Self {
        if let Some(setup) = self.nodes.get_mut(node.index()) {
            setup.attack = Some(attack);
        }
        self
    }

    /// Maximum observation error, in context units
    pub fn noise(mut self, noise: i64) -> Self {
        self.noise = noise.max(0);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bound each reporter's QR history
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn build(self) -> TrustResult<TrustSimulator> {
        self.config.validate()?;
        let engine = TrustEngine::with_config(self.config);

        let nodes = self
            .nodes
            .into_iter()
            .map(|setup| {
                let history = match self.history_limit {
                    Some(limit) => QrHistory::default().with_limit(limit),
                    None => QrHistory::default(),
                };
                SimNode {
                    target: engine.target_context(setup.expected.0, setup.expected.1),
                    actual: setup.actual,
                    attack: setup.attack.as_ref().map(AttackConfig::build),
                    history,
                    feedback: Feedback::default(),
                }
            })
            .collect();

        Ok(TrustSimulator {
            engine,
            nodes,
            rng: StdRng::seed_from_u64(self.seed),
            noise: self.noise,
            time: 0,
        })
    }
}

/// QR inputs derived for one reporter in the last round
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Feedback {
    /// Mean agreement of the reporter's notes with the round's trust signs
    pub qrxf: f64,
    /// Share of the reporter's reports that were rejected
    pub cf: f64,
}

struct SimNode {
    target: TargetContext,
    actual: (i64, i64),
    attack: Option<Box<dyn Attack>>,
    history: QrHistory,
    feedback: Feedback,
}

/// Drives rounds of reporting, evaluation and QR feedback
pub struct TrustSimulator {
    engine: TrustEngine,
    nodes: Vec<SimNode>,
    rng: StdRng,
    noise: i64,
    time: i64,
}

impl TrustSimulator {
    pub fn builder() -> ScenarioBuilder {
        ScenarioBuilder::new()
    }

    pub fn engine(&self) -> &TrustEngine {
        &self.engine
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Time of the last completed round
    pub fn time(&self) -> i64 {
        self.time
    }

    /// Current QR of a reporter
    pub fn qr(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(node.index()).map(|n| n.history.latest())
    }

    pub fn qrs(&self) -> Vec<f64> {
        self.nodes.iter().map(|n| n.history.latest()).collect()
    }

    pub fn history(&self, node: NodeId) -> Option<&QrHistory> {
        self.nodes.get(node.index()).map(|n| &n.history)
    }

    pub fn feedback(&self, node: NodeId) -> Option<Feedback> {
        self.nodes.get(node.index()).map(|n| n.feedback)
    }

    pub fn is_attacker(&self, node: NodeId) -> bool {
        self.nodes
            .get(node.index())
            .map_or(false, |n| n.attack.is_some())
    }

    fn observe(&mut self, value: i64, max: i64) -> i64 {
        let error = if self.noise > 0 {
            self.rng.gen_range(-self.noise..=self.noise)
        } else {
            0
        };
        value.saturating_add(error).clamp(0, max.max(0))
    }

    /// What `reporter` submits about `target` this round
    fn report(&mut self, target: usize, reporter: usize) -> Report {
        let ctx = self.nodes[target].target;
        let (service, capability) = self.nodes[target].actual;

        let service = self.observe(service, ctx.service_max);
        let capability = self.observe(capability, ctx.capability_max);

        let within = (service - ctx.service_target).abs() <= ctx.eta
            && (capability - ctx.capability_target).abs() <= ctx.eta;
        let note = if within { Note::Positive } else { Note::Negative };
        let honest = Report::new(service, capability, note, self.time);

        match self.nodes[reporter].attack.as_mut() {
            Some(attack) => {
                let forged = attack.forge(honest);
                trace!(
                    subject = target,
                    reporter = reporter,
                    attack = %attack.kind(),
                    "Forged report"
                );
                forged
            }
            None => honest,
        }
    }

    /// Run one round and feed the result back into every reporter's QR
    pub fn run_round(&mut self) -> TrustResult<RoundOutcome> {
        self.time += 1;
        let n = self.nodes.len();

        let targets = self.nodes.iter().map(|node| node.target).collect();
        let mut input = RoundInput::new(targets, self.time);
        input.set_qrs(self.qrs())?;

        for target in 0..n {
            for reporter in (0..n).filter(|r| *r != target) {
                let report = self.report(target, reporter);
                input.add_report(
                    NodeId::from_index(target),
                    NodeId::from_index(reporter),
                    report,
                )?;
            }
        }

        let outcome = self.engine.evaluate_round(&input)?;

        for reporter in 0..n {
            let feedback = reporter_feedback(&outcome, reporter)?;
            let node = &mut self.nodes[reporter];
            let qr = self
                .engine
                .update_qr(&mut node.history, feedback.qrxf, feedback.cf, self.time);
            node.feedback = feedback;
            trace!(
                reporter = reporter,
                qrxf = feedback.qrxf,
                cf = feedback.cf,
                qr = qr,
                "Updated QR"
            );
        }

        debug!(
            round = self.time,
            nodes = n,
            accepted = outcome.accepted,
            rejected = outcome.rejected,
            "Simulated round"
        );

        Ok(outcome)
    }

    /// Run `rounds` rounds, returning every outcome
    pub fn run(&mut self, rounds: usize) -> TrustResult<Vec<RoundOutcome>> {
        (0..rounds).map(|_| self.run_round()).collect()
    }
}

fn signum(value: f64) -> i64 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// QRXF and CF of one reporter from a round outcome
fn reporter_feedback(outcome: &RoundOutcome, reporter: usize) -> TrustResult<Feedback> {
    let n = outcome.trust.len();
    let mut submitted = 0u32;
    let mut rejected = 0u32;
    let mut agreement = 0i64;
    let mut counted = 0u32;

    for target in (0..n).filter(|t| *t != reporter) {
        let verdict = outcome
            .weights
            .get(target, reporter)
            .ok_or(TrustError::DimensionMismatch {
                expected: n,
                actual: target,
            })?;
        submitted += 1;

        match verdict {
            Verdict::Accepted(_) => {
                let note = outcome.notes.get(target, reporter).copied().unwrap_or_default();
                agreement += note.value() * signum(outcome.trust[target]);
                counted += 1;
            }
            Verdict::Rejected(_) => rejected += 1,
        }
    }

    Ok(Feedback {
        qrxf: if counted == 0 {
            0.0
        } else {
            agreement as f64 / counted as f64
        },
        cf: if submitted == 0 {
            0.0
        } else {
            rejected as f64 / submitted as f64
        },
    })
}
