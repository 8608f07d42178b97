//! Report-level attacks
//!
//! An [`Attack`] sits between what a reporter honestly observed and what
//! it submits. The harness wraps hostile reporters in one.

use ctm_core::{Note, Report};
use tracing::trace;

use crate::producers;

/// Attack type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackKind {
    /// Always submit a negative note
    BadMouth,
    /// Always submit a positive note
    GoodMouth,
    /// Alternate between bad and good mouthing
    OnOff,
    /// Claim a fixed service value
    ServiceSet,
    /// Claim a fixed capability value
    CapabilitySet,
    /// Backdate the report
    TimeDecay,
}

impl AttackKind {
    pub fn all() -> &'static [AttackKind] {
        &[
            AttackKind::BadMouth,
            AttackKind::GoodMouth,
            AttackKind::OnOff,
            AttackKind::ServiceSet,
            AttackKind::CapabilitySet,
            AttackKind::TimeDecay,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AttackKind::BadMouth => "bad-mouth",
            AttackKind::GoodMouth => "good-mouth",
            AttackKind::OnOff => "on-off",
            AttackKind::ServiceSet => "service-set",
            AttackKind::CapabilitySet => "capability-set",
            AttackKind::TimeDecay => "time-decay",
        }
    }
}

impl std::fmt::Display for AttackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Turns an honest report into a hostile one
pub trait Attack: Send {
    fn kind(&self) -> AttackKind;

    /// Produce the report actually submitted
    fn forge(&mut self, honest: Report) -> Report;
}

fn note_from(code: i64) -> Note {
    if code < 0 {
        Note::Negative
    } else {
        Note::Positive
    }
}

/// Bad mouthing
#[derive(Clone, Copy, Debug, Default)]
pub struct BadMouth;

impl Attack for BadMouth {
    fn kind(&self) -> AttackKind {
        AttackKind::BadMouth
    }

    fn forge(&mut self, honest: Report) -> Report {
        honest.with_note(note_from(producers::bad_mouth()))
    }
}

/// Good mouthing (ballot stuffing)
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodMouth;

impl Attack for GoodMouth {
    fn kind(&self) -> AttackKind {
        AttackKind::GoodMouth
    }

    fn forge(&mut self, honest: Report) -> Report {
        honest.with_note(note_from(producers::good_mouth()))
    }
}

/// On-off attack.
///
/// Starts bad mouthing and flips phase every `period` forged reports.
/// A period of 0 never flips on its own; use [`OnOff::set_bad_mouthing`].
#[derive(Clone, Debug)]
pub struct OnOff {
    period: u32,
    bad_mouthing: bool,
    forged: u32,
}

impl OnOff {
    pub fn new(period: u32) -> Self {
        OnOff {
            period,
            bad_mouthing: true,
            forged: 0,
        }
    }

    /// Phase switched only by the caller
    pub fn manual() -> Self {
        Self::new(0)
    }

    pub fn is_bad_mouthing(&self) -> bool {
        self.bad_mouthing
    }

    pub fn set_bad_mouthing(&mut self, bad_mouthing: bool) {
        self.bad_mouthing = bad_mouthing;
        self.forged = 0;
    }
}

impl Default for OnOff {
    fn default() -> Self {
        Self::new(1)
    }
}

impl Attack for OnOff {
    fn kind(&self) -> AttackKind {
        AttackKind::OnOff
    }

    fn forge(&mut self, honest: Report) -> Report {
        let forged = honest.with_note(note_from(producers::on_off(self.bad_mouthing)));

        if self.period > 0 {
            self.forged += 1;
            if self.forged >= self.period {
                self.forged = 0;
                self.bad_mouthing = !self.bad_mouthing;
                trace!(bad_mouthing = self.bad_mouthing, "On-off attack switched phase");
            }
        }
        forged
    }
}

/// Floods a fixed service value
#[derive(Clone, Copy, Debug, Default)]
pub struct ServiceSet;

impl Attack for ServiceSet {
    fn kind(&self) -> AttackKind {
        AttackKind::ServiceSet
    }

    fn forge(&mut self, honest: Report) -> Report {
        Report {
            service: producers::service_set(),
            ..honest
        }
    }
}

/// Floods a fixed capability value
#[derive(Clone, Copy, Debug, Default)]
pub struct CapabilitySet;

impl Attack for CapabilitySet {
    fn kind(&self) -> AttackKind {
        AttackKind::CapabilitySet
    }

    fn forge(&mut self, honest: Report) -> Report {
        Report {
            capability: producers::capability_set(),
            ..honest
        }
    }
}

/// Backdates reports so they look staler than they are
#[derive(Clone, Copy, Debug)]
pub struct TimeDecay {
    offset: i64,
}

impl TimeDecay {
    pub fn new(offset: i64) -> Self {
        TimeDecay { offset }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for TimeDecay {
    fn default() -> Self {
        Self::new(producers::BACKDATE_TICKS)
    }
}

impl Attack for TimeDecay {
    fn kind(&self) -> AttackKind {
        AttackKind::TimeDecay
    }

    fn forge(&mut self, honest: Report) -> Report {
        honest.with_time(honest.time.saturating_sub(self.offset))
    }
}

/// Attack configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackConfig {
    pub kind: AttackKind,
    /// Forged reports per on-off phase
    pub on_off_period: u32,
    /// Ticks removed by time decay
    pub backdate_ticks: i64,
}

impl AttackConfig {
    pub fn new(kind: AttackKind) -> Self {
        AttackConfig {
            kind,
            on_off_period: 1,
            backdate_ticks: producers::BACKDATE_TICKS,
        }
    }

    pub fn bad_mouth() -> Self {
        Self::new(AttackKind::BadMouth)
    }

    pub fn good_mouth() -> Self {
        Self::new(AttackKind::GoodMouth)
    }

    pub fn on_off(period: u32) -> Self {
        AttackConfig {
            on_off_period: period,
            ..Self::new(AttackKind::OnOff)
        }
    }

    pub fn time_decay(ticks: i64) -> Self {
        AttackConfig {
            backdate_ticks: ticks,
            ..Self::new(AttackKind::TimeDecay)
        }
    }

    /// Instantiate the configured attack
    pub fn build(&self) -> Box<dyn Attack> {
        match self.kind {
            AttackKind::BadMouth => Box::new(BadMouth),
            AttackKind::GoodMouth => Box::new(GoodMouth),
            AttackKind::OnOff => Box::new(OnOff::new(self.on_off_period)),
            AttackKind::ServiceSet => Box::new(ServiceSet),
            AttackKind::CapabilitySet => Box::new(CapabilitySet),
            AttackKind::TimeDecay => Box::new(TimeDecay::new(self.backdate_ticks)),
        }
    }
}
