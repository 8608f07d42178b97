//! CTM Adversary - hostile report producers
//!
//! Each producer takes an honest value and returns a forged one of the
//! same type. Forged reports are ordinary rows: they go through
//! restriction and weighting like any other report.
//!
//! - Bad mouthing: always speak against the target
//! - Good mouthing: always vouch for the target
//! - On-off: alternate between the two
//! - Context flooding: always claim a fixed service or capability
//! - Time decay: backdate the submission time

pub mod attack;
pub mod producers;

pub use attack::*;
pub use producers::*;
