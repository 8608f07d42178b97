//! CTM Model - Context trust computation
//!
//! This crate implements the trust pipeline:
//! - Distance engine: how far a report sits from the target context
//! - Restriction: discard invalid and implausible reports
//! - Decay weighting: distance and recency weights
//! - Aggregation: one trust value per node from the weight matrix
//! - QR feedback: recency-weighted quality of each reporter
//!
//! Every stage is a pure function over immutable input. [`TrustEngine`]
//! wires them together for a full round.

pub mod aggregate;
pub mod config;
pub mod distance;
pub mod engine;
pub mod qr;
pub mod restrict;
pub mod weight;

pub use aggregate::*;
pub use config::*;
pub use distance::*;
pub use engine::*;
pub use qr::*;
pub use restrict::*;
pub use weight::*;
