//! CTM Test Harness - multi-round trust simulation
//!
//! This crate provides:
//! - Scenario building with honest, faulty and hostile nodes
//! - A round driver that feeds reporter QR back into the next round
//! - Tracing setup for tests and benches

pub mod logging;
pub mod simulator;

pub use logging::*;
pub use simulator::*;
