//! CTM Core - Fundamental types for the context trust model
//!
//! This crate defines the data model shared by every CTM component:
//! - Identifiers (NodeId)
//! - Reports and endorsement notes
//! - Target contexts (expected service/capability values and bounds)
//! - Verdicts (accepted value or tagged rejection)
//! - Weight and note matrices
//! - QR observations

pub mod context;
pub mod error;
pub mod id;
pub mod matrix;
pub mod observation;
pub mod report;
pub mod verdict;

pub use context::*;
pub use error::*;
pub use id::*;
pub use matrix::*;
pub use observation::*;
pub use report::*;
pub use verdict::*;
