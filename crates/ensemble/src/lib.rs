//! Combo ensemble builder
//!
//! Combines a pool of scored combo trees into a single weighted program,
//! either by AdaBoost or by admitting row-selecting experts.

pub mod candidate;
pub mod ensemble;
pub mod errors;
pub mod manifest;
pub mod params;
pub mod pool;
pub mod scorer;

pub use candidate::{is_correct, BehavioralScore, ScoredCandidate, DEFAULT_WEIGHT};
pub use ensemble::Ensemble;
pub use errors::{EnsembleError, Result};
pub use manifest::{EnsembleManifest, ManifestMember};
pub use params::{EnsembleParams, ParamOverrides};
pub use pool::{CandidatePool, PoolEntry};
pub use scorer::{BehaviorTable, WeightedScorer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
