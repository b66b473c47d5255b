//! Cost queries between memory targets.
//!
//! # Submodules
//!
//! - `metric` - Cost dimensions and provenance-tagged estimates
//! - `fallback` - Hop-count topology distance model
//! - `engine` - Native/fallback dispatch

mod engine;
mod fallback;
mod metric;

pub use engine::{get_bandwidth, get_latency, CostEngine, CostEngineConfig};
pub use fallback::{FallbackModel, FallbackModelBuilder, Hop};
pub use metric::{CostEstimate, CostMetric, CostSource};
