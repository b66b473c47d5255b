//! # Helix Memory Targets
//!
//! A memory target is a location in a heterogeneous memory topology (a NUMA
//! node, a high-bandwidth tier, device-attached memory) that an allocator
//! can place data on. This crate is the seam between topology knowledge and
//! allocation policy: it manages target lifetime uniformly across an open
//! set of target kinds and answers comparable cost queries between them.
//!
//! It is **policy-free**: choosing a target is the allocator's job, and
//! discovering targets is the job of the kind implementations.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Allocator / Pool layer                    │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ create / clone / destroy     │ bandwidth / latency
//! ┌──────────────┴───────────────┐  ┌───────────┴───────────────┐
//! │      Lifecycle Manager       │  │     Cost Query Engine     │
//! │   (KindRegistry, lifecycle)  │  │  native ──► topology hops │
//! └──────────────┬───────────────┘  └───────────┬───────────────┘
//!                │                              │
//! ┌──────────────┴──────────────────────────────┴───────────────┐
//! │      MemTarget = Arc<CapabilityTable> + private state       │
//! └──────────────────────────────┬──────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴──────────────────────────────┐
//! │     MemTargetKind implementations (NUMA, HBM, device)       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use helix_memtarget::{registry, get_latency};
//!
//! let numa = registry().register(NumaKind::new(topology))?;
//! registry().seal();
//!
//! let near = registry().create(numa, &NumaParams::new(0))?;
//! let far = registry().create(numa, &NumaParams::new(1))?;
//! let cost = get_latency(&near, &far)?;
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod cost;
pub mod error;
pub mod handle;
pub mod kind;
pub mod lifecycle;
pub mod ops;
pub mod registry;
pub mod types;

// Re-exports for convenience
pub use cost::{
    get_bandwidth, get_latency, CostEngine, CostEngineConfig, CostEstimate, CostMetric,
    CostSource, FallbackModel, FallbackModelBuilder, Hop,
};
pub use error::{Error, Result};
pub use handle::MemTarget;
pub use kind::MemTargetKind;
pub use lifecycle::{clone_target, create, destroy};
pub use ops::{CapabilityTable, MemTargetOps, PrivateState, StateRef};
pub use registry::{register, registry, KindRegistry, MAX_KINDS};
pub use types::*;

// Handles and tables cross allocator threads
static_assertions::assert_impl_all!(MemTarget: Send, Sync);
static_assertions::assert_impl_all!(CapabilityTable: Send, Sync);
static_assertions::assert_impl_all!(KindRegistry: Send, Sync);
static_assertions::const_assert_eq!(KindId::NONE.raw(), 0);
