//! # NUMA Memory Targets
//!
//! Memory target kind for NUMA nodes, built over a topology snapshot taken
//! at boot.
//!
//! - Latency is answered natively from the node distance matrix
//! - Bandwidth is answered natively where the platform reported it;
//!   other pairs use the cost engine's hop-count fallback
//! - Targets of one node share an identity, so a clone queried against its
//!   original reports the self-pair baseline
//!
//! ```rust,ignore
//! let mut topology = NumaTopology::new(2);
//! topology.set_distance_symmetric(0, 1, 21)?;
//!
//! let numa = helix_memtarget_numa::register(registry(), topology)?;
//! let node0 = registry().create(numa, &NumaParams::new(0))?;
//! ```

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

pub mod kind;
pub mod topology;

pub use kind::{register, NumaKind, NumaParams, NumaTarget, NUMA_KIND_NAME};
pub use topology::{
    CpuId, Distance, NodeId, NumaNode, NumaTopology, LOCAL_DISTANCE, REMOTE_DISTANCE,
    UNREACHABLE_DISTANCE,
};
