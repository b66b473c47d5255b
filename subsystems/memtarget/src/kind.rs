//! # Target Kinds
//!
//! The contract a concrete memory target kind implements.
//!
//! A kind owns the knowledge of one backing technology (NUMA nodes, HBM
//! tiers, device memory). It validates construction parameters, owns the
//! per-instance private state type and may answer cost queries between two
//! of its own instances. Everything except `name` and `construct` is
//! optional; the defaults decline.
//!
//! ## Rules for implementors
//!
//! - `construct` must leave nothing reachable when it fails.
//! - `clone_state` must not mutate the original, even on failure.
//! - No blocking I/O outside `construct`.
//! - Cost answers for the same ordered pair must be stable for the process
//!   lifetime.
//!
//! The lifecycle manager only talks to kinds through the type-erased
//! [`MemTargetOps`](crate::ops::MemTargetOps) table built from this trait.

use core::any::Any;

use crate::error::{Error, Result};
use crate::types::{Bandwidth, KindCaps, Latency, Locality, MemTargetType};

/// A concrete memory target kind
pub trait MemTargetKind: Send + Sync + 'static {
    /// Construction parameters identifying one instance (e.g. a node id)
    type Params: Any;

    /// Private per-instance state, exclusively owned by a handle
    type State: Send + Sync + 'static;

    /// Kind name, unique within a registry
    fn name(&self) -> &'static str;

    /// Classification reported by handles of this kind
    fn target_type(&self) -> MemTargetType {
        MemTargetType::Unknown
    }

    /// Optional operations this kind provides
    ///
    /// The cost engine only asks for native metrics the kind advertises
    /// here, and clone fails with [`Error::NotSupported`] without `CLONE`.
    fn capabilities(&self) -> KindCaps {
        KindCaps::empty()
    }

    /// Validate `params` and build private state
    fn construct(&self, params: &Self::Params) -> Result<Self::State>;

    /// Release private state
    fn destroy(&self, state: Self::State) {
        drop(state);
    }

    /// Produce an independent copy of `state`
    fn clone_state(&self, _state: &Self::State) -> Result<Self::State> {
        Err(Error::NotSupported)
    }

    /// Bandwidth from `src` to `dst`, `None` to defer to the fallback
    fn bandwidth(&self, _src: &Self::State, _dst: &Self::State) -> Option<Bandwidth> {
        None
    }

    /// Latency from `src` to `dst`, `None` to defer to the fallback
    fn latency(&self, _src: &Self::State, _dst: &Self::State) -> Option<Latency> {
        None
    }

    /// Capacity in bytes
    fn capacity(&self, _state: &Self::State) -> Option<u64> {
        None
    }

    /// Topology position used by the distance fallback
    fn locality(&self, _state: &Self::State) -> Option<Locality> {
        None
    }

    /// Identity of the underlying location
    ///
    /// Two handles of the same kind reporting the same id are the same
    /// target for cost purposes (a clone and its original, for instance).
    fn target_id(&self, _state: &Self::State) -> Option<u64> {
        None
    }
}
