//! Shared test kinds.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use helix_memtarget::{
    CapabilityTable, Error, KindCaps, Latency, Locality, MemTargetKind, MemTargetType, Result,
};

// ============================================================================
// ALLOCATION COUNTING KIND
// ============================================================================

/// Allocation counters shared between a kind and its states
#[derive(Debug, Default)]
pub struct Allocations {
    allocated: AtomicUsize,
    freed: AtomicUsize,
}

impl Allocations {
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::SeqCst)
    }

    pub fn freed(&self) -> usize {
        self.freed.load(Ordering::SeqCst)
    }

    /// States currently alive
    pub fn outstanding(&self) -> usize {
        self.allocated() - self.freed()
    }
}

/// Private state that reports its own release
#[derive(Debug)]
pub struct Counted {
    pub node: u32,
    pub counter: u64,
    allocations: Arc<Allocations>,
}

impl Counted {
    fn new(node: u32, counter: u64, allocations: &Arc<Allocations>) -> Self {
        allocations.allocated.fetch_add(1, Ordering::SeqCst);
        Self {
            node,
            counter,
            allocations: Arc::clone(allocations),
        }
    }

    /// Kind-specific mutation
    pub fn bump(&mut self) {
        self.counter += 1;
    }
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.allocations.freed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Construction parameters of [`Counting`]
#[derive(Debug, Clone, Copy)]
pub struct CountingParams {
    pub node: u32,
    pub counter: u64,
    /// Make construction fail after allocating
    pub fail: Option<Error>,
}

impl CountingParams {
    pub fn new(node: u32) -> Self {
        Self {
            node,
            counter: 0,
            fail: None,
        }
    }

    pub fn with_counter(mut self, counter: u64) -> Self {
        self.counter = counter;
        self
    }

    pub fn failing(mut self, error: Error) -> Self {
        self.fail = Some(error);
        self
    }
}

/// Kind whose states are counted on allocation and release
#[derive(Debug, Default)]
pub struct Counting {
    pub allocations: Arc<Allocations>,
}

impl Counting {
    pub fn table() -> (Arc<CapabilityTable>, Arc<Allocations>) {
        let kind = Counting::default();
        let allocations = Arc::clone(&kind.allocations);
        (CapabilityTable::new(kind), allocations)
    }
}

impl MemTargetKind for Counting {
    type Params = CountingParams;
    type State = Counted;

    fn name(&self) -> &'static str {
        "counting"
    }

    fn target_type(&self) -> MemTargetType {
        MemTargetType::Numa
    }

    fn capabilities(&self) -> KindCaps {
        KindCaps::CLONE | KindCaps::LATENCY | KindCaps::LOCALITY
    }

    fn construct(&self, params: &CountingParams) -> Result<Counted> {
        let state = Counted::new(params.node, params.counter, &self.allocations);
        match params.fail {
            // `state` is dropped here, before the error is returned
            Some(error) => Err(error),
            None => Ok(state),
        }
    }

    fn clone_state(&self, state: &Counted) -> Result<Counted> {
        Ok(Counted::new(state.node, state.counter, &self.allocations))
    }

    fn latency(&self, src: &Counted, dst: &Counted) -> Option<Latency> {
        Some(10 + u64::from(src.node.abs_diff(dst.node)) * 5)
    }

    fn locality(&self, state: &Counted) -> Option<Locality> {
        Some(Locality::host(0, state.node))
    }

    fn target_id(&self, state: &Counted) -> Option<u64> {
        Some(u64::from(state.node))
    }
}

// ============================================================================
// RING KIND
// ============================================================================

/// Instances on a ring of `size`; latency grows by 10 per step forward
#[derive(Debug, Clone, Copy)]
pub struct Ring {
    pub size: u32,
}

impl MemTargetKind for Ring {
    type Params = u32;
    type State = u32;

    fn name(&self) -> &'static str {
        "ring"
    }

    fn capabilities(&self) -> KindCaps {
        KindCaps::LATENCY | KindCaps::CLONE
    }

    fn construct(&self, position: &u32) -> Result<u32> {
        if *position >= self.size {
            return Err(Error::InvalidArgument);
        }
        Ok(*position)
    }

    fn clone_state(&self, position: &u32) -> Result<u32> {
        Ok(*position)
    }

    fn latency(&self, src: &u32, dst: &u32) -> Option<Latency> {
        let steps = (dst + self.size - src) % self.size;
        Some(u64::from(steps) * 10)
    }

    fn target_id(&self, position: &u32) -> Option<u64> {
        Some(u64::from(*position))
    }
}

// ============================================================================
// OPAQUE KIND
// ============================================================================

/// Kind with no cost knowledge at all
#[derive(Debug)]
pub struct Opaque;

impl MemTargetKind for Opaque {
    type Params = ();
    type State = ();

    fn name(&self) -> &'static str {
        "opaque"
    }

    fn construct(&self, _: &()) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// DEVICE KIND
// ============================================================================

/// Device-attached memory reporting only its locality
#[derive(Debug)]
pub struct Device;

impl MemTargetKind for Device {
    type Params = Locality;
    type State = Locality;

    fn name(&self) -> &'static str {
        "device"
    }

    fn target_type(&self) -> MemTargetType {
        MemTargetType::Device
    }

    fn capabilities(&self) -> KindCaps {
        KindCaps::LOCALITY
    }

    fn construct(&self, locality: &Locality) -> Result<Locality> {
        Ok(*locality)
    }

    fn locality(&self, locality: &Locality) -> Option<Locality> {
        Some(*locality)
    }
}

// ============================================================================
// NAMED KIND
// ============================================================================

/// Stateless kind registered under an arbitrary name
#[derive(Debug)]
pub struct Named(pub &'static str);

impl MemTargetKind for Named {
    type Params = ();
    type State = ();

    fn name(&self) -> &'static str {
        self.0
    }

    fn construct(&self, _: &()) -> Result<()> {
        Ok(())
    }
}
