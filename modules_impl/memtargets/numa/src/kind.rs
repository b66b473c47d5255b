//! NUMA node target kind.

use alloc::sync::Arc;

use helix_memtarget::{
    Bandwidth, Error, KindCaps, KindId, KindRegistry, Latency, Locality, MemTargetKind,
    MemTargetType, Result,
};

use crate::topology::{NodeId, NumaTopology};

/// Kind name under which NUMA targets register
pub const NUMA_KIND_NAME: &str = "numa";

// ============================================================================
// PARAMETERS AND STATE
// ============================================================================

/// Construction parameters of a NUMA target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumaParams {
    /// Node id as reported by the platform
    pub physical_id: NodeId,
}

impl NumaParams {
    /// Parameters for a node
    pub const fn new(physical_id: NodeId) -> Self {
        Self { physical_id }
    }
}

/// Private state of a NUMA target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumaTarget {
    /// Node id
    pub node: NodeId,
    /// Package the node belongs to
    pub package: u32,
    /// Node memory (bytes)
    pub capacity: u64,
}

// ============================================================================
// KIND
// ============================================================================

/// NUMA node target kind
///
/// Native latency is the topology distance. Native bandwidth is answered
/// only from a source node whose bandwidth to every other node is known;
/// otherwise the whole row goes to the engine's distance fallback, so
/// values ranked from one source never mix platform and fallback units.
#[derive(Debug, Clone)]
pub struct NumaKind {
    topology: Arc<NumaTopology>,
}

impl NumaKind {
    /// Create the kind over a discovered topology
    pub fn new(topology: NumaTopology) -> Self {
        Self::with_shared(Arc::new(topology))
    }

    /// Create the kind over a topology shared with other components
    pub fn with_shared(topology: Arc<NumaTopology>) -> Self {
        Self { topology }
    }

    /// Topology snapshot
    pub fn topology(&self) -> &NumaTopology {
        &self.topology
    }
}

impl MemTargetKind for NumaKind {
    type Params = NumaParams;
    type State = NumaTarget;

    fn name(&self) -> &'static str {
        NUMA_KIND_NAME
    }

    fn target_type(&self) -> MemTargetType {
        MemTargetType::Numa
    }

    fn capabilities(&self) -> KindCaps {
        KindCaps::CLONE
            | KindCaps::BANDWIDTH
            | KindCaps::LATENCY
            | KindCaps::CAPACITY
            | KindCaps::LOCALITY
    }

    fn construct(&self, params: &NumaParams) -> Result<NumaTarget> {
        let node = self.topology.node(params.physical_id).ok_or_else(|| {
            log::debug!(
                "numa: node {} not in topology ({} nodes)",
                params.physical_id,
                self.topology.node_count()
            );
            Error::InvalidArgument
        })?;

        Ok(NumaTarget {
            node: node.id,
            package: node.package,
            capacity: node.total_memory,
        })
    }

    fn clone_state(&self, state: &NumaTarget) -> Result<NumaTarget> {
        Ok(state.clone())
    }

    fn bandwidth(&self, src: &NumaTarget, dst: &NumaTarget) -> Option<Bandwidth> {
        if !self.topology.bandwidth_row_known(src.node) {
            return None;
        }
        self.topology.bandwidth(src.node, dst.node)
    }

    fn latency(&self, src: &NumaTarget, dst: &NumaTarget) -> Option<Latency> {
        self.topology
            .distance(src.node, dst.node)
            .map(Latency::from)
    }

    fn capacity(&self, state: &NumaTarget) -> Option<u64> {
        Some(state.capacity).filter(|&c| c > 0)
    }

    fn locality(&self, state: &NumaTarget) -> Option<Locality> {
        Some(Locality::host(state.package, state.node))
    }

    fn target_id(&self, state: &NumaTarget) -> Option<u64> {
        Some(u64::from(state.node))
    }
}

/// Register the NUMA kind for `topology` in `registry`
pub fn register(registry: &KindRegistry, topology: NumaTopology) -> Result<KindId> {
    registry.register(NumaKind::new(topology))
}

// ============================================================================
// TESTS
// ============================================================================
