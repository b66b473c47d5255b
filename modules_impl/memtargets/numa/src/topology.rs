//! NUMA topology snapshot.
//!
//! The snapshot is produced once by a discovery collaborator (ACPI SRAT/SLIT
//! and HMAT parsing, sysfs, hwloc) and is immutable afterwards. Distances
//! and bandwidths are directional: `from -> to` need not equal `to -> from`.

use alloc::vec;
use alloc::vec::Vec;

use helix_memtarget::{Error, Result};

/// NUMA node identifier
pub type NodeId = u32;

/// CPU identifier
pub type CpuId = u32;

/// SLIT-style relative distance
pub type Distance = u8;

/// Distance of a node to itself
pub const LOCAL_DISTANCE: Distance = 10;

/// Default distance between two different nodes
pub const REMOTE_DISTANCE: Distance = 20;

/// Distance marking an unreachable pair
pub const UNREACHABLE_DISTANCE: Distance = 255;

// ============================================================================
// NUMA NODE
// ============================================================================

/// NUMA node information
#[derive(Debug, Clone)]
pub struct NumaNode {
    /// Node ID
    pub id: NodeId,
    /// Package (socket) the node belongs to
    pub package: u32,
    /// CPUs on this node
    pub cpus: Vec<CpuId>,
    /// Total memory (bytes)
    pub total_memory: u64,
}

impl NumaNode {
    /// Create new NUMA node
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            package: 0,
            cpus: Vec::new(),
            total_memory: 0,
        }
    }

    /// Set package
    pub fn with_package(mut self, package: u32) -> Self {
        self.package = package;
        self
    }

    /// Add CPUs
    pub fn with_cpus(mut self, cpus: &[CpuId]) -> Self {
        self.cpus.extend_from_slice(cpus);
        self
    }

    /// Set memory
    pub fn with_memory(mut self, total: u64) -> Self {
        self.total_memory = total;
        self
    }

    /// CPU count
    pub fn cpu_count(&self) -> usize {
        self.cpus.len()
    }

    /// Has CPU?
    pub fn has_cpu(&self, cpu: CpuId) -> bool {
        self.cpus.contains(&cpu)
    }

    /// Memory-only node (CXL expander, HBM exposed as a node)?
    pub fn is_memory_only(&self) -> bool {
        self.cpus.is_empty()
    }
}

// ============================================================================
// NUMA TOPOLOGY
// ============================================================================

/// NUMA topology information
#[derive(Debug, Clone)]
pub struct NumaTopology {
    /// Node information, indexed by node id
    nodes: Vec<NumaNode>,
    /// Distance matrix, `distances[from][to]`
    distances: Vec<Vec<Distance>>,
    /// Bandwidth matrix, `bandwidths[from][to]`; 0 when unknown
    bandwidths: Vec<Vec<u64>>,
}

impl NumaTopology {
    /// Create a topology with `node_count` nodes on package 0
    ///
    /// Distances start at [`LOCAL_DISTANCE`] on the diagonal and
    /// [`REMOTE_DISTANCE`] elsewhere; bandwidths start unknown.
    pub fn new(node_count: u32) -> Self {
        let n = node_count as usize;
        let nodes = (0..node_count).map(NumaNode::new).collect();

        let mut distances = vec![vec![REMOTE_DISTANCE; n]; n];
        for (i, row) in distances.iter_mut().enumerate() {
            row[i] = LOCAL_DISTANCE;
        }

        Self {
            nodes,
            distances,
            bandwidths: vec![vec![0; n]; n],
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> u32 {
        self.nodes.len() as u32
    }

    /// Get node
    pub fn node(&self, id: NodeId) -> Option<&NumaNode> {
        self.nodes.get(id as usize)
    }

    /// Replace a node's description
    ///
    /// The node's id must be within the topology.
    pub fn set_node(&mut self, node: NumaNode) -> Result<()> {
        let slot = self
            .nodes
            .get_mut(node.id as usize)
            .ok_or(Error::InvalidArgument)?;
        *slot = node;
        Ok(())
    }

    /// Iterate over nodes
    pub fn nodes(&self) -> impl Iterator<Item = &NumaNode> {
        self.nodes.iter()
    }

    /// Set distance from one node to another
    pub fn set_distance(&mut self, from: NodeId, to: NodeId, distance: Distance) -> Result<()> {
        let cell = self
            .distances
            .get_mut(from as usize)
            .and_then(|row| row.get_mut(to as usize))
            .ok_or(Error::InvalidArgument)?;
        *cell = distance;
        Ok(())
    }

    /// Set distance in both directions
    pub fn set_distance_symmetric(&mut self, a: NodeId, b: NodeId, distance: Distance) -> Result<()> {
        self.set_distance(a, b, distance)?;
        self.set_distance(b, a, distance)
    }

    /// Get distance from one node to another
    pub fn distance(&self, from: NodeId, to: NodeId) -> Option<Distance> {
        self.distances
            .get(from as usize)
            .and_then(|row| row.get(to as usize))
            .copied()
    }

    /// Set bandwidth from one node to another (0 = unknown)
    pub fn set_bandwidth(&mut self, from: NodeId, to: NodeId, bandwidth: u64) -> Result<()> {
        let cell = self
            .bandwidths
            .get_mut(from as usize)
            .and_then(|row| row.get_mut(to as usize))
            .ok_or(Error::InvalidArgument)?;
        *cell = bandwidth;
        Ok(())
    }

    /// Get known bandwidth from one node to another
    pub fn bandwidth(&self, from: NodeId, to: NodeId) -> Option<u64> {
        self.bandwidths
            .get(from as usize)
            .and_then(|row| row.get(to as usize))
            .copied()
            .filter(|&bw| bw > 0)
    }

    /// Is the bandwidth from `from` to every other node known?
    pub fn bandwidth_row_known(&self, from: NodeId) -> bool {
        self.bandwidths.get(from as usize).is_some_and(|row| {
            row.iter()
                .enumerate()
                .all(|(to, &bw)| to == from as usize || bw > 0)
        })
    }

    /// Find node for CPU
    pub fn node_for_cpu(&self, cpu: CpuId) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.has_cpu(cpu)).map(|n| n.id)
    }

    /// Other nodes sorted by distance from `from`, nearest first
    pub fn nearest_nodes(&self, from: NodeId) -> Vec<NodeId> {
        let mut nodes: Vec<_> = (0..self.node_count())
            .filter(|&n| n != from)
            .map(|n| (n, self.distance(from, n).unwrap_or(UNREACHABLE_DISTANCE)))
            .collect();

        nodes.sort_by_key(|&(n, d)| (d, n));
        nodes.into_iter().map(|(n, _)| n).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
