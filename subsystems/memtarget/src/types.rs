//! Core memory target types.

use core::fmt;

// ============================================================================
// COST VALUES
// ============================================================================

/// Bandwidth magnitude (higher is better)
///
/// Opaque units: only the ordering between values is meaningful.
pub type Bandwidth = u64;

/// Latency magnitude (lower is better)
///
/// Opaque units: only the ordering between values is meaningful.
pub type Latency = u64;

/// Sentinel bandwidth reported for a target queried against itself
pub const BANDWIDTH_MAX: Bandwidth = Bandwidth::MAX;

/// Latency reported for a target queried against itself
pub const LATENCY_BASELINE: Latency = 0;

// ============================================================================
// KIND IDENTIFIER
// ============================================================================

/// Identifier assigned to a capability table when it is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(u32);

impl KindId {
    /// Never assigned by a registry; lookups with it always fail
    pub const NONE: KindId = KindId(0);

    /// Create from a raw value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Is this the unassigned identifier?
    pub const fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for KindId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kind#{}", self.0)
    }
}

// ============================================================================
// TARGET TYPE
// ============================================================================

/// Coarse classification of the memory behind a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MemTargetType {
    /// Not classified by its kind
    Unknown       = 0,
    /// Host NUMA node
    Numa          = 1,
    /// High-bandwidth memory tier (HBM, MCDRAM)
    HighBandwidth = 2,
    /// Device-attached memory (GPU VRAM, CXL expanders)
    Device        = 3,
}

// ============================================================================
// KIND CAPABILITIES
// ============================================================================

bitflags::bitflags! {
    /// Optional operations a capability table provides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KindCaps: u32 {
        /// Private state can be cloned
        const CLONE     = 1 << 0;
        /// Kind answers bandwidth queries natively
        const BANDWIDTH = 1 << 1;
        /// Kind answers latency queries natively
        const LATENCY   = 1 << 2;
        /// Kind reports target capacity
        const CAPACITY  = 1 << 3;
        /// Kind reports a topology locality for the distance fallback
        const LOCALITY  = 1 << 4;
    }
}

// ============================================================================
// LOCALITY
// ============================================================================

/// Structural position of a target in the machine topology
///
/// Consumed by the topology-distance fallback when two targets cannot be
/// compared natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locality {
    /// Package (socket) the memory hangs off
    pub package: u32,
    /// NUMA node within the package
    pub node: u32,
    /// Device owning the memory, `None` for host memory
    pub device: Option<u32>,
}

impl Locality {
    /// Host memory on a given package and node
    pub const fn host(package: u32, node: u32) -> Self {
        Self {
            package,
            node,
            device: None,
        }
    }

    /// Memory attached to a device reachable from a given package and node
    pub const fn device(package: u32, node: u32, device: u32) -> Self {
        Self {
            package,
            node,
            device: Some(device),
        }
    }

    /// Is this host memory?
    pub const fn is_host(&self) -> bool {
        self.device.is_none()
    }
}

// ============================================================================
// TESTS
// ============================================================================
