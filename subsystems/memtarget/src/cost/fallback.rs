//! # Topology Distance Fallback
//!
//! Cost model used when two targets cannot be compared by their own kind:
//! targets of different kinds, or a kind that declines a metric.
//!
//! The model counts the structural boundaries ("hops") separating the two
//! targets' [`Locality`] and maps the count to a latency and a bandwidth
//! proxy. It is a placeholder with known limited precision: it only
//! guarantees monotonicity (more hops never gives lower latency or higher
//! bandwidth). Replace it through [`FallbackModel::builder`] when real
//! interconnect numbers are available.
//!
//! Defaults mirror the ACPI SLIT convention of local distance 10, remote 20.

use crate::error::{Error, Result};
use crate::types::{Bandwidth, Latency, Locality};

// ============================================================================
// HOPS
// ============================================================================

/// Structural distance class between two localities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Hop {
    /// Same node, same device
    Local        = 0,
    /// Different node on the same package
    CrossNode    = 1,
    /// Different package
    CrossPackage = 2,
    /// Different device, or host memory against device memory
    CrossDevice  = 3,
}

impl Hop {
    /// Classify the distance from `src` to `dst`
    pub fn between(src: &Locality, dst: &Locality) -> Hop {
        if src.device != dst.device {
            Hop::CrossDevice
        } else if src.package != dst.package {
            Hop::CrossPackage
        } else if src.node != dst.node {
            Hop::CrossNode
        } else {
            Hop::Local
        }
    }

    /// Number of boundaries crossed
    #[inline(always)]
    pub const fn count(&self) -> u64 {
        *self as u64
    }
}

// ============================================================================
// FALLBACK MODEL
// ============================================================================

/// Hop-count cost model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackModel {
    /// Latency of a local access
    base_latency: Latency,
    /// Latency added per hop
    latency_per_hop: Latency,
    /// Bandwidth of a local access; divided by `hops + 1`
    peak_bandwidth: Bandwidth,
}

impl FallbackModel {
    /// Default model: local latency 10, +10 per hop, peak bandwidth 1000
    pub const DEFAULT: FallbackModel = FallbackModel {
        base_latency: 10,
        latency_per_hop: 10,
        peak_bandwidth: 1000,
    };

    /// Start building a model from the defaults
    pub const fn builder() -> FallbackModelBuilder {
        FallbackModelBuilder {
            model: Self::DEFAULT,
        }
    }

    /// Latency proxy for a hop class
    #[inline]
    pub fn latency_for(&self, hop: Hop) -> Latency {
        self.base_latency
            .saturating_add(self.latency_per_hop.saturating_mul(hop.count()))
    }

    /// Bandwidth proxy for a hop class
    #[inline]
    pub fn bandwidth_for(&self, hop: Hop) -> Bandwidth {
        self.peak_bandwidth / (hop.count() + 1)
    }

    /// Latency proxy between two localities
    pub fn latency(&self, src: &Locality, dst: &Locality) -> Latency {
        self.latency_for(Hop::between(src, dst))
    }

    /// Bandwidth proxy between two localities
    pub fn bandwidth(&self, src: &Locality, dst: &Locality) -> Bandwidth {
        self.bandwidth_for(Hop::between(src, dst))
    }

    /// Local access latency
    pub fn base_latency(&self) -> Latency {
        self.base_latency
    }

    /// Latency added per hop
    pub fn latency_per_hop(&self) -> Latency {
        self.latency_per_hop
    }

    /// Local access bandwidth
    pub fn peak_bandwidth(&self) -> Bandwidth {
        self.peak_bandwidth
    }
}

impl Default for FallbackModel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`FallbackModel`]
#[derive(Debug, Clone, Copy)]
pub struct FallbackModelBuilder {
    model: FallbackModel,
}

impl FallbackModelBuilder {
    /// Set the local access latency
    pub fn base_latency(mut self, latency: Latency) -> Self {
        self.model.base_latency = latency;
        self
    }

    /// Set the latency added per hop
    pub fn latency_per_hop(mut self, latency: Latency) -> Self {
        self.model.latency_per_hop = latency;
        self
    }

    /// Set the local access bandwidth
    pub fn peak_bandwidth(mut self, bandwidth: Bandwidth) -> Self {
        self.model.peak_bandwidth = bandwidth;
        self
    }

    /// Validate and build
    ///
    /// A zero peak bandwidth would collapse every bandwidth answer to zero
    /// and is rejected with `InvalidArgument`.
    pub fn build(self) -> Result<FallbackModel> {
        if self.model.peak_bandwidth == 0 {
            return Err(Error::InvalidArgument);
        }
        Ok(self.model)
    }
}

// ============================================================================
// TESTS
// ============================================================================
