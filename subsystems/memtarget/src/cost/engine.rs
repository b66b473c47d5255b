//! # Cost Query Engine
//!
//! Answers bandwidth and latency queries between an ordered pair of targets.
//!
//! ## Dispatch
//!
//! 1. **Self-pair**: the same handle, or two handles of one kind reporting
//!    the same `target_id` (a clone and its original) get the baseline:
//!    latency `0`, bandwidth [`BANDWIDTH_MAX`](crate::types::BANDWIDTH_MAX)
//! 2. **Native**: both targets share a capability table that advertises the
//!    metric and answers for this pair
//! 3. **Fallback**: both targets report a locality and the engine has a
//!    [`FallbackModel`]
//! 4. Otherwise `NotSupported`
//!
//! Queries are read-only and deterministic for a static topology.

use core::ptr;

use super::fallback::FallbackModel;
use super::metric::{CostEstimate, CostMetric, CostSource};
use crate::error::{Error, Result};
use crate::handle::MemTarget;
use crate::types::{Bandwidth, KindCaps, Latency};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Cost engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEngineConfig {
    /// Topology fallback model; `None` answers natively or not at all
    pub fallback: Option<FallbackModel>,
}

impl CostEngineConfig {
    /// Default configuration: fallback enabled with the default model
    pub const DEFAULT: CostEngineConfig = CostEngineConfig {
        fallback: Some(FallbackModel::DEFAULT),
    };
}

impl Default for CostEngineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Cost query engine
#[derive(Debug, Clone, Copy)]
pub struct CostEngine {
    config: CostEngineConfig,
}

impl CostEngine {
    /// Create an engine
    pub const fn new(config: CostEngineConfig) -> Self {
        Self { config }
    }

    /// Engine without topology fallback
    pub const fn native_only() -> Self {
        Self::new(CostEngineConfig { fallback: None })
    }

    /// Configuration
    pub fn config(&self) -> &CostEngineConfig {
        &self.config
    }

    /// Bandwidth from `src` to `dst`
    pub fn get_bandwidth(&self, src: &MemTarget, dst: &MemTarget) -> Result<Bandwidth> {
        self.estimate(CostMetric::Bandwidth, src, dst).map(|e| e.value)
    }

    /// Latency from `src` to `dst`
    pub fn get_latency(&self, src: &MemTarget, dst: &MemTarget) -> Result<Latency> {
        self.estimate(CostMetric::Latency, src, dst).map(|e| e.value)
    }

    /// Bandwidth from `src` to `dst` with provenance
    pub fn estimate_bandwidth(&self, src: &MemTarget, dst: &MemTarget) -> Result<CostEstimate> {
        self.estimate(CostMetric::Bandwidth, src, dst)
    }

    /// Latency from `src` to `dst` with provenance
    pub fn estimate_latency(&self, src: &MemTarget, dst: &MemTarget) -> Result<CostEstimate> {
        self.estimate(CostMetric::Latency, src, dst)
    }

    /// Estimate `metric` from `src` to `dst`
    pub fn estimate(
        &self,
        metric: CostMetric,
        src: &MemTarget,
        dst: &MemTarget,
    ) -> Result<CostEstimate> {
        if Self::same_target(src, dst) {
            return Ok(CostEstimate::new(
                metric,
                metric.baseline(),
                CostSource::Baseline,
            ));
        }

        if let Some(value) = Self::native(metric, src, dst)? {
            log::trace!(
                "memtarget: native {} {} -> {} = {}",
                metric.name(),
                src.kind_name(),
                dst.kind_name(),
                value
            );
            return Ok(CostEstimate::new(metric, value, CostSource::Native));
        }

        if let Some(value) = self.fallback(metric, src, dst) {
            log::trace!(
                "memtarget: fallback {} {} -> {} = {}",
                metric.name(),
                src.kind_name(),
                dst.kind_name(),
                value
            );
            return Ok(CostEstimate::new(metric, value, CostSource::Fallback));
        }

        log::trace!(
            "memtarget: no {} answer for {} -> {}",
            metric.name(),
            src.kind_name(),
            dst.kind_name()
        );
        Err(Error::NotSupported)
    }

    /// Do `src` and `dst` denote the same location?
    fn same_target(src: &MemTarget, dst: &MemTarget) -> bool {
        if ptr::eq(src, dst) {
            return true;
        }
        if !src.same_kind(dst) {
            return false;
        }
        match (src.target_id(), dst.target_id()) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Kind-native answer, if both targets share a table that provides it
    fn native(metric: CostMetric, src: &MemTarget, dst: &MemTarget) -> Result<Option<u64>> {
        if !src.same_kind(dst) {
            return Ok(None);
        }

        let table = src.table();
        let required = match metric {
            CostMetric::Bandwidth => KindCaps::BANDWIDTH,
            CostMetric::Latency => KindCaps::LATENCY,
        };
        if !table.supports(required) {
            return Ok(None);
        }

        let (s, d) = (src.state_ref()?, dst.state_ref()?);
        Ok(match metric {
            CostMetric::Bandwidth => table.ops().bandwidth(s, d),
            CostMetric::Latency => table.ops().latency(s, d),
        })
    }

    /// Topology-distance answer
    fn fallback(&self, metric: CostMetric, src: &MemTarget, dst: &MemTarget) -> Option<u64> {
        let model = self.config.fallback.as_ref()?;
        let (s, d) = (src.locality()?, dst.locality()?);

        Some(match metric {
            CostMetric::Bandwidth => model.bandwidth(&s, &d),
            CostMetric::Latency => model.latency(&s, &d),
        })
    }
}

impl Default for CostEngine {
    fn default() -> Self {
        Self::new(CostEngineConfig::DEFAULT)
    }
}

/// Engine used by the free query functions
static DEFAULT_ENGINE: CostEngine = CostEngine::new(CostEngineConfig::DEFAULT);

/// Bandwidth from `src` to `dst` using the default engine
pub fn get_bandwidth(src: &MemTarget, dst: &MemTarget) -> Result<Bandwidth> {
    DEFAULT_ENGINE.get_bandwidth(src, dst)
}

/// Latency from `src` to `dst` using the default engine
pub fn get_latency(src: &MemTarget, dst: &MemTarget) -> Result<Latency> {
    DEFAULT_ENGINE.get_latency(src, dst)
}

// ============================================================================
// TESTS
// ============================================================================
