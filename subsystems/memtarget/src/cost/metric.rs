//! Cost metrics and estimates.

use crate::types::{BANDWIDTH_MAX, LATENCY_BASELINE};

// ============================================================================
// METRIC
// ============================================================================

/// A cost dimension between two targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostMetric {
    /// Transfer bandwidth, higher is better
    Bandwidth,
    /// Access latency, lower is better
    Latency,
}

impl CostMetric {
    /// Is `a` a better value than `b` for this metric?
    #[inline]
    pub const fn is_better(&self, a: u64, b: u64) -> bool {
        match self {
            CostMetric::Bandwidth => a > b,
            CostMetric::Latency => a < b,
        }
    }

    /// Value reported for a target queried against itself
    #[inline]
    pub const fn baseline(&self) -> u64 {
        match self {
            CostMetric::Bandwidth => BANDWIDTH_MAX,
            CostMetric::Latency => LATENCY_BASELINE,
        }
    }

    /// Name for log messages
    pub const fn name(&self) -> &'static str {
        match self {
            CostMetric::Bandwidth => "bandwidth",
            CostMetric::Latency => "latency",
        }
    }
}

// ============================================================================
// ESTIMATE
// ============================================================================

/// Where a cost value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CostSource {
    /// Answered by the targets' own kind
    Native,
    /// Derived from topology distance; lower precision than `Native`
    Fallback,
    /// Self-pair baseline
    Baseline,
}

/// A cost value with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
    /// Metric
    pub metric: CostMetric,
    /// Value in opaque magnitude units
    pub value: u64,
    /// Provenance
    pub source: CostSource,
}

impl CostEstimate {
    /// Create an estimate
    pub const fn new(metric: CostMetric, value: u64, source: CostSource) -> Self {
        Self {
            metric,
            value,
            source,
        }
    }

    /// Was this answered natively by the kind?
    #[inline]
    pub const fn is_native(&self) -> bool {
        matches!(self.source, CostSource::Native)
    }

    /// Is this estimate better than `other`?
    ///
    /// Only meaningful when both estimates share a metric.
    #[inline]
    pub fn is_better_than(&self, other: &CostEstimate) -> bool {
        self.metric.is_better(self.value, other.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(CostMetric::Bandwidth.is_better(200, 100));
        assert!(CostMetric::Latency.is_better(10, 20));
        assert!(!CostMetric::Latency.is_better(20, 20));
    }

    #[test]
    fn test_baseline_is_best() {
        for value in [0u64, 1, 10, 1 << 40] {
            assert!(!CostMetric::Latency.is_better(value, CostMetric::Latency.baseline()));
            assert!(!CostMetric::Bandwidth.is_better(value, CostMetric::Bandwidth.baseline()));
        }
    }
}
