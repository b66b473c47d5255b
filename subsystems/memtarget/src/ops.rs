//! # Capability Tables
//!
//! The type-erased operation table behind every [`MemTarget`] handle.
//!
//! Kind authors implement the typed [`MemTargetKind`] trait; this module
//! wraps it into an object-safe [`MemTargetOps`] so handles and the registry
//! can hold an open set of kinds behind one pointer type. A
//! [`CapabilityTable`] is immutable once built and shared by reference
//! counting between the registry and every handle of its kind.
//!
//! [`MemTarget`]: crate::handle::MemTarget

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::kind::MemTargetKind;
use crate::types::{Bandwidth, KindCaps, KindId, Latency, Locality, MemTargetType};

/// Owned, type-erased private state of one target
pub type PrivateState = Box<dyn Any + Send + Sync>;

/// Borrowed private state
pub type StateRef<'a> = &'a (dyn Any + Send + Sync);

// ============================================================================
// ERASED OPERATIONS
// ============================================================================

/// Object-safe operation table of a target kind
///
/// Implemented for every [`MemTargetKind`] through [`CapabilityTable::new`].
/// Hand-written implementations are possible for kinds that need to manage
/// erased state themselves.
pub trait MemTargetOps: Send + Sync {
    /// Kind name
    fn name(&self) -> &'static str;

    /// Classification of targets of this kind
    fn target_type(&self) -> MemTargetType;

    /// Optional operations provided
    fn capabilities(&self) -> KindCaps;

    /// Build private state from parameters
    fn construct(&self, params: &dyn Any) -> Result<PrivateState>;

    /// Release private state
    fn destroy(&self, state: PrivateState);

    /// Clone private state
    fn clone_state(&self, state: StateRef<'_>) -> Result<PrivateState>;

    /// Native bandwidth between two states of this kind
    fn bandwidth(&self, src: StateRef<'_>, dst: StateRef<'_>) -> Option<Bandwidth>;

    /// Native latency between two states of this kind
    fn latency(&self, src: StateRef<'_>, dst: StateRef<'_>) -> Option<Latency>;

    /// Capacity in bytes
    fn capacity(&self, state: StateRef<'_>) -> Option<u64>;

    /// Topology position
    fn locality(&self, state: StateRef<'_>) -> Option<Locality>;

    /// Identity of the underlying location
    fn target_id(&self, state: StateRef<'_>) -> Option<u64>;
}

/// Adapter from a typed kind to the erased table
struct TypedOps<K>(K);

impl<K: MemTargetKind> TypedOps<K> {
    fn state<'a>(&self, state: StateRef<'a>) -> Option<&'a K::State> {
        state.downcast_ref::<K::State>()
    }

    fn pair<'a>(
        &self,
        src: StateRef<'a>,
        dst: StateRef<'a>,
    ) -> Option<(&'a K::State, &'a K::State)> {
        Some((self.state(src)?, self.state(dst)?))
    }
}

impl<K: MemTargetKind> MemTargetOps for TypedOps<K> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn target_type(&self) -> MemTargetType {
        self.0.target_type()
    }

    fn capabilities(&self) -> KindCaps {
        self.0.capabilities()
    }

    fn construct(&self, params: &dyn Any) -> Result<PrivateState> {
        let params = params
            .downcast_ref::<K::Params>()
            .ok_or(Error::InvalidArgument)?;
        let state = self.0.construct(params)?;
        Ok(Box::new(state))
    }

    fn destroy(&self, state: PrivateState) {
        match state.downcast::<K::State>() {
            Ok(state) => self.0.destroy(*state),
            Err(_) => log::warn!(
                "memtarget: '{}' asked to destroy foreign state, dropping it",
                self.0.name()
            ),
        }
    }

    fn clone_state(&self, state: StateRef<'_>) -> Result<PrivateState> {
        let state = self.state(state).ok_or(Error::InvalidArgument)?;
        let copy = self.0.clone_state(state)?;
        Ok(Box::new(copy))
    }

    fn bandwidth(&self, src: StateRef<'_>, dst: StateRef<'_>) -> Option<Bandwidth> {
        let (src, dst) = self.pair(src, dst)?;
        self.0.bandwidth(src, dst)
    }

    fn latency(&self, src: StateRef<'_>, dst: StateRef<'_>) -> Option<Latency> {
        let (src, dst) = self.pair(src, dst)?;
        self.0.latency(src, dst)
    }

    fn capacity(&self, state: StateRef<'_>) -> Option<u64> {
        self.0.capacity(self.state(state)?)
    }

    fn locality(&self, state: StateRef<'_>) -> Option<Locality> {
        self.0.locality(self.state(state)?)
    }

    fn target_id(&self, state: StateRef<'_>) -> Option<u64> {
        self.0.target_id(self.state(state)?)
    }
}

// ============================================================================
// CAPABILITY TABLE
// ============================================================================

/// Shared, immutable capability table of one target kind
///
/// Besides the operations it tracks how many live handles reference it,
/// which is what the registry reports and what leak tests observe.
pub struct CapabilityTable {
    /// Registry-assigned id, `KindId::NONE` for unregistered tables
    id: KindId,
    /// Operations
    ops: Box<dyn MemTargetOps>,
    /// Live handles backed by this table
    live: AtomicUsize,
}

impl CapabilityTable {
    /// Build an unregistered table from a typed kind
    pub fn new<K: MemTargetKind>(kind: K) -> Arc<Self> {
        Self::from_ops(KindId::NONE, Box::new(TypedOps(kind)))
    }

    /// Build a table from a hand-written operation set
    pub fn from_ops(id: KindId, ops: Box<dyn MemTargetOps>) -> Arc<Self> {
        Arc::new(Self {
            id,
            ops,
            live: AtomicUsize::new(0),
        })
    }

    pub(crate) fn with_id<K: MemTargetKind>(id: KindId, kind: K) -> Arc<Self> {
        Self::from_ops(id, Box::new(TypedOps(kind)))
    }

    /// Registry id
    #[inline(always)]
    pub fn id(&self) -> KindId {
        self.id
    }

    /// Kind name
    #[inline(always)]
    pub fn name(&self) -> &'static str {
        self.ops.name()
    }

    /// Operations
    #[inline(always)]
    pub fn ops(&self) -> &dyn MemTargetOps {
        self.ops.as_ref()
    }

    /// Optional operations provided
    #[inline(always)]
    pub fn capabilities(&self) -> KindCaps {
        self.ops.capabilities()
    }

    /// Does this table provide every capability in `caps`?
    #[inline]
    pub fn supports(&self, caps: KindCaps) -> bool {
        self.ops.capabilities().contains(caps)
    }

    /// Number of live handles backed by this table
    #[inline]
    pub fn live_targets(&self) -> usize {
        self.live.load(Ordering::Acquire)
    }

    pub(crate) fn acquire(&self) {
        self.live.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn release(&self) {
        self.live.fetch_sub(1, Ordering::AcqRel);
    }
}

impl fmt::Debug for CapabilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityTable")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("caps", &self.capabilities())
            .field("live", &self.live_targets())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
