//! # Target Handles
//!
//! A [`MemTarget`] pairs a shared [`CapabilityTable`] with the private state
//! its kind built. The state is exclusively owned by the handle: it is
//! released through the table's `destroy` exactly once, either by
//! [`MemTarget::destroy`] or when the handle is dropped.
//!
//! Handles are `Send + Sync`. Cost queries only need `&MemTarget` and may run
//! concurrently; anything that mutates or consumes a handle needs `&mut` or
//! ownership, so the single-writer rule is checked by the compiler.

use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

use crate::error::{Error, Result};
use crate::ops::{CapabilityTable, PrivateState, StateRef};
use crate::types::{KindCaps, KindId, Locality, MemTargetType};

/// Handle to a live memory target
pub struct MemTarget {
    /// Capability table, shared with every handle of the same kind
    table: Arc<CapabilityTable>,
    /// Private state; only `None` while being destroyed
    state: Option<PrivateState>,
}

impl MemTarget {
    /// Wrap freshly constructed state, accounting for it on the table
    pub(crate) fn from_parts(table: Arc<CapabilityTable>, state: PrivateState) -> Self {
        table.acquire();
        Self {
            table,
            state: Some(state),
        }
    }

    /// Capability table backing this handle
    #[inline(always)]
    pub fn table(&self) -> &Arc<CapabilityTable> {
        &self.table
    }

    /// Registry id of the kind
    #[inline(always)]
    pub fn kind_id(&self) -> KindId {
        self.table.id()
    }

    /// Kind name
    #[inline(always)]
    pub fn kind_name(&self) -> &'static str {
        self.table.name()
    }

    /// Classification of this target
    #[inline]
    pub fn target_type(&self) -> MemTargetType {
        self.table.ops().target_type()
    }

    /// Optional operations of this target's kind
    #[inline]
    pub fn capabilities(&self) -> KindCaps {
        self.table.capabilities()
    }

    /// Do both handles share the same capability table?
    #[inline]
    pub fn same_kind(&self, other: &MemTarget) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    /// Capacity in bytes
    pub fn capacity(&self) -> Result<u64> {
        if !self.table.supports(KindCaps::CAPACITY) {
            return Err(Error::NotSupported);
        }
        self.table
            .ops()
            .capacity(self.state_ref()?)
            .ok_or(Error::NotSupported)
    }

    /// Topology position, if the kind reports one
    pub fn locality(&self) -> Option<Locality> {
        if !self.table.supports(KindCaps::LOCALITY) {
            return None;
        }
        self.table.ops().locality(self.state_ref().ok()?)
    }

    /// Identity of the underlying location, if the kind reports one
    pub fn target_id(&self) -> Option<u64> {
        self.table.ops().target_id(self.state_ref().ok()?)
    }

    /// Borrow the private state as the kind's concrete state type
    ///
    /// Returns `None` when `S` is not this handle's state type.
    pub fn state<S: Any>(&self) -> Option<&S> {
        self.state.as_deref()?.downcast_ref::<S>()
    }

    /// Mutably borrow the private state as the kind's concrete state type
    ///
    /// This is the hook for kind-specific operations on a single target.
    pub fn state_mut<S: Any>(&mut self) -> Option<&mut S> {
        self.state.as_deref_mut()?.downcast_mut::<S>()
    }

    /// Erased state for table calls
    pub(crate) fn state_ref(&self) -> Result<StateRef<'_>> {
        match self.state.as_ref() {
            Some(state) => Ok(&**state),
            None => Err(Error::InvalidArgument),
        }
    }

    /// Release the private state through the table
    fn release(&mut self) {
        if let Some(state) = self.state.take() {
            self.table.ops().destroy(state);
            self.table.release();
        }
    }

    /// Destroy the target, releasing its private state
    pub fn destroy(mut self) {
        log::debug!("memtarget: destroying '{}' target", self.kind_name());
        self.release();
    }
}

impl Drop for MemTarget {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for MemTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemTarget")
            .field("kind", &self.kind_name())
            .field("kind_id", &self.kind_id())
            .field("target_id", &self.target_id())
            .finish()
    }
}
