//! # Lifecycle Manager
//!
//! Creation, cloning and destruction of [`MemTarget`] handles.
//!
//! Failure paths never leave a handle behind: a target is only wrapped (and
//! counted as live on its table) after the kind's `construct` or
//! `clone_state` succeeded, and whatever the kind returned on failure has
//! already been dropped by the time the error reaches the caller.

use alloc::sync::Arc;
use core::any::Any;

use crate::error::{Error, Result};
use crate::handle::MemTarget;
use crate::ops::CapabilityTable;
use crate::types::KindCaps;

/// Create a target from a capability table and construction parameters
///
/// # Errors
///
/// - `InvalidArgument` if `table` is `None`, if `params` is not the kind's
///   parameter type, or if the kind rejects the parameters
/// - `OutOfResources` if the kind could not allocate its state
pub fn create(table: Option<&Arc<CapabilityTable>>, params: &dyn Any) -> Result<MemTarget> {
    let table = table.ok_or(Error::InvalidArgument)?;

    let state = table.ops().construct(params).map_err(|e| {
        log::debug!("memtarget: '{}' construct failed: {}", table.name(), e);
        e
    })?;

    let target = MemTarget::from_parts(Arc::clone(table), state);
    log::debug!(
        "memtarget: created '{}' target ({} live)",
        table.name(),
        table.live_targets()
    );
    Ok(target)
}

/// Destroy a target
///
/// `None` is accepted and ignored.
pub fn destroy(target: Option<MemTarget>) {
    if let Some(target) = target {
        target.destroy();
    }
}

/// Clone a target into a new handle with independent private state
///
/// The clone shares the original's capability table and answers every cost
/// query exactly like the original.
///
/// # Errors
///
/// - `NotSupported` if the kind does not provide cloning
/// - any error the kind's clone reports; the original is left untouched
pub fn clone_target(target: &MemTarget) -> Result<MemTarget> {
    let table = target.table();
    if !table.supports(KindCaps::CLONE) {
        return Err(Error::NotSupported);
    }

    let state = table.ops().clone_state(target.state_ref()?)?;
    log::debug!("memtarget: cloned '{}' target", table.name());
    Ok(MemTarget::from_parts(Arc::clone(table), state))
}

impl MemTarget {
    /// Create a target; see [`create`]
    pub fn create(table: &Arc<CapabilityTable>, params: &dyn Any) -> Result<MemTarget> {
        create(Some(table), params)
    }

    /// Clone this target; see [`clone_target`]
    pub fn try_clone(&self) -> Result<MemTarget> {
        clone_target(self)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::MemTargetKind;
    use crate::types::MemTargetType;

    /// Tier with a tunable id, rejecting id 0
    struct Tier;

    #[derive(Debug, Clone, PartialEq)]
    struct TierState {
        id: u32,
        hits: u64,
    }

    impl MemTargetKind for Tier {
        type Params = u32;
        type State = TierState;

        fn name(&self) -> &'static str {
            "tier"
        }

        fn target_type(&self) -> MemTargetType {
            MemTargetType::HighBandwidth
        }

        fn capabilities(&self) -> KindCaps {
            KindCaps::CLONE | KindCaps::CAPACITY
        }

        fn construct(&self, id: &u32) -> Result<TierState> {
            match *id {
                0 => Err(Error::InvalidArgument),
                u32::MAX => Err(Error::OutOfResources),
                id => Ok(TierState { id, hits: 0 }),
            }
        }

        fn clone_state(&self, state: &TierState) -> Result<TierState> {
            Ok(state.clone())
        }

        fn capacity(&self, state: &TierState) -> Option<u64> {
            Some(u64::from(state.id) << 20)
        }
    }

    struct NoClone;

    impl MemTargetKind for NoClone {
        type Params = ();
        type State = ();

        fn name(&self) -> &'static str {
            "no-clone"
        }

        fn construct(&self, _: &()) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_create_without_table() {
        assert_eq!(create(None, &1u32).err(), Some(Error::InvalidArgument));
    }

    #[test]
    fn test_create_failures_leave_nothing_live() {
        let table = CapabilityTable::new(Tier);

        assert_eq!(
            MemTarget::create(&table, &0u32).err(),
            Some(Error::InvalidArgument)
        );
        assert_eq!(
            MemTarget::create(&table, &u32::MAX).err(),
            Some(Error::OutOfResources)
        );
        assert_eq!(
            MemTarget::create(&table, &"wrong").err(),
            Some(Error::InvalidArgument)
        );
        assert_eq!(table.live_targets(), 0);
    }

    #[test]
    fn test_create_and_destroy() {
        let table = CapabilityTable::new(Tier);
        let target = MemTarget::create(&table, &4u32).unwrap();

        assert_eq!(table.live_targets(), 1);
        assert_eq!(target.kind_name(), "tier");
        assert_eq!(target.target_type(), MemTargetType::HighBandwidth);
        assert_eq!(target.capacity(), Ok(4 << 20));

        destroy(Some(target));
        destroy(None);
        assert_eq!(table.live_targets(), 0);
    }

    #[test]
    fn test_drop_releases_state() {
        let table = CapabilityTable::new(Tier);
        {
            let _target = MemTarget::create(&table, &2u32).unwrap();
            assert_eq!(table.live_targets(), 1);
        }
        assert_eq!(table.live_targets(), 0);
    }

    #[test]
    fn test_clone_is_independent() {
        let table = CapabilityTable::new(Tier);
        let mut original = MemTarget::create(&table, &9u32).unwrap();
        let copy = original.try_clone().unwrap();

        assert!(copy.same_kind(&original));
        assert_eq!(table.live_targets(), 2);

        original.state_mut::<TierState>().unwrap().hits = 42;
        assert_eq!(copy.state::<TierState>().unwrap().hits, 0);

        original.destroy();
        assert_eq!(copy.state::<TierState>().unwrap().id, 9);
        assert_eq!(table.live_targets(), 1);
    }

    #[test]
    fn test_clone_not_supported() {
        let table = CapabilityTable::new(NoClone);
        let target = MemTarget::create(&table, &()).unwrap();

        assert_eq!(target.try_clone().err(), Some(Error::NotSupported));
        assert_eq!(target.capacity(), Err(Error::NotSupported));
        assert_eq!(table.live_targets(), 1);
    }

    #[test]
    fn test_state_accessor_type_mismatch() {
        let table = CapabilityTable::new(Tier);
        let mut target = MemTarget::create(&table, &3u32).unwrap();
        assert!(target.state::<u32>().is_none());
        assert!(target.state_mut::<u64>().is_none());
    }
}
