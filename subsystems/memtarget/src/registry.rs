//! # Kind Registry
//!
//! Process-wide registration of capability tables.
//!
//! ## Phases
//!
//! 1. **Init**: kinds are registered, normally from a single thread while
//!    topology discovery runs
//! 2. **Sealed**: [`KindRegistry::seal`] closes registration; lookups and
//!    target creation continue from any thread
//! 3. **Teardown**: [`KindRegistry::teardown`] drops every table and reopens
//!    the registry. Handles still alive keep their own table reference.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use spin::RwLock;

use crate::error::{Error, Result};
use crate::handle::MemTarget;
use crate::kind::MemTargetKind;
use crate::lifecycle;
use crate::ops::{CapabilityTable, MemTargetOps};
use crate::types::KindId;

/// Maximum number of registered kinds
pub const MAX_KINDS: usize = 64;

/// Registry of target kinds
pub struct KindRegistry {
    /// Tables by id
    tables: RwLock<BTreeMap<KindId, Arc<CapabilityTable>>>,
    /// Ids by kind name
    named: RwLock<BTreeMap<&'static str, KindId>>,
    /// Next id to hand out
    next_id: AtomicU32,
    /// Registration closed
    sealed: AtomicBool,
}

impl KindRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self {
            tables: RwLock::new(BTreeMap::new()),
            named: RwLock::new(BTreeMap::new()),
            next_id: AtomicU32::new(1),
            sealed: AtomicBool::new(false),
        }
    }

    /// Register a typed kind
    pub fn register<K: MemTargetKind>(&self, kind: K) -> Result<KindId> {
        self.insert(kind.name(), |id| CapabilityTable::with_id(id, kind))
    }

    /// Register a hand-written operation table
    pub fn register_ops(&self, ops: alloc::boxed::Box<dyn MemTargetOps>) -> Result<KindId> {
        self.insert(ops.name(), |id| CapabilityTable::from_ops(id, ops))
    }

    fn insert(
        &self,
        name: &'static str,
        build: impl FnOnce(KindId) -> Arc<CapabilityTable>,
    ) -> Result<KindId> {
        let mut tables = self.tables.write();
        let mut named = self.named.write();

        // `seal` takes the table lock, so the flag is stable from here on
        if self.is_sealed() {
            log::warn!("memtarget: registry sealed, rejecting kind '{}'", name);
            return Err(Error::InvalidArgument);
        }

        if named.contains_key(name) {
            log::warn!("memtarget: kind '{}' already registered", name);
            return Err(Error::InvalidArgument);
        }
        if tables.len() >= MAX_KINDS {
            return Err(Error::OutOfResources);
        }

        let id = KindId::from_raw(self.next_id.fetch_add(1, Ordering::Relaxed));
        tables.insert(id, build(id));
        named.insert(name, id);

        log::debug!("memtarget: registered kind '{}' as {}", name, id);
        Ok(id)
    }

    /// Close registration
    ///
    /// Waits for registrations in flight; any registration that starts
    /// after this returns fails.
    pub fn seal(&self) {
        let _tables = self.tables.write();
        self.sealed.store(true, Ordering::Release);
    }

    /// Is registration closed?
    #[inline]
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Get a capability table by id
    pub fn lookup(&self, id: KindId) -> Option<Arc<CapabilityTable>> {
        self.tables.read().get(&id).cloned()
    }

    /// Look up a kind id by name
    pub fn lookup_by_name(&self, name: &str) -> Option<KindId> {
        self.named.read().get(name).copied()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    /// Is the registry empty?
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live handles of a kind, `None` for unknown ids
    pub fn live_targets(&self, id: KindId) -> Option<usize> {
        self.tables.read().get(&id).map(|t| t.live_targets())
    }

    /// Create a target of a registered kind
    ///
    /// An unregistered `id` fails with `InvalidArgument`, like a missing
    /// capability table.
    pub fn create(&self, id: KindId, params: &dyn Any) -> Result<MemTarget> {
        let table = self.lookup(id);
        lifecycle::create(table.as_ref(), params)
    }

    /// Drop every registered table and reopen registration
    ///
    /// Returns the number of tables removed.
    pub fn teardown(&self) -> usize {
        let mut tables = self.tables.write();
        let mut named = self.named.write();

        for table in tables.values() {
            let live = table.live_targets();
            if live > 0 {
                log::warn!(
                    "memtarget: tearing down kind '{}' with {} live targets",
                    table.name(),
                    live
                );
            }
        }

        let removed = tables.len();
        tables.clear();
        named.clear();
        self.sealed.store(false, Ordering::Release);

        log::debug!("memtarget: registry torn down ({} kinds)", removed);
        removed
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KindRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KindRegistry")
            .field("kinds", &self.len())
            .field("sealed", &self.is_sealed())
            .finish()
    }
}

/// Global kind registry
static REGISTRY: KindRegistry = KindRegistry::new();

/// Get the global kind registry
pub fn registry() -> &'static KindRegistry {
    &REGISTRY
}

/// Register a kind in the global registry (convenience function)
pub fn register<K: MemTargetKind>(kind: K) -> Result<KindId> {
    REGISTRY.register(kind)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

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

    #[test]
    fn test_register_and_lookup() {
        let registry = KindRegistry::new();
        let a = registry.register(Named("a")).unwrap();
        let b = registry.register(Named("b")).unwrap();

        assert_ne!(a, b);
        assert!(!a.is_none());
        assert_eq!(registry.lookup_by_name("b"), Some(b));
        assert_eq!(registry.lookup(a).unwrap().id(), a);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = KindRegistry::new();
        registry.register(Named("dup")).unwrap();
        assert_eq!(
            registry.register(Named("dup")).err(),
            Some(Error::InvalidArgument)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_table_limit() {
        use alloc::boxed::Box;
        use alloc::format;

        let registry = KindRegistry::new();
        for i in 0..MAX_KINDS {
            let name: &'static str = Box::leak(format!("k{}", i).into_boxed_str());
            registry.register(Named(name)).unwrap();
        }
        assert_eq!(
            registry.register(Named("one-too-many")).err(),
            Some(Error::OutOfResources)
        );
    }

    #[test]
    fn test_seal_closes_registration() {
        let registry = KindRegistry::new();
        registry.register(Named("early")).unwrap();
        registry.seal();

        assert_eq!(
            registry.register(Named("late")).err(),
            Some(Error::InvalidArgument)
        );
        assert!(registry.lookup_by_name("early").is_some());
    }

    #[test]
    fn test_create_unregistered_kind() {
        let registry = KindRegistry::new();
        assert_eq!(
            registry.create(KindId::NONE, &()).err(),
            Some(Error::InvalidArgument)
        );
        assert_eq!(
            registry.create(KindId::from_raw(99), &()).err(),
            Some(Error::InvalidArgument)
        );
    }

    #[test]
    fn test_teardown_keeps_live_handles_usable() {
        let registry = KindRegistry::new();
        let id = registry.register(Named("t")).unwrap();
        let target = registry.create(id, &()).unwrap();
        registry.seal();

        assert_eq!(registry.live_targets(id), Some(1));
        assert_eq!(registry.teardown(), 1);
        assert!(registry.is_empty());
        assert!(!registry.is_sealed());
        assert_eq!(registry.live_targets(id), None);

        assert_eq!(target.kind_name(), "t");
        assert_eq!(target.table().live_targets(), 1);
        target.destroy();
    }
}
