//! Reference-counted asset handles
//!
//! Dropping the last handle to an asset does not free anything inline; it
//! stages a Delete on the lifecycle queue so teardown happens on the context
//! that owns the device. That decoupling is the whole point of this type.

use crate::asset::Asset;
use crate::id::AssetId;
use crate::lifecycle::{LifecycleAction, LifecycleSender};
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared ownership core for one loaded asset
///
/// One core exists per repository entry; every handle for that asset shares
/// the same refcount, so the 0→1 and 1→0 transitions happen exactly once
/// per load cycle.
pub struct HandleCore<T: Asset> {
    cell: Arc<RwLock<T>>,
    refs: AtomicUsize,
    sender: LifecycleSender,
}

impl<T: Asset> HandleCore<T> {
    pub(crate) fn new(asset: T, sender: LifecycleSender) -> Arc<Self> {
        Arc::new(Self {
            cell: Arc::new(RwLock::new(asset)),
            refs: AtomicUsize::new(0),
            sender,
        })
    }

    pub(crate) fn cell(&self) -> &Arc<RwLock<T>> {
        &self.cell
    }

    pub(crate) fn ref_count(&self) -> usize {
        self.refs.load(Ordering::Relaxed)
    }
}

/// Reference-counted smart reference to a loaded asset
pub struct Handle<T: Asset> {
    core: Option<Arc<HandleCore<T>>>,
}

impl<T: Asset> Handle<T> {
    /// The empty handle; refers to nothing
    pub fn empty() -> Self {
        Self { core: None }
    }

    /// Attach a new reference to a core
    ///
    /// The 0→1 transition stages Init for the asset.
    pub(crate) fn attach(core: Arc<HandleCore<T>>) -> Self {
        // the count carries no data dependency, only existence
        if core.refs.fetch_add(1, Ordering::Relaxed) == 0 {
            core.sender
                .enqueue(LifecycleAction::Init, core.cell.clone());
        }
        Self { core: Some(core) }
    }

    fn release(core: &Arc<HandleCore<T>>) {
        if core.refs.fetch_sub(1, Ordering::AcqRel) == 1 {
            // carries the core so a re-acquire before the drain is visible
            // to the consumer and the stale entry skips teardown
            core.sender.enqueue_delete(core.clone());
        }
    }

    /// Whether this handle refers to nothing
    pub fn is_empty(&self) -> bool {
        self.core.is_none()
    }

    /// Id of the referenced asset, or the empty id
    pub fn id(&self) -> AssetId {
        self.core
            .as_ref()
            .map(|core| core.cell.read().id())
            .unwrap_or(AssetId::EMPTY)
    }

    /// The asset cell, if the handle is non-empty
    pub fn try_get(&self) -> Option<&Arc<RwLock<T>>> {
        self.core.as_ref().map(|core| &core.cell)
    }

    /// The asset cell
    ///
    /// Panics on an empty handle; dereferencing one is a caller bug.
    pub fn get(&self) -> &Arc<RwLock<T>> {
        match self.try_get() {
            Some(cell) => cell,
            None => panic!("dereferenced an empty asset handle"),
        }
    }

    /// Release this reference and leave the handle empty
    pub fn reset(&mut self) {
        if let Some(core) = self.core.take() {
            Self::release(&core);
        }
    }

    /// Live reference count, 0 for the empty handle
    pub fn ref_count(&self) -> usize {
        self.core.as_ref().map(|core| core.ref_count()).unwrap_or(0)
    }
}

impl<T: Asset> Clone for Handle<T> {
    fn clone(&self) -> Self {
        if let Some(core) = &self.core {
            core.refs.fetch_add(1, Ordering::Relaxed);
        }
        Self {
            core: self.core.clone(),
        }
    }
}

impl<T: Asset> Drop for Handle<T> {
    fn drop(&mut self) {
        if let Some(core) = self.core.take() {
            Self::release(&core);
        }
    }
}

impl<T: Asset> Default for Handle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Identity comparison: two handles are equal when they share the same core
impl<T: Asset> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        match (&self.core, &other.core) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Asset> Eq for Handle<T> {}

impl<T: Asset> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("id", &self.id())
            .field("refs", &self.ref_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{AssetInfo, AssetKind};
    use crate::lifecycle::{lifecycle_channel, LifecycleConsumer};

    #[derive(Default)]
    struct Dummy {
        info: AssetInfo,
    }

    impl Asset for Dummy {
        fn info(&self) -> &AssetInfo {
            &self.info
        }
        fn info_mut(&mut self) -> &mut AssetInfo {
            &mut self.info
        }
        fn kind(&self) -> AssetKind {
            AssetKind::Unknown
        }
    }

    fn core_pair() -> (Arc<HandleCore<Dummy>>, LifecycleConsumer) {
        let (tx, rx) = lifecycle_channel();
        let mut dummy = Dummy::default();
        dummy.info = AssetInfo::new(AssetId::generate(), "dummy");
        (HandleCore::new(dummy, tx), rx)
    }

    #[test]
    fn test_first_attach_stages_init_once() {
        let (core, rx) = core_pair();
        let first = Handle::attach(core.clone());
        let second = Handle::attach(core);
        assert_eq!(rx.pending(LifecycleAction::Init), 1);
        assert_eq!(first.ref_count(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_last_release_stages_exactly_one_delete() {
        let (core, rx) = core_pair();
        let handle = Handle::attach(core);
        let clones: Vec<_> = (0..10).map(|_| handle.clone()).collect();

        drop(clones);
        assert_eq!(rx.pending(LifecycleAction::Delete), 0);
        drop(handle);
        assert_eq!(rx.pending(LifecycleAction::Delete), 1);
    }

    #[test]
    fn test_reset_releases() {
        let (core, rx) = core_pair();
        let mut handle = Handle::attach(core);
        handle.reset();
        assert!(handle.is_empty());
        assert_eq!(handle.id(), AssetId::EMPTY);
        assert_eq!(rx.pending(LifecycleAction::Delete), 1);
        // resetting an empty handle is a no-op
        handle.reset();
        assert_eq!(rx.pending(LifecycleAction::Delete), 1);
    }

    #[test]
    fn test_empty_handles_compare_equal() {
        let empty_a: Handle<Dummy> = Handle::empty();
        let empty_b: Handle<Dummy> = Handle::default();
        assert_eq!(empty_a, empty_b);

        let (core, _rx) = core_pair();
        let live = Handle::attach(core);
        assert_ne!(live, empty_a);
    }

    #[test]
    fn test_concurrent_clone_release_balances() {
        let (core, rx) = core_pair();
        let handle = Handle::attach(core);

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let local = handle.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        let inner = local.clone();
                        drop(inner);
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(handle.ref_count(), 1);
        drop(handle);
        assert_eq!(rx.pending(LifecycleAction::Delete), 1);
    }

    #[test]
    #[should_panic(expected = "empty asset handle")]
    fn test_get_on_empty_handle_panics() {
        let empty: Handle<Dummy> = Handle::empty();
        let _ = empty.get();
    }
}
