//! Deferred lifecycle queues
//!
//! Handles and repositories can be touched from any thread, but resource
//! acquisition and release belong to the single context that owns the device.
//! Producers stage work on three tag channels; the frame owner drains them
//! once per tick and runs the hooks there.

use crate::asset::{Asset, LoadState};
use crate::error::Result;
use crate::handle::HandleCore;
use crate::id::AssetId;
use crossbeam::channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, error};

/// Lifecycle tag for a staged piece of work
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    /// First handle attached; build derived state
    Init,
    /// Declarative fields changed; rebuild derived state
    Update,
    /// Last handle released; tear derived state down
    Delete,
}

/// Type-erased staged work item carrying an owning reference
///
/// The consumer materializes the asset, runs the hook, then drops the
/// reference; producers never hand over raw pointers.
trait QueuedAsset: Send + Sync {
    fn id(&self) -> AssetId;
    fn run(&self, action: LifecycleAction) -> Result<()>;
    fn mark_failed(&self);
}

struct TypedQueued<T: Asset> {
    cell: Arc<RwLock<T>>,
}

impl<T: Asset> QueuedAsset for TypedQueued<T> {
    fn id(&self) -> AssetId {
        self.cell.read().id()
    }

    fn run(&self, action: LifecycleAction) -> Result<()> {
        let mut asset = self.cell.write();
        match action {
            LifecycleAction::Init => {
                asset.initialize()?;
                asset.set_state(LoadState::Ready);
            }
            LifecycleAction::Update => {
                asset.refresh()?;
                asset.set_state(LoadState::Ready);
            }
            LifecycleAction::Delete => {
                asset.teardown();
                asset.set_state(LoadState::Unloaded);
            }
        }
        Ok(())
    }

    fn mark_failed(&self) {
        self.cell.write().set_state(LoadState::Failed);
    }
}

/// Delete entry carrying the whole handle core
///
/// The refcount can go 0→1 again between the 1→0 transition and the drain
/// (a repository `get` re-attaches). A stale Delete for a core that holds
/// live references again must not tear the asset down, so the consumer
/// re-checks the count and skips.
struct QueuedDelete<T: Asset> {
    core: Arc<HandleCore<T>>,
}

impl<T: Asset> QueuedAsset for QueuedDelete<T> {
    fn id(&self) -> AssetId {
        self.core.cell().read().id()
    }

    fn run(&self, _action: LifecycleAction) -> Result<()> {
        if self.core.ref_count() > 0 {
            // re-acquired before the drain; the entry is stale
            return Ok(());
        }
        let mut asset = self.core.cell().write();
        asset.teardown();
        asset.set_state(LoadState::Unloaded);
        Ok(())
    }

    fn mark_failed(&self) {
        self.core.cell().write().set_state(LoadState::Failed);
    }
}

/// Producer half: cheap to clone, safe to use from any thread
#[derive(Clone)]
pub struct LifecycleSender {
    init: Sender<Box<dyn QueuedAsset>>,
    update: Sender<Box<dyn QueuedAsset>>,
    delete: Sender<Box<dyn QueuedAsset>>,
}

impl LifecycleSender {
    pub(crate) fn enqueue<T: Asset>(&self, action: LifecycleAction, cell: Arc<RwLock<T>>) {
        let entry: Box<dyn QueuedAsset> = Box::new(TypedQueued { cell });
        let channel = match action {
            LifecycleAction::Init => &self.init,
            LifecycleAction::Update => &self.update,
            LifecycleAction::Delete => &self.delete,
        };
        // send only fails once the consumer is gone (process teardown);
        // late releases are safe to drop at that point
        let _ = channel.send(entry);
    }

    /// Stage the deferred teardown for a core whose last reference dropped
    pub(crate) fn enqueue_delete<T: Asset>(&self, core: Arc<HandleCore<T>>) {
        let entry: Box<dyn QueuedAsset> = Box::new(QueuedDelete { core });
        let _ = self.delete.send(entry);
    }
}

/// Counters for one drain pass
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainStats {
    pub processed: usize,
    pub failed: usize,
}

impl DrainStats {
    fn absorb(&mut self, other: DrainStats) {
        self.processed += other.processed;
        self.failed += other.failed;
    }
}

/// Consumer half; not clonable, so exactly one context can drain
pub struct LifecycleConsumer {
    init: Receiver<Box<dyn QueuedAsset>>,
    update: Receiver<Box<dyn QueuedAsset>>,
    delete: Receiver<Box<dyn QueuedAsset>>,
}

impl LifecycleConsumer {
    /// Drain one tag queue
    ///
    /// Takes everything staged at the time of the call, then processes it
    /// without holding any queue lock. A failing item is logged, its asset
    /// marked [`LoadState::Failed`], and the drain continues.
    pub fn drain(&self, action: LifecycleAction) -> DrainStats {
        let receiver = match action {
            LifecycleAction::Init => &self.init,
            LifecycleAction::Update => &self.update,
            LifecycleAction::Delete => &self.delete,
        };

        let staged: Vec<_> = receiver.try_iter().collect();
        let mut stats = DrainStats::default();
        for entry in staged {
            match entry.run(action) {
                Ok(()) => stats.processed += 1,
                Err(e) => {
                    entry.mark_failed();
                    stats.failed += 1;
                    error!(asset = %entry.id(), ?action, "lifecycle work failed: {e}");
                }
            }
        }
        if stats.processed + stats.failed > 0 {
            debug!(
                ?action,
                processed = stats.processed,
                failed = stats.failed,
                "drained lifecycle queue"
            );
        }
        stats
    }

    /// Drain all three queues, init before update before delete
    pub fn drain_all(&self) -> DrainStats {
        let mut stats = self.drain(LifecycleAction::Init);
        stats.absorb(self.drain(LifecycleAction::Update));
        stats.absorb(self.drain(LifecycleAction::Delete));
        stats
    }

    /// Items currently staged on one queue
    pub fn pending(&self, action: LifecycleAction) -> usize {
        match action {
            LifecycleAction::Init => self.init.len(),
            LifecycleAction::Update => self.update.len(),
            LifecycleAction::Delete => self.delete.len(),
        }
    }
}

/// Build the producer/consumer pair, once, at startup
pub fn lifecycle_channel() -> (LifecycleSender, LifecycleConsumer) {
    let (init_tx, init_rx) = unbounded();
    let (update_tx, update_rx) = unbounded();
    let (delete_tx, delete_rx) = unbounded();
    (
        LifecycleSender {
            init: init_tx,
            update: update_tx,
            delete: delete_tx,
        },
        LifecycleConsumer {
            init: init_rx,
            update: update_rx,
            delete: delete_rx,
        },
    )
}
