//! Object registry
//!
//! Owns every live game object. Slots are reused through a free list and
//! carry a generation so stale [`ObjectHandle`]s are detected, while a
//! separate order list keeps insertion order, which is dispatch order.
//!
//! # Borrowing
//!
//! While one of its hooks runs, an object is moved out of its slot with
//! [`Registry::take`] and moved back with [`Registry::restore`]. A slot whose
//! object is out is "in flight": it still counts as live until destroyed.

use super::handle::ObjectHandle;
use super::object::GameObject;

/// Engine-side lifecycle of a registered object.
///
/// This is the built-in bookkeeping consulted before any user hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Registered, `start` not yet delivered
    Awake,
    /// `start` delivered
    Started,
    /// Removal underway; no more hooks except `on_destroy`
    Destroying,
}

/// Outcome of [`Registry::begin_destroy`]
pub(crate) enum Teardown {
    /// The object was in its slot; run `on_destroy` on it, then release
    Now(Box<dyn GameObject>),
    /// The object is in flight; it is handed back by `restore`
    InFlight,
}

/// What the end-of-frame sweep has to do
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Sweep {
    Nothing,
    All,
    Handles(Vec<ObjectHandle>),
}

struct Entry {
    object: Option<Box<dyn GameObject>>,
    lifecycle: Lifecycle,
}

struct Slot {
    generation: u32,
    entry: Option<Entry>,
}

/// Ordered collection of live objects plus the deferred destroy state.
#[derive(Default)]
pub struct Registry {
    /// Storage for all slots (occupied or vacant)
    slots: Vec<Slot>,
    /// Vacant slot indices, reused LIFO
    free: Vec<u32>,
    /// Live handles in insertion order
    order: Vec<ObjectHandle>,
    /// Deferred destroy requests in enqueue order
    pending: Vec<ObjectHandle>,
    /// Destroy everything at the next sweep
    destroy_all: bool,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object at the end of the dispatch order.
    pub(crate) fn insert(&mut self, object: Box<dyn GameObject>) -> ObjectHandle {
        let entry = Entry {
            object: Some(object),
            lifecycle: Lifecycle::Awake,
        };

        let handle = if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            ObjectHandle::new(index, slot.generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            ObjectHandle::new(index, 0)
        };

        self.order.push(handle);
        handle
    }

    fn entry(&self, handle: ObjectHandle) -> Option<&Entry> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, handle: ObjectHandle) -> Option<&mut Entry> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.entry.as_mut())
    }

    /// Lifecycle of the object, `None` once its slot is released
    #[must_use]
    pub fn lifecycle(&self, handle: ObjectHandle) -> Option<Lifecycle> {
        self.entry(handle).map(|entry| entry.lifecycle)
    }

    /// Check if a handle refers to a live object that is not being destroyed.
    #[must_use]
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.lifecycle(handle)
            .is_some_and(|lifecycle| lifecycle != Lifecycle::Destroying)
    }

    pub(crate) fn mark_started(&mut self, handle: ObjectHandle) {
        if let Some(entry) = self.entry_mut(handle) {
            entry.lifecycle = Lifecycle::Started;
        }
    }

    /// Move an object out of its slot. `None` if missing, destroying, or in flight.
    pub(crate) fn take(&mut self, handle: ObjectHandle) -> Option<Box<dyn GameObject>> {
        self.entry_mut(handle)
            .filter(|entry| entry.lifecycle != Lifecycle::Destroying)
            .and_then(|entry| entry.object.take())
    }

    /// Move an object back after its hook returned.
    ///
    /// Hands the object back as `Err` when it was destroyed while in flight;
    /// the caller must run `on_destroy` and then [`release`](Self::release).
    pub(crate) fn restore(
        &mut self,
        handle: ObjectHandle,
        object: Box<dyn GameObject>,
    ) -> Result<(), Box<dyn GameObject>> {
        match self.entry_mut(handle) {
            Some(entry) if entry.lifecycle != Lifecycle::Destroying => {
                entry.object = Some(object);
                Ok(())
            }
            _ => Err(object),
        }
    }

    /// Mark an object as destroying and drop it from the dispatch order.
    ///
    /// Returns `None` if the handle is not live.
    pub(crate) fn begin_destroy(&mut self, handle: ObjectHandle) -> Option<Teardown> {
        let entry = self
            .entry_mut(handle)
            .filter(|entry| entry.lifecycle != Lifecycle::Destroying)?;

        entry.lifecycle = Lifecycle::Destroying;
        let teardown = match entry.object.take() {
            Some(object) => Teardown::Now(object),
            None => Teardown::InFlight,
        };

        self.order.retain(|&h| h != handle);
        Some(teardown)
    }

    /// Free the slot of a destroyed object, invalidating its handle.
    pub(crate) fn release(&mut self, handle: ObjectHandle) {
        let Some(slot) = self
            .slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation() && slot.entry.is_some())
        else {
            return;
        };

        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
    }

    /// Drop every live object without running any hook.
    ///
    /// Slots are released, so outstanding handles go stale. An object that is
    /// in flight is only marked destroying; `restore` hands it back. Returns
    /// the number of objects removed.
    pub(crate) fn clear(&mut self) -> usize {
        let order = std::mem::take(&mut self.order);
        for &handle in &order {
            let in_slot = match self.entry_mut(handle) {
                Some(entry) => {
                    entry.lifecycle = Lifecycle::Destroying;
                    entry.object.is_some()
                }
                None => false,
            };
            if in_slot {
                self.release(handle);
            }
        }
        order.len()
    }

    /// Live handles in dispatch order
    #[must_use]
    pub fn handles(&self) -> &[ObjectHandle] {
        &self.order
    }

    /// Translate a position in dispatch order into a handle.
    ///
    /// Positions shift whenever an object is destroyed.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<ObjectHandle> {
        self.order.get(index).copied()
    }

    /// Number of live objects
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if there are no live objects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Queue a handle for the next sweep.
    pub(crate) fn enqueue_destroy(&mut self, handle: ObjectHandle) {
        self.pending.push(handle);
    }

    /// Request that everything be destroyed at the next sweep.
    pub(crate) fn request_destroy_all(&mut self) {
        self.destroy_all = true;
    }

    /// Deferred destroy requests in enqueue order
    #[must_use]
    pub fn pending(&self) -> &[ObjectHandle] {
        &self.pending
    }

    /// Check whether a destroy-all is scheduled
    #[must_use]
    pub fn destroy_all_requested(&self) -> bool {
        self.destroy_all
    }

    /// Take the deferred destroy work, leaving the queue and flag cleared.
    ///
    /// A destroy-all request discards the per-object queue.
    pub(crate) fn take_sweep(&mut self) -> Sweep {
        let pending = std::mem::take(&mut self.pending);
        if std::mem::take(&mut self.destroy_all) {
            Sweep::All
        } else if pending.is_empty() {
            Sweep::Nothing
        } else {
            Sweep::Handles(pending)
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("order", &self.order)
            .field("pending", &self.pending)
            .field("destroy_all", &self.destroy_all)
            .finish_non_exhaustive()
    }
}
