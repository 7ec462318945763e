//! Scene context
//!
//! A [`Scene`] owns the object registry, the clock, the configuration and the
//! scheduler state. It is handed to every hook, so objects create and destroy
//! each other through the same API the application uses.

use smallvec::SmallVec;

use crate::core::config::Config;
use crate::core::debug::FrameStats;
use crate::core::engine::{Hook, SchedulerState};
use crate::core::error::{Result, SceneError};
use crate::core::time::Time;
use crate::objects::{GameObject, ObjectHandle, Registry, Teardown};

/// Composed runtime state for one session.
#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) config: Config,
    pub(crate) time: Time,
    pub(crate) registry: Registry,
    pub(crate) state: SchedulerState,
    pub(crate) stats: FrameStats,
    /// Object whose hook is currently executing
    pub(crate) current: Option<ObjectHandle>,
}

impl Scene {
    /// Create an empty scene with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene with the given configuration
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Discard every object and all pending destroy state.
    ///
    /// Objects are dropped without `on_destroy`. The configuration is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AlreadyRunning`] while the loop is active.
    pub fn reinitialize(&mut self) -> Result<()> {
        if self.state != SchedulerState::Stopped {
            return Err(SceneError::AlreadyRunning);
        }
        if !self.registry.is_empty() {
            log::debug!("Reinitializing scene, dropping {} objects", self.registry.len());
        }
        self.registry = Registry::new();
        self.time.clear();
        self.stats = FrameStats::new();
        self.current = None;
        Ok(())
    }

    //--- Accessors ---------------------------------------------------------

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the configuration mutably.
    ///
    /// Display settings and the frame rate cap only take effect at the next
    /// [`run`](Self::run).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Replace the configuration
    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    /// Frame timing
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Rolling frame statistics for the current or last loop
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Current scheduler state
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Check if the frame loop is running
    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    /// Read-only view of the registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle of the object whose hook is executing, if any.
    ///
    /// `None` during `awake`, since the object is not registered yet.
    pub fn current_object(&self) -> Option<ObjectHandle> {
        self.current
    }

    /// Number of live objects
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if the scene has no live objects
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Check if a handle refers to a live object
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.registry.contains(handle)
    }

    /// Handle of the object at `index` in dispatch order
    pub fn handle_at(&self, index: usize) -> Option<ObjectHandle> {
        self.registry.handle_at(index)
    }

    //--- Object lifecycle --------------------------------------------------

    /// Add an object to the scene.
    ///
    /// `awake` runs before the object is registered. When the loop is
    /// starting or running, `start` follows immediately.
    ///
    /// # Errors
    ///
    /// Returns the error of a failing `awake` (the object is dropped) or
    /// `start` (the object stays registered).
    pub fn instantiate<T: GameObject>(&mut self, object: T) -> Result<ObjectHandle> {
        let mut object: Box<dyn GameObject> = Box::new(object);

        let outer = self.current.take();
        let awake = object.awake(self);
        self.current = outer;
        awake.map_err(|source| SceneError::hook("awake", source))?;

        let handle = self.registry.insert(object);
        log::debug!("Instantiated object {handle}");

        if self.state.delivers_start() {
            self.invoke(handle, &mut Hook::Start)?;
        }
        Ok(handle)
    }

    /// Add a default-constructed object. See [`instantiate`](Self::instantiate).
    ///
    /// # Errors
    ///
    /// Same as [`instantiate`](Self::instantiate).
    pub fn instantiate_default<T: GameObject + Default>(&mut self) -> Result<ObjectHandle> {
        self.instantiate(T::default())
    }

    /// Destroy an object at the end of the current frame.
    ///
    /// `on_destroy` runs during the sweep, not now.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownObject`] if the handle is not live.
    pub fn destroy(&mut self, handle: ObjectHandle) -> Result<()> {
        if !self.registry.contains(handle) {
            log::warn!("destroy: object {handle} is not live");
            return Err(SceneError::UnknownObject(handle));
        }
        self.registry.enqueue_destroy(handle);
        Ok(())
    }

    /// Run `on_destroy` on an object and remove it now.
    ///
    /// When the target's own hook is executing, it leaves the dispatch order
    /// at once and its `on_destroy` runs as soon as that hook returns.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnknownObject`] if the handle is not live, or the
    /// error of a failing `on_destroy`.
    pub fn destroy_immediate(&mut self, handle: ObjectHandle) -> Result<()> {
        match self.registry.begin_destroy(handle) {
            Some(Teardown::Now(object)) => self.teardown(handle, object),
            Some(Teardown::InFlight) => {
                log::debug!("Object {handle} destroyed from inside its own hook");
                Ok(())
            }
            None => {
                log::warn!("destroy_immediate: object {handle} is not live");
                Err(SceneError::UnknownObject(handle))
            }
        }
    }

    /// Destroy every object at the end of the current frame.
    ///
    /// Discards any per-object requests queued this frame.
    pub fn destroy_all(&mut self) {
        self.registry.request_destroy_all();
    }

    /// Run `on_destroy` on every object in dispatch order and empty the scene.
    ///
    /// Only the objects live at the call receive `on_destroy`. Objects that
    /// those hooks create are dropped without any hook.
    ///
    /// # Errors
    ///
    /// Returns the first failing `on_destroy`.
    pub fn destroy_all_immediate(&mut self) -> Result<()> {
        let snapshot: SmallVec<[ObjectHandle; 32]> =
            self.registry.handles().iter().copied().collect();
        for handle in snapshot {
            // Earlier teardowns may have destroyed it already
            if self.registry.contains(handle) {
                self.destroy_immediate(handle)?;
            }
        }

        let dropped = self.registry.clear();
        if dropped > 0 {
            log::debug!("Dropped {dropped} objects created during teardown");
        }
        Ok(())
    }

    /// Stop the loop at the end of the current frame.
    pub fn quit(&mut self) {
        if matches!(
            self.state,
            SchedulerState::Starting | SchedulerState::Running
        ) {
            log::info!("Quit requested");
            self.state = SchedulerState::Stopping;
        }
    }

    /// Run `on_destroy` on a detached object and free its slot.
    pub(crate) fn teardown(
        &mut self,
        handle: ObjectHandle,
        mut object: Box<dyn GameObject>,
    ) -> Result<()> {
        let outer = self.current.replace(handle);
        let result = object.on_destroy(self);
        self.current = outer;

        self.registry.release(handle);
        log::debug!("Destroyed object {handle}");
        result.map_err(|source| SceneError::hook("on_destroy", source))
    }
}
