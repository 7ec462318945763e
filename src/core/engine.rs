//! Frame scheduler and hook dispatch
//!
//! # Frame
//!
//! ```text
//! poll events ─► dispatch each (Quit stops at once)
//!      │
//!      ▼
//! tick clock ─► update ─► fixed_update? ─► late_update
//!      │
//!      ▼
//! clear canvas ─► draw ─► present ─► destroy sweep
//! ```

use std::borrow::Cow;
use std::time::Duration;

use smallvec::SmallVec;

use crate::backend::Backend;
use crate::core::debug::FrameStats;
use crate::core::error::{HookResult, Result, SceneError};
use crate::core::events::Event;
use crate::core::Scene;
use crate::objects::{GameObject, Lifecycle, ObjectHandle, Sweep};
use crate::renderer::Canvas;

/// Scheduler state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchedulerState {
    /// No loop is active
    #[default]
    Stopped,
    /// `start` is being delivered to the initial objects
    Starting,
    /// Frames are being produced
    Running,
    /// Quit was requested, or the loop is shutting down
    Stopping,
}

impl SchedulerState {
    /// Whether objects instantiated now receive `start` immediately
    pub(crate) fn delivers_start(self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }
}

/// A hook delivered to every object
pub(crate) enum Hook<'a> {
    Start,
    Update,
    FixedUpdate,
    LateUpdate,
    Draw(&'a mut Canvas),
    ApplicationSuspend,
    ApplicationQuit,
    Event(&'a Event),
}

impl Hook<'_> {
    fn name(&self) -> Cow<'static, str> {
        match self {
            Self::Start => Cow::Borrowed("start"),
            Self::Update => Cow::Borrowed("update"),
            Self::FixedUpdate => Cow::Borrowed("fixed_update"),
            Self::LateUpdate => Cow::Borrowed("late_update"),
            Self::Draw(_) => Cow::Borrowed("draw"),
            Self::ApplicationSuspend => Cow::Borrowed("on_application_suspend"),
            Self::ApplicationQuit => Cow::Borrowed("on_application_quit"),
            Self::Event(Event::Other { .. }) => Cow::Borrowed("on_unknown_event"),
            Self::Event(event) => Cow::Owned(event.handler_name()),
        }
    }

    fn call(&mut self, object: &mut dyn GameObject, scene: &mut Scene) -> HookResult {
        match self {
            Self::Start => object.start(scene),
            Self::Update => object.update(scene),
            Self::FixedUpdate => object.fixed_update(scene),
            Self::LateUpdate => object.late_update(scene),
            Self::Draw(canvas) => object.draw(scene, canvas),
            Self::ApplicationSuspend => object.on_application_suspend(scene),
            Self::ApplicationQuit => object.on_application_quit(scene),
            Self::Event(event) => event.deliver(object, scene),
        }
    }
}

impl Scene {
    /// Run the frame loop until a quit event or [`Scene::quit`].
    ///
    /// # Lifecycle
    ///
    /// 1. Initializes the backend from the configuration
    /// 2. Delivers `start` to the objects instantiated so far
    /// 3. Produces frames until stopped
    /// 4. Delivers `on_application_suspend` and `on_application_quit`, then
    ///    destroys every object, drops pending destroy requests and clears
    ///    the clock
    /// 5. Shuts the backend down
    ///
    /// # Errors
    ///
    /// Fails before any hook runs if the backend cannot initialize. A failing
    /// hook aborts the loop where it stands and its error is returned; objects
    /// and the clock keep their last values.
    pub fn run<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        if self.state != SchedulerState::Stopped {
            return Err(SceneError::AlreadyRunning);
        }

        log::info!("Starting scene loop with {} objects", self.len());
        backend.init(&self.config)?;

        let result = self.run_loop(backend);
        if let Err(e) = &result {
            log::error!("Scene loop aborted: {e}");
        }

        self.state = SchedulerState::Stopped;
        self.current = None;
        backend.shutdown();
        result
    }

    /// Deliver one event to every object, as the loop does for backend events.
    ///
    /// A [`Event::Quit`] is turned into [`Scene::quit`].
    ///
    /// # Errors
    ///
    /// Returns the first failing handler.
    pub fn dispatch_event(&mut self, event: &Event) -> Result<()> {
        if event.is_quit() {
            self.quit();
            return Ok(());
        }
        self.dispatch(&mut Hook::Event(event))
    }

    fn run_loop<B: Backend + ?Sized>(&mut self, backend: &mut B) -> Result<()> {
        self.state = SchedulerState::Starting;
        self.dispatch(&mut Hook::Start)?;

        self.time.reset(self.config.fixed_delta_time);
        self.stats = FrameStats::new();
        if self.state == SchedulerState::Starting {
            self.state = SchedulerState::Running;
        }

        let frame_rate_cap = self.config.frame_rate_cap();
        let mut events = Vec::new();
        while self.state == SchedulerState::Running {
            self.run_frame(backend, frame_rate_cap, &mut events)?;
        }

        self.state = SchedulerState::Stopping;
        log::info!(
            "Scene loop stopped after {} frames ({})",
            self.time.frame_count(),
            self.stats.format_stats()
        );

        self.dispatch(&mut Hook::ApplicationSuspend)?;
        self.dispatch(&mut Hook::ApplicationQuit)?;
        self.destroy_all_immediate()?;
        if self.registry.take_sweep() != Sweep::Nothing {
            log::debug!("Discarded destroy requests made during shutdown");
        }
        self.time.clear();
        Ok(())
    }

    fn run_frame<B: Backend + ?Sized>(
        &mut self,
        backend: &mut B,
        frame_rate_cap: Option<u32>,
        events: &mut Vec<Event>,
    ) -> Result<()> {
        events.clear();
        backend.poll_events(events);
        for event in events.drain(..) {
            if event.is_quit() {
                log::info!("Quit event received");
                self.state = SchedulerState::Stopping;
                return Ok(());
            }
            self.dispatch(&mut Hook::Event(&event))?;
        }

        let elapsed_ms = backend.tick(frame_rate_cap);
        self.time.advance(elapsed_ms);
        self.stats.record_frame(Duration::from_millis(elapsed_ms));
        log::trace!(
            "Frame {} ({} ms)",
            self.time.frame_count(),
            elapsed_ms
        );

        self.dispatch(&mut Hook::Update)?;
        if self.time.consume_fixed_step() {
            self.dispatch(&mut Hook::FixedUpdate)?;
        }
        self.dispatch(&mut Hook::LateUpdate)?;

        let canvas = backend.canvas();
        if let Some(color) = self.config.background_color {
            canvas.fill(color);
        }
        self.dispatch(&mut Hook::Draw(canvas))?;
        backend.present()?;

        self.sweep()
    }

    /// Apply the deferred destroy requests collected during the frame.
    fn sweep(&mut self) -> Result<()> {
        match self.registry.take_sweep() {
            Sweep::Nothing => Ok(()),
            Sweep::All => {
                log::debug!("Sweep: destroying all {} objects", self.len());
                self.destroy_all_immediate()
            }
            Sweep::Handles(handles) => {
                for handle in handles {
                    if self.registry.contains(handle) {
                        self.destroy_immediate(handle)?;
                    } else {
                        log::warn!("Sweep: object {handle} is already gone, skipping");
                    }
                }
                Ok(())
            }
        }
    }

    /// Deliver a hook to every object registered when the dispatch starts,
    /// in insertion order.
    pub(crate) fn dispatch(&mut self, hook: &mut Hook<'_>) -> Result<()> {
        let snapshot: SmallVec<[ObjectHandle; 32]> =
            self.registry.handles().iter().copied().collect();

        for handle in snapshot {
            self.invoke(handle, hook)?;
        }
        Ok(())
    }

    /// Deliver a hook to one object.
    pub(crate) fn invoke(&mut self, handle: ObjectHandle, hook: &mut Hook<'_>) -> Result<()> {
        // Built-in lifecycle handling runs before the object's own hook
        match self.registry.lifecycle(handle) {
            None | Some(Lifecycle::Destroying) => return Ok(()),
            Some(Lifecycle::Started) if matches!(hook, Hook::Start) => return Ok(()),
            Some(_) => {}
        }

        // Already in flight further up the stack
        let Some(mut object) = self.registry.take(handle) else {
            return Ok(());
        };
        if matches!(hook, Hook::Start) {
            self.registry.mark_started(handle);
        }

        let outer = self.current.replace(handle);
        let result = hook
            .call(object.as_mut(), self)
            .map_err(|source| SceneError::hook(hook.name(), source));
        self.current = outer;

        match self.registry.restore(handle, object) {
            Ok(()) => result,
            // Destroyed from inside its own hook
            Err(object) => {
                let teardown = self.teardown(handle, object);
                result.and(teardown)
            }
        }
    }
}
