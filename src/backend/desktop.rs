//! Windowed backend built on winit and wgpu
//!
//! The scheduler owns the frame loop, so the winit event loop is pumped once
//! per frame instead of being run to completion. winit allows one event loop
//! per process; it is created by the first [`Backend::init`] and kept for
//! later runs, while the window and GPU resources live for a single run.

use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use super::presenter::Presenter;
use super::{Backend, BackendError, FrameLimiter};
use crate::core::{
    Config, Event, EventQueue, KeyEvent, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent,
    ScreenFlags,
};
use crate::renderer::Canvas;

/// Pumps allowed for the platform to hand out the first window
const MAX_INIT_PUMPS: usize = 64;

/// A window waiting for the event loop to become active
struct WindowRequest {
    attributes: WindowAttributes,
    display: usize,
    fullscreen: bool,
}

/// Receives winit callbacks and turns them into [`Event`]s.
#[derive(Default)]
struct DesktopApp {
    request: Option<WindowRequest>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    events: EventQueue,
    cursor: Vec2,
    error: Option<BackendError>,
}

impl DesktopApp {
    fn open_requested_window(&mut self, event_loop: &ActiveEventLoop) {
        let Some(request) = self.request.take() else {
            return;
        };

        let monitor = event_loop.available_monitors().nth(request.display);
        if monitor.is_none() && request.display != 0 {
            log::warn!(
                "Display {} not found, using the primary monitor",
                request.display
            );
        }

        let mut attributes = request.attributes;
        if request.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(monitor)));
        } else if let Some(monitor) = monitor {
            attributes = attributes.with_position(monitor.position());
        }

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(BackendError::Window(e.to_string()));
                return;
            }
        };

        match pollster::block_on(Presenter::new(Arc::clone(&window))) {
            Ok(presenter) => {
                self.presenter = Some(presenter);
                self.window = Some(window);
            }
            Err(e) => self.error = Some(e),
        }
    }

    fn push_key(&mut self, event: winit::event::KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            log::trace!("Ignoring unidentified key {:?}", event.physical_key);
            return;
        };

        let text = event
            .text
            .as_ref()
            .map(|t| t.to_string())
            .filter(|t| !t.chars().any(char::is_control));
        let key_event = KeyEvent {
            key,
            repeat: event.repeat,
            text: text.clone(),
        };

        match event.state {
            ElementState::Pressed => {
                self.events.push(Event::KeyDown(key_event));
                if let Some(text) = text {
                    self.events.push(Event::TextInput(text));
                }
            }
            ElementState::Released => self.events.push(Event::KeyUp(key_event)),
        }
    }
}

impl ApplicationHandler for DesktopApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.open_requested_window(event_loop);
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window.as_ref().is_none_or(|w| w.id() != window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.events.push(Event::Quit);
            }

            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                self.events.push(Event::WindowResized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::Focused(focused) => self.events.push(Event::WindowFocus(focused)),

            WindowEvent::KeyboardInput { event, .. } => self.push_key(event),

            WindowEvent::Ime(Ime::Commit(text)) => self.events.push(Event::TextInput(text)),

            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                let delta = position - self.cursor;
                self.cursor = position;
                self.events
                    .push(Event::MouseMotion(MouseMotionEvent { position, delta }));
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = MouseButtonEvent {
                    button,
                    position: self.cursor,
                };
                self.events.push(match state {
                    ElementState::Pressed => Event::MouseButtonDown(event),
                    ElementState::Released => Event::MouseButtonUp(event),
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(x, y),
                    MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x as f32, pos.y as f32),
                };
                self.events.push(Event::MouseWheel(MouseWheelEvent { delta }));
            }

            WindowEvent::Moved(position) => self.events.push(Event::Other {
                name: "windowmoved".to_string(),
                payload: serde_json::json!({ "x": position.x, "y": position.y }),
            }),

            WindowEvent::Occluded(occluded) => self.events.push(Event::Other {
                name: "windowoccluded".to_string(),
                payload: serde_json::Value::Bool(occluded),
            }),

            WindowEvent::DroppedFile(path) => self.events.push(Event::Other {
                name: "dropfile".to_string(),
                payload: serde_json::Value::String(path.display().to_string()),
            }),

            WindowEvent::CursorEntered { .. } => self.events.push(Event::Other {
                name: "windowenter".to_string(),
                payload: serde_json::Value::Null,
            }),

            WindowEvent::CursorLeft { .. } => self.events.push(Event::Other {
                name: "windowleave".to_string(),
                payload: serde_json::Value::Null,
            }),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Only the first run gets `resumed`
        self.open_requested_window(event_loop);
    }
}

/// Desktop window backend.
///
/// # Example
///
/// ```no_run
/// use frameloop::backend::DesktopBackend;
/// use frameloop::core::Scene;
///
/// let mut scene = Scene::new();
/// scene.run(&mut DesktopBackend::new()).unwrap();
/// ```
#[derive(Default)]
pub struct DesktopBackend {
    event_loop: Option<EventLoop<()>>,
    app: DesktopApp,
    limiter: FrameLimiter,
    canvas: Canvas,
}

impl DesktopBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// The open window, if a run is in progress
    pub fn window(&self) -> Option<&Window> {
        self.app.window.as_deref()
    }

    fn window_attributes(config: &Config) -> WindowAttributes {
        let (width, height) = config.screen_size;
        let flags = config.screen_flags;

        Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)))
            .with_resizable(flags.contains(ScreenFlags::RESIZABLE))
            .with_decorations(!flags.contains(ScreenFlags::NOFRAME))
            .with_visible(!flags.contains(ScreenFlags::HIDDEN))
    }
}

impl Backend for DesktopBackend {
    fn init(&mut self, config: &Config) -> Result<(), BackendError> {
        let event_loop = match self.event_loop.take() {
            Some(event_loop) => event_loop,
            None => EventLoop::new().map_err(|e| BackendError::EventLoop(e.to_string()))?,
        };
        let event_loop = self.event_loop.insert(event_loop);

        if config.screen_depth != 0 {
            log::debug!(
                "Requested color depth {} is advisory, the surface format decides",
                config.screen_depth
            );
        }

        self.app.events.clear();
        self.app.cursor = Vec2::ZERO;
        self.app.request = Some(WindowRequest {
            attributes: Self::window_attributes(config),
            display: config.screen_display,
            fullscreen: config.screen_flags.contains(ScreenFlags::FULLSCREEN),
        });

        for _ in 0..MAX_INIT_PUMPS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app)
            {
                return Err(BackendError::EventLoop(format!(
                    "event loop exited during init with code {code}"
                )));
            }
            if let Some(e) = self.app.error.take() {
                return Err(e);
            }
            if self.app.window.is_some() {
                break;
            }
        }

        let Some(window) = &self.app.window else {
            self.app.request = None;
            return Err(BackendError::Window("platform never opened the window".to_string()));
        };

        let size = window.inner_size();
        self.canvas.resize(size.width, size.height);
        self.limiter.reset();
        log::info!(
            "Opened window \"{}\" ({}x{})",
            config.title,
            size.width,
            size.height
        );
        Ok(())
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) {
        let Some(event_loop) = self.event_loop.as_mut() else {
            return;
        };

        if let PumpStatus::Exit(_) = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app)
        {
            self.app.events.push(Event::Quit);
        }

        for event in self.app.events.drain() {
            if let Event::WindowResized { width, height } = event {
                self.canvas.resize(width, height);
            }
            events.push(event);
        }
    }

    fn tick(&mut self, frame_rate_cap: Option<u32>) -> u64 {
        self.limiter.tick(frame_rate_cap)
    }

    fn canvas(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), BackendError> {
        if let Some(e) = self.app.error.take() {
            return Err(e);
        }
        let (Some(window), Some(presenter)) = (&self.app.window, &mut self.app.presenter) else {
            return Err(BackendError::Surface("no window to present to".to_string()));
        };

        window.pre_present_notify();
        presenter.present(&self.canvas)
    }

    fn shutdown(&mut self) {
        // Surface before window
        self.app.presenter = None;
        self.app.window = None;
        self.app.request = None;
        self.app.events.clear();

        if let Some(event_loop) = self.event_loop.as_mut() {
            // Let the platform process the close
            let _ = event_loop.pump_app_events(Some(Duration::ZERO), &mut self.app);
        }
        log::info!("Desktop backend shut down");
    }
}
