//! Backend events and their handler mapping
//!
//! Every event a backend reports is one of a closed set of known kinds, each
//! delivered to a dedicated [`GameObject`] hook. Kinds the engine has no slot
//! for travel as [`Event::Other`] and reach the `on_unknown_event` fallback,
//! so backends can report new event types without engine changes.
//!
//! # Example
//!
//! ```ignore
//! // In a backend
//! queue.push(Event::KeyDown(KeyEvent::new(KeyCode::Space)));
//!
//! // Once per frame, after pumping the platform
//! out.extend(queue.drain());
//! ```

use std::borrow::Cow;
use std::collections::VecDeque;

use glam::Vec2;
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::core::error::HookResult;
use crate::core::Scene;
use crate::objects::GameObject;

// ============================================================================
// Event Payloads
// ============================================================================

/// A key press or release
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    /// Physical key
    pub key: KeyCode,
    /// True for auto-repeat presses
    pub repeat: bool,
    /// Text produced by the key, if any
    pub text: Option<String>,
}

impl KeyEvent {
    /// A non-repeating key event without text
    #[must_use]
    pub fn new(key: KeyCode) -> Self {
        Self {
            key,
            repeat: false,
            text: None,
        }
    }
}

/// Pointer movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMotionEvent {
    /// Pointer position in surface coordinates
    pub position: Vec2,
    /// Movement since the previous motion event
    pub delta: Vec2,
}

/// A mouse button press or release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    /// Button that changed state
    pub button: MouseButton,
    /// Pointer position when it happened
    pub position: Vec2,
}

/// Scroll wheel movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseWheelEvent {
    /// Scroll amount (lines or pixels, as reported by the backend)
    pub delta: Vec2,
}

// ============================================================================
// Event Types
// ============================================================================

/// An input or window event reported by a backend.
///
/// `Quit` stops the frame loop and is never delivered to objects.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Event {
    /// The user or platform asked the application to close
    Quit,
    /// A key was pressed
    KeyDown(KeyEvent),
    /// A key was released
    KeyUp(KeyEvent),
    /// The pointer moved
    MouseMotion(MouseMotionEvent),
    /// A mouse button was pressed
    MouseButtonDown(MouseButtonEvent),
    /// A mouse button was released
    MouseButtonUp(MouseButtonEvent),
    /// The scroll wheel moved
    MouseWheel(MouseWheelEvent),
    /// Text was committed
    TextInput(String),
    /// The surface changed size
    WindowResized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// The window gained or lost focus
    WindowFocus(bool),
    /// Any event kind without a dedicated hook
    Other {
        /// Backend name of the event type
        name: String,
        /// Raw event data
        payload: serde_json::Value,
    },
}

impl Event {
    /// Backend-facing name of the event type, lowercase.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Quit => Cow::Borrowed("quit"),
            Self::KeyDown(_) => Cow::Borrowed("keydown"),
            Self::KeyUp(_) => Cow::Borrowed("keyup"),
            Self::MouseMotion(_) => Cow::Borrowed("mousemotion"),
            Self::MouseButtonDown(_) => Cow::Borrowed("mousebuttondown"),
            Self::MouseButtonUp(_) => Cow::Borrowed("mousebuttonup"),
            Self::MouseWheel(_) => Cow::Borrowed("mousewheel"),
            Self::TextInput(_) => Cow::Borrowed("textinput"),
            Self::WindowResized { .. } => Cow::Borrowed("windowresized"),
            Self::WindowFocus(_) => Cow::Borrowed("windowfocus"),
            Self::Other { name, .. } => Cow::Owned(name.to_lowercase()),
        }
    }

    /// Name of the hook this event is delivered to, e.g. `on_keydown`.
    #[must_use]
    pub fn handler_name(&self) -> String {
        format!("on_{}", self.name())
    }

    /// Check for the loop-stopping event
    #[must_use]
    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }

    /// Invoke the hook that handles this event on `object`.
    pub(crate) fn deliver(&self, object: &mut dyn GameObject, scene: &mut Scene) -> HookResult {
        match self {
            Self::Quit => Ok(()),
            Self::KeyDown(e) => object.on_keydown(scene, e),
            Self::KeyUp(e) => object.on_keyup(scene, e),
            Self::MouseMotion(e) => object.on_mousemotion(scene, e),
            Self::MouseButtonDown(e) => object.on_mousebuttondown(scene, e),
            Self::MouseButtonUp(e) => object.on_mousebuttonup(scene, e),
            Self::MouseWheel(e) => object.on_mousewheel(scene, e),
            Self::TextInput(text) => object.on_textinput(scene, text),
            Self::WindowResized { width, height } => {
                object.on_windowresized(scene, *width, *height)
            }
            Self::WindowFocus(focused) => object.on_windowfocus(scene, *focused),
            Self::Other { .. } => object.on_unknown_event(scene, self),
        }
    }
}

// ============================================================================
// Event Queue
// ============================================================================

/// FIFO of events reported by the platform.
///
/// Backends push events from their platform callbacks and drain the queue
/// once per frame, after pumping.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<Event>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
        }
    }

    /// Append an event.
    #[inline]
    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Remove and yield every queued event, oldest first.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.events.drain(..)
    }

    /// Check if the queue is empty.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of queued events.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drop all queued events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_names() {
        assert_eq!(
            Event::KeyDown(KeyEvent::new(KeyCode::Space)).handler_name(),
            "on_keydown"
        );
        assert_eq!(
            Event::WindowResized {
                width: 1,
                height: 1
            }
            .handler_name(),
            "on_windowresized"
        );
        assert_eq!(Event::Quit.name(), "quit");
    }

    #[test]
    fn test_other_event_name_lowercased() {
        let event = Event::Other {
            name: "DropFile".to_string(),
            payload: serde_json::json!({ "file": "a.png" }),
        };
        assert_eq!(event.name(), "dropfile");
        assert_eq!(event.handler_name(), "on_dropfile");
        assert!(!event.is_quit());
    }

    #[test]
    fn test_event_queue_push_and_drain() {
        let mut queue = EventQueue::new();

        queue.push(Event::Quit);
        assert_eq!(queue.len(), 1);

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(events, vec![Event::Quit]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_event_queue_preserves_order() {
        let mut queue = EventQueue::new();

        queue.push(Event::WindowFocus(true));
        queue.push(Event::WindowFocus(false));
        queue.push(Event::TextInput("a".to_string()));

        let events: Vec<_> = queue.drain().collect();
        assert_eq!(
            events,
            vec![
                Event::WindowFocus(true),
                Event::WindowFocus(false),
                Event::TextInput("a".to_string())
            ]
        );
    }

    #[test]
    fn test_event_queue_clear() {
        let mut queue = EventQueue::with_capacity(2);

        queue.push(Event::TextInput("a".to_string()));
        queue.push(Event::TextInput("b".to_string()));
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.drain().count(), 0);
    }
}
