//! Game object trait
//!
//! Objects opt into lifecycle and event hooks by overriding them; every hook
//! defaults to a no-op, so a missing handler is never an error.

use crate::core::error::HookResult;
use crate::core::events::{Event, KeyEvent, MouseButtonEvent, MouseMotionEvent, MouseWheelEvent};
use crate::core::Scene;
use crate::renderer::Canvas;

/// Behaviour driven by a [`Scene`].
///
/// Hooks receive the scene itself, so an object can instantiate or destroy
/// objects (including itself), read [`Scene::time`] or stop the loop with
/// [`Scene::quit`] from inside any hook. The object is detached from the
/// registry while its own hook runs.
///
/// Hook order within a frame: input events, `update`, `fixed_update` (when a
/// fixed step is due), `late_update`, `draw`.
#[allow(unused_variables)]
pub trait GameObject: 'static {
    /// Called once on construction, before the object joins the registry
    fn awake(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called once before the first frame the object takes part in
    fn start(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called every frame
    fn update(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called on frames where a fixed step is due
    fn fixed_update(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called every frame after `update` and `fixed_update`
    fn late_update(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called every frame with the draw surface
    fn draw(&mut self, scene: &mut Scene, canvas: &mut Canvas) -> HookResult {
        Ok(())
    }

    /// Called exactly once when the object is destroyed
    fn on_destroy(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called when the loop stops, before `on_application_quit`
    fn on_application_suspend(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    /// Called when the loop stops, before every object is destroyed
    fn on_application_quit(&mut self, scene: &mut Scene) -> HookResult {
        Ok(())
    }

    fn on_keydown(&mut self, scene: &mut Scene, event: &KeyEvent) -> HookResult {
        Ok(())
    }

    fn on_keyup(&mut self, scene: &mut Scene, event: &KeyEvent) -> HookResult {
        Ok(())
    }

    fn on_mousemotion(&mut self, scene: &mut Scene, event: &MouseMotionEvent) -> HookResult {
        Ok(())
    }

    fn on_mousebuttondown(&mut self, scene: &mut Scene, event: &MouseButtonEvent) -> HookResult {
        Ok(())
    }

    fn on_mousebuttonup(&mut self, scene: &mut Scene, event: &MouseButtonEvent) -> HookResult {
        Ok(())
    }

    fn on_mousewheel(&mut self, scene: &mut Scene, event: &MouseWheelEvent) -> HookResult {
        Ok(())
    }

    fn on_textinput(&mut self, scene: &mut Scene, text: &str) -> HookResult {
        Ok(())
    }

    fn on_windowresized(&mut self, scene: &mut Scene, width: u32, height: u32) -> HookResult {
        Ok(())
    }

    fn on_windowfocus(&mut self, scene: &mut Scene, focused: bool) -> HookResult {
        Ok(())
    }

    /// Fallback for event kinds without a dedicated hook ([`Event::Other`])
    fn on_unknown_event(&mut self, scene: &mut Scene, event: &Event) -> HookResult {
        Ok(())
    }
}
