//! Recording object shared by scene and scheduler tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::error::HookResult;
use crate::core::events::{Event, KeyEvent};
use crate::core::Scene;
use crate::objects::{GameObject, ObjectHandle};
use crate::renderer::Canvas;

/// Shared log of `"<name>:<hook>"` lines
pub(crate) type Journal = Rc<RefCell<Vec<String>>>;

pub(crate) fn journal() -> Journal {
    Rc::new(RefCell::new(Vec::new()))
}

/// Lines of the journal belonging to one hook
pub(crate) fn calls(journal: &Journal, hook: &str) -> Vec<String> {
    let suffix = format!(":{hook}");
    journal
        .borrow()
        .iter()
        .filter(|line| line.ends_with(&suffix))
        .cloned()
        .collect()
}

/// Side effect a recorder performs the first time a given hook runs
pub(crate) enum Action {
    DestroySelfImmediate,
    Destroy(ObjectHandle),
    DestroyImmediate(ObjectHandle),
    DestroyAll,
    Quit,
    Spawn(&'static str),
    Fail,
}

pub(crate) struct Recorder {
    name: &'static str,
    journal: Journal,
    actions: Vec<(&'static str, Action)>,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: Rc::clone(journal),
            actions: Vec::new(),
        }
    }

    /// Perform `action` the first time `hook` runs
    pub(crate) fn on(mut self, hook: &'static str, action: Action) -> Self {
        self.actions.push((hook, action));
        self
    }

    fn record(&mut self, scene: &mut Scene, hook: &str) -> HookResult {
        self.journal
            .borrow_mut()
            .push(format!("{}:{}", self.name, hook));

        let Some(pos) = self.actions.iter().position(|(h, _)| *h == hook) else {
            return Ok(());
        };
        let (_, action) = self.actions.remove(pos);
        match action {
            Action::DestroySelfImmediate => {
                let me = scene.current_object().ok_or("no current object")?;
                scene.destroy_immediate(me)?;
            }
            Action::Destroy(target) => scene.destroy(target)?,
            Action::DestroyImmediate(target) => scene.destroy_immediate(target)?,
            Action::DestroyAll => scene.destroy_all(),
            Action::Quit => scene.quit(),
            Action::Spawn(name) => {
                scene.instantiate(Recorder::new(name, &self.journal))?;
            }
            Action::Fail => return Err(format!("{} failed in {}", self.name, hook).into()),
        }
        Ok(())
    }
}

impl GameObject for Recorder {
    fn awake(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "awake")
    }

    fn start(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "start")
    }

    fn update(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "update")
    }

    fn fixed_update(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "fixed_update")
    }

    fn late_update(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "late_update")
    }

    fn draw(&mut self, scene: &mut Scene, _canvas: &mut Canvas) -> HookResult {
        self.record(scene, "draw")
    }

    fn on_destroy(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "on_destroy")
    }

    fn on_application_suspend(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "on_application_suspend")
    }

    fn on_application_quit(&mut self, scene: &mut Scene) -> HookResult {
        self.record(scene, "on_application_quit")
    }

    fn on_keydown(&mut self, scene: &mut Scene, _event: &KeyEvent) -> HookResult {
        self.record(scene, "on_keydown")
    }

    fn on_unknown_event(&mut self, scene: &mut Scene, _event: &Event) -> HookResult {
        self.record(scene, "on_unknown_event")
    }
}

/// Instantiates a replacement of itself from every `on_destroy`
pub(crate) struct Respawner {
    journal: Journal,
}

impl Respawner {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: Rc::clone(journal),
        }
    }
}

impl GameObject for Respawner {
    fn on_destroy(&mut self, scene: &mut Scene) -> HookResult {
        self.journal
            .borrow_mut()
            .push("respawner:on_destroy".to_string());
        scene.instantiate(Respawner::new(&self.journal))?;
        Ok(())
    }
}
