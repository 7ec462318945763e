//! End-to-end runs of the frame loop through the public API

use std::cell::RefCell;
use std::rc::Rc;

use frameloop::prelude::*;

type Journal = Rc<RefCell<Vec<String>>>;

/// Records every hook it receives
struct Recorder {
    name: String,
    journal: Journal,
    spawn_on_start: bool,
}

impl Recorder {
    fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: Rc::clone(journal),
            spawn_on_start: false,
        }
    }

    fn log(&self, hook: &str) {
        self.journal
            .borrow_mut()
            .push(format!("{}:{}", self.name, hook));
    }
}

impl GameObject for Recorder {
    fn awake(&mut self, _scene: &mut Scene) -> HookResult {
        self.log("awake");
        Ok(())
    }

    fn start(&mut self, scene: &mut Scene) -> HookResult {
        self.log("start");
        if self.spawn_on_start {
            scene.instantiate(Recorder::new(&format!("{}-child", self.name), &self.journal))?;
        }
        Ok(())
    }

    fn update(&mut self, _scene: &mut Scene) -> HookResult {
        self.log("update");
        Ok(())
    }

    fn fixed_update(&mut self, _scene: &mut Scene) -> HookResult {
        self.log("fixed_update");
        Ok(())
    }

    fn on_keyup(&mut self, scene: &mut Scene, event: &KeyEvent) -> HookResult {
        self.log("on_keyup");
        if event.key == KeyCode::Escape {
            scene.quit();
        }
        Ok(())
    }

    fn on_destroy(&mut self, _scene: &mut Scene) -> HookResult {
        self.log("on_destroy");
        Ok(())
    }
}

/// Paints a square where it stands
struct Block {
    position: (i32, i32),
    color: Color,
}

impl GameObject for Block {
    fn draw(&mut self, _scene: &mut Scene, canvas: &mut Canvas) -> HookResult {
        canvas.fill_rect(self.position.0, self.position.1, 2, 2, self.color);
        Ok(())
    }
}

fn count(journal: &Journal, line: &str) -> usize {
    journal.borrow().iter().filter(|l| *l == line).count()
}

#[test]
fn test_escape_quits_after_finishing_frame() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::new();
    scene.instantiate(Recorder::new("player", &journal)).unwrap();

    let escape = Event::KeyUp(KeyEvent::new(KeyCode::Escape));
    let mut backend = HeadlessBackend::new()
        .idle_frames(2, 16)
        .frame(vec![escape], 16)
        .idle_frames(5, 16);
    scene.run(&mut backend).unwrap();

    assert_eq!(count(&journal, "player:update"), 3);
    assert_eq!(count(&journal, "player:on_destroy"), 1);
    assert_eq!(backend.presented_frames(), 3);
    assert_eq!(backend.frames_remaining(), 5);
    assert!(scene.is_empty());
}

#[test]
fn test_fixed_steps_follow_elapsed_time() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::with_config(Config::default().with_fixed_delta_time(0.05));
    scene.instantiate(Recorder::new("a", &journal)).unwrap();

    // Fires on the third and sixth frame
    let mut backend = HeadlessBackend::new().idle_frames(6, 20);
    scene.run(&mut backend).unwrap();

    assert_eq!(count(&journal, "a:update"), 6);
    assert_eq!(count(&journal, "a:fixed_update"), 2);
}

#[test]
fn test_children_spawned_in_start_are_started() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::new();
    let mut parent = Recorder::new("parent", &journal);
    parent.spawn_on_start = true;
    scene.instantiate(parent).unwrap();

    let mut backend = HeadlessBackend::new().idle_frames(1, 16);
    scene.run(&mut backend).unwrap();

    assert_eq!(
        journal.borrow()[..4],
        ["parent:awake", "parent:start", "parent-child:awake", "parent-child:start"]
    );
    assert_eq!(count(&journal, "parent-child:update"), 1);
}

#[test]
fn test_draw_order_and_background() {
    let mut scene = Scene::with_config(
        Config::default()
            .with_size(8, 8)
            .with_background_color(Some(Color::BLACK)),
    );
    scene
        .instantiate(Block {
            position: (0, 0),
            color: Color::rgb(255, 0, 0),
        })
        .unwrap();
    scene
        .instantiate(Block {
            position: (1, 1),
            color: Color::rgb(0, 0, 255),
        })
        .unwrap();

    let mut backend = HeadlessBackend::new().idle_frames(1, 16);
    scene.run(&mut backend).unwrap();

    let canvas = backend.canvas_ref();
    assert_eq!(canvas.pixel(0, 0), Some(Color::rgb(255, 0, 0)));
    // Later objects draw on top
    assert_eq!(canvas.pixel(1, 1), Some(Color::rgb(0, 0, 255)));
    assert_eq!(canvas.pixel(5, 5), Some(Color::BLACK));
}

#[test]
fn test_scene_can_run_again() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::new();
    let mut backend = HeadlessBackend::new().idle_frames(1, 16);

    scene.instantiate(Recorder::new("first", &journal)).unwrap();
    scene.run(&mut backend).unwrap();

    backend.push_frame(Vec::new(), 16);
    scene.instantiate(Recorder::new("second", &journal)).unwrap();
    scene.run(&mut backend).unwrap();

    assert_eq!(count(&journal, "first:update"), 1);
    assert_eq!(count(&journal, "second:update"), 1);
    assert_eq!(count(&journal, "second:start"), 1);
    assert_eq!(backend.inits(), 2);
    assert_eq!(backend.shutdowns(), 2);
}

#[test]
fn test_quit_frame_is_not_replayed_by_next_run() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::new();
    let mut backend = HeadlessBackend::new()
        .idle_frames(1, 16)
        .frame(vec![Event::Quit], 16)
        .idle_frames(1, 16);

    scene.instantiate(Recorder::new("first", &journal)).unwrap();
    scene.run(&mut backend).unwrap();
    assert_eq!(backend.frames_remaining(), 1);

    scene.instantiate(Recorder::new("second", &journal)).unwrap();
    scene.run(&mut backend).unwrap();

    assert_eq!(count(&journal, "first:update"), 1);
    assert_eq!(count(&journal, "second:update"), 1);
    assert_eq!(backend.frames_remaining(), 0);
    assert_eq!(backend.presented_frames(), 2);
}

#[test]
fn test_shared_scene_after_run() {
    let journal: Journal = Rc::default();
    let shared = scene().unwrap();
    shared
        .borrow_mut()
        .unwrap()
        .config_mut()
        .background_color = Some(Color::rgb(10, 20, 30));
    shared.instantiate(Recorder::new("a", &journal)).unwrap();

    let mut backend = HeadlessBackend::new().idle_frames(1, 16);
    shared.run(&mut backend).unwrap();

    let fresh = scene().unwrap();
    let view = fresh.borrow().unwrap();
    assert!(view.is_empty());
    assert!(!view.is_running());
    assert_eq!(view.config().background_color, Some(Color::rgb(10, 20, 30)));
}

#[test]
fn test_destroy_stale_handle_is_an_error() {
    let journal: Journal = Rc::default();
    let mut scene = Scene::new();
    let handle = scene.instantiate(Recorder::new("a", &journal)).unwrap();
    scene.destroy_immediate(handle).unwrap();

    let reused = scene.instantiate(Recorder::new("b", &journal)).unwrap();
    assert_ne!(handle, reused);
    assert!(matches!(
        scene.destroy(handle),
        Err(SceneError::UnknownObject(h)) if h == handle
    ));
    assert!(scene.contains(reused));
}

#[test]
fn test_config_file_drives_run() {
    let dir = std::env::temp_dir().join(format!("frameloop-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("loop.ron");

    Config::default()
        .with_size(3, 2)
        .with_background_color(None)
        .save_ron(&path)
        .unwrap();
    let config = Config::load_ron(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    let mut scene = Scene::with_config(config);
    let mut backend = HeadlessBackend::new().idle_frames(1, 16);
    scene.run(&mut backend).unwrap();

    assert_eq!(backend.canvas_ref().size(), (3, 2));
    // No background clear, the canvas keeps its initial black
    assert!(backend
        .canvas_ref()
        .pixels()
        .iter()
        .all(|&c| c == Color::BLACK));
}
