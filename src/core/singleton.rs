//! Process-wide scene handle
//!
//! Most programs own a [`Scene`] directly. For code that wants a single scene
//! reachable from anywhere on the main thread, [`scene`] hands out clones of one
//! thread-local instance.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::backend::Backend;
use crate::core::config::Config;
use crate::core::error::{Result, SceneError};
use crate::core::Scene;
use crate::objects::{GameObject, ObjectHandle};

thread_local! {
    static SHARED: Rc<RefCell<Scene>> = Rc::new(RefCell::new(Scene::new()));
}

/// Re-initialize the thread's shared scene and return a handle to it.
///
/// Objects and pending destroys are discarded without `on_destroy`, the
/// configuration survives. Every handle returned so far refers to the same
/// scene and observes the reset.
///
/// # Errors
///
/// Returns [`SceneError::Busy`] while the shared scene is running.
pub fn scene() -> Result<SharedScene> {
    let shared = SharedScene(SHARED.with(Rc::clone));
    shared.borrow_mut()?.reinitialize()?;
    Ok(shared)
}

/// Cloneable handle to the thread's shared scene.
///
/// Hooks receive the scene as `&mut Scene`; going through this handle from
/// inside a hook of the running scene fails with [`SceneError::Busy`].
#[derive(Clone)]
pub struct SharedScene(Rc<RefCell<Scene>>);

impl SharedScene {
    /// Borrow the scene for reading
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running.
    pub fn borrow(&self) -> Result<Ref<'_, Scene>> {
        self.0.try_borrow().map_err(|_| SceneError::Busy)
    }

    /// Borrow the scene for writing
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running or borrowed.
    pub fn borrow_mut(&self) -> Result<RefMut<'_, Scene>> {
        self.0.try_borrow_mut().map_err(|_| SceneError::Busy)
    }

    /// Add an object. See [`Scene::instantiate`].
    ///
    /// # Errors
    ///
    /// [`SceneError::Busy`], or the error of a failing `awake`.
    pub fn instantiate<T: GameObject>(&self, object: T) -> Result<ObjectHandle> {
        self.borrow_mut()?.instantiate(object)
    }

    /// Queue an object for destruction. See [`Scene::destroy`].
    ///
    /// # Errors
    ///
    /// [`SceneError::Busy`], or [`SceneError::UnknownObject`] for a stale handle.
    pub fn destroy(&self, handle: ObjectHandle) -> Result<()> {
        self.borrow_mut()?.destroy(handle)
    }

    /// Destroy an object now. See [`Scene::destroy_immediate`].
    ///
    /// # Errors
    ///
    /// [`SceneError::Busy`], an unknown handle, or a failing `on_destroy`.
    pub fn destroy_immediate(&self, handle: ObjectHandle) -> Result<()> {
        self.borrow_mut()?.destroy_immediate(handle)
    }

    /// See [`Scene::destroy_all`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running.
    pub fn destroy_all(&self) -> Result<()> {
        self.borrow_mut()?.destroy_all();
        Ok(())
    }

    /// See [`Scene::destroy_all_immediate`].
    ///
    /// # Errors
    ///
    /// [`SceneError::Busy`], or the first failing `on_destroy`.
    pub fn destroy_all_immediate(&self) -> Result<()> {
        self.borrow_mut()?.destroy_all_immediate()
    }

    /// See [`Scene::quit`].
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running; hooks quit
    /// through the scene they are handed.
    pub fn quit(&self) -> Result<()> {
        self.borrow_mut()?.quit();
        Ok(())
    }

    /// Copy of the current configuration
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running.
    pub fn config(&self) -> Result<Config> {
        Ok(self.borrow()?.config().clone())
    }

    /// Replace the configuration. Display settings apply at the next run.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Busy`] while the scene is running.
    pub fn set_config(&self, config: Config) -> Result<()> {
        self.borrow_mut()?.set_config(config);
        Ok(())
    }

    /// Run the loop on the shared scene. See [`Scene::run`].
    ///
    /// # Errors
    ///
    /// [`SceneError::Busy`] if already running, otherwise as [`Scene::run`].
    pub fn run<B: Backend + ?Sized>(&self, backend: &mut B) -> Result<()> {
        self.borrow_mut()?.run(backend)
    }

    /// Check whether two handles refer to the same scene
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for SharedScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0.try_borrow() {
            Ok(scene) => f.debug_tuple("SharedScene").field(&*scene).finish(),
            Err(_) => f.write_str("SharedScene(<running>)"),
        }
    }
}
