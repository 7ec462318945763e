//! Demo: a circle steered with the arrow keys while its hue cycles

use frameloop::prelude::*;

/// Controllable colored circle
struct Player {
    radius: f32,
    /// Pixels moved per fixed update
    speed: f32,
    /// Hue turns per second
    color_speed: f32,
    hue: f32,
    position: Vec2,
    movement: Vec2,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            radius: 15.0,
            speed: 15.0,
            color_speed: 1.0 / 8.0,
            hue: 0.0,
            position: Vec2::ZERO,
            movement: Vec2::ZERO,
        }
    }
}

/// Fully saturated, full value color for a hue in turns
fn hue_to_color(hue: f32) -> Color {
    let h = hue.rem_euclid(1.0) * 6.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Color::from_rgb_f32(r, g, b)
}

impl GameObject for Player {
    fn update(&mut self, scene: &mut Scene) -> HookResult {
        self.hue = (self.hue + self.color_speed * scene.time().delta_time() as f32) % 1.0;
        Ok(())
    }

    fn fixed_update(&mut self, _scene: &mut Scene) -> HookResult {
        if self.movement != Vec2::ZERO {
            self.position += self.movement.normalize() * self.speed;
        }
        Ok(())
    }

    fn on_keydown(&mut self, _scene: &mut Scene, event: &KeyEvent) -> HookResult {
        match event.key {
            KeyCode::ArrowLeft => self.movement.x = -1.0,
            KeyCode::ArrowRight => self.movement.x = 1.0,
            KeyCode::ArrowUp => self.movement.y = -1.0,
            KeyCode::ArrowDown => self.movement.y = 1.0,
            _ => {}
        }
        Ok(())
    }

    fn on_keyup(&mut self, scene: &mut Scene, event: &KeyEvent) -> HookResult {
        match event.key {
            KeyCode::ArrowLeft | KeyCode::ArrowRight => self.movement.x = 0.0,
            KeyCode::ArrowUp | KeyCode::ArrowDown => self.movement.y = 0.0,
            KeyCode::Escape => scene.quit(),
            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, _scene: &mut Scene, canvas: &mut Canvas) -> HookResult {
        let center = Vec2::new(canvas.width() as f32, canvas.height() as f32) / 2.0;
        canvas.fill_circle(center + self.position, self.radius, hue_to_color(self.hue));
        Ok(())
    }
}

fn run() -> Result<(), SceneError> {
    let scene = scene()?;
    scene.borrow_mut()?.config_mut().background_color = Some(Color::BLACK);
    scene.instantiate(Player::default())?;
    scene.run(&mut DesktopBackend::new())
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("Demo failed: {e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
