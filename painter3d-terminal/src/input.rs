/// Input handling
///
/// Key events are folded into an explicit [`InputState`] owned by the app
/// and consumed once per frame; nothing here is global.
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use painter3d_core::Camera;

use crate::config::ControlsConfig;

/// Pitch is kept short of straight up/down so the camera basis stays valid.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.05;

/// Movement requested since the last frame, in key presses.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Along the look direction; negative moves back.
    pub advance: f32,
    /// Positive turns left.
    pub turn: f32,
    /// Along world y.
    pub climb: f32,
    /// Positive looks up.
    pub look: f32,
    pub quit: bool,
}

impl InputState {
    /// Fold one key event into the state.
    pub fn record(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char('w') => self.advance += 1.0,
            KeyCode::Char('s') => self.advance -= 1.0,
            KeyCode::Char('a') | KeyCode::Left => self.turn += 1.0,
            KeyCode::Char('d') | KeyCode::Right => self.turn -= 1.0,
            KeyCode::Up => self.climb += 1.0,
            KeyCode::Down => self.climb -= 1.0,
            KeyCode::Char('r') => self.look += 1.0,
            KeyCode::Char('f') => self.look -= 1.0,
            _ => {}
        }
    }

    /// Move and turn the camera, then clear the accumulated motion.
    pub fn apply(&mut self, camera: &mut Camera, controls: &ControlsConfig) {
        camera.yaw += self.turn * controls.turn_step;
        camera.pitch =
            (camera.pitch + self.look * controls.turn_step).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        camera.position = camera.position + camera.look_dir * (self.advance * controls.move_step);
        camera.position.y += self.climb * controls.climb_step;

        let quit = self.quit;
        *self = Self {
            quit,
            ..Self::default()
        };
    }
}
