use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

impl MoveKey {
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(MoveKey::Forward),
            KeyCode::KeyS => Some(MoveKey::Backward),
            KeyCode::KeyA => Some(MoveKey::Left),
            KeyCode::KeyD => Some(MoveKey::Right),
            _ => None,
        }
    }
}

/// Which movement keys are currently held.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementInput {
    /// Updates the held state from a keyboard event. Returns `false` for keys
    /// that do not move the camera.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match MoveKey::from_key_code(key) {
            Some(key) => {
                self.set(key, pressed);
                true
            }
            None => false,
        }
    }

    pub fn set(&mut self, key: MoveKey, pressed: bool) {
        match key {
            MoveKey::Forward => self.forward = pressed,
            MoveKey::Backward => self.backward = pressed,
            MoveKey::Left => self.left = pressed,
            MoveKey::Right => self.right = pressed,
        }
    }

    pub fn is_pressed(&self, key: MoveKey) -> bool {
        match key {
            MoveKey::Forward => self.forward,
            MoveKey::Backward => self.backward,
            MoveKey::Left => self.left,
            MoveKey::Right => self.right,
        }
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
