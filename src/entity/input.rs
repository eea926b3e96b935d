//! Avatar input state

/// Direction/jump intents sampled once per frame by the input layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvatarInput {
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub jump_pressed: bool, // Space bar
}

impl AvatarInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left() -> Self {
        Self {
            left_pressed: true,
            ..Self::default()
        }
    }

    pub fn right() -> Self {
        Self {
            right_pressed: true,
            ..Self::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Self::default()
        }
    }

    /// Whether any key is held this frame
    pub fn any(&self) -> bool {
        self.left_pressed || self.right_pressed || self.jump_pressed
    }
}
