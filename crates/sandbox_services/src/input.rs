//! Input abstraction and scripted playback for headless runs

use sandbox_core::game::FrameInput;
use sandbox_core::math::{Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Height the synthetic pick ray is cast from.
const CAMERA_HEIGHT: f32 = 10.0;

/// Level-triggered input as a host samples it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub move_x: f32,
    pub move_y: f32,
    /// Point on the floor under the cursor, if the cursor is over the world.
    pub cursor: Option<Vec3>,
    pub button_down: bool,
    pub ui_captured: bool,
}

/// Hold `state` for `frames` frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputStep {
    pub frames: u32,
    pub state: InputState,
}

/// Turns a list of held states into per-frame [`FrameInput`]s, deriving the
/// press and release edges.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<InputStep>,
    step: usize,
    frame_in_step: u32,
    was_down: bool,
}

impl ScriptedInput {
    pub fn new(steps: Vec<InputStep>) -> Self {
        Self {
            steps,
            ..Default::default()
        }
    }

    /// Input for the next frame. Once the script runs out the player is idle.
    pub fn next_frame(&mut self) -> FrameInput {
        let state = self.advance();
        let input = frame_input(state, self.was_down);
        self.was_down = state.button_down;
        input
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps.len()
    }

    fn advance(&mut self) -> InputState {
        while let Some(step) = self.steps.get(self.step) {
            if self.frame_in_step < step.frames {
                self.frame_in_step += 1;
                return step.state;
            }
            self.step += 1;
            self.frame_in_step = 0;
        }
        InputState::default()
    }
}

/// Convert a sampled state to frame input, given whether the button was
/// held the frame before.
pub fn frame_input(state: InputState, was_down: bool) -> FrameInput {
    FrameInput {
        mouse: state.cursor.map_or(Vec2::ZERO, |c| Vec2::new(c.x, c.z)),
        mouse_ray: state
            .cursor
            .map(|c| Ray::new(c + Vec3::Y * CAMERA_HEIGHT, Vec3::NEG_Y)),
        left_pressed: state.button_down && !was_down,
        left_down: state.button_down,
        left_released: !state.button_down && was_down,
        ui_wants_mouse: state.ui_captured,
        movement: Vec2::new(state.move_x, state.move_y),
    }
}
