// frame.rs - Per-frame scratch state, double-buffered
//
// Each update builds a fresh FrameCtx and keeps the previous one around so
// that edge-triggered logic (collision begin, drag release) can diff.

use crate::math::{Ray, Vec2};
use crate::things::ThingRef;
use std::collections::BTreeSet;

/// What the host observed from the player this frame.
///
/// Ray construction from the camera belongs to the host; the core only needs
/// the resulting pick ray.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub mouse: Vec2,
    pub mouse_ray: Option<Ray>,
    pub left_pressed: bool,
    pub left_down: bool,
    pub left_released: bool,
    /// The UI layer owns the cursor; skip world picking and dragging.
    pub ui_wants_mouse: bool,
    /// Movement axes: x is strafe (right positive), y is forward along +Z.
    pub movement: Vec2,
}

/// An entity under the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub thing: ThingRef,
    pub distance: f32,
}

/// An unordered contact is stored twice, once per direction.
pub type Pair = (ThingRef, ThingRef);

#[derive(Debug, Clone, Default)]
pub struct FrameCtx {
    pub mouse: Vec2,
    pub mouse_ray: Option<Ray>,
    /// Nearest first.
    pub under_mouse: Vec<RayHit>,
    pub collision_pairs: BTreeSet<Pair>,
    pub hovered: Vec<ThingRef>,
    pub dragging: BTreeSet<ThingRef>,
}

impl FrameCtx {
    pub(crate) fn new(input: &FrameInput) -> Self {
        Self {
            mouse: input.mouse,
            mouse_ray: input.mouse_ray,
            ..Default::default()
        }
    }
}

/// The frame being built and the one before it.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    current: FrameCtx,
    previous: FrameCtx,
}

impl FrameBuffer {
    pub fn current(&self) -> &FrameCtx {
        &self.current
    }

    pub fn previous(&self) -> &FrameCtx {
        &self.previous
    }

    /// Hand out the latest completed frame so a new one can be built
    /// against it.
    pub(crate) fn begin(&mut self) -> FrameCtx {
        std::mem::take(&mut self.current)
    }

    /// Store the frame just built, with `last` becoming the previous one.
    pub(crate) fn finish(&mut self, last: FrameCtx, frame: FrameCtx) {
        self.previous = last;
        self.current = frame;
    }
}
