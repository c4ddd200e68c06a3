use crate::map::Grid;
use crate::{normalize_radians, Point};
use glam::Vec2;

/// degrees per second of turning intent, before `speed` is applied
pub const TURN_RATE: f32 = 80.;
/// pixels of look offset added per tick of look input
pub const LOOK_STEP: f32 = 30.;

pub const SPRINT_MOD: f32 = 1.5;
pub const FINE_MOD: f32 = 0.25;

/// Keys held during one tick.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Input {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub look_up: bool,
    pub look_down: bool,
    pub sprint: bool,
    /// slows turning and looking for precise aiming
    pub fine: bool,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Camera {
    pub position: Point,
    /// degrees, counter-clockwise from +x; any real value
    pub heading: f32,
    pub dx: f32,
    pub dy: f32,
    pub dturn: f32,
    pub speed: f32,
    /// degrees
    pub fov: f32,
    /// grid units
    pub view_distance: u32,
    /// pixels the horizon is shifted up by
    pub look: f32,
}

impl Camera {
    pub fn new(position: Point, heading: f32) -> Self {
        Self {
            position,
            heading,
            dx: 0.,
            dy: 0.,
            dturn: 0.,
            speed: 1.5,
            fov: 90.,
            view_distance: 24,
            look: 0.,
        }
    }

    /// heading in [0, 2π)
    pub fn radians(&self) -> f32 {
        normalize_radians(self.heading.to_radians())
    }

    pub fn heading_vector(&self) -> Vec2 {
        Vec2::from_angle(self.radians())
    }

    /// accumulate this tick's intents from held keys
    pub fn steer(&mut self, input: &Input) {
        let speed_mod = if input.sprint { SPRINT_MOD } else { 1. };
        let rot_mod = if input.fine { FINE_MOD } else { 1. };
        let heading = self.heading_vector();

        if input.forward {
            self.dx += heading.x * speed_mod;
            self.dy += heading.y * speed_mod;
        }
        if input.back {
            self.dx -= heading.x * speed_mod;
            self.dy -= heading.y * speed_mod;
        }
        if input.turn_left {
            self.dturn += TURN_RATE * rot_mod;
        }
        if input.turn_right {
            self.dturn -= TURN_RATE * rot_mod;
        }
        if input.look_up {
            self.look += LOOK_STEP * rot_mod;
        }
        if input.look_down {
            self.look -= LOOK_STEP * rot_mod;
        }
    }

    fn clear_intents(&mut self) {
        self.dx = 0.;
        self.dy = 0.;
        self.dturn = 0.;
    }

    /// integrate intents into position and heading, then clear them
    pub fn update(&mut self, dt: f32) {
        self.position.x += self.dx * self.speed * dt;
        self.position.y += self.dy * self.speed * dt;
        self.heading += self.dturn * self.speed * dt;
        self.clear_intents();
    }

    /// like [`Camera::update`], but each axis of movement is dropped if it
    /// would end inside a solid tile, so the camera slides along walls
    pub fn update_within(&mut self, grid: &Grid, dt: f32) {
        let total = Vec2::new(self.dx, self.dy) * self.speed * dt;

        if total.is_finite() {
            // no sub-step may cross more than one tile boundary per axis
            let substeps = total.abs().max_element().ceil().max(1.) as u32;
            let step = total / substeps as f32;
            for _ in 0..substeps {
                if step.x != 0. && !grid.is_solid_at(self.position + Vec2::new(step.x, 0.)) {
                    self.position.x += step.x;
                }
                if step.y != 0. && !grid.is_solid_at(self.position + Vec2::new(0., step.y)) {
                    self.position.y += step.y;
                }
            }
        }
        self.heading += self.dturn * self.speed * dt;
        self.clear_intents();
    }
}
