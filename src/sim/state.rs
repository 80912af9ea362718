//! Scene state and entity types
//!
//! Everything the simulation step mutates lives here. Entities are created
//! once at setup and never added or removed afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::shape::{Aabb, RectShape};
use super::spawn::Variant;
use crate::colors;
use crate::consts::*;

/// A sprite that drifts at constant velocity and reflects off the walls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bouncer {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Units per second
    pub vel: Vec2,
}

impl Bouncer {
    pub fn new(id: u32, pos: Vec2, size: Vec2, vel: Vec2) -> Self {
        Self { id, pos, size, vel }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Linear motion: `pos += vel * elapsed`
    pub fn advance(&mut self, elapsed: f32) {
        self.pos += self.vel * elapsed;
    }

    /// Flip each velocity component whose axis is out of `[0, bound - size]`.
    ///
    /// Position is left alone; a sprite still outside next frame flips again.
    /// Returns how many components flipped (0, 1 or 2).
    pub fn bounce(&mut self, scene_size: Vec2) -> u32 {
        let mut flipped = 0;
        if self.pos.x < 0.0 || self.pos.x > scene_size.x - self.size.x {
            self.vel.x = -self.vel.x;
            flipped += 1;
        }
        if self.pos.y < 0.0 || self.pos.y > scene_size.y - self.size.y {
            self.vel.y = -self.vel.y;
            flipped += 1;
        }
        flipped
    }
}

/// Complete scene state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    /// Seed the bouncers were spawned from
    pub seed: u64,
    pub variant: Variant,
    /// Reflection boundary (width, height)
    pub size: Vec2,
    /// Simulation steps taken so far
    pub time_ticks: u64,
    /// Key-driven rectangle
    pub mover: RectShape,
    /// Click-to-grow rectangle
    pub grower: RectShape,
    /// Sorted by id, in draw order
    pub bouncers: Vec<Bouncer>,
}

impl Scene {
    /// Scene with the Mover and Grower in their starting spots and no bouncers
    pub fn new(seed: u64, variant: Variant, size: Vec2) -> Self {
        let mover = RectShape::new(
            Vec2::new(size.x / 2.0 - MOVER_SIZE / 2.0, size.y / 2.0 - 100.0),
            Vec2::splat(MOVER_SIZE),
            colors::MOVER,
        );
        let grower = RectShape::new(
            Vec2::new(size.x / 2.0 - GROWER_SIZE / 2.0, size.y / 2.0 + 50.0),
            Vec2::splat(GROWER_SIZE),
            colors::GROWER,
        );
        Self {
            seed,
            variant,
            size,
            time_ticks: 0,
            mover,
            grower,
            bouncers: Vec::new(),
        }
    }

    pub fn mover_highlighted(&self) -> bool {
        self.mover.fill == colors::HIGHLIGHT
    }

    pub fn grower_highlighted(&self) -> bool {
        self.grower.fill == colors::HIGHLIGHT
    }

    /// Bouncers whose box currently pokes outside the scene
    pub fn escaped_bouncers(&self) -> usize {
        let scene = Aabb::from_pos_size(Vec2::ZERO, self.size);
        self.bouncers
            .iter()
            .filter(|b| {
                let bb = b.bounds();
                bb.min.x < scene.min.x
                    || bb.min.y < scene.min.y
                    || bb.max.x > scene.max.x
                    || bb.max.y > scene.max.y
            })
            .count()
    }
}
