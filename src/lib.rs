//! Bounce Lab - a first-lab animation loop
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, reflection, collisions, input)
//! - `renderer`: WebGPU rendering pipeline
//! - `resources`: Sprite image loading
//! - `settings`: Variant selection and spawn ranges

pub mod renderer;
pub mod resources;
pub mod settings;
pub mod sim;

pub use resources::{ResourceError, SpriteImage};
pub use settings::Settings;
pub use sim::Variant;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Window title
    pub const TITLE: &str = "Example Bounce";
    /// Scene is square in every variant
    pub const SIZE: f32 = 400.0;

    pub const FRAMES_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep (seconds per frame)
    pub const SECOND_DELAY: f32 = 1.0 / FRAMES_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default sprite location, relative to the working directory / page
    pub const BOUNCER_IMAGE: &str = "resources/ball.gif";
    pub const NUM_BOUNCERS: usize = 50;
    /// Per-axis speed used by the first variant (units/s)
    pub const BOUNCER_SPEED: f32 = 100.0;

    pub const MOVER_SIZE: f32 = 50.0;
    /// Distance moved per key press
    pub const MOVER_SPEED: f32 = 5.0;
    /// Degrees per frame (Mover spins backwards, Grower forwards)
    pub const ROTATION_STEP: f32 = 1.0;

    pub const GROWER_SIZE: f32 = 50.0;
    /// Scale multiplier per click
    pub const GROWER_RATE: f32 = 1.1;
}

/// Scene colors (sRGB RGBA, converted to linear by the renderer)
pub mod colors {
    pub type Rgba = [f32; 4];

    pub const AZURE: Rgba = [0.941, 1.0, 1.0, 1.0];
    pub const OLIVEDRAB: Rgba = [0.420, 0.557, 0.137, 1.0];
    pub const PLUM: Rgba = [0.867, 0.627, 0.867, 1.0];
    pub const BISQUE: Rgba = [1.0, 0.894, 0.769, 1.0];
    pub const WHITE: Rgba = [1.0, 1.0, 1.0, 1.0];

    pub const BACKGROUND: Rgba = AZURE;
    pub const HIGHLIGHT: Rgba = OLIVEDRAB;
    pub const MOVER: Rgba = PLUM;
    pub const GROWER: Rgba = BISQUE;
}

/// Rotate `v` by `degrees` (screen coordinates, y pointing down)
#[inline]
pub fn rotate_degrees(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    angle.rem_euclid(360.0)
}
