//! Deterministic simulation module
//!
//! All scene logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by bouncer ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod shape;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FixedStep;
pub use shape::{Aabb, RectShape};
pub use spawn::{IntRange, SetupError, SpawnConfig, Variant, biased_int, setup_scene};
pub use state::{Bouncer, Scene};
pub use tick::{FrameInput, InputEvent, Key, StepReport, handle_click, handle_key, step, tick};
