//! Fixed timestep simulation step and input handlers
//!
//! `step` is the whole animation: move, spin, reflect, then recolor on
//! collisions. Input handlers run between steps.

use glam::Vec2;

use super::state::Scene;
use crate::colors;
use crate::consts::*;

/// Keys the scene reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "ArrowUp" | "Up" => Key::Up,
            "ArrowDown" | "Down" => Key::Down,
            "ArrowLeft" | "Left" => Key::Left,
            "ArrowRight" | "Right" => Key::Right,
            _ => Key::Other,
        }
    }
}

/// A single host input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyPressed(Key),
    /// Click position in scene coordinates
    Clicked(Vec2),
}

/// Input collected between two steps, applied in arrival order
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub events: Vec<InputEvent>,
}

impl FrameInput {
    pub fn push_key(&mut self, key: Key) {
        self.events.push(InputEvent::KeyPressed(key));
    }

    pub fn push_click(&mut self, point: Vec2) {
        self.events.push(InputEvent::Clicked(point));
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Velocity components flipped by wall reflection
    pub reflections: u32,
    /// Mover and Grower shapes overlap
    pub mover_hit: bool,
    /// Grower bounds overlap at least one bouncer
    pub grower_hit: bool,
}

/// Advance the scene by `elapsed` seconds
pub fn step(scene: &mut Scene, elapsed: f32) -> StepReport {
    let elapsed = elapsed.max(0.0);
    let mut report = StepReport::default();

    scene.time_ticks += 1;

    // Update actors
    for bouncer in &mut scene.bouncers {
        bouncer.advance(elapsed);
    }
    scene.mover.rotate_by(-ROTATION_STEP);
    scene.grower.rotate_by(ROTATION_STEP);

    // Bounce off the walls
    for bouncer in &mut scene.bouncers {
        let flipped = bouncer.bounce(scene.size);
        if flipped > 0 {
            log::trace!("Bouncer {} reflected at {:?}", bouncer.id, bouncer.pos);
        }
        report.reflections += flipped;
    }

    // Shapes can be tested exactly
    report.mover_hit = scene.mover.overlaps(&scene.grower);
    scene.mover.fill = if report.mover_hit {
        colors::HIGHLIGHT
    } else {
        colors::MOVER
    };

    // Sprites only have bounding boxes
    let grower_bounds = scene.grower.bounds();
    report.grower_hit = scene
        .bouncers
        .iter()
        .any(|b| grower_bounds.intersects(&b.bounds()));
    scene.grower.fill = if report.grower_hit {
        colors::HIGHLIGHT
    } else {
        colors::GROWER
    };

    report
}

/// Nudge the Mover one step in the pressed direction
pub fn handle_key(scene: &mut Scene, key: Key) {
    let delta = match key {
        Key::Right => Vec2::new(MOVER_SPEED, 0.0),
        Key::Left => Vec2::new(-MOVER_SPEED, 0.0),
        Key::Up => Vec2::new(0.0, -MOVER_SPEED),
        Key::Down => Vec2::new(0.0, MOVER_SPEED),
        Key::Other => return,
    };
    scene.mover.pos += delta;
}

/// Grow the Grower if the click landed in its resting box. Returns whether it did.
pub fn handle_click(scene: &mut Scene, point: Vec2) -> bool {
    if !scene.grower.contains(point) {
        return false;
    }
    scene.grower.scale *= GROWER_RATE;
    log::debug!("Grower scaled to {:?}", scene.grower.scale);
    true
}

/// Drain pending input into the scene
pub fn apply_input(scene: &mut Scene, input: &mut FrameInput) {
    for event in input.events.drain(..) {
        match event {
            InputEvent::KeyPressed(key) => handle_key(scene, key),
            InputEvent::Clicked(point) => {
                handle_click(scene, point);
            }
        }
    }
}

/// Apply pending input, then run one step
pub fn tick(scene: &mut Scene, input: &mut FrameInput, elapsed: f32) -> StepReport {
    apply_input(scene, input);
    let report = step(scene, elapsed);
    log::debug!(
        "tick {}: {} reflections, mover_hit={}, grower_hit={}",
        scene.time_ticks,
        report.reflections,
        report.mover_hit,
        report.grower_hit
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::spawn::{SpawnConfig, Variant, setup_scene};
    use crate::sim::state::Bouncer;
    use proptest::prelude::*;

    fn empty_scene() -> Scene {
        Scene::new(1, Variant::First, Vec2::splat(SIZE))
    }

    #[test]
    fn test_step_reflects_example() {
        let mut scene = empty_scene();
        scene.bouncers.push(Bouncer::new(
            1,
            Vec2::new(395.0, 100.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(10.0, 0.0),
        ));
        let report = step(&mut scene, 0.1);
        assert!((scene.bouncers[0].pos.x - 396.0).abs() < 1e-4);
        assert_eq!(scene.bouncers[0].vel.x, -10.0);
        assert_eq!(report.reflections, 1);
    }

    #[test]
    fn test_stuck_bouncer_flips_every_frame() {
        // Still past the wall after flipping, so the sign keeps alternating
        let mut scene = empty_scene();
        scene.bouncers.push(Bouncer::new(
            1,
            Vec2::new(395.0, 100.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(10.0, 0.0),
        ));
        let expected = [(396.0, -10.0), (395.0, 10.0), (396.0, -10.0), (395.0, 10.0)];
        for (x, vx) in expected {
            let report = step(&mut scene, 0.1);
            assert!((scene.bouncers[0].pos.x - x).abs() < 1e-3);
            assert_eq!(scene.bouncers[0].vel.x, vx);
            assert_eq!(report.reflections, 1);
        }
    }

    #[test]
    fn test_step_spins_shapes() {
        let mut scene = empty_scene();
        step(&mut scene, SECOND_DELAY);
        assert_eq!(scene.mover.rotation, 359.0);
        assert_eq!(scene.grower.rotation, 1.0);
        assert_eq!(scene.time_ticks, 1);
    }

    #[test]
    fn test_mover_highlight_on_overlap() {
        let mut scene = empty_scene();
        step(&mut scene, SECOND_DELAY);
        assert!(!scene.mover_highlighted());

        // Drive the mover down onto the grower
        for _ in 0..30 {
            handle_key(&mut scene, Key::Down);
        }
        let report = step(&mut scene, SECOND_DELAY);
        assert!(report.mover_hit);
        assert!(scene.mover_highlighted());

        // And back off again
        for _ in 0..30 {
            handle_key(&mut scene, Key::Up);
        }
        step(&mut scene, SECOND_DELAY);
        assert_eq!(scene.mover.fill, colors::MOVER);
    }

    #[test]
    fn test_grower_highlight_any_bouncer() {
        let mut scene = empty_scene();
        let far = Bouncer::new(1, Vec2::new(0.0, 0.0), Vec2::splat(10.0), Vec2::ZERO);
        let near = Bouncer::new(2, Vec2::new(180.0, 260.0), Vec2::splat(10.0), Vec2::ZERO);
        scene.bouncers.push(far);
        let report = step(&mut scene, SECOND_DELAY);
        assert!(!report.grower_hit);
        assert_eq!(scene.grower.fill, colors::GROWER);

        scene.bouncers.push(near);
        let report = step(&mut scene, SECOND_DELAY);
        assert!(report.grower_hit);
        assert!(scene.grower_highlighted());
    }

    #[test]
    fn test_handle_key_directions() {
        let mut scene = empty_scene();
        let start = scene.mover.pos;
        handle_key(&mut scene, Key::Right);
        handle_key(&mut scene, Key::Right);
        handle_key(&mut scene, Key::Up);
        handle_key(&mut scene, Key::Other);
        assert_eq!(scene.mover.pos, start + Vec2::new(10.0, -5.0));
        handle_key(&mut scene, Key::Left);
        handle_key(&mut scene, Key::Down);
        assert_eq!(scene.mover.pos, start + Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_three_clicks_compound() {
        let mut scene = empty_scene();
        let center = scene.grower.center();
        for _ in 0..3 {
            assert!(handle_click(&mut scene, center));
        }
        let expected = 1.1f32.powi(3);
        assert!((scene.grower.scale.x - expected).abs() < 1e-5);
        assert!((scene.grower.scale.y - expected).abs() < 1e-5);
    }

    #[test]
    fn test_click_outside_ignored() {
        let mut scene = empty_scene();
        assert!(!handle_click(&mut scene, Vec2::new(5.0, 5.0)));
        assert_eq!(scene.grower.scale, Vec2::ONE);
    }

    #[test]
    fn test_click_ignores_grower_transform() {
        let mut scene = empty_scene();
        let center = scene.grower.center();
        for _ in 0..3 {
            assert!(handle_click(&mut scene, center));
        }
        // Grown to 1.331x, but the hit area is still the 175..225 x 250..300 box
        let past_edge = Vec2::new(228.0, 275.0);
        assert!(!handle_click(&mut scene, past_edge));

        // Spun 45 degrees, the corners of the resting box still register
        scene.grower.rotation = 45.0;
        let corner = Vec2::new(177.0, 252.0);
        assert!(handle_click(&mut scene, corner));
        assert!((scene.grower.scale.x - 1.1f32.powi(4)).abs() < 1e-5);
    }

    #[test]
    fn test_apply_input_order_and_drain() {
        let mut scene = empty_scene();
        let mut input = FrameInput::default();
        input.push_key(Key::Down);
        input.push_click(scene.grower.center());
        input.push_key(Key::Left);
        let start = scene.mover.pos;
        let report = tick(&mut scene, &mut input, SECOND_DELAY);
        assert!(input.is_empty());
        assert_eq!(scene.mover.pos, start + Vec2::new(-5.0, 5.0));
        assert!((scene.grower.scale.x - 1.1).abs() < 1e-6);
        assert_eq!(report.reflections, 0);
    }

    #[test]
    fn test_step_never_adds_entities() {
        let config = SpawnConfig {
            variant: Variant::Third,
            ..Default::default()
        };
        let mut scene = setup_scene(&config, Ok(Vec2::splat(16.0)), 77).unwrap();
        let count = scene.bouncers.len();
        for _ in 0..600 {
            step(&mut scene, SECOND_DELAY);
        }
        assert_eq!(scene.bouncers.len(), count);
    }

    #[test]
    fn test_bouncers_stay_near_walls() {
        // Reflection is corrective: escapes never exceed one step of motion
        let config = SpawnConfig {
            variant: Variant::Second,
            ..Default::default()
        };
        let mut scene = setup_scene(&config, Ok(Vec2::splat(16.0)), 5).unwrap();
        let max_step = 150.0 * SECOND_DELAY;
        for _ in 0..1200 {
            step(&mut scene, SECOND_DELAY);
            for b in &scene.bouncers {
                assert!(b.pos.x >= -2.0 * max_step);
                assert!(b.pos.y >= -2.0 * max_step);
                assert!(b.pos.x + b.size.x <= SIZE + 2.0 * max_step);
                assert!(b.pos.y + b.size.y <= SIZE + 2.0 * max_step);
            }
        }
    }

    #[test]
    fn test_determinism() {
        let config = SpawnConfig {
            variant: Variant::Second,
            ..Default::default()
        };
        let mut a = setup_scene(&config, Ok(Vec2::splat(16.0)), 99999).unwrap();
        let mut b = setup_scene(&config, Ok(Vec2::splat(16.0)), 99999).unwrap();

        for i in 0..240 {
            let mut input_a = FrameInput::default();
            if i % 20 == 0 {
                input_a.push_key(Key::Down);
                input_a.push_click(a.grower.center());
            }
            let mut input_b = input_a.clone();
            tick(&mut a, &mut input_a, SECOND_DELAY);
            tick(&mut b, &mut input_b, SECOND_DELAY);
        }

        assert_eq!(a.bouncers, b.bouncers);
        assert_eq!(a.mover.pos, b.mover.pos);
        assert_eq!(a.grower.scale, b.grower.scale);
        assert_eq!(a.grower.fill, b.grower.fill);
    }

    proptest! {
        #[test]
        fn prop_motion_is_linear(
            x in 50.0f32..300.0,
            y in 50.0f32..300.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
            dt in 0.0f32..0.2,
        ) {
            let mut scene = empty_scene();
            let bouncer = Bouncer::new(1, Vec2::new(x, y), Vec2::splat(10.0), Vec2::new(vx, vy));
            scene.bouncers.push(bouncer);
            step(&mut scene, dt);
            let b = &scene.bouncers[0];
            prop_assert!((b.pos.x - (x + vx * dt)).abs() < 1e-3);
            prop_assert!((b.pos.y - (y + vy * dt)).abs() < 1e-3);
        }

        #[test]
        fn prop_reflection_conserves_speed(
            x in -50.0f32..450.0,
            y in -50.0f32..450.0,
            vx in -200.0f32..200.0,
            vy in -200.0f32..200.0,
        ) {
            let mut scene = empty_scene();
            let bouncer = Bouncer::new(1, Vec2::new(x, y), Vec2::splat(20.0), Vec2::new(vx, vy));
            scene.bouncers.push(bouncer);
            step(&mut scene, SECOND_DELAY);
            let v = scene.bouncers[0].vel;
            prop_assert_eq!(v.x.abs(), vx.abs());
            prop_assert_eq!(v.y.abs(), vy.abs());
        }

        #[test]
        fn prop_mover_highlight_ignores_history(
            dx in -40i32..40,
            dy in -40i32..40,
            warmup in 0usize..30,
        ) {
            // Two scenes reaching the same geometry by different paths agree
            let mut direct = empty_scene();
            let mut wandering = empty_scene();
            for _ in 0..warmup {
                handle_key(&mut wandering, Key::Down);
                step(&mut wandering, SECOND_DELAY);
            }
            for _ in 0..warmup {
                handle_key(&mut wandering, Key::Up);
            }
            direct.mover.rotation = wandering.mover.rotation;
            direct.grower.rotation = wandering.grower.rotation;

            let offset = Vec2::new(dx as f32 * 5.0, dy as f32 * 5.0);
            direct.mover.pos += offset;
            wandering.mover.pos += offset;
            step(&mut direct, SECOND_DELAY);
            step(&mut wandering, SECOND_DELAY);
            prop_assert_eq!(direct.mover_highlighted(), wandering.mover_highlighted());
        }
    }
}
