//! Scene setup and randomized bouncer initialization
//!
//! The three lab variants differ only in how bouncers get their size and
//! velocity. All draws come from a seeded `Pcg32` so a seed reproduces a scene.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::state::{Bouncer, Scene};
use crate::consts::*;
use crate::resources::ResourceError;

/// Which revision of the lab to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Sprite-sized bouncers at a fixed speed; a missing sprite is ignored
    #[default]
    First,
    /// Random size, velocity from a positive/negative range pair
    Second,
    /// Random size, random magnitude with a coin-flip sign
    Third,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::First => "first",
            Variant::Second => "second",
            Variant::Third => "third",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1" | "first" => Some(Variant::First),
            "2" | "second" => Some(Variant::Second),
            "3" | "third" => Some(Variant::Third),
            _ => None,
        }
    }

    /// Whether setup may continue without the sprite image
    pub fn tolerates_missing_sprite(&self) -> bool {
        matches!(self, Variant::First)
    }
}

/// Integer range used by the biased draw (see [`biased_int`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn is_empty(&self) -> bool {
        self.max <= self.min
    }
}

/// Everything that decides what bouncers get spawned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub variant: Variant,
    pub bouncer_count: usize,
    /// Square side length (variants 2 and 3)
    pub size_range: IntRange,
    /// Positive per-axis speed range, mirrored for negative draws (variant 2)
    pub speed_range: IntRange,
    /// Per-axis speed magnitude before the sign flip (variant 3)
    pub speed_magnitude: IntRange,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            variant: Variant::First,
            bouncer_count: NUM_BOUNCERS,
            size_range: IntRange::new(8, 40),
            speed_range: IntRange::new(10, 150),
            speed_magnitude: IntRange::new(40, 150),
        }
    }
}

impl SpawnConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.bouncer_count == 0 {
            return Err(SetupError::InvalidConfig("bouncer_count must be positive".into()));
        }
        let ranges = [
            ("size_range", self.size_range),
            ("speed_range", self.speed_range),
            ("speed_magnitude", self.speed_magnitude),
        ];
        for (name, range) in ranges {
            if range.is_empty() {
                return Err(SetupError::InvalidConfig(format!(
                    "{name} is empty ({}..{})",
                    range.min, range.max
                )));
            }
        }
        if self.size_range.min < 0 {
            return Err(SetupError::InvalidConfig("size_range must not be negative".into()));
        }
        if self.speed_range.min < 1 {
            return Err(SetupError::InvalidConfig("speed_range must be positive".into()));
        }
        if self.speed_magnitude.min < 0 {
            return Err(SetupError::InvalidConfig(
                "speed_magnitude must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Errors that stop a scene from being built
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("bouncer sprite unavailable: {0}")]
    MissingSprite(#[source] ResourceError),
    #[error("invalid settings: {0}")]
    InvalidConfig(String),
}

/// `min + uniform[0, max - min) + 1`, i.e. uniform over `[min + 1, max]`.
///
/// Never returns `min`. An empty range (`max <= min`) yields `max`.
pub fn biased_int<R: Rng>(rng: &mut R, min: i32, max: i32) -> i32 {
    if max <= min {
        return max;
    }
    let span = max as i64 - min as i64;
    (min as i64 + rng.random_range(0..span) + 1) as i32
}

/// Magnitude from `range`, negated on a fair coin flip
pub fn signed_magnitude<R: Rng>(rng: &mut R, range: IntRange) -> i32 {
    let magnitude = biased_int(rng, range.min, range.max);
    if rng.random_bool(0.5) { -magnitude } else { magnitude }
}

/// Draw from `range` or its mirror `[-max, -min]`, picked by a fair coin.
///
/// Both sides go through [`biased_int`], so positive draws land in
/// `[min + 1, max]` and negative ones in `[1 - max, -min]`. Zero needs
/// `min < 1`, which [`SpawnConfig::validate`] rejects.
pub fn mirrored_range<R: Rng>(rng: &mut R, range: IntRange) -> i32 {
    if rng.random_bool(0.5) {
        biased_int(rng, -range.max, -range.min)
    } else {
        biased_int(rng, range.min, range.max)
    }
}

/// Create `config.bouncer_count` bouncers that start fully inside the scene
pub fn spawn_bouncers<R: Rng>(
    rng: &mut R,
    config: &SpawnConfig,
    sprite_size: Vec2,
    scene_size: Vec2,
) -> Vec<Bouncer> {
    (0..config.bouncer_count)
        .map(|i| {
            let size = match config.variant {
                Variant::First => sprite_size,
                Variant::Second | Variant::Third => {
                    let side = biased_int(rng, config.size_range.min, config.size_range.max);
                    Vec2::splat(side as f32)
                }
            };

            let pos = Vec2::new(
                biased_int(rng, 0, (scene_size.x - size.x) as i32) as f32,
                biased_int(rng, 0, (scene_size.y - size.y) as i32) as f32,
            );

            let vel = match config.variant {
                Variant::First => Vec2::splat(BOUNCER_SPEED),
                Variant::Second => Vec2::new(
                    mirrored_range(rng, config.speed_range) as f32,
                    mirrored_range(rng, config.speed_range) as f32,
                ),
                Variant::Third => Vec2::new(
                    signed_magnitude(rng, config.speed_magnitude) as f32,
                    signed_magnitude(rng, config.speed_magnitude) as f32,
                ),
            };

            Bouncer::new(i as u32 + 1, pos, size, vel)
        })
        .collect()
}

/// Build the starting scene.
///
/// `sprite_size` is the natural size of the bouncer image, or the error from
/// loading it. The first variant carries on without bouncers when the image
/// is missing; the others refuse to start.
pub fn setup_scene(
    config: &SpawnConfig,
    sprite_size: Result<Vec2, ResourceError>,
    seed: u64,
) -> Result<Scene, SetupError> {
    config.validate()?;

    let mut scene = Scene::new(seed, config.variant, Vec2::splat(SIZE));
    let mut rng = Pcg32::seed_from_u64(seed);

    match sprite_size {
        Ok(sprite_size) => {
            scene.bouncers = spawn_bouncers(&mut rng, config, sprite_size, scene.size);
        }
        Err(err) if config.variant.tolerates_missing_sprite() => {
            log::debug!("Continuing without bouncers: {}", err);
        }
        Err(err) => return Err(SetupError::MissingSprite(err)),
    }

    log::info!(
        "Scene ready: variant {}, {} bouncers, seed {}",
        config.variant.as_str(),
        scene.bouncers.len(),
        seed
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing() -> ResourceError {
        ResourceError::Io {
            path: BOUNCER_IMAGE.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
    }

    #[test]
    fn test_biased_int_never_returns_min() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..2000 {
            let v = biased_int(&mut rng, 3, 6);
            assert!((4..=6).contains(&v), "got {v}");
        }
    }

    #[test]
    fn test_biased_int_hits_max() {
        let mut rng = Pcg32::seed_from_u64(11);
        assert!((0..500).any(|_| biased_int(&mut rng, 0, 3) == 3));
    }

    #[test]
    fn test_biased_int_empty_range() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(biased_int(&mut rng, 5, 5), 5);
        assert_eq!(biased_int(&mut rng, 9, 2), 2);
    }

    #[test]
    fn test_signed_magnitude_uses_both_signs() {
        let mut rng = Pcg32::seed_from_u64(3);
        let draws: Vec<i32> = (0..200)
            .map(|_| signed_magnitude(&mut rng, IntRange::new(40, 150)))
            .collect();
        assert!(draws.iter().any(|&v| v < 0));
        assert!(draws.iter().any(|&v| v > 0));
        assert!(draws.iter().all(|v| (41..=150).contains(&v.abs())));
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!(Variant::parse("2"), Some(Variant::Second));
        assert_eq!(Variant::parse(" Third "), Some(Variant::Third));
        assert_eq!(Variant::parse("fourth"), None);
    }

    #[test]
    fn test_first_variant_uses_sprite_size() {
        let config = SpawnConfig::default();
        let scene = setup_scene(&config, Ok(Vec2::new(20.0, 16.0)), 42).unwrap();
        assert_eq!(scene.bouncers.len(), NUM_BOUNCERS);
        for b in &scene.bouncers {
            assert_eq!(b.size, Vec2::new(20.0, 16.0));
            assert_eq!(b.vel, Vec2::splat(BOUNCER_SPEED));
        }
        assert_eq!(scene.escaped_bouncers(), 0);
    }

    #[test]
    fn test_first_variant_swallows_missing_sprite() {
        let scene = setup_scene(&SpawnConfig::default(), Err(missing()), 42).unwrap();
        assert!(scene.bouncers.is_empty());
    }

    #[test]
    fn test_later_variants_fail_without_sprite() {
        for variant in [Variant::Second, Variant::Third] {
            let config = SpawnConfig {
                variant,
                ..Default::default()
            };
            let err = setup_scene(&config, Err(missing()), 42).unwrap_err();
            assert!(matches!(err, SetupError::MissingSprite(_)));
        }
    }

    #[test]
    fn test_second_variant_ranges() {
        let config = SpawnConfig {
            variant: Variant::Second,
            ..Default::default()
        };
        let scene = setup_scene(&config, Ok(Vec2::splat(20.0)), 9).unwrap();
        for b in &scene.bouncers {
            assert_eq!(b.size.x, b.size.y);
            assert!((9.0..=40.0).contains(&b.size.x));
            for v in [b.vel.x, b.vel.y] {
                assert!((11.0..=150.0).contains(&v) || (-149.0..=-10.0).contains(&v), "{v}");
            }
        }
        assert_eq!(scene.escaped_bouncers(), 0);
    }

    #[test]
    fn test_second_variant_never_stalls() {
        let config = SpawnConfig {
            variant: Variant::Second,
            ..Default::default()
        };
        let mut negatives = 0;
        for seed in 0..200 {
            let scene = setup_scene(&config, Ok(Vec2::splat(20.0)), seed).unwrap();
            for b in &scene.bouncers {
                assert_ne!(b.vel.x, 0.0, "seed {seed} bouncer {}", b.id);
                assert_ne!(b.vel.y, 0.0, "seed {seed} bouncer {}", b.id);
                negatives += (b.vel.x < 0.0) as u32;
            }
        }
        assert!(negatives > 0);
    }

    #[test]
    fn test_mirrored_range_tight_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let draws: Vec<i32> = (0..500)
            .map(|_| mirrored_range(&mut rng, IntRange::new(1, 2)))
            .collect();
        assert!(draws.iter().all(|&v| v == 2 || v == -1));
        assert!(draws.contains(&2));
        assert!(draws.contains(&-1));
    }

    #[test]
    fn test_third_variant_magnitudes() {
        let config = SpawnConfig {
            variant: Variant::Third,
            ..Default::default()
        };
        let scene = setup_scene(&config, Ok(Vec2::splat(20.0)), 9).unwrap();
        for b in &scene.bouncers {
            assert!((41.0..=150.0).contains(&b.vel.x.abs()));
            assert!((41.0..=150.0).contains(&b.vel.y.abs()));
        }
    }

    #[test]
    fn test_same_seed_same_scene() {
        let config = SpawnConfig {
            variant: Variant::Third,
            ..Default::default()
        };
        let a = setup_scene(&config, Ok(Vec2::splat(20.0)), 1234).unwrap();
        let b = setup_scene(&config, Ok(Vec2::splat(20.0)), 1234).unwrap();
        assert_eq!(a.bouncers, b.bouncers);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SpawnConfig {
            bouncer_count: 0,
            ..Default::default()
        };
        assert!(matches!(
            setup_scene(&config, Ok(Vec2::ONE), 1),
            Err(SetupError::InvalidConfig(_))
        ));

        let config = SpawnConfig {
            speed_magnitude: IntRange::new(10, 10),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SpawnConfig {
            speed_range: IntRange::new(0, 150),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
