//! Rectangle geometry for the Mover and Grower
//!
//! A rectangle is stored untransformed (top-left corner + size) together with
//! a rotation (degrees) and a per-axis scale. Both transforms pivot on the
//! rectangle's centre, so the centre never moves when the shape spins or grows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::colors::Rgba;
use crate::{normalize_degrees, rotate_degrees};

/// Intersections with less area than this count as touching, not overlapping
pub const AREA_EPSILON: f32 = 1e-3;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Smallest box enclosing all points
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for &p in points {
            min = min.min(p);
            max = max.max(p);
        }
        Self { min, max }
    }

    /// Overlap test with inclusive edges (boxes that only touch still intersect)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// A filled rectangle that can rotate and scale about its centre
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectShape {
    /// Top-left corner before transforms
    pub pos: Vec2,
    pub size: Vec2,
    /// Rotation in degrees, clockwise on screen
    pub rotation: f32,
    pub scale: Vec2,
    pub fill: Rgba,
}

impl RectShape {
    pub fn new(pos: Vec2, size: Vec2, fill: Rgba) -> Self {
        Self {
            pos,
            size,
            rotation: 0.0,
            scale: Vec2::ONE,
            fill,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(self.rotation + degrees);
    }

    /// Corners after scale and rotation, in winding order
    /// (top-left, top-right, bottom-right, bottom-left of the local box)
    pub fn corners(&self) -> [Vec2; 4] {
        let c = self.center();
        let half = self.size * self.scale * 0.5;
        [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ]
        .map(|local| c + rotate_degrees(local, self.rotation))
    }

    /// Axis-aligned bounds of the transformed rectangle
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.corners())
    }

    /// The untransformed box (position and size, ignoring rotation and scale)
    pub fn local_bounds(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }

    /// Point test against the local box. Rotation and scale are ignored, so a
    /// spun or grown shape keeps the hit area it had at rest.
    pub fn contains(&self, p: Vec2) -> bool {
        self.local_bounds().contains(p)
    }

    /// Exact overlap area with another rectangle
    pub fn intersection_area(&self, other: &RectShape) -> f32 {
        polygon_area(&clip_convex(&self.corners(), &other.corners()))
    }

    /// True when the two shapes share a non-degenerate region
    pub fn overlaps(&self, other: &RectShape) -> bool {
        self.intersection_area(other) > AREA_EPSILON
    }
}

/// Signed shoelace area (positive for counter-clockwise in y-up terms)
fn signed_area(poly: &[Vec2]) -> f32 {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        sum += a.perp_dot(b);
    }
    sum * 0.5
}

/// Unsigned polygon area
pub fn polygon_area(poly: &[Vec2]) -> f32 {
    signed_area(poly).abs()
}

/// Clip a convex `subject` polygon against a convex `clip` polygon
/// (Sutherland-Hodgman). Either winding is accepted for `clip`.
pub fn clip_convex(subject: &[Vec2], clip: &[Vec2]) -> Vec<Vec2> {
    let winding = signed_area(clip).signum();
    if winding == 0.0 {
        return Vec::new();
    }

    let mut output = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let edge = b - a;
        let inside = |p: Vec2| edge.perp_dot(p - a) * winding >= 0.0;

        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let cur = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            match (inside(prev), inside(cur)) {
                (true, true) => output.push(cur),
                (true, false) => output.extend(edge_crossing(prev, cur, a, edge)),
                (false, true) => {
                    output.extend(edge_crossing(prev, cur, a, edge));
                    output.push(cur);
                }
                (false, false) => {}
            }
        }
    }
    output
}

/// Point where segment p→q crosses the line through `a` along `edge`
fn edge_crossing(p: Vec2, q: Vec2, a: Vec2, edge: Vec2) -> Option<Vec2> {
    let denom = edge.perp_dot(q - p);
    if denom.abs() < f32::EPSILON {
        return None;
    }
    let t = edge.perp_dot(a - p) / denom;
    Some(p + (q - p) * t)
}
