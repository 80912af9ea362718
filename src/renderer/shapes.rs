//! Shape generation for 2D primitives
//!
//! Vertices come out in normalized device coordinates so the pipeline can
//! upload them untouched.

use glam::Vec2;

use super::vertex::{Vertex, linear_color};
use crate::colors::{Rgba, WHITE};
use crate::sim::{Aabb, RectShape, Scene};

/// Map scene coordinates (origin top-left, y down) to NDC (origin centre, y up)
#[inline]
pub fn scene_to_ndc(p: Vec2, scene_size: Vec2) -> Vec2 {
    Vec2::new(p.x / scene_size.x * 2.0 - 1.0, 1.0 - p.y / scene_size.y * 2.0)
}

/// Two triangles covering a quad given in winding order
pub fn quad(corners: [Vec2; 4], color: Rgba, scene_size: Vec2) -> [Vertex; 6] {
    let color = linear_color(color);
    let [a, b, c, d] = corners.map(|p| scene_to_ndc(p, scene_size));
    [
        Vertex::new(a.x, a.y, color),
        Vertex::new(b.x, b.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(a.x, a.y, color),
        Vertex::new(c.x, c.y, color),
        Vertex::new(d.x, d.y, color),
    ]
}

/// A filled (possibly rotated and scaled) rectangle
pub fn rect(shape: &RectShape, scene_size: Vec2) -> [Vertex; 6] {
    quad(shape.corners(), shape.fill, scene_size)
}

/// A textured quad stretching the whole sprite over `bounds`
pub fn sprite(bounds: &Aabb, scene_size: Vec2) -> [Vertex; 6] {
    let tint = linear_color(WHITE);
    let tl = scene_to_ndc(bounds.min, scene_size);
    let br = scene_to_ndc(bounds.max, scene_size);
    let tr = Vec2::new(br.x, tl.y);
    let bl = Vec2::new(tl.x, br.y);
    [
        Vertex::sprite(tl.x, tl.y, 0.0, 0.0, tint),
        Vertex::sprite(tr.x, tr.y, 1.0, 0.0, tint),
        Vertex::sprite(br.x, br.y, 1.0, 1.0, tint),
        Vertex::sprite(tl.x, tl.y, 0.0, 0.0, tint),
        Vertex::sprite(br.x, br.y, 1.0, 1.0, tint),
        Vertex::sprite(bl.x, bl.y, 0.0, 1.0, tint),
    ]
}

/// Everything in draw order: bouncers first, then the Mover, then the Grower
pub fn scene_vertices(scene: &Scene) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((scene.bouncers.len() + 2) * 6);
    for bouncer in &scene.bouncers {
        vertices.extend(sprite(&bouncer.bounds(), scene.size));
    }
    vertices.extend(rect(&scene.mover, scene.size));
    vertices.extend(rect(&scene.grower, scene.size));
    vertices
}
