//! Extruded text geometry. Glyph outlines are flattened into closed contours,
//! the front and back caps are filled with lyon, and the sides are walled
//! through a ring profile that optionally rounds off into a bevel.

use std::f32::consts::FRAC_PI_2;

use ab_glyph::{Font, OutlineCurve};
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use lyon::lyon_tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use lyon::math::point;
use lyon::path::PathEvent;

use crate::core::error::BalloonError;

const EPS: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bevel {
    pub thickness: f32,
    pub size: f32,
    pub segments: u32,
}

/// Shape parameters of the extruded text, in scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    /// Em size.
    pub size: f32,
    pub depth: f32,
    pub curve_segments: u32,
    pub bevel: Option<Bevel>,
}

/// Closed polyline, y up. The closing edge from the last point back to the
/// first is implicit.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub points: Vec<Vec2>,
    /// Filled area lies to the left of the direction of travel.
    pub fill_left: bool,
}

impl Contour {
    fn edge_outward(&self, i: usize) -> Vec2 {
        let a = self.points[i];
        let b = self.points[(i + 1) % self.points.len()];
        let d = (b - a).normalize_or_zero();
        if self.fill_left {
            Vec2::new(d.y, -d.x)
        } else {
            Vec2::new(-d.y, d.x)
        }
    }

    /// Per-vertex offset direction for growing the contour by one unit.
    fn miters(&self) -> Vec<Vec2> {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let before = self.edge_outward((i + n - 1) % n);
                let after = self.edge_outward(i);
                let sum = before + after;
                if sum.length_squared() < EPS {
                    return after;
                }
                let m = sum.normalize();
                m / m.dot(after).max(0.25)
            })
            .collect()
    }
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn quad_point(p0: Vec2, p1: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Split one glyph's curve list into closed polylines. A curve that does not
/// start where the previous one ended opens a new contour.
fn flatten_outline(curves: &[OutlineCurve], segments: u32) -> Vec<Vec<Vec2>> {
    let v = |p: ab_glyph::Point| Vec2::new(p.x, p.y);
    let steps = segments.max(1);
    let mut contours = Vec::new();
    let mut current: Vec<Vec2> = Vec::new();

    for curve in curves {
        let start = match curve {
            OutlineCurve::Line(p0, _) | OutlineCurve::Quad(p0, _, _) | OutlineCurve::Cubic(p0, _, _, _) => {
                v(*p0)
            }
        };
        match current.last() {
            Some(last) if last.distance_squared(start) > EPS => {
                contours.push(std::mem::take(&mut current));
                current.push(start);
            }
            Some(_) => {}
            None => current.push(start),
        }
        match curve {
            OutlineCurve::Line(_, p1) => current.push(v(*p1)),
            OutlineCurve::Quad(p0, p1, p2) => {
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    current.push(quad_point(v(*p0), v(*p1), v(*p2), t));
                }
            }
            OutlineCurve::Cubic(p0, p1, p2, p3) => {
                for i in 1..=steps {
                    let t = i as f32 / steps as f32;
                    current.push(cubic_point(v(*p0), v(*p1), v(*p2), v(*p3), t));
                }
            }
        }
    }
    contours.push(current);

    contours
        .into_iter()
        .filter_map(|mut pts| {
            pts.dedup_by(|a, b| a.distance_squared(*b) <= EPS);
            if pts.len() > 1 && pts[0].distance_squared(pts[pts.len() - 1]) <= EPS {
                pts.pop();
            }
            (pts.len() >= 3 && signed_area(&pts).abs() > EPS).then_some(pts)
        })
        .collect()
}

/// Lay `text` out on one line and return its glyph contours scaled so one em
/// is `size` units. The baseline sits at y = 0.
pub fn text_contours<F: Font>(
    font: &F,
    text: &str,
    size: f32,
    curve_segments: u32,
) -> Result<Vec<Contour>, BalloonError> {
    let scale = size / font.units_per_em().unwrap_or(1000.0);
    let mut out = Vec::new();
    let mut caret = 0.0f32;
    let mut previous = None;

    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret += font.kern_unscaled(prev, id);
        }
        previous = Some(id);
        let Some(outline) = font.outline(id) else {
            caret += font.h_advance_unscaled(id);
            continue;
        };
        let glyph: Vec<Vec<Vec2>> = flatten_outline(&outline.curves, curve_segments)
            .into_iter()
            .map(|pts| {
                pts.into_iter()
                    .map(|p| Vec2::new(p.x + caret, p.y) * scale)
                    .collect()
            })
            .collect();
        // Outer contours dominate the total area, so its sign tells which
        // side the font fills on.
        let fill_left = glyph.iter().map(|c| signed_area(c)).sum::<f32>() > 0.0;
        out.extend(glyph.into_iter().map(|points| Contour { points, fill_left }));
        caret += font.h_advance_unscaled(id);
    }

    if out.is_empty() {
        return Err(BalloonError::EmptyText(text.to_string()));
    }
    Ok(out)
}

/// Triangle list for the extruded text. Origin at the bottom-left back corner
/// of the bounding box, extending to `+x`, `+y` and `+z`.
#[derive(Debug, Clone, Default)]
pub struct ExtrudedMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub size: Vec3,
}

impl ExtrudedMesh {
    fn quad(&mut self, corners: [Vec3; 4], fallback: Vec3) {
        let normal = (corners[1] - corners[0])
            .cross(corners[2] - corners[0])
            .try_normalize()
            .or_else(|| (corners[2] - corners[0]).cross(corners[3] - corners[0]).try_normalize())
            .unwrap_or(fallback);
        let base = self.positions.len() as u32;
        self.positions.extend(corners.iter().map(|c| c.to_array()));
        self.normals.extend_from_slice(&[normal.to_array(); 4]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn recenter(&mut self) {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in &self.positions {
            let p = Vec3::from(*p);
            min = min.min(p);
            max = max.max(p);
        }
        if self.positions.is_empty() {
            return;
        }
        for p in &mut self.positions {
            *p = (Vec3::from(*p) - min).to_array();
        }
        self.size = max - min;
    }

    pub fn into_mesh(self) -> Mesh {
        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
            .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// `(z, outward offset)` rings from the back cap to the front cap.
fn ring_profile(depth: f32, bevel: Option<Bevel>) -> Vec<(f32, f32)> {
    let Some(b) = bevel.filter(|b| b.thickness > 0.0 || b.size > 0.0) else {
        return vec![(0.0, 0.0), (depth.max(0.0), 0.0)];
    };
    let segs = b.segments.max(1);
    let total = depth.max(0.0) + 2.0 * b.thickness;
    let back: Vec<(f32, f32)> = (0..=segs)
        .map(|k| {
            let a = k as f32 / segs as f32 * FRAC_PI_2;
            (b.thickness * (1.0 - a.cos()), b.size * a.sin())
        })
        .collect();
    let front = back.iter().rev().map(|&(z, off)| (total - z, off));
    back.iter().copied().chain(front).collect()
}

/// Fill the contours with the non-zero rule. Returns 2D vertices and
/// counter-clockwise triangles.
fn fill_caps(contours: &[Contour]) -> Result<(Vec<Vec2>, Vec<[u32; 3]>), BalloonError> {
    let mut events = Vec::new();
    for c in contours {
        let first = point(c.points[0].x, c.points[0].y);
        events.push(PathEvent::Begin { at: first });
        for pair in c.points.windows(2) {
            events.push(PathEvent::Line {
                from: point(pair[0].x, pair[0].y),
                to: point(pair[1].x, pair[1].y),
            });
        }
        let last = c.points[c.points.len() - 1];
        events.push(PathEvent::End {
            last: point(last.x, last.y),
            first,
            close: true,
        });
    }

    let mut geometry: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    let options = FillOptions::default().with_fill_rule(FillRule::NonZero);
    tessellator
        .tessellate(
            events.iter().cloned(),
            &options,
            &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| {
                Vec2::new(vertex.position().x, vertex.position().y)
            }),
        )
        .map_err(|e| BalloonError::Tessellation(format!("{e:?}")))?;

    let verts = geometry.vertices;
    let tris = geometry
        .indices
        .chunks_exact(3)
        .map(|t| {
            let (a, b, c) = (verts[t[0] as usize], verts[t[1] as usize], verts[t[2] as usize]);
            if (b - a).perp_dot(c - a) < 0.0 {
                [t[0], t[2], t[1]]
            } else {
                [t[0], t[1], t[2]]
            }
        })
        .collect();
    Ok((verts, tris))
}

pub fn extrude_contours(contours: &[Contour], depth: f32, bevel: Option<Bevel>) -> Result<ExtrudedMesh, BalloonError> {
    let mut out = ExtrudedMesh::default();
    if contours.is_empty() {
        return Ok(out);
    }
    let profile = ring_profile(depth, bevel);
    let front_z = profile.last().map(|r| r.0).unwrap_or(0.0);

    let (verts, tris) = fill_caps(contours)?;
    for (z, normal, flip) in [(front_z, Vec3::Z, false), (0.0, Vec3::NEG_Z, true)] {
        let base = out.positions.len() as u32;
        out.positions.extend(verts.iter().map(|v| [v.x, v.y, z]));
        out.normals.extend(std::iter::repeat(normal.to_array()).take(verts.len()));
        for t in &tris {
            let t = if flip { [t[0], t[2], t[1]] } else { *t };
            out.indices.extend(t.iter().map(|i| base + i));
        }
    }

    for contour in contours {
        let miters = contour.miters();
        let n = contour.points.len();
        let ring = |i: usize, (z, off): (f32, f32)| {
            let p = contour.points[i] + miters[i] * off;
            Vec3::new(p.x, p.y, z)
        };
        for i in 0..n {
            let j = (i + 1) % n;
            if contour.points[i].distance_squared(contour.points[j]) <= EPS {
                continue;
            }
            let outward = contour.edge_outward(i).extend(0.0);
            for pair in profile.windows(2) {
                let (lo, hi) = (pair[0], pair[1]);
                let corners = [ring(i, lo), ring(j, lo), ring(j, hi), ring(i, hi)];
                // Walking the edge then up +z winds towards the right-hand side.
                let corners = if contour.fill_left {
                    corners
                } else {
                    [corners[1], corners[0], corners[3], corners[2]]
                };
                out.quad(corners, outward);
            }
        }
    }

    out.recenter();
    Ok(out)
}

/// Contours and extrusion in one step.
pub fn build_text_mesh<F: Font>(font: &F, text: &str, settings: &ExtrudeSettings) -> Result<ExtrudedMesh, BalloonError> {
    let contours = text_contours(font, text, settings.size, settings.curve_segments)?;
    extrude_contours(&contours, settings.depth, settings.bevel)
}
