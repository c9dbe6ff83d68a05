// Convex shapes and separating-axis intersection tests.

use glam::Vec2;

/// Convex polygon in world space. Two points make a segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Polygon {
    /// Places local-space points at `pos`, rotated by `heading` radians.
    pub fn from_local(local: &[Vec2], pos: Vec2, heading: f32) -> Self {
        let rot = Vec2::from_angle(heading);
        Self {
            points: local.iter().map(|p| pos + rot.rotate(*p)).collect(),
        }
    }

    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self { points: vec![a, b] }
    }

    /// Unit normals of every edge. A segment yields its single normal.
    fn axes(&self) -> impl Iterator<Item = Vec2> + '_ {
        let n = self.points.len();
        let edges = if n == 2 { 1 } else { n };
        (0..edges).filter_map(move |i| {
            let edge = self.points[(i + 1) % n] - self.points[i];
            let normal = edge.perp().normalize_or_zero();
            (normal != Vec2::ZERO).then_some(normal)
        })
    }

    fn project(&self, axis: Vec2) -> (f32, f32) {
        self.points
            .iter()
            .map(|p| p.dot(axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
                (lo.min(d), hi.max(d))
            })
    }
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    fn project(&self, axis: Vec2) -> (f32, f32) {
        let c = self.center.dot(axis);
        (c - self.radius, c + self.radius)
    }
}

fn disjoint((a_lo, a_hi): (f32, f32), (b_lo, b_hi): (f32, f32)) -> bool {
    a_hi < b_lo || b_hi < a_lo
}

/// Touching counts as intersecting.
pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    if a.points.is_empty() || b.points.is_empty() {
        return false;
    }
    !a.axes()
        .chain(b.axes())
        .any(|axis| disjoint(a.project(axis), b.project(axis)))
}

pub fn polygon_intersects_circle(poly: &Polygon, circle: &Circle) -> bool {
    let Some(closest) = poly
        .points
        .iter()
        .copied()
        .min_by(|p, q| {
            p.distance_squared(circle.center)
                .total_cmp(&q.distance_squared(circle.center))
        })
    else {
        return false;
    };

    // Vertex-region axis covers the case where no edge normal separates.
    let vertex_axis = (circle.center - closest).normalize_or_zero();
    let extra = (vertex_axis != Vec2::ZERO).then_some(vertex_axis);

    !poly
        .axes()
        .chain(extra)
        .any(|axis| disjoint(poly.project(axis), circle.project(axis)))
}
