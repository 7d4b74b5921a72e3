use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f64 {
        (*other - *self).norm()
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
            self.z + (other.z - self.z) * t,
        )
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Self::Output {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl BBox2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f64::INFINITY, f64::INFINITY),
            max: Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn include_point(&mut self, point: Vec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        (self.max.x - self.min.x).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.max.y - self.min.y).max(0.0)
    }
}

/// Piecewise-linear curve through `points`. The curve is closed when its
/// last point repeats the first one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline3 {
    pub points: Vec<Vec3>,
}

impl Polyline3 {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Builds a closed polyline, appending the start point when the input
    /// does not already end on it. Fewer than two points are kept as-is.
    pub fn closed(mut points: Vec<Vec3>) -> Self {
        if points.len() >= 2 && points.first() != points.last() {
            let first = points[0];
            points.push(first);
        }
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.points.first() == self.points.last()
    }

    pub fn span_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn span_starts(&self) -> &[Vec3] {
        &self.points[..self.span_count()]
    }

    /// Span-start points, plus the end point when the curve is open. Closed
    /// curves never report their shared start/end vertex twice.
    pub fn vertices(&self) -> Vec<Vec3> {
        let mut out = self.span_starts().to_vec();
        if !self.is_closed() {
            if let Some(end) = self.points.last() {
                out.push(*end);
            }
        }
        out
    }

    pub fn length(&self) -> f64 {
        self.points
            .iter()
            .tuple_windows()
            .map(|(a, b)| a.distance(b))
            .sum()
    }

    /// Point at arc length `s` from the start, clamped to the curve.
    pub fn point_at_length(&self, s: f64) -> Option<Vec3> {
        let first = *self.points.first()?;
        if s <= 0.0 {
            return Some(first);
        }
        let mut walked = 0.0;
        for (a, b) in self.points.iter().tuple_windows() {
            let seg = a.distance(b);
            if seg > 0.0 && walked + seg >= s {
                return Some(a.lerp(b, (s - walked) / seg));
            }
            walked += seg;
        }
        self.points.last().copied()
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
        }
    }

    pub fn bbox(&self) -> BBox2 {
        let mut bbox = BBox2::empty();
        for p in &self.points {
            bbox.include_point(p.xy());
        }
        bbox
    }
}
