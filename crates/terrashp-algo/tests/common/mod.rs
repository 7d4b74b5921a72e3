#![allow(dead_code)]

use terrashp_algo::surface::{Ray, SurfaceIntersector};
use terrashp_core::geom::{BBox2, Polyline3, Vec2, Vec3};
use terrashp_core::model::{AttrValue, Geometry, ShapeRecord};

/// Horizontal plane at `z`, optionally limited to `extent` in plan.
pub struct FlatPlane {
    pub z: f64,
    pub extent: Option<BBox2>,
}

impl FlatPlane {
    pub fn unbounded(z: f64) -> Self {
        Self { z, extent: None }
    }

    pub fn bounded(z: f64, min: (f64, f64), max: (f64, f64)) -> Self {
        Self {
            z,
            extent: Some(BBox2::new(Vec2::new(min.0, min.1), Vec2::new(max.0, max.1))),
        }
    }
}

impl SurfaceIntersector for FlatPlane {
    fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        if ray.direction.z == 0.0 {
            return None;
        }
        let t = (self.z - ray.origin.z) / ray.direction.z;
        if t < 0.0 {
            return None;
        }
        let hit = ray.point_at(t);
        match &self.extent {
            Some(extent) if !extent.contains(hit.xy()) => None,
            _ => Some(t),
        }
    }
}

/// Several stacked planes; the nearest one along the ray wins.
pub struct Layers(pub Vec<FlatPlane>);

impl SurfaceIntersector for Layers {
    fn intersect_ray(&self, ray: &Ray) -> Option<f64> {
        self.0
            .iter()
            .filter_map(|p| p.intersect_ray(ray))
            .reduce(f64::min)
    }
}

pub fn square(x: f64, y: f64, size: f64, z: f64) -> Vec<Vec3> {
    vec![
        Vec3::new(x, y, z),
        Vec3::new(x + size, y, z),
        Vec3::new(x + size, y + size, z),
        Vec3::new(x, y + size, z),
    ]
}

pub fn polygon_record(ring: Vec<Vec3>, attributes: Vec<AttrValue>) -> ShapeRecord {
    ShapeRecord {
        geometry: Geometry::PolylineSet(vec![Polyline3::closed(ring)]),
        attributes,
    }
}

/// Attribute row with `value` at `index` and text placeholders elsewhere.
pub fn row_with(index: usize, value: AttrValue, len: usize) -> Vec<AttrValue> {
    (0..len)
        .map(|i| {
            if i == index {
                value.clone()
            } else {
                AttrValue::Text(format!("f{i}"))
            }
        })
        .collect()
}
