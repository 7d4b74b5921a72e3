use terrashp_core::geom::Vec3;
use terrashp_core::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub const DOWN: Vec3 = Vec3::new(0.0, 0.0, -1.0);
    pub const UP: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Read-only terrain that answers ray queries.
pub trait SurfaceIntersector: Send + Sync {
    /// Smallest non-negative ray parameter at which `ray` meets the surface.
    fn intersect_ray(&self, ray: &Ray) -> Option<f64>;
}

/// Turns an unordered point cloud into a queryable surface.
pub trait SurfaceBuilder {
    type Surface: SurfaceIntersector;

    fn build(&self, points: &[Vec3]) -> Result<Self::Surface>;
}
